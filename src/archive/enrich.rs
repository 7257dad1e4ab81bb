//! Content enrichment: re-reading dates and tags from document text.
//!
//! Text extraction and tagging are collaborators behind the
//! [`TextExtractor`] and [`ContentTagger`] traits. Jobs run on an
//! [`EnrichmentPool`] after [`Archive::add`](crate::archive::Archive::add)
//! has returned, and write back under the same locks the archive uses.

use bitflags::bitflags;
use parking_lot::{Condvar, Mutex};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};

use super::Shared;

bitflags! {
    /// What to read from a document's text after it was added.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ParseOptions: u8 {
        /// Replace the date with the first date found in the text.
        const CONTENT_DATE = 1;
        /// Add tags found in the text, if they already exist.
        const CONTENT_TAGS = 1 << 1;
    }
}

/// Reads the full text of a document, e.g. from a PDF.
pub trait TextExtractor: Send + Sync {
    /// `None` when the document has no text or cannot be read.
    fn extract(&self, path: &Path) -> Option<String>;
}

/// Proposes tag names for a document text.
pub trait ContentTagger: Send + Sync {
    fn tag_names(&self, text: &str) -> HashSet<String>;
}

/// Proposes every lowercased alphanumeric word of at least `min_length`
/// characters.
#[derive(Debug, Clone, Copy)]
pub struct WordTagger {
    pub min_length: usize,
}

impl WordTagger {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl ContentTagger for WordTagger {
    fn tag_names(&self, text: &str) -> HashSet<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|word| word.chars().count() >= self.min_length)
            .map(str::to_lowercase)
            .collect()
    }
}

/// Everything a job needs besides the document path.
pub(crate) struct Enricher {
    pub(crate) shared: Arc<Shared>,
    pub(crate) extractor: Arc<dyn TextExtractor>,
    pub(crate) tagger: Arc<dyn ContentTagger>,
}

impl Enricher {
    /// Reads the text of `path` and writes back date and known tags.
    ///
    /// The document may have moved partitions or been removed while the text
    /// was extracted; it is looked up again under both partition locks.
    pub(crate) fn run(&self, path: &Path, options: ParseOptions) {
        let Some(text) = self.extractor.extract(path) else {
            tracing::debug!(path = %path.display(), "no text extracted, skipping enrichment");
            return;
        };

        let found_date = if options.contains(ParseOptions::CONTENT_DATE) {
            self.shared.parser.dates().extract(&text)
        } else {
            None
        };
        let proposed = if options.contains(ParseOptions::CONTENT_TAGS) {
            self.tagger.tag_names(&text)
        } else {
            HashSet::new()
        };

        let mut untagged = self.shared.untagged.lock();
        let mut tagged = self.shared.tagged.lock();
        let Some(document) = untagged
            .get_mut(path)
            .or_else(|| tagged.get_mut(path))
        else {
            tracing::debug!(path = %path.display(), "document gone before enrichment finished");
            return;
        };

        if let Some(found) = &found_date {
            document.date = found.date;
        }

        let mut confirmed = Vec::new();
        for name in proposed {
            if document.tags.contains(&name) {
                continue;
            }
            if self.shared.tags.confirm(&name).is_some() {
                confirmed.push(name.clone());
                document.tags.insert(name);
            }
        }

        tracing::debug!(
            path = %path.display(),
            date = ?found_date.as_ref().map(|found| found.date),
            tags = ?confirmed,
            "document enriched"
        );
    }
}

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct Pending {
    count: Mutex<usize>,
    idle: Condvar,
}

impl Pending {
    fn start(&self) {
        *self.count.lock() += 1;
    }

    fn finish(&self) {
        let mut count = self.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    fn wait(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.idle.wait(&mut count);
        }
    }
}

/// A fixed set of worker threads running submitted jobs in FIFO order.
///
/// Dropping the pool closes the queue and joins the workers after they have
/// finished every job already submitted.
pub struct EnrichmentPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    pending: Arc<Pending>,
}

impl EnrichmentPool {
    /// Spawns `workers` threads, at least one.
    pub fn new(workers: usize) -> Self {
        let (sender, receiver) = channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));
        let pending = Arc::new(Pending::default());

        let workers = (0..workers.max(1))
            .map(|_| {
                let receiver = Arc::clone(&receiver);
                let pending = Arc::clone(&pending);
                thread::spawn(move || worker_loop(&receiver, &pending))
            })
            .collect();

        Self {
            sender: Some(sender),
            workers,
            pending,
        }
    }

    pub fn submit(&self, job: impl FnOnce() + Send + 'static) {
        let Some(sender) = &self.sender else {
            tracing::warn!("enrichment pool is shut down, dropping job");
            return;
        };

        self.pending.start();
        if sender.send(Box::new(job)).is_err() {
            self.pending.finish();
            tracing::warn!("enrichment workers are gone, dropping job");
        }
    }

    /// Blocks until every submitted job has finished.
    pub fn wait_idle(&self) {
        self.pending.wait();
    }

    pub fn shutdown(&mut self) {
        // dropping the sender ends the worker loops
        self.sender.take();

        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for EnrichmentPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(receiver: &Mutex<Receiver<Job>>, pending: &Pending) {
    loop {
        let job = receiver.lock().recv();
        let Ok(job) = job else {
            break;
        };

        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::warn!("enrichment job panicked");
        }
        pending.finish();
    }
}

/// Submits an enrichment job for `path`.
pub(crate) fn schedule(
    pool: &EnrichmentPool,
    enricher: &Arc<Enricher>,
    path: PathBuf,
    options: ParseOptions,
) {
    let enricher = Arc::clone(enricher);
    pool.submit(move || enricher.run(&path, options));
}
