//! The archive facade: both document partitions and the tag vocabulary.
//!
//! [`Archive`] is the only place where documents and tag counts change
//! together. Every operation that touches a document's tags also adds or
//! releases the matching references in the [`TagStore`], so a tag's count
//! always equals the number of stored documents holding it (plus whatever
//! was seeded by hand).

pub mod enrich;
pub mod rename;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::MutexGuard;

use crate::config::ArchiveConfig;
use crate::domain::{Document, DownloadStatus, Tag, TaggingStatus};
use crate::error::{ArchiveError, ArchiveResult};
use crate::parser::NameParser;
use crate::parser::slug::slugify;
use crate::search::sort::sort_by_descriptors;
use crate::search::{SearchScope, filter_by_all};
use crate::store::documents::Documents;
use crate::store::{DocumentStore, TagStore};

use enrich::{ContentTagger, Enricher, EnrichmentPool, ParseOptions, TextExtractor};
use rename::FileMover;

/// State shared with enrichment workers.
pub(crate) struct Shared {
    pub(crate) parser: NameParser,
    pub(crate) tags: TagStore,
    pub(crate) untagged: DocumentStore,
    pub(crate) tagged: DocumentStore,
}

impl Shared {
    fn partition(&self, status: TaggingStatus) -> &DocumentStore {
        match status {
            TaggingStatus::Untagged => &self.untagged,
            TaggingStatus::Tagged => &self.tagged,
        }
    }

    /// Locks both partitions in the fixed order.
    fn lock_both(&self) -> (MutexGuard<'_, Documents>, MutexGuard<'_, Documents>) {
        let untagged = self.untagged.lock();
        let tagged = self.tagged.lock();
        (untagged, tagged)
    }

    fn release_tags(&self, document: &Document) {
        for name in &document.tags {
            self.tags.remove(name);
        }
    }
}

struct Enrichment {
    pool: EnrichmentPool,
    enricher: Arc<Enricher>,
}

/// Inbox and archive of scanned documents.
///
/// Untagged documents wait in the inbox until [`Archive::archive`] moves
/// them into the tagged partition. A path lives in at most one partition.
pub struct Archive {
    shared: Arc<Shared>,
    enrichment: Option<Enrichment>,
    slugify_on_rename: bool,
    archive_root: PathBuf,
}

impl Archive {
    /// Creates an empty archive without content enrichment.
    pub fn new(config: &ArchiveConfig) -> Self {
        let shared = Shared {
            parser: config.name_parser(),
            tags: TagStore::new(),
            untagged: DocumentStore::new(TaggingStatus::Untagged),
            tagged: DocumentStore::new(TaggingStatus::Tagged),
        };

        Archive {
            shared: Arc::new(shared),
            enrichment: None,
            slugify_on_rename: config.slugify_on_rename,
            archive_root: config.archive_root.clone(),
        }
    }

    /// Creates an empty archive whose [`ParseOptions`] requests are served by
    /// `config.enrichment_workers` threads.
    pub fn with_enrichment(
        config: &ArchiveConfig,
        extractor: Arc<dyn TextExtractor>,
        tagger: Arc<dyn ContentTagger>,
    ) -> Self {
        let mut archive = Self::new(config);
        let enricher = Enricher {
            shared: Arc::clone(&archive.shared),
            extractor,
            tagger,
        };
        archive.enrichment = Some(Enrichment {
            pool: EnrichmentPool::new(config.enrichment_workers),
            enricher: Arc::new(enricher),
        });
        archive
    }

    /// Parses `path`, interns its tags and stores the document in the
    /// partition for `tagging_status`.
    ///
    /// Adding a path that is already stored replaces that document and
    /// releases its tags first. With non-empty `options` an enrichment job is
    /// queued; the returned document does not reflect it yet.
    pub fn add(
        &self,
        path: impl Into<PathBuf>,
        size: Option<u64>,
        download_status: DownloadStatus,
        tagging_status: TaggingStatus,
        options: ParseOptions,
    ) -> Document {
        let path = path.into();
        let parsed = self.shared.parser.parse(&path);
        let document = Document::from_parsed(path, parsed, size, download_status, tagging_status);

        {
            let (mut untagged, mut tagged) = self.shared.lock_both();
            for previous in [untagged.remove(document.path()), tagged.remove(document.path())]
                .into_iter()
                .flatten()
            {
                self.shared.release_tags(&previous);
            }

            for name in &document.tags {
                self.shared.tags.add(name);
            }

            let partition = match tagging_status {
                TaggingStatus::Untagged => &mut untagged,
                TaggingStatus::Tagged => &mut tagged,
            };
            partition.insert(document.path().to_path_buf(), document.clone());
        }

        tracing::debug!(
            path = %document.path().display(),
            status = ?tagging_status,
            tags = document.tags.len(),
            "document added"
        );

        if !options.is_empty() {
            self.schedule_enrichment(document.path(), options);
        }

        document
    }

    fn schedule_enrichment(&self, path: &Path, options: ParseOptions) {
        match &self.enrichment {
            Some(enrichment) => {
                enrich::schedule(&enrichment.pool, &enrichment.enricher, path.to_path_buf(), options)
            }
            None => tracing::debug!(
                path = %path.display(),
                "content enrichment requested but not configured"
            ),
        }
    }

    /// Removes the given documents and releases their tags.
    ///
    /// Each document is looked up by path in the partition of its tagging
    /// status; documents not stored there are skipped, so nothing is
    /// released twice.
    pub fn remove<'a>(&self, documents: impl IntoIterator<Item = &'a Document>) {
        let (mut untagged, mut tagged) = self.shared.lock_both();

        for document in documents {
            let partition = match document.tagging_status {
                TaggingStatus::Untagged => &mut untagged,
                TaggingStatus::Tagged => &mut tagged,
            };
            if let Some(stored) = partition.remove(document.path()) {
                self.shared.release_tags(&stored);
                tracing::debug!(path = %stored.path().display(), "document removed");
            }
        }
    }

    /// Removes every document with `status`.
    pub fn remove_all(&self, status: TaggingStatus) {
        let mut partition = self.shared.partition(status).lock();
        let count = partition.len();

        for (_, document) in partition.drain() {
            self.shared.release_tags(&document);
        }
        tracing::debug!(status = ?status, count, "partition cleared");
    }

    /// Replaces the stored document with the same path.
    ///
    /// The document goes into the partition of its tagging status and is
    /// removed from the other one. Tag counts follow the difference between
    /// the stored version and `document`.
    pub fn update(&self, document: Document) -> Document {
        let (mut untagged, mut tagged) = self.shared.lock_both();
        let (target, other) = match document.tagging_status {
            TaggingStatus::Untagged => (&mut untagged, &mut tagged),
            TaggingStatus::Tagged => (&mut tagged, &mut untagged),
        };

        if let Some(stale) = other.remove(document.path()) {
            self.shared.release_tags(&stale);
        }

        let previous = target.insert(document.path().to_path_buf(), document.clone());
        let previous_tags = previous.map(|previous| previous.tags).unwrap_or_default();

        for name in document.tags.difference(&previous_tags) {
            self.shared.tags.add(name);
        }
        for name in previous_tags.difference(&document.tags) {
            self.shared.tags.remove(name);
        }

        document
    }

    /// Re-reads the document at `path` from its filename, e.g. after the
    /// download status changed. Same as [`Archive::add`], including the
    /// enrichment requested by `options`.
    pub fn update_from(
        &self,
        path: impl Into<PathBuf>,
        size: Option<u64>,
        download_status: DownloadStatus,
        tagging_status: TaggingStatus,
        options: ParseOptions,
    ) -> Document {
        self.add(path, size, download_status, tagging_status, options)
    }

    /// Moves `document` from the inbox into the tagged partition.
    ///
    /// Both partitions stay locked for the move, so the document is never
    /// visible in neither or both. An already tagged document is returned
    /// as stored.
    pub fn archive(&self, document: &Document) -> ArchiveResult<Document> {
        let (mut untagged, mut tagged) = self.shared.lock_both();

        if let Some(mut moved) = untagged.remove(document.path()) {
            moved.tagging_status = TaggingStatus::Tagged;
            tagged.insert(moved.path().to_path_buf(), moved.clone());
            tracing::info!(path = %moved.path().display(), "document archived");
            return Ok(moved);
        }

        tagged
            .get(document.path())
            .cloned()
            .ok_or_else(|| ArchiveError::DocumentNotFound(document.path().to_path_buf()))
    }

    /// Documents with `status` inside `scope` whose filename contains every
    /// term, oldest first.
    pub fn get<S: AsRef<str>>(
        &self,
        scope: &SearchScope,
        terms: &[S],
        status: TaggingStatus,
    ) -> Vec<Document> {
        let in_scope = self
            .shared
            .partition(status)
            .snapshot()
            .into_iter()
            .filter(|document| scope.contains(document));

        let mut found = filter_by_all(terms, in_scope);
        sort_by_descriptors(&mut found, &Document::display_order());
        found
    }

    /// Stored copy of the document at `path`, from either partition.
    pub fn document(&self, path: &Path) -> Option<Document> {
        self.shared
            .untagged
            .get(path)
            .or_else(|| self.shared.tagged.get(path))
    }

    /// Adds the tag `name` to the stored `document`.
    pub fn add_tag(&self, name: &str, document: &Document) -> ArchiveResult<Document> {
        self.with_stored(document, |stored, tags| {
            if stored.tags.insert(name.to_string()) {
                tags.add(name);
            }
        })
    }

    /// Removes the tag `name` from the stored `document`.
    pub fn remove_tag(&self, name: &str, document: &Document) -> ArchiveResult<Document> {
        self.with_stored(document, |stored, tags| {
            if stored.tags.remove(name) {
                tags.remove(name);
            }
        })
    }

    /// Makes the tags of the stored `document` exactly `names`.
    ///
    /// Only names that appear or disappear change counts.
    pub fn set_tags<I, S>(&self, names: I, document: &Document) -> ArchiveResult<Document>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let wanted: BTreeSet<String> = names.into_iter().map(Into::into).collect();

        self.with_stored(document, |stored, tags| {
            for name in wanted.difference(&stored.tags) {
                tags.add(name);
            }
            for name in stored.tags.difference(&wanted) {
                tags.remove(name);
            }
            stored.tags = wanted;
        })
    }

    /// Runs `change` on the stored copy of `document` while its partition is
    /// locked and returns the changed copy.
    fn with_stored(
        &self,
        document: &Document,
        change: impl FnOnce(&mut Document, &TagStore),
    ) -> ArchiveResult<Document> {
        let mut partition = self.shared.partition(document.tagging_status).lock();
        let stored = partition
            .get_mut(document.path())
            .ok_or_else(|| ArchiveError::DocumentNotFound(document.path().to_path_buf()))?;

        change(stored, &self.shared.tags);
        Ok(stored.clone())
    }

    /// Tags whose name contains every term; all tags for no terms.
    pub fn available_tags<S: AsRef<str>>(&self, terms: &[S]) -> Vec<Tag> {
        self.shared.tags.available(terms)
    }

    pub fn tag(&self, name: &str) -> Option<Tag> {
        self.shared.tags.get(name)
    }

    pub fn tags(&self) -> &TagStore {
        &self.shared.tags
    }

    /// Year folders of the tagged partition, sorted.
    pub fn years(&self) -> Vec<String> {
        let years: BTreeSet<String> = self
            .shared
            .tagged
            .snapshot()
            .into_iter()
            .map(|document| document.folder().to_string())
            .filter(|folder| !folder.is_empty())
            .collect();
        years.into_iter().collect()
    }

    pub fn len(&self, status: TaggingStatus) -> usize {
        self.shared.partition(status).len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.untagged.is_empty() && self.shared.tagged.is_empty()
    }

    /// Moves the stored `document` to its canonical place below
    /// `archive_root` and stores it under the new path.
    ///
    /// The target is `archive_root/<year>/<date>--<specification>__<tags>.pdf`.
    /// Tag counts do not change.
    ///
    /// # Errors
    /// - [`DocumentError`](crate::domain::DocumentError) when tags or
    ///   specification are missing
    /// - [`ArchiveError::RenameTargetExists`] when another file or a document
    ///   stored in either partition already has the target path
    /// - [`ArchiveError::RenameIoFailure`] when the move itself fails
    /// - [`ArchiveError::DocumentNotFound`] when `document` is not stored
    pub fn rename(
        &self,
        document: &Document,
        archive_root: &Path,
        mover: &dyn FileMover,
    ) -> ArchiveResult<Document> {
        let (mut untagged, mut tagged) = self.shared.lock_both();
        let (partition, other) = match document.tagging_status {
            TaggingStatus::Untagged => (&mut untagged, &tagged),
            TaggingStatus::Tagged => (&mut tagged, &untagged),
        };
        let stored = partition
            .get(document.path())
            .cloned()
            .ok_or_else(|| ArchiveError::DocumentNotFound(document.path().to_path_buf()))?;

        let mut renamed = stored.clone();
        if self.slugify_on_rename {
            renamed.set_specification(&slugify(stored.specification()));
        }

        let (folder, filename) = renamed.renaming_path()?;
        let target = archive_root.join(folder).join(filename);
        if target == stored.path() {
            return Ok(stored);
        }

        if mover.exists(&target) || partition.contains_key(&target) || other.contains_key(&target)
        {
            tracing::warn!(path = %target.display(), "rename target already exists");
            return Err(ArchiveError::RenameTargetExists(target));
        }

        mover
            .move_file(stored.path(), &target)
            .map_err(|source| {
                tracing::warn!(
                    from = %stored.path().display(),
                    to = %target.display(),
                    error = %source,
                    "failed to move document"
                );
                ArchiveError::RenameIoFailure {
                    path: target.clone(),
                    source,
                }
            })?;

        let renamed = renamed.with_path(&target);
        partition.remove(stored.path());
        partition.insert(target, renamed.clone());

        tracing::info!(
            from = %stored.path().display(),
            to = %renamed.path().display(),
            "document renamed"
        );
        Ok(renamed)
    }

    /// Root folder configured for [`Archive::rename_into_root`].
    pub fn archive_root(&self) -> &Path {
        &self.archive_root
    }

    /// [`Archive::rename`] below the configured archive root.
    pub fn rename_into_root(
        &self,
        document: &Document,
        mover: &dyn FileMover,
    ) -> ArchiveResult<Document> {
        self.rename(document, &self.archive_root, mover)
    }

    /// Blocks until every queued enrichment job has finished.
    pub fn wait_for_enrichment(&self) {
        if let Some(enrichment) = &self.enrichment {
            enrichment.pool.wait_idle();
        }
    }
}

impl Default for Archive {
    fn default() -> Self {
        Self::new(&ArchiveConfig::default())
    }
}
