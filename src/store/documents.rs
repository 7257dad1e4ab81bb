use parking_lot::MutexGuard;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::{Document, TaggingStatus};
use crate::store::guard::Guarded;

pub(crate) type Documents = HashMap<PathBuf, Document>;

/// One partition of the archive: all documents with the same tagging status,
/// keyed by path.
///
/// The store itself does not touch tag counts; the
/// [`Archive`](crate::archive::Archive) keeps those in sync.
#[derive(Debug)]
pub struct DocumentStore {
    status: TaggingStatus,
    documents: Guarded<Documents>,
}

impl DocumentStore {
    pub fn new(status: TaggingStatus) -> Self {
        Self {
            status,
            documents: Guarded::default(),
        }
    }

    pub fn status(&self) -> TaggingStatus {
        self.status
    }

    /// Inserts or replaces the document with the same path and returns the
    /// replaced one.
    pub fn insert(&self, document: Document) -> Option<Document> {
        self.documents
            .mutate(|documents| documents.insert(document.path().to_path_buf(), document))
    }

    pub fn get(&self, path: &Path) -> Option<Document> {
        self.documents.read(|documents| documents.get(path).cloned())
    }

    pub fn remove(&self, path: &Path) -> Option<Document> {
        self.documents.mutate(|documents| documents.remove(path))
    }

    /// Empties the partition and returns what it held.
    pub fn drain(&self) -> Vec<Document> {
        self.documents
            .mutate(|documents| documents.drain().map(|(_, document)| document).collect())
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.documents.read(|documents| documents.contains_key(path))
    }

    pub fn len(&self) -> usize {
        self.documents.read(HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies of all documents, in no particular order.
    pub fn snapshot(&self) -> Vec<Document> {
        self.documents
            .read(|documents| documents.values().cloned().collect())
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Documents> {
        self.documents.lock()
    }
}
