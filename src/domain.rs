//! Records the archive is made of: documents and tag snapshots.

pub mod document;
pub mod tag;

pub use document::{
    ARCHIVE_EXTENSION, Document, DocumentError, DocumentSortKey, DownloadStatus, TaggingStatus,
};
pub use tag::{Tag, TagSortKey};
