use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Document(#[from] crate::domain::DocumentError),

    #[error("rename target already exists: {0}")]
    RenameTargetExists(PathBuf),

    #[error("failed to move document to {path}: {source}")]
    RenameIoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document not found: {0}")]
    DocumentNotFound(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;
