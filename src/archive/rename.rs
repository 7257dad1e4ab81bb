use std::fs;
use std::io;
use std::path::Path;

/// Moves document files on disk for [`Archive::rename`](crate::archive::Archive::rename).
pub trait FileMover {
    fn exists(&self, path: &Path) -> bool;

    /// Moves `from` to `to`, creating missing parent folders of `to`.
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`FileMover`] for the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileMover;

impl FileMover for LocalFileMover {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        if let Some(folder) = to.parent() {
            fs::create_dir_all(folder)?;
        }
        fs::rename(from, to)
    }
}
