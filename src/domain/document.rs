use chrono::{Local, NaiveDate};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::parser::filename::ParsedFilename;
use crate::parser::slug::capitalize_first_letter;
use crate::search::Searchable;
use crate::search::sort::{SortDescriptor, Sortable};

/// Extension every renamed document ends up with.
pub const ARCHIVE_EXTENSION: &str = "pdf";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("document has no specification")]
    MissingSpecification,
    #[error("document has no tags")]
    MissingTags,
}

/// Where the bytes of a document currently live.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DownloadStatus {
    /// Only available in remote storage.
    Remote,
    Downloading { percent: f32 },
    Local,
}

/// Whether a document finished the archiving workflow.
///
/// `Untagged` documents sit in the inbox, `Tagged` ones live in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaggingStatus {
    Untagged,
    Tagged,
}

/// A scanned document known to the archive.
///
/// Identity is the `path`: two documents with the same path are the same
/// entity, whatever their other fields say. That is what lets a changed copy
/// replace the stored one in its partition.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    filename: String,
    folder: String,
    pub date: NaiveDate,
    specification: String,
    /// Names of the tags this document holds; counts live in the tag store.
    pub tags: BTreeSet<String>,
    size: Option<u64>,
    pub download_status: DownloadStatus,
    pub tagging_status: TaggingStatus,
}

impl Document {
    /// Creates a document without any parsed metadata.
    ///
    /// The date defaults to today, the specification is empty and there are
    /// no tags.
    pub fn new(
        path: impl Into<PathBuf>,
        size: Option<u64>,
        download_status: DownloadStatus,
        tagging_status: TaggingStatus,
    ) -> Self {
        Self::from_parsed(
            path,
            ParsedFilename::default(),
            size,
            download_status,
            tagging_status,
        )
    }

    /// Creates a document from the metadata recovered by the filename parser.
    ///
    /// Missing parts fall back to defaults: today's date, an empty
    /// specification and no tags. Tag names are taken as they are; interning
    /// them in the tag store is the caller's job.
    pub fn from_parsed(
        path: impl Into<PathBuf>,
        parsed: ParsedFilename,
        size: Option<u64>,
        download_status: DownloadStatus,
        tagging_status: TaggingStatus,
    ) -> Self {
        let path = path.into();
        let (filename, folder) = Self::path_parts(&path);

        Document {
            path,
            filename,
            folder,
            date: parsed.date.unwrap_or_else(|| Local::now().date_naive()),
            specification: parsed.specification.unwrap_or_default(),
            tags: parsed.tag_names.unwrap_or_default().into_iter().collect(),
            size,
            download_status,
            tagging_status,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whole filename, e.g. `scan1.pdf`.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Name of the parent folder, e.g. `2018`.
    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn specification(&self) -> &str {
        &self.specification
    }

    /// Replaces the specification.
    ///
    /// Underscores are reserved for separating tags, so they become hyphens;
    /// the result is lowercased.
    pub fn set_specification(&mut self, specification: &str) {
        self.specification = specification.replace('_', "-").to_lowercase();
    }

    /// The specification as words with a capital first letter,
    /// e.g. `blue-pullover` becomes `Blue Pullover`.
    pub fn specification_capitalized(&self) -> String {
        self.specification
            .split([' ', '-'])
            .filter(|word| !word.is_empty())
            .map(capitalize_first_letter)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Human readable size such as `1.5 MB`, if the size is known.
    pub fn size_label(&self) -> Option<String> {
        self.size.map(format_byte_count)
    }

    /// Returns a copy of this document pointing at `new_path`.
    ///
    /// Filename and folder follow the new path; everything else is kept.
    /// Nothing on disk changes.
    pub fn with_path(&self, new_path: impl Into<PathBuf>) -> Document {
        let path = new_path.into();
        let (filename, folder) = Self::path_parts(&path);

        Document {
            path,
            filename,
            folder,
            ..self.clone()
        }
    }

    /// Folder and filename this document gets under the naming scheme
    /// `YYYY-MM-DD--specification__tag1_tag2.pdf`.
    ///
    /// Tags are sorted and joined with `_`; the folder is the year.
    /// Fails with [`DocumentError::MissingTags`] or
    /// [`DocumentError::MissingSpecification`] when that part is empty.
    pub fn renaming_path(&self) -> Result<(String, String), DocumentError> {
        if self.tags.is_empty() {
            return Err(DocumentError::MissingTags);
        }
        if self.specification.is_empty() {
            return Err(DocumentError::MissingSpecification);
        }

        let date = self.date.format("%Y-%m-%d").to_string();
        let tags = self.tags.iter().map(String::as_str).collect::<Vec<_>>().join("_");

        let filename = format!(
            "{date}--{}__{tags}.{ARCHIVE_EXTENSION}",
            self.specification
        );
        let folder = date.chars().take(4).collect();

        Ok((folder, filename))
    }

    /// Sort descriptors for showing documents: oldest first, and on equal
    /// dates by filename in reverse.
    pub fn display_order() -> [SortDescriptor<DocumentSortKey>; 2] {
        [
            SortDescriptor::ascending(DocumentSortKey::Date),
            SortDescriptor::descending(DocumentSortKey::Filename),
        ]
    }

    fn path_parts(path: &Path) -> (String, String) {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let folder = path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        (filename, folder)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filename)
    }
}

impl Searchable for Document {
    fn search_term(&self) -> &str {
        &self.filename
    }
}

/// Keys a list of documents can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSortKey {
    Date,
    Filename,
    Specification,
}

impl Sortable for Document {
    type Key = DocumentSortKey;

    fn compare_by(&self, other: &Self, key: DocumentSortKey) -> Ordering {
        match key {
            DocumentSortKey::Date => self.date.cmp(&other.date),
            DocumentSortKey::Filename => self.filename.cmp(&other.filename),
            DocumentSortKey::Specification => self.specification.cmp(&other.specification),
        }
    }
}

fn format_byte_count(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];

    match bytes {
        1 => return "1 byte".to_string(),
        0..1000 => return format!("{bytes} bytes"),
        _ => {}
    }

    let mut value = bytes as f64 / 1000.0;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
