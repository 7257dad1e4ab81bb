//! # archive_core
//!
//! The data and parsing core of a personal document archive: scanned files
//! carry their metadata in the filename, and this library recovers it, keeps
//! the documents in an inbox and an archive, and maintains a reference-counted
//! tag vocabulary.
//!
//! ## Features
//!
//! - **Filename Parsing**: Dates, specifications and tags from names such as
//!   `2010-05-12--example-description__tag1_tag2.pdf`, with a locale-aware
//!   fuzzy date extractor for loosely named scans
//! - **Tag Vocabulary**: Counts that always match the documents holding a tag
//! - **Inbox and Archive**: Two partitions with an explicit `archive` move
//! - **Search**: Case-insensitive AND-of-substrings over documents and tags
//! - **Content Enrichment**: Background workers that read dates and known tags
//!   from document text
//! - **Renaming**: Canonical filenames and year folders, moved through a
//!   pluggable [`FileMover`](archive::rename::FileMover)
//!
//! ## Quick Start
//!
//! ```rust
//! use archive_core::{Archive, ArchiveConfig, SearchScope};
//! use archive_core::archive::enrich::ParseOptions;
//! use archive_core::domain::{DownloadStatus, TaggingStatus};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = Archive::new(&ArchiveConfig::default());
//!
//! let document = archive.add(
//!     "/inbox/2018-05-12--kitchen-table__bill_ikea.pdf",
//!     Some(2048),
//!     DownloadStatus::Local,
//!     TaggingStatus::Untagged,
//!     ParseOptions::empty(),
//! );
//! assert_eq!(document.specification(), "kitchen-table");
//! assert_eq!(archive.tags().count("ikea"), 1);
//!
//! archive.archive(&document)?;
//! let found = archive.get(&SearchScope::All, &["table"], TaggingStatus::Tagged);
//! assert_eq!(found.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **[`parser`]**: Date extraction, filename parsing and slug helpers
//! - **[`domain`]**: Documents and tag snapshots
//! - **[`store`]**: Lock-guarded tag vocabulary and document partitions
//! - **[`search`]**: Substring filters, scopes and sort descriptors
//! - **[`archive`]**: The facade tying stores, enrichment and renaming together
//! - **[`config`]**: TOML configuration
//! - **[`error`]**: Unified error handling
//!
//! ## Naming Scheme
//!
//! A renamed document is stored as
//! `<root>/YYYY/YYYY-MM-DD--specification__tag1_tag2.pdf`. Tags are sorted
//! and joined with `_`, which is why specifications never contain
//! underscores. Parsing a canonical name and renaming it again yields the same
//! name.
//!
//! ```rust
//! use archive_core::parser::NameParser;
//!
//! let parsed = NameParser::default().parse("2010-05-12--example-description__tag1_tag2.pdf");
//! assert_eq!(parsed.specification.as_deref(), Some("example-description"));
//! assert_eq!(parsed.tag_names, Some(vec!["tag1".to_string(), "tag2".to_string()]));
//! ```
//!
//! ## Error Handling
//!
//! Parsing never fails: missing parts come back as `None`. Operations that
//! can fail return [`ArchiveResult<T>`], which wraps [`ArchiveError`];
//! document errors convert automatically so `?` works throughout.
//!
//! ```rust,no_run
//! use archive_core::{Archive, ArchiveResult};
//! use archive_core::archive::rename::LocalFileMover;
//! use archive_core::domain::Document;
//! use std::path::Path;
//!
//! fn file_away(archive: &Archive, document: &Document) -> ArchiveResult<Document> {
//!     let archived = archive.archive(document)?;
//!     archive.rename(&archived, Path::new("/srv/archive"), &LocalFileMover)
//! }
//! ```

pub mod archive;
pub mod config;
pub mod domain;
pub mod error;
pub mod parser;
pub mod search;
pub mod store;

/// Re-exports the most commonly used types for convenience.
pub use archive::Archive;
pub use config::ArchiveConfig;
pub use error::{ArchiveError, ArchiveResult};
pub use search::SearchScope;
