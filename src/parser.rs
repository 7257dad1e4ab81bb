//! Recovering metadata from filenames and document text.

pub mod date;
pub mod filename;
pub mod slug;

pub use date::{DateExtractor, DateLocale, ExtractedDate};
pub use filename::{NameParser, ParsedFilename};
