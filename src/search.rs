//! Substring search over in-memory collections.
//!
//! Anything that exposes a single search string can be filtered: documents
//! are searched by filename, tags by name. Matching is a case-insensitive
//! substring test, and a list of terms is combined with AND by narrowing the
//! candidates one term at a time.
//!
//! # Usage
//!
//! ```rust
//! use archive_core::search::{Searchable, filter_by_all};
//!
//! struct Entry(&'static str);
//!
//! impl Searchable for Entry {
//!     fn search_term(&self) -> &str {
//!         self.0
//!     }
//! }
//!
//! let entries = vec![
//!     Entry("2018 05 12 kitchen table bill ikea"),
//!     Entry("2018 01 07 tom tailor shirt bill"),
//! ];
//! let found = filter_by_all(&["shirt", "BILL"], entries);
//! assert_eq!(found.len(), 1);
//! ```

pub mod sort;

use crate::domain::Document;

/// An element that can be found by [`filter_by`].
pub trait Searchable {
    /// The string search terms are matched against.
    fn search_term(&self) -> &str;
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn search_term(&self) -> &str {
        (**self).search_term()
    }
}

/// Which part of the archive a query looks at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchScope {
    /// The whole archive.
    All,
    /// Only documents whose folder is this year, e.g. `"2018"`.
    Year(String),
}

impl SearchScope {
    pub fn year(year: impl Into<String>) -> Self {
        SearchScope::Year(year.into())
    }

    /// Returns whether `document` lies inside this scope.
    pub fn contains(&self, document: &Document) -> bool {
        match self {
            SearchScope::All => true,
            SearchScope::Year(year) => document.folder() == year,
        }
    }
}

/// Keeps the elements whose search term contains `term`, ignoring case.
pub fn filter_by<T, I>(term: &str, elements: I) -> Vec<T>
where
    T: Searchable,
    I: IntoIterator<Item = T>,
{
    let needle = term.to_lowercase();
    elements
        .into_iter()
        .filter(|element| element.search_term().to_lowercase().contains(&needle))
        .collect()
}

/// Keeps the elements whose search term contains every one of `terms`.
///
/// Blank terms are skipped, so an empty or blank list keeps everything.
pub fn filter_by_all<T, I, S>(terms: &[S], elements: I) -> Vec<T>
where
    T: Searchable,
    I: IntoIterator<Item = T>,
    S: AsRef<str>,
{
    let mut current: Vec<T> = elements.into_iter().collect();
    for term in terms.iter().map(AsRef::as_ref) {
        if term.trim().is_empty() {
            continue;
        }
        current = filter_by(term, current);
    }
    current
}
