use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::search::Searchable;
use crate::search::sort::Sortable;

/// A snapshot of one entry in the tag vocabulary.
///
/// Tags are handed out by [`TagStore`](crate::store::tags::TagStore) as copies:
/// the count reflects the store at the time of the call and is never updated
/// afterwards. Equality, hashing and ordering look at `name` only, so two
/// snapshots of the same tag taken at different times compare equal.
#[derive(Debug, Clone)]
pub struct Tag {
    pub name: String,
    pub count: usize,
}

impl Tag {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.count)
    }
}

impl Searchable for Tag {
    fn search_term(&self) -> &str {
        &self.name
    }
}

/// Keys a list of tags can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSortKey {
    Name,
    Count,
}

impl Sortable for Tag {
    type Key = TagSortKey;

    fn compare_by(&self, other: &Self, key: TagSortKey) -> Ordering {
        match key {
            TagSortKey::Name => self.name.cmp(&other.name),
            TagSortKey::Count => self.count.cmp(&other.count),
        }
    }
}
