use std::collections::HashMap;

use crate::domain::Tag;
use crate::search::filter_by_all;
use crate::store::guard::Guarded;

/// The tag vocabulary: every known tag name with its reference count.
///
/// A count is the number of documents holding the tag plus whatever was
/// seeded with [`TagStore::add_count`]. A name whose count drops to zero is
/// removed; it is never kept around at zero.
#[derive(Debug, Default)]
pub struct TagStore {
    counts: Guarded<HashMap<String, usize>>,
}

impl TagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more reference to `name`, creating the tag if needed.
    pub fn add(&self, name: &str) -> Tag {
        self.add_count(name, 1)
    }

    /// Adds `count` references to `name` and returns a snapshot of the tag.
    ///
    /// A count of zero never creates an entry.
    pub fn add_count(&self, name: &str, count: usize) -> Tag {
        self.counts.mutate(|counts| {
            if count == 0 {
                return Tag::new(name, counts.get(name).copied().unwrap_or_default());
            }
            let entry = counts.entry(name.to_string()).or_default();
            *entry += count;
            Tag::new(name, *entry)
        })
    }

    /// Adds one reference to `name` only if the tag is already known.
    ///
    /// Check and increment happen under one lock, so a tag that is released
    /// concurrently is never resurrected.
    pub fn confirm(&self, name: &str) -> Option<Tag> {
        self.counts.mutate(|counts| {
            let entry = counts.get_mut(name)?;
            *entry += 1;
            Some(Tag::new(name, *entry))
        })
    }

    /// Drops one reference to `name`. Unknown names are ignored.
    pub fn remove(&self, name: &str) {
        self.counts.mutate(|counts| {
            let Some(entry) = counts.get_mut(name) else {
                return;
            };
            *entry = entry.saturating_sub(1);
            if *entry == 0 {
                counts.remove(name);
                tracing::trace!(tag = name, "tag released");
            }
        });
    }

    pub fn get(&self, name: &str) -> Option<Tag> {
        self.counts
            .read(|counts| counts.get(name).map(|count| Tag::new(name, *count)))
    }

    /// Current count of `name`, zero when unknown.
    pub fn count(&self, name: &str) -> usize {
        self.counts
            .read(|counts| counts.get(name).copied().unwrap_or_default())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.counts.read(|counts| counts.contains_key(name))
    }

    pub fn len(&self) -> usize {
        self.counts.read(HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All tags, sorted by name.
    pub fn all(&self) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self
            .counts
            .snapshot()
            .into_iter()
            .map(|(name, count)| Tag::new(name, count))
            .collect();
        tags.sort();
        tags
    }

    /// Tags whose name contains every term, ignoring case; all tags when the
    /// terms are empty or blank. Sorted by name.
    pub fn available<S: AsRef<str>>(&self, terms: &[S]) -> Vec<Tag> {
        filter_by_all(terms, self.all())
    }
}
