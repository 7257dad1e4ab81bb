//! Multi-key sorting for tags and documents.

use std::cmp::Ordering;

/// A type that can be compared by one of several keys.
pub trait Sortable {
    type Key: Copy;

    fn compare_by(&self, other: &Self, key: Self::Key) -> Ordering;
}

/// One sort criterion: a key and a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortDescriptor<K> {
    pub key: K,
    pub ascending: bool,
}

impl<K> SortDescriptor<K> {
    pub fn ascending(key: K) -> Self {
        Self {
            key,
            ascending: true,
        }
    }

    pub fn descending(key: K) -> Self {
        Self {
            key,
            ascending: false,
        }
    }
}

/// Sorts `items` by the descriptors in order; later descriptors only break
/// ties left by earlier ones. The sort is stable.
pub fn sort_by_descriptors<T: Sortable>(items: &mut [T], descriptors: &[SortDescriptor<T::Key>]) {
    items.sort_by(|lhs, rhs| {
        for descriptor in descriptors {
            let ordering = lhs.compare_by(rhs, descriptor.key);
            let ordering = if descriptor.ascending {
                ordering
            } else {
                ordering.reverse()
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}
