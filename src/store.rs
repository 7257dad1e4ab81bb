//! In-memory stores shared between callers and enrichment workers.
//!
//! Lock order, whenever more than one lock is held: untagged partition,
//! then tagged partition, then the tag store.

pub mod documents;
pub mod guard;
pub mod tags;

pub use documents::DocumentStore;
pub use guard::Guarded;
pub use tags::TagStore;
