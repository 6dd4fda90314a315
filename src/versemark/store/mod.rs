//! # Corpus Storage
//!
//! The [`CorpusStore`] trait abstracts where the canonical JSON corpus
//! lives so the command layer never touches persistence details.
//!
//! ## Implementations
//!
//! - [`fs::FileCorpus`]: production storage. One JSON file per corpus
//!   domain (`alma.json`, `conference.json`, ...) inside the corpus
//!   directory, each mapping reference string to entry. The whole corpus is
//!   loaded into memory on open; `flush` rewrites only dirty domains, via
//!   write-to-temp-then-rename so an interrupted run never corrupts the
//!   previous corpus.
//!
//! - [`memory::InMemoryCorpus`]: in-memory storage for tests.
//!
//! ## Ordering
//!
//! `list` returns entries in canonical document order (the `Ord` on
//! [`Reference`]). The synchronizer depends on this to tell real corpus
//! changes apart from iteration noise, so both implementations keep their
//! entries in a `BTreeMap`.

use crate::error::Result;
use crate::model::CorpusEntry;
use crate::reference::Reference;

pub mod fs;
pub mod memory;

pub trait CorpusStore {
    /// Insert an entry, or replace the entry with the same reference.
    fn upsert(&mut self, entry: CorpusEntry) -> Result<()>;

    /// Get an entry by reference.
    fn get(&self, reference: &Reference) -> Result<CorpusEntry>;

    /// List entries in canonical document order, optionally restricted to
    /// descendants of `prefix`.
    fn list(&self, prefix: Option<&Reference>) -> Result<Vec<CorpusEntry>>;

    /// Remove an entry permanently (explicit pruning only).
    fn remove(&mut self, reference: &Reference) -> Result<CorpusEntry>;

    /// Persist pending changes.
    fn flush(&mut self) -> Result<()>;
}
