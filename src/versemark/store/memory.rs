use super::CorpusStore;
use crate::error::{Result, VersemarkError};
use crate::model::CorpusEntry;
use crate::reference::Reference;
use std::collections::BTreeMap;

/// In-memory corpus for tests. Same ordering behavior as the file store,
/// no persistence.
#[derive(Debug, Default)]
pub struct InMemoryCorpus {
    entries: BTreeMap<Reference, CorpusEntry>,
}

impl InMemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CorpusStore for InMemoryCorpus {
    fn upsert(&mut self, entry: CorpusEntry) -> Result<()> {
        self.entries.insert(entry.reference.clone(), entry);
        Ok(())
    }

    fn get(&self, reference: &Reference) -> Result<CorpusEntry> {
        self.entries
            .get(reference)
            .cloned()
            .ok_or_else(|| VersemarkError::NotFound(reference.clone()))
    }

    fn list(&self, prefix: Option<&Reference>) -> Result<Vec<CorpusEntry>> {
        Ok(self
            .entries
            .values()
            .filter(|entry| prefix.map_or(true, |p| entry.reference.is_descendant_of(p)))
            .cloned()
            .collect())
    }

    fn remove(&mut self, reference: &Reference) -> Result<CorpusEntry> {
        self.entries
            .remove(reference)
            .ok_or_else(|| VersemarkError::NotFound(reference.clone()))
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
