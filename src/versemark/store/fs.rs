use super::CorpusStore;
use crate::error::{Result, VersemarkError};
use crate::model::{CorpusEntry, EntryKind, Metadata};
use crate::reference::Reference;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk entry shape: the reference is the map key, not repeated inside
/// the object.
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    kind: EntryKind,
    text: String,
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    children: Vec<Reference>,
}

pub struct FileCorpus {
    dir: PathBuf,
    entries: BTreeMap<Reference, CorpusEntry>,
    dirty_domains: BTreeSet<String>,
}

impl FileCorpus {
    /// Load the corpus from `dir`. A missing directory is an empty corpus;
    /// it is created on first flush.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let mut entries = BTreeMap::new();

        if dir.exists() {
            for dir_entry in fs::read_dir(&dir).map_err(VersemarkError::Io)? {
                let path = dir_entry.map_err(VersemarkError::Io)?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                // config.json lives alongside the domain files
                if path.file_name().and_then(|n| n.to_str()) == Some("config.json") {
                    continue;
                }
                let content = fs::read_to_string(&path).map_err(VersemarkError::Io)?;
                let domain: BTreeMap<String, StoredEntry> =
                    serde_json::from_str(&content).map_err(VersemarkError::Serialization)?;
                for (key, stored) in domain {
                    let reference: Reference = key.parse()?;
                    entries.insert(
                        reference.clone(),
                        CorpusEntry {
                            reference,
                            kind: stored.kind,
                            text: stored.text,
                            metadata: stored.metadata,
                            children: stored.children,
                        },
                    );
                }
            }
        }

        Ok(Self {
            dir,
            entries,
            dirty_domains: BTreeSet::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn domain_path(&self, domain: &str) -> PathBuf {
        self.dir.join(format!("{}.json", domain))
    }

    fn write_domain(&self, domain: &str) -> Result<()> {
        let map: BTreeMap<String, StoredEntry> = self
            .entries
            .values()
            .filter(|entry| entry.reference.domain() == domain)
            .map(|entry| {
                (
                    entry.reference.to_string(),
                    StoredEntry {
                        kind: entry.kind,
                        text: entry.text.clone(),
                        metadata: entry.metadata.clone(),
                        children: entry.children.clone(),
                    },
                )
            })
            .collect();

        let path = self.domain_path(domain);
        if map.is_empty() {
            // Whole domain pruned away
            if path.exists() {
                fs::remove_file(path).map_err(VersemarkError::Io)?;
            }
            return Ok(());
        }

        let content =
            serde_json::to_string_pretty(&map).map_err(VersemarkError::Serialization)?;
        write_atomic(&path, &content)
    }
}

/// Write to a sibling temp file, then rename over the target. A crash
/// mid-write leaves the previous file intact.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, content).map_err(VersemarkError::Io)?;
    fs::rename(&tmp, path).map_err(VersemarkError::Io)?;
    Ok(())
}

impl CorpusStore for FileCorpus {
    fn upsert(&mut self, entry: CorpusEntry) -> Result<()> {
        self.dirty_domains.insert(entry.reference.domain().to_string());
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
        let entry = self
            .entries
            .remove(reference)
            .ok_or_else(|| VersemarkError::NotFound(reference.clone()))?;
        self.dirty_domains.insert(reference.domain().to_string());
        Ok(entry)
    }

    fn flush(&mut self) -> Result<()> {
        if self.dirty_domains.is_empty() {
            return Ok(());
        }
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(VersemarkError::Io)?;
        }
        // Dirty set is only cleared once every domain landed, so a failed
        // flush can be retried.
        let domains: Vec<String> = self.dirty_domains.iter().cloned().collect();
        for domain in &domains {
            self.write_domain(domain)?;
        }
        self.dirty_domains.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(reference: &str, text: &str) -> CorpusEntry {
        CorpusEntry::new(reference.parse().unwrap(), EntryKind::Scripture, text)
    }

    #[test]
    fn persists_and_reloads() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("corpus");

        let mut corpus = FileCorpus::open(&dir).unwrap();
        corpus.upsert(entry("alma.32.21", "faith is not...")).unwrap();
        corpus.upsert(entry("alma.32.22", "and now behold...")).unwrap();
        corpus.upsert(entry("helaman.5.12", "it is upon the rock...")).unwrap();
        corpus.flush().unwrap();

        assert!(dir.join("alma.json").exists());
        assert!(dir.join("helaman.json").exists());

        let reloaded = FileCorpus::open(&dir).unwrap();
        let got = reloaded.get(&"alma.32.21".parse().unwrap()).unwrap();
        assert_eq!(got.text, "faith is not...");
        assert_eq!(reloaded.list(None).unwrap().len(), 3);
    }

    #[test]
    fn list_respects_prefix_and_document_order() {
        let tmp = tempfile::tempdir().unwrap();
        let mut corpus = FileCorpus::open(tmp.path().join("corpus")).unwrap();
        corpus.upsert(entry("alma.32.21", "a")).unwrap();
        corpus.upsert(entry("alma.32.9", "b")).unwrap();
        corpus.upsert(entry("alma.33.1", "c")).unwrap();

        let prefix: Reference = "alma.32".parse().unwrap();
        let refs: Vec<String> = corpus
            .list(Some(&prefix))
            .unwrap()
            .iter()
            .map(|e| e.reference.to_string())
            .collect();
        assert_eq!(refs, vec!["alma.32.9", "alma.32.21"]);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("corpus");
        let mut corpus = FileCorpus::open(&dir).unwrap();
        corpus.upsert(entry("alma.32.21", "old text")).unwrap();
        corpus.upsert(entry("alma.32.21", "new text")).unwrap();
        corpus.flush().unwrap();

        let reloaded = FileCorpus::open(&dir).unwrap();
        assert_eq!(reloaded.list(None).unwrap().len(), 1);
        assert_eq!(
            reloaded.get(&"alma.32.21".parse().unwrap()).unwrap().text,
            "new text"
        );
    }

    #[test]
    fn remove_prunes_and_deletes_empty_domain_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("corpus");
        let mut corpus = FileCorpus::open(&dir).unwrap();
        corpus.upsert(entry("alma.32.21", "a")).unwrap();
        corpus.flush().unwrap();
        assert!(dir.join("alma.json").exists());

        corpus.remove(&"alma.32.21".parse().unwrap()).unwrap();
        corpus.flush().unwrap();
        assert!(!dir.join("alma.json").exists());
        assert!(matches!(
            corpus.get(&"alma.32.21".parse().unwrap()),
            Err(VersemarkError::NotFound(_))
        ));
    }

    #[test]
    fn flush_leaves_no_temp_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("corpus");
        let mut corpus = FileCorpus::open(&dir).unwrap();
        corpus.upsert(entry("alma.32.21", "a")).unwrap();
        corpus.flush().unwrap();

        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn reserialization_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("corpus");
        let mut corpus = FileCorpus::open(&dir).unwrap();
        corpus.upsert(entry("alma.32.21", "faith is not...")).unwrap();
        corpus.flush().unwrap();
        let first = fs::read_to_string(dir.join("alma.json")).unwrap();

        // Re-upsert the identical entry and flush again
        let mut reloaded = FileCorpus::open(&dir).unwrap();
        let same = reloaded.get(&"alma.32.21".parse().unwrap()).unwrap();
        reloaded.upsert(same).unwrap();
        reloaded.flush().unwrap();
        let second = fs::read_to_string(dir.join("alma.json")).unwrap();
        assert_eq!(first, second);
    }
}
