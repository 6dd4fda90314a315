//! # Ingestion
//!
//! The boundary to the scraping side of the system. Scrapers live outside
//! this crate; what they hand over is a sequence of [`RawDocument`]s, and
//! [`ingest`] feeds those into the corpus store one upsert at a time.
//! A malformed item fails that item only: the batch keeps going and the
//! report carries the warning.

use crate::error::{Result, VersemarkError};
use crate::model::{CorpusEntry, EntryKind, Metadata};
use crate::reference::Reference;
use crate::store::CorpusStore;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One scraped text block, as produced by an ingestion adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDocument {
    pub reference: Reference,
    pub kind: EntryKind,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub children: Vec<Reference>,
}

impl From<RawDocument> for CorpusEntry {
    fn from(doc: RawDocument) -> Self {
        CorpusEntry {
            reference: doc.reference,
            kind: doc.kind,
            text: doc.text,
            metadata: doc.metadata,
            children: doc.children,
        }
    }
}

/// A producer of scraped documents. Errors are per-item; returning
/// `Some(Err(..))` skips that item and the batch continues.
pub trait IngestSource {
    fn produce(&mut self) -> Option<Result<RawDocument>>;
}

/// Reads a scraped JSON export: a top-level array of raw documents.
/// The file must parse as JSON (fatal); individual documents may not
/// (per-item).
pub struct JsonFileSource {
    items: std::vec::IntoIter<serde_json::Value>,
}

impl JsonFileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(VersemarkError::Io)?;
        let items: Vec<serde_json::Value> =
            serde_json::from_str(&content).map_err(VersemarkError::Serialization)?;
        Ok(Self {
            items: items.into_iter(),
        })
    }
}

impl IngestSource for JsonFileSource {
    fn produce(&mut self) -> Option<Result<RawDocument>> {
        let value = self.items.next()?;
        Some(
            serde_json::from_value::<RawDocument>(value)
                .map_err(|e| VersemarkError::MalformedDocument(e.to_string())),
        )
    }
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub succeeded: usize,
    pub failed: usize,
    pub warnings: Vec<String>,
}

/// Drain a source into the store, then flush once. Store write failures are
/// fatal to the run; item failures are not.
pub fn ingest<S: CorpusStore, I: IngestSource>(store: &mut S, mut source: I) -> Result<IngestReport> {
    let mut report = IngestReport::default();
    while let Some(item) = source.produce() {
        match item {
            Ok(doc) => {
                store.upsert(doc.into())?;
                report.succeeded += 1;
            }
            Err(e) => {
                report.failed += 1;
                report.warnings.push(e.to_string());
            }
        }
    }
    store.flush()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryCorpus;

    struct VecSource(std::vec::IntoIter<Result<RawDocument>>);

    impl IngestSource for VecSource {
        fn produce(&mut self) -> Option<Result<RawDocument>> {
            self.0.next()
        }
    }

    fn doc(reference: &str, text: &str) -> RawDocument {
        RawDocument {
            reference: reference.parse().unwrap(),
            kind: EntryKind::Scripture,
            text: text.to_string(),
            metadata: Metadata::default(),
            children: Vec::new(),
        }
    }

    #[test]
    fn item_failures_do_not_abort_the_batch() {
        let mut store = InMemoryCorpus::new();
        let source = VecSource(
            vec![
                Ok(doc("alma.32.21", "faith is not...")),
                Err(VersemarkError::InvalidReference("Bad Key!".into())),
                Ok(doc("alma.32.22", "and now behold...")),
            ]
            .into_iter(),
        );

        let report = ingest(&mut store, source).unwrap();
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(store.list(None).unwrap().len(), 2);
    }

    #[test]
    fn json_source_skips_malformed_documents() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("export.json");
        std::fs::write(
            &path,
            r#"[
                {"reference":"alma.32.21","kind":"scripture","text":"faith is not..."},
                {"reference":"NOT A REF","kind":"scripture","text":"x"},
                {"reference":"alma.32.22","kind":"scripture","text":"and now behold..."}
            ]"#,
        )
        .unwrap();

        let mut store = InMemoryCorpus::new();
        let report = ingest(&mut store, JsonFileSource::open(&path).unwrap()).unwrap();
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert!(report.warnings[0].contains("Malformed document"));
    }

    #[test]
    fn bad_shape_is_malformed_not_invalid_reference() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("export.json");
        // Reference is fine; the kind is not a known entry kind.
        std::fs::write(
            &path,
            r#"[{"reference":"alma.32.21","kind":"poem","text":"x"}]"#,
        )
        .unwrap();

        let mut source = JsonFileSource::open(&path).unwrap();
        let err = source.produce().unwrap().unwrap_err();
        assert!(matches!(err, VersemarkError::MalformedDocument(_)));
    }

    #[test]
    fn unreadable_export_is_fatal() {
        assert!(JsonFileSource::open("/nonexistent/export.json").is_err());
    }

    #[test]
    fn reingestion_replaces_in_place() {
        let mut store = InMemoryCorpus::new();
        let first = VecSource(vec![Ok(doc("alma.32.21", "old"))].into_iter());
        ingest(&mut store, first).unwrap();
        let second = VecSource(vec![Ok(doc("alma.32.21", "new"))].into_iter());
        ingest(&mut store, second).unwrap();

        let entry = store.get(&"alma.32.21".parse().unwrap()).unwrap();
        assert_eq!(entry.text, "new");
        assert_eq!(store.list(None).unwrap().len(), 1);
    }
}
