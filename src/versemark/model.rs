use crate::reference::Reference;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of source text an entry holds. Drives which annotation slots
/// its note file gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Scripture,
    Talk,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
}

/// Canonical stored text for one reference. Owned by the corpus store;
/// created on ingestion and replaced in place by re-ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub reference: Reference,
    pub kind: EntryKind,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub children: Vec<Reference>,
}

impl CorpusEntry {
    pub fn new(reference: Reference, kind: EntryKind, text: impl Into<String>) -> Self {
        Self {
            reference,
            kind,
            text: text.into(),
            metadata: Metadata::default(),
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    CrossReference,
    FootnoteSource,
    Topical,
}

impl LinkKind {
    /// Sort rank within a resolved link set. Lower sorts first.
    pub fn priority(self) -> u8 {
        match self {
            LinkKind::CrossReference => 0,
            LinkKind::FootnoteSource => 1,
            LinkKind::Topical => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::CrossReference => "cross-reference",
            LinkKind::FootnoteSource => "footnote-source",
            LinkKind::Topical => "topical",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A derived link between two references. Regenerated on demand by the
/// resolver, never hand-edited and never persisted as authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub source: Reference,
    pub target: Reference,
    pub kind: LinkKind,
    pub confidence: f64,
    pub provenance: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_defaults_survive_partial_json() {
        let entry: CorpusEntry = serde_json::from_str(
            r#"{"reference":"alma.32.21","kind":"scripture","text":"faith is not..."}"#,
        )
        .unwrap();
        assert_eq!(entry.metadata, Metadata::default());
        assert!(entry.children.is_empty());
    }

    #[test]
    fn entry_round_trips() {
        let mut entry = CorpusEntry::new(
            "alma.32.21".parse().unwrap(),
            EntryKind::Scripture,
            "faith is not to have a perfect knowledge",
        );
        entry.metadata.topics = vec!["faith".into()];
        entry.children = vec!["alma.32.22".parse().unwrap()];

        let json = serde_json::to_string(&entry).unwrap();
        let back: CorpusEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn link_kind_priority_matches_output_order() {
        assert!(LinkKind::CrossReference.priority() < LinkKind::FootnoteSource.priority());
        assert!(LinkKind::FootnoteSource.priority() < LinkKind::Topical.priority());
    }
}
