//! # Resource Resolver
//!
//! Computes the derived [`ResourceLink`] set for one reference against the
//! corpus. Resolution is deterministic given corpus state: the same corpus
//! and configuration always yield the same links in the same order, so the
//! synchronizer can tell a real change apart from reordering noise.
//!
//! Link derivation:
//! - `footnote-source`: the entry's own `children`, confidence 1.0.
//! - `cross-reference`: entries elsewhere in the corpus whose `children`
//!   cite this reference, confidence 0.9.
//! - `topical`: entries sharing metadata topics, confidence = Jaccard
//!   similarity of the two topic sets.
//!
//! Output is ordered by (link kind priority, target reference ascending)
//! and truncated per kind. An unresolvable child is skipped with a warning,
//! never a hard failure.

use crate::error::{Result, VersemarkError};
use crate::model::{LinkKind, ResourceLink};
use crate::reference::Reference;
use crate::store::CorpusStore;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub include_topical: bool,
    pub max_links_per_kind: usize,
    pub min_confidence: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            include_topical: true,
            max_links_per_kind: 5,
            min_confidence: 0.25,
        }
    }
}

#[derive(Debug, Default)]
pub struct Resolution {
    pub links: Vec<ResourceLink>,
    pub warnings: Vec<String>,
}

fn jaccard(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

pub fn resolve<S: CorpusStore>(
    store: &S,
    reference: &Reference,
    config: &ResolverConfig,
) -> Result<Resolution> {
    let entry = store.get(reference)?;
    let mut resolution = Resolution::default();

    // Forward links: the entry's own children.
    for child in &entry.children {
        match store.get(child) {
            Ok(_) => resolution.links.push(ResourceLink {
                source: reference.clone(),
                target: child.clone(),
                kind: LinkKind::FootnoteSource,
                confidence: 1.0,
                provenance: "children".to_string(),
            }),
            Err(VersemarkError::NotFound(_)) => resolution.warnings.push(format!(
                "{}: child {} not in corpus, link skipped",
                reference, child
            )),
            Err(e) => return Err(e),
        }
    }

    let own_topics: BTreeSet<&str> = entry.metadata.topics.iter().map(String::as_str).collect();

    for other in store.list(None)? {
        if other.reference == *reference {
            continue;
        }
        // Reverse citations become cross-references.
        if other.children.contains(reference) {
            resolution.links.push(ResourceLink {
                source: reference.clone(),
                target: other.reference.clone(),
                kind: LinkKind::CrossReference,
                confidence: 0.9,
                provenance: "citation".to_string(),
            });
        }
        if config.include_topical && !own_topics.is_empty() {
            let other_topics: BTreeSet<&str> =
                other.metadata.topics.iter().map(String::as_str).collect();
            let confidence = jaccard(&own_topics, &other_topics);
            if confidence > 0.0 {
                resolution.links.push(ResourceLink {
                    source: reference.clone(),
                    target: other.reference.clone(),
                    kind: LinkKind::Topical,
                    confidence,
                    provenance: "topics".to_string(),
                });
            }
        }
    }

    resolution
        .links
        .retain(|link| link.confidence >= config.min_confidence);
    resolution
        .links
        .sort_by(|a, b| (a.kind.priority(), &a.target).cmp(&(b.kind.priority(), &b.target)));

    // Cap each kind, keeping the sorted prefix.
    let mut kept = Vec::with_capacity(resolution.links.len());
    let mut counts = [0usize; 3];
    for link in resolution.links.drain(..) {
        let slot = link.kind.priority() as usize;
        if counts[slot] < config.max_links_per_kind {
            counts[slot] += 1;
            kept.push(link);
        }
    }
    resolution.links = kept;

    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CorpusEntry, EntryKind};
    use crate::store::memory::InMemoryCorpus;

    fn entry(reference: &str, children: &[&str], topics: &[&str]) -> CorpusEntry {
        let mut e = CorpusEntry::new(reference.parse().unwrap(), EntryKind::Scripture, "text");
        e.children = children.iter().map(|c| c.parse().unwrap()).collect();
        e.metadata.topics = topics.iter().map(|t| t.to_string()).collect();
        e
    }

    fn corpus() -> InMemoryCorpus {
        let mut store = InMemoryCorpus::new();
        store
            .upsert(entry("alma.32.21", &["alma.32.22"], &["faith"]))
            .unwrap();
        store.upsert(entry("alma.32.22", &[], &[])).unwrap();
        store
            .upsert(entry("hebrews.11.1", &["alma.32.21"], &["faith", "hope"]))
            .unwrap();
        store
            .upsert(entry("ether.12.6", &["alma.32.21"], &["faith"]))
            .unwrap();
        store
    }

    #[test]
    fn resolves_all_kinds_in_priority_order() {
        let store = corpus();
        let resolution = resolve(
            &store,
            &"alma.32.21".parse().unwrap(),
            &ResolverConfig::default(),
        )
        .unwrap();

        let kinds: Vec<LinkKind> = resolution.links.iter().map(|l| l.kind).collect();
        let mut sorted = kinds.clone();
        sorted.sort_by_key(|k| k.priority());
        assert_eq!(kinds, sorted);

        // ether.12.6 and hebrews.11.1 both cite alma.32.21
        let crossrefs: Vec<String> = resolution
            .links
            .iter()
            .filter(|l| l.kind == LinkKind::CrossReference)
            .map(|l| l.target.to_string())
            .collect();
        assert_eq!(crossrefs, vec!["ether.12.6", "hebrews.11.1"]);
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn ordering_is_stable_across_calls() {
        let store = corpus();
        let reference: Reference = "alma.32.21".parse().unwrap();
        let config = ResolverConfig::default();
        let first = resolve(&store, &reference, &config).unwrap();
        let second = resolve(&store, &reference, &config).unwrap();
        assert_eq!(first.links, second.links);
    }

    #[test]
    fn missing_child_is_a_warning_not_a_failure() {
        let mut store = corpus();
        store
            .upsert(entry("moroni.7.33", &["lost.1.1"], &[]))
            .unwrap();
        let resolution = resolve(
            &store,
            &"moroni.7.33".parse().unwrap(),
            &ResolverConfig::default(),
        )
        .unwrap();
        assert_eq!(resolution.warnings.len(), 1);
        assert!(resolution.warnings[0].contains("lost.1.1"));
        assert!(resolution
            .links
            .iter()
            .all(|l| l.kind != LinkKind::FootnoteSource));
    }

    #[test]
    fn max_links_per_kind_caps_output() {
        let store = corpus();
        let config = ResolverConfig {
            max_links_per_kind: 1,
            ..Default::default()
        };
        let resolution = resolve(&store, &"alma.32.21".parse().unwrap(), &config).unwrap();
        let crossrefs: Vec<_> = resolution
            .links
            .iter()
            .filter(|l| l.kind == LinkKind::CrossReference)
            .collect();
        assert_eq!(crossrefs.len(), 1);
        assert_eq!(crossrefs[0].target.to_string(), "ether.12.6");
    }

    #[test]
    fn min_confidence_filters_weak_topical_links() {
        let store = corpus();
        let config = ResolverConfig {
            min_confidence: 0.75,
            ..Default::default()
        };
        let resolution = resolve(&store, &"alma.32.21".parse().unwrap(), &config).unwrap();
        // hebrews shares 1 of 2 topics (0.5), ether shares 1 of 1 (1.0)
        let topical: Vec<String> = resolution
            .links
            .iter()
            .filter(|l| l.kind == LinkKind::Topical)
            .map(|l| l.target.to_string())
            .collect();
        assert_eq!(topical, vec!["ether.12.6"]);
    }

    #[test]
    fn include_topical_false_drops_topical_links() {
        let store = corpus();
        let config = ResolverConfig {
            include_topical: false,
            ..Default::default()
        };
        let resolution = resolve(&store, &"alma.32.21".parse().unwrap(), &config).unwrap();
        assert!(resolution.links.iter().all(|l| l.kind != LinkKind::Topical));
    }

    #[test]
    fn unknown_reference_is_not_found() {
        let store = corpus();
        let result = resolve(
            &store,
            &"nephi.1.1".parse().unwrap(),
            &ResolverConfig::default(),
        );
        assert!(matches!(result, Err(VersemarkError::NotFound(_))));
    }
}
