//! # Note Generator
//!
//! Renders a corpus entry plus its resolved links into a candidate
//! [`NoteFile`]. Pure: no filesystem access, deterministic for a given
//! entry and link sequence. The caller (the sync command) handles I/O.
//!
//! Layout mirrors the markdown the original study vault used: frontmatter
//! with the entry's metadata, a heading, the source text, then one
//! annotation slot per slot kind for the entry type. The crossref slot is
//! seeded with wiki-style links; footnotes and highlights start empty and
//! belong to the user from the first write.

use crate::model::{CorpusEntry, EntryKind, ResourceLink};
use crate::notefile::{content_hash, AnnotationSlot, NoteFile, Segment, SlotKind};

const SCRIPTURE_SLOTS: &[SlotKind] = &[SlotKind::CrossRefs, SlotKind::Footnotes, SlotKind::Highlights];
const TALK_SLOTS: &[SlotKind] = &[SlotKind::CrossRefs, SlotKind::Highlights];

/// Slot kinds a note for this entry type carries, in file order.
pub fn slot_kinds(kind: EntryKind) -> &'static [SlotKind] {
    match kind {
        EntryKind::Scripture => SCRIPTURE_SLOTS,
        EntryKind::Talk => TALK_SLOTS,
    }
}

fn frontmatter(entry: &CorpusEntry) -> String {
    let mut out = String::from("---\n");
    out.push_str(&format!("reference: {}\n", entry.reference));
    out.push_str(&format!(
        "kind: {}\n",
        match entry.kind {
            EntryKind::Scripture => "scripture",
            EntryKind::Talk => "talk",
        }
    ));
    if let Some(title) = &entry.metadata.title {
        out.push_str(&format!("title: {}\n", title));
    }
    if let Some(speaker) = &entry.metadata.speaker {
        out.push_str(&format!("speaker: {}\n", speaker));
    }
    if let Some(date) = &entry.metadata.date {
        out.push_str(&format!("date: {}\n", date));
    }
    if let Some(url) = &entry.metadata.source_url {
        out.push_str(&format!("source_url: {}\n", url));
    }
    if !entry.metadata.topics.is_empty() {
        out.push_str(&format!("topics: {}\n", entry.metadata.topics.join(", ")));
    }
    out.push_str("---\n\n");
    out
}

fn crossref_body(links: &[ResourceLink]) -> String {
    let mut body = String::new();
    for link in links {
        body.push_str(&format!(
            "- [[{}]] ({} {:.2})\n",
            link.target, link.kind, link.confidence
        ));
    }
    body
}

pub fn generate(entry: &CorpusEntry, links: &[ResourceLink]) -> NoteFile {
    let title = entry
        .metadata
        .title
        .clone()
        .unwrap_or_else(|| entry.reference.to_string());

    let mut header = frontmatter(entry);
    header.push_str(&format!("# {}\n\n", title));
    header.push_str(&entry.text);
    if !entry.text.ends_with('\n') {
        header.push('\n');
    }

    let kinds = slot_kinds(entry.kind);
    let section_headers: Vec<String> = kinds
        .iter()
        .map(|kind| format!("\n## {}\n\n", kind.heading()))
        .collect();

    // The drift hash covers every structural piece of the file.
    let mut structural = header.clone();
    for section in &section_headers {
        structural.push_str(section);
    }
    let hash = content_hash(&structural);

    let mut segments = vec![Segment::Structural(header)];
    for (kind, section) in kinds.iter().zip(section_headers) {
        segments.push(Segment::Structural(section));
        segments.push(Segment::Slot(AnnotationSlot {
            reference: entry.reference.clone(),
            kind: *kind,
            generated_hash: hash.clone(),
            body: match kind {
                SlotKind::CrossRefs => crossref_body(links),
                SlotKind::Footnotes | SlotKind::Highlights => String::new(),
            },
        }));
    }

    NoteFile {
        reference: entry.reference.clone(),
        segments,
    }
}
