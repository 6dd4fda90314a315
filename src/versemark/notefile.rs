//! # Note Files and Annotation Slots
//!
//! A [`NoteFile`] is the in-memory form of one on-disk note: generated
//! structural content interleaved with [`AnnotationSlot`]s whose bodies
//! belong to the user once the file exists. Slots are keyed by identity
//! (reference + kind), never by file position, so regeneration can find
//! them no matter how the surrounding text moved.
//!
//! ## Marker syntax
//!
//! Slots are delimited by full-line Obsidian comment markers:
//!
//! ```text
//! %%vmark begin alma.32.21 crossref 5f2a8c31d0e4b7a2%%
//! - [[hebrews.11.1]] (cross-reference 0.90)
//! %%vmark end alma.32.21 crossref%%
//! ```
//!
//! The `%%...%%` form is invisible in rendered Obsidian notes and the
//! `vmark` prefix keeps it from colliding with prose. Marker-looking text
//! *inside* a slot body is body text; a marker that cannot be parsed, or a
//! begin without its end, degrades that region to structural content and is
//! reported so the user is warned rather than silently overwritten.

use crate::reference::Reference;
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::fmt;

static BEGIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^%%vmark begin ([a-z0-9._-]+) ([a-z]+) ([0-9a-f]{8,64})%%$").unwrap()
});
static END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%%vmark end ([a-z0-9._-]+) ([a-z]+)%%$").unwrap());

const MARKER_PREFIX: &str = "%%vmark";

/// Number of hex chars of the sha256 digest kept in slot markers.
const HASH_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Footnotes,
    Highlights,
    CrossRefs,
}

impl SlotKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SlotKind::Footnotes => "footnotes",
            SlotKind::Highlights => "highlights",
            SlotKind::CrossRefs => "crossref",
        }
    }

    pub fn parse(s: &str) -> Option<SlotKind> {
        match s {
            "footnotes" => Some(SlotKind::Footnotes),
            "highlights" => Some(SlotKind::Highlights),
            "crossref" => Some(SlotKind::CrossRefs),
            _ => None,
        }
    }

    /// Section heading used in the generated structural content.
    pub fn heading(self) -> &'static str {
        match self {
            SlotKind::Footnotes => "Footnotes",
            SlotKind::Highlights => "Highlights",
            SlotKind::CrossRefs => "Cross references",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An identity-keyed region whose body is user-owned after creation. The
/// hash records the generated structural content the slot was last written
/// against, used by the synchronizer to detect drift.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationSlot {
    pub reference: Reference,
    pub kind: SlotKind,
    pub generated_hash: String,
    pub body: String,
}

impl AnnotationSlot {
    pub fn identity(&self) -> (&Reference, SlotKind) {
        (&self.reference, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Structural(String),
    Slot(AnnotationSlot),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteFile {
    pub reference: Reference,
    pub segments: Vec<Segment>,
}

impl NoteFile {
    pub fn slots(&self) -> impl Iterator<Item = &AnnotationSlot> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Slot(slot) => Some(slot),
            Segment::Structural(_) => None,
        })
    }

    pub fn find_slot(&self, reference: &Reference, kind: SlotKind) -> Option<&AnnotationSlot> {
        self.slots()
            .find(|slot| slot.reference == *reference && slot.kind == kind)
    }

    /// All structural (generated, non-user) content concatenated.
    pub fn structural_content(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if let Segment::Structural(text) = segment {
                out.push_str(text);
            }
        }
        out
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Structural(text) => out.push_str(text),
                Segment::Slot(slot) => {
                    out.push_str(&format!(
                        "%%vmark begin {} {} {}%%\n",
                        slot.reference, slot.kind, slot.generated_hash
                    ));
                    out.push_str(&slot.body);
                    if !slot.body.is_empty() && !slot.body.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str(&format!(
                        "%%vmark end {} {}%%\n",
                        slot.reference, slot.kind
                    ));
                }
            }
        }
        out
    }
}

/// Hash of generated content, stamped into slot markers.
pub fn content_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut hex = String::with_capacity(HASH_LEN);
    for byte in digest.iter().take(HASH_LEN / 2) {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

#[derive(Debug)]
pub struct ParsedNote {
    pub note: NoteFile,
    /// Human-readable descriptions of marker regions that could not be
    /// parsed and were degraded to structural content.
    pub unparsable: Vec<String>,
}

/// Parse an on-disk note back into segments by slot identity.
pub fn parse(reference: &Reference, text: &str) -> ParsedNote {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut segments = Vec::new();
    let mut structural = String::new();
    let mut unparsable = Vec::new();

    let flush = |structural: &mut String, segments: &mut Vec<Segment>| {
        if !structural.is_empty() {
            segments.push(Segment::Structural(std::mem::take(structural)));
        }
    };

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim_end();

        if let Some(caps) = BEGIN_RE.captures(trimmed) {
            let slot_ref = caps[1].parse::<Reference>().ok();
            let slot_kind = SlotKind::parse(&caps[2]);
            let hash = caps[3].to_string();

            if let (Some(slot_ref), Some(slot_kind)) = (slot_ref, slot_kind) {
                // Scan ahead for the matching end marker.
                let mut end_index = None;
                for (j, candidate) in lines.iter().enumerate().skip(i + 1) {
                    if let Some(end_caps) = END_RE.captures(candidate.trim_end()) {
                        if end_caps[1] == slot_ref.to_string()
                            && SlotKind::parse(&end_caps[2]) == Some(slot_kind)
                        {
                            end_index = Some(j);
                            break;
                        }
                    }
                }

                if let Some(end) = end_index {
                    flush(&mut structural, &mut segments);
                    let body: String = lines[i + 1..end].concat();
                    segments.push(Segment::Slot(AnnotationSlot {
                        reference: slot_ref,
                        kind: slot_kind,
                        generated_hash: hash,
                        body,
                    }));
                    i = end + 1;
                    continue;
                }
                unparsable.push(format!(
                    "unterminated slot {} {} (no end marker)",
                    slot_ref, slot_kind
                ));
                structural.push_str(line);
                i += 1;
                continue;
            }
            unparsable.push(format!("malformed slot marker: {}", trimmed));
            structural.push_str(line);
            i += 1;
            continue;
        }

        if trimmed.starts_with(MARKER_PREFIX) {
            // Stray end marker or a begin marker the regex rejected.
            unparsable.push(format!("malformed slot marker: {}", trimmed));
        }
        structural.push_str(line);
        i += 1;
    }
    if !structural.is_empty() {
        segments.push(Segment::Structural(structural));
    }

    ParsedNote {
        note: NoteFile {
            reference: reference.clone(),
            segments,
        },
        unparsable,
    }
}
