//! # Note Synchronizer
//!
//! The merge engine. Given the current on-disk contents of a note (if any)
//! and a freshly generated candidate for the same reference, produce the
//! merged contents plus a [`ChangeReport`]. Pure on strings; the sync
//! command owns the actual file I/O.
//!
//! Rules, in order:
//! 1. No existing file: the candidate is the result.
//! 2. A slot present in both keeps the *existing* body verbatim and takes
//!    the candidate's generated hash.
//! 3. A slot only in the candidate is inserted as generated.
//! 4. A slot only in the existing file is orphaned: preserved at the end of
//!    the file and flagged, never dropped. Deleting it is a separate,
//!    explicitly confirmed operation outside this module.
//! 5. All structural content is replaced by the candidate's verbatim.
//!
//! Regions of the existing file with unparsable slot markers degrade to
//! structural content (replaced) and are reported so nothing disappears
//! without a trace.

use crate::notefile::{self, NoteFile, Segment, SlotKind};
use crate::reference::Reference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotChange {
    /// Kept the user's body; generated content did not drift.
    Unchanged,
    /// New slot introduced by the candidate.
    Inserted,
    /// Present on disk but gone from the candidate; preserved and flagged.
    Orphaned,
    /// Kept the user's body, but the generated content around it changed.
    StructuralUpdated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Created,
    Updated,
    Unchanged,
    Orphaned,
}

#[derive(Debug, Clone)]
pub struct SlotReport {
    pub reference: Reference,
    pub kind: SlotKind,
    pub change: SlotChange,
}

#[derive(Debug)]
pub struct ChangeReport {
    pub reference: Reference,
    pub status: FileStatus,
    pub slots: Vec<SlotReport>,
    pub unparsable: Vec<String>,
}

impl ChangeReport {
    pub fn has_warnings(&self) -> bool {
        !self.unparsable.is_empty()
            || self
                .slots
                .iter()
                .any(|slot| slot.change == SlotChange::Orphaned)
    }
}

pub fn synchronize(existing: Option<&str>, candidate: &NoteFile) -> (String, ChangeReport) {
    let existing_text = match existing {
        Some(text) => text,
        None => {
            let slots = candidate
                .slots()
                .map(|slot| SlotReport {
                    reference: slot.reference.clone(),
                    kind: slot.kind,
                    change: SlotChange::Inserted,
                })
                .collect();
            return (
                candidate.render(),
                ChangeReport {
                    reference: candidate.reference.clone(),
                    status: FileStatus::Created,
                    slots,
                    unparsable: Vec::new(),
                },
            );
        }
    };

    let parsed = notefile::parse(&candidate.reference, existing_text);
    let mut slots = Vec::new();
    let mut segments = Vec::with_capacity(candidate.segments.len());

    for segment in &candidate.segments {
        match segment {
            Segment::Structural(text) => segments.push(Segment::Structural(text.clone())),
            Segment::Slot(candidate_slot) => {
                match parsed
                    .note
                    .find_slot(&candidate_slot.reference, candidate_slot.kind)
                {
                    Some(existing_slot) => {
                        let change = if existing_slot.generated_hash == candidate_slot.generated_hash
                        {
                            SlotChange::Unchanged
                        } else {
                            SlotChange::StructuralUpdated
                        };
                        let mut kept = existing_slot.clone();
                        kept.generated_hash = candidate_slot.generated_hash.clone();
                        segments.push(Segment::Slot(kept));
                        slots.push(SlotReport {
                            reference: candidate_slot.reference.clone(),
                            kind: candidate_slot.kind,
                            change,
                        });
                    }
                    None => {
                        segments.push(Segment::Slot(candidate_slot.clone()));
                        slots.push(SlotReport {
                            reference: candidate_slot.reference.clone(),
                            kind: candidate_slot.kind,
                            change: SlotChange::Inserted,
                        });
                    }
                }
            }
        }
    }

    // Slots on disk that the candidate no longer produces ride along at the
    // end of the file until the user explicitly removes them.
    for existing_slot in parsed.note.slots() {
        if candidate
            .find_slot(&existing_slot.reference, existing_slot.kind)
            .is_none()
        {
            segments.push(Segment::Slot(existing_slot.clone()));
            slots.push(SlotReport {
                reference: existing_slot.reference.clone(),
                kind: existing_slot.kind,
                change: SlotChange::Orphaned,
            });
        }
    }

    let merged = NoteFile {
        reference: candidate.reference.clone(),
        segments,
    };
    let output = merged.render();
    let status = if output == existing_text {
        FileStatus::Unchanged
    } else {
        FileStatus::Updated
    };

    (
        output,
        ChangeReport {
            reference: candidate.reference.clone(),
            status,
            slots,
            unparsable: parsed.unparsable,
        },
    )
}

/// The reference was removed from the corpus entirely: the whole file is
/// orphaned. Contents are untouched; the caller must not delete the file.
pub fn synchronize_orphan(reference: &Reference, existing: &str) -> ChangeReport {
    let parsed = notefile::parse(reference, existing);
    let slots = parsed
        .note
        .slots()
        .map(|slot| SlotReport {
            reference: slot.reference.clone(),
            kind: slot.kind,
            change: SlotChange::Orphaned,
        })
        .collect();
    ChangeReport {
        reference: reference.clone(),
        status: FileStatus::Orphaned,
        slots,
        unparsable: parsed.unparsable,
    }
}
