//! # Reference Identifiers
//!
//! A [`Reference`] is the stable hierarchical key that joins everything in
//! versemark: corpus entries, resolver links, and note files are all
//! addressed by it. References look like `alma.32.21` (book/chapter/verse)
//! or `conference.2023-10.nelson.4` (conference/session/talk/paragraph).
//!
//! Ordering is canonical document order: segments compare pairwise, and
//! segments that are plain numbers compare numerically, so `alma.32.9`
//! sorts before `alma.32.21`. The corpus store relies on this ordering for
//! its `list` contract, and the synchronizer relies on `list` being stable.
//!
//! References are immutable once parsed and serialize as their string form.

use crate::error::{Result, VersemarkError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const MAX_SEGMENTS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Reference {
    segments: Vec<String>,
}

impl Reference {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The corpus domain this reference belongs to (its first segment).
    pub fn domain(&self) -> &str {
        &self.segments[0]
    }

    pub fn parent(&self) -> Option<Reference> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Reference {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// True if `self` equals `prefix` or sits below it in the hierarchy.
    pub fn is_descendant_of(&self, prefix: &Reference) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }
}

fn valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

impl FromStr for Reference {
    type Err = VersemarkError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(VersemarkError::InvalidReference(s.to_string()));
        }
        let segments: Vec<String> = normalized.split('.').map(str::to_string).collect();
        if segments.len() > MAX_SEGMENTS || !segments.iter().all(|seg| valid_segment(seg)) {
            return Err(VersemarkError::InvalidReference(s.to_string()));
        }
        Ok(Reference { segments })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl TryFrom<String> for Reference {
    type Error = VersemarkError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Reference> for String {
    fn from(reference: Reference) -> String {
        reference.to_string()
    }
}

// Numeric segments compare as numbers and sort before name segments, so
// verse 9 comes before verse 21 within a chapter. The string tie-break
// keeps Ord consistent with Eq for forms like "01" vs "1".
fn compare_segments(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

impl Ord for Reference {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut a = self.segments.iter();
        let mut b = other.segments.iter();
        loop {
            match (a.next(), b.next()) {
                (Some(x), Some(y)) => match compare_segments(x, y) {
                    Ordering::Equal => continue,
                    ord => return ord,
                },
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
            }
        }
    }
}

impl PartialOrd for Reference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
