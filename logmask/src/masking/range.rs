//! Match ranges, overlap resolution and right-to-left substitution.
//!
//! All ranges handed to [`resolve`] must come from one immutable snapshot of
//! the text. Substitution then edits a copy of that snapshot from the rightmost
//! range to the leftmost, so offsets of ranges still waiting to be applied stay
//! valid even though each replacement changes the buffer length.

use std::borrow::Cow;

use crate::error::MaskError;

/// An inclusive byte span `[start, end]` of one text snapshot to be replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchRange {
    /// First byte of the span.
    pub start: usize,
    /// Last byte of the span (inclusive).
    pub end: usize,
}

impl MatchRange {
    /// Creates a range from inclusive bounds. Inverted ranges are allowed here
    /// and dropped by [`resolve`].
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Converts a half-open capture span into an inclusive range.
    ///
    /// Returns `None` for empty captures, which have nothing to redact.
    #[must_use]
    pub fn from_span(start: usize, end_exclusive: usize) -> Option<Self> {
        let end = end_exclusive.checked_sub(1)?;
        (end >= start).then_some(Self { start, end })
    }

    /// True when `end < start`.
    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &MatchRange) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// True when the two ranges share at least one byte.
    pub fn overlaps(&self, other: &MatchRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Resolves candidate ranges into a substitution plan.
///
/// 1. Inverted ranges are dropped.
/// 2. Ranges with identical bounds are collapsed into one.
/// 3. A range is dropped when another range of the full candidate set contains
///    it. The check always runs against the full set, so a range can be removed
///    by a range that is itself removed later.
/// 4. Survivors are ordered by `end`, descending.
/// 5. Survivors that still partially overlap are merged into their union.
///
/// The result is pairwise disjoint and every dropped range is contained in
/// some returned range.
#[must_use]
pub fn resolve(mut candidates: Vec<MatchRange>) -> Vec<MatchRange> {
    candidates.retain(|range| !range.is_inverted());
    candidates.sort_unstable();
    candidates.dedup();

    let mut survivors: Vec<MatchRange> = candidates
        .iter()
        .enumerate()
        .filter(|&(i, range)| {
            !candidates
                .iter()
                .enumerate()
                .any(|(j, other)| i != j && other.contains(range))
        })
        .map(|(_, range)| *range)
        .collect();

    survivors.sort_unstable_by(|a, b| b.end.cmp(&a.end));

    let mut plan: Vec<MatchRange> = Vec::with_capacity(survivors.len());
    for range in survivors {
        match plan.last_mut() {
            Some(last) if range.overlaps(last) => last.start = last.start.min(range.start),
            _ => plan.push(range),
        }
    }
    plan
}

/// Replaces every range of `plan` with `marker`, in the order given.
///
/// `plan` must be ordered by `end` descending, as produced by [`resolve`].
/// Returns the input borrowed when there is nothing to replace.
pub fn substitute<'a>(
    text: &'a str,
    plan: &[MatchRange],
    marker: &str,
) -> Result<Cow<'a, str>, MaskError> {
    if plan.is_empty() {
        return Ok(Cow::Borrowed(text));
    }

    let mut buffer = String::with_capacity(text.len());
    buffer.push_str(text);
    for range in plan {
        let invalid = || MaskError::InvalidRange {
            start: range.start,
            end: range.end,
            len: buffer.len(),
        };
        if range.is_inverted() || range.end >= buffer.len() {
            return Err(invalid());
        }
        let end_exclusive = range.end + 1;
        if !buffer.is_char_boundary(range.start) || !buffer.is_char_boundary(end_exclusive) {
            return Err(invalid());
        }
        buffer.replace_range(range.start..end_exclusive, marker);
    }
    Ok(Cow::Owned(buffer))
}
