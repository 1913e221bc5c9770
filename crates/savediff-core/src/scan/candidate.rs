//! Ranked candidates and their hex context.

use std::cmp::Ordering;

use serde::Serialize;

use crate::numeric::Dtype;

/// Bytes of context shown before a candidate offset
pub const CONTEXT_BEFORE: usize = 16;
/// Bytes of context shown from the candidate offset onward
pub const CONTEXT_AFTER: usize = 48;

/// A location and interpretation whose decoded values matched the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub offset: usize,
    pub width: usize,
    pub dtype: Dtype,
    pub values: [i64; 3],
    pub score: i64,
    pub diff_ab: usize,
    pub diff_bc: usize,
    pub context_hex: String,
}

impl Candidate {
    /// Ranking order: score descending, then offset, then dtype label.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then(self.offset.cmp(&other.offset))
            .then(self.dtype.label().cmp(other.dtype.label()))
    }
}

/// Sort candidates into their final ranking.
pub fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by(Candidate::rank_cmp);
}

/// Hex context around `offset`: `<start>..<end> | hh hh ..`.
///
/// Spans `CONTEXT_BEFORE` bytes before and `CONTEXT_AFTER` bytes from the
/// offset, clamped to the blob.
pub fn hexdump_context(blob: &[u8], offset: usize) -> String {
    let start = offset.saturating_sub(CONTEXT_BEFORE).min(blob.len());
    let end = offset.saturating_add(CONTEXT_AFTER).min(blob.len());
    let hex = blob[start..end.max(start)]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{:#x}..{:#x} | {}", start, end, hex)
}
