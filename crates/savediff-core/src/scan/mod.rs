//! Diff-based field search
//!
//! locate → score → rank. Each stage is a pure function of its inputs;
//! exclusion masks are always passed in explicitly.

mod candidate;
mod locator;
mod score;

pub use candidate::{CONTEXT_AFTER, CONTEXT_BEFORE, Candidate, hexdump_context, rank};
pub use locator::{ExclusionMode, Match, ScanRequest, ScanTarget, locate};
pub use score::{
    CHAOS_PENALTY, CHAOS_THRESHOLD, EXCLUDED_PENALTY, NEIGHBORHOOD, QUIET_BUDGET, Score,
    TRACKED_BONUS, compute_score,
};

use crate::error::Result;
use crate::numeric::{DtypeSelector, WidthSelector};
use crate::region::ExclusionMask;

/// Turn locator hits into scored candidates (unranked).
pub fn score_matches(blobs: [&[u8]; 3], matches: &[Match]) -> Vec<Candidate> {
    matches
        .iter()
        .map(|m| {
            let width = m.dtype.width();
            let score = compute_score(blobs, m.offset, width, m.excluded);
            Candidate {
                offset: m.offset,
                width,
                dtype: m.dtype,
                values: m.values,
                score: score.score,
                diff_ab: score.diff_ab,
                diff_bc: score.diff_bc,
                context_hex: hexdump_context(blobs[0], m.offset),
            }
        })
        .collect()
}

/// Locate, score and rank in one pass.
pub fn scan(
    blobs: [&[u8]; 3],
    masks: &[ExclusionMask; 3],
    request: &ScanRequest,
) -> Result<Vec<Candidate>> {
    let matches = locate(blobs, masks, request)?;
    let mut candidates = score_matches(blobs, &matches);
    rank(&mut candidates);
    Ok(candidates)
}

/// Exact-value scan with explicit selectors.
pub fn scan_exact(
    blobs: [&[u8]; 3],
    values: [i64; 3],
    width: WidthSelector,
    dtype: DtypeSelector,
    masks: &[ExclusionMask; 3],
) -> Result<Vec<Candidate>> {
    let request = ScanRequest::exact(values)
        .with_width(width)
        .with_dtype(dtype);
    scan(blobs, masks, &request)
}

/// Constant-delta scan with explicit selectors.
pub fn scan_delta(
    blobs: [&[u8]; 3],
    deltas: [i64; 2],
    width: WidthSelector,
    dtype: DtypeSelector,
    masks: &[ExclusionMask; 3],
) -> Result<Vec<Candidate>> {
    let request = ScanRequest::delta(deltas)
        .with_width(width)
        .with_dtype(dtype);
    scan(blobs, masks, &request)
}
