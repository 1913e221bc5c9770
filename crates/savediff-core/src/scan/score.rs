//! Deterministic candidate scoring.
//!
//! A genuine counter changes on every transition while the bytes around it
//! stay put. The score rewards exactly that:
//!
//! | Signal                                       | Points            |
//! |----------------------------------------------|-------------------|
//! | field bytes differ A→B and B→C               | +300              |
//! | quiet neighborhood                           | +max(0, 500 − n)  |
//! | chaotic neighborhood (n > 420)               | −250              |
//! | offset inside an exclusion region            | −500              |
//!
//! where `n` is the number of differing bytes (A/B plus B/C) within ±64 bytes
//! of the field.

use serde::Serialize;

/// Neighborhood radius around the field, in bytes
pub const NEIGHBORHOOD: usize = 64;
pub const TRACKED_BONUS: i64 = 300;
pub const QUIET_BUDGET: i64 = 500;
pub const CHAOS_THRESHOLD: usize = 420;
pub const CHAOS_PENALTY: i64 = 250;
pub const EXCLUDED_PENALTY: i64 = 500;

/// Scorer output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Score {
    pub score: i64,
    pub diff_ab: usize,
    pub diff_bc: usize,
}

impl Score {
    pub fn noise(&self) -> usize {
        self.diff_ab + self.diff_bc
    }
}

fn window_diff_count(x: &[u8], y: &[u8], start: usize, end: usize) -> usize {
    x[start..end]
        .iter()
        .zip(&y[start..end])
        .filter(|(p, q)| p != q)
        .count()
}

/// Score the field at `offset..offset + width`.
///
/// Pure: identical inputs always give identical output. A field running past
/// the common length is clipped to it and never earns the tracking bonus.
pub fn compute_score(
    blobs: [&[u8]; 3],
    offset: usize,
    width: usize,
    excluded: bool,
) -> Score {
    let [a, b, c] = blobs;
    let common = a.len().min(b.len()).min(c.len());
    let field_end = offset.saturating_add(width);
    let start = offset.saturating_sub(NEIGHBORHOOD).min(common);
    let end = common
        .min(field_end.saturating_add(NEIGHBORHOOD))
        .max(start);

    let diff_ab = window_diff_count(a, b, start, end);
    let diff_bc = window_diff_count(b, c, start, end);
    let noise = diff_ab + diff_bc;

    let mut score = 0;
    let tracked = field_end <= common && {
        let field = offset..field_end;
        a[field.clone()] != b[field.clone()] && b[field.clone()] != c[field]
    };
    if tracked {
        score += TRACKED_BONUS;
    }

    score += (QUIET_BUDGET - noise as i64).max(0);

    if noise > CHAOS_THRESHOLD {
        score -= CHAOS_PENALTY;
    }
    if excluded {
        score -= EXCLUDED_PENALTY;
    }

    Score {
        score,
        diff_ab,
        diff_bc,
    }
}
