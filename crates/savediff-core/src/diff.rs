//! Byte-level comparison of two snapshots.

use serde::Serialize;

/// One differing byte position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteDiff {
    pub offset: usize,
    pub before: u8,
    pub after: u8,
}

/// Summary of a two-way comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub len_a: usize,
    pub len_b: usize,
    /// Total differing positions within the common length
    pub total: usize,
    /// The first `limit` differences, by offset
    pub diffs: Vec<ByteDiff>,
}

impl DiffSummary {
    pub fn length_delta(&self) -> usize {
        self.len_a.abs_diff(self.len_b)
    }

    pub fn is_truncated(&self) -> bool {
        self.total > self.diffs.len()
    }
}

/// Compare `a` and `b` up to their common length.
pub fn diff_bytes(a: &[u8], b: &[u8], limit: usize) -> DiffSummary {
    let mut diffs = Vec::new();
    let mut total = 0;

    for (offset, (&before, &after)) in a.iter().zip(b).enumerate() {
        if before != after {
            total += 1;
            if diffs.len() < limit {
                diffs.push(ByteDiff {
                    offset,
                    before,
                    after,
                });
            }
        }
    }

    DiffSummary {
        len_a: a.len(),
        len_b: b.len(),
        total,
        diffs,
    }
}
