//! Candidate location over three snapshots.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::numeric::{Dtype, DtypeSelector, WidthSelector, resolve_dtypes};
use crate::region::ExclusionMask;

/// Value pattern a field must follow across A, B and C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanTarget {
    /// The three decoded values, in order
    Exact([i64; 3]),
    /// `B - A` and `C - B`
    Delta([i64; 2]),
}

impl ScanTarget {
    #[inline]
    pub fn matches(&self, values: [i64; 3]) -> bool {
        let [va, vb, vc] = values;
        match *self {
            Self::Exact(target) => values == target,
            Self::Delta([d1, d2]) => vb - va == d1 && vc - vb == d2,
        }
    }
}

/// How offsets inside an exclusion region are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExclusionMode {
    /// Never report them
    #[default]
    Skip,
    /// Report them with the exclusion penalty applied
    Demote,
}

/// Everything the locator needs besides the bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRequest {
    pub target: ScanTarget,
    pub width: WidthSelector,
    pub dtype: DtypeSelector,
    pub exclusion_mode: ExclusionMode,
}

impl ScanRequest {
    pub fn exact(values: [i64; 3]) -> Self {
        Self::new(ScanTarget::Exact(values))
    }

    pub fn delta(deltas: [i64; 2]) -> Self {
        Self::new(ScanTarget::Delta(deltas))
    }

    pub fn new(target: ScanTarget) -> Self {
        Self {
            target,
            width: WidthSelector::Auto,
            dtype: DtypeSelector::Auto,
            exclusion_mode: ExclusionMode::Skip,
        }
    }

    pub fn with_width(mut self, width: WidthSelector) -> Self {
        self.width = width;
        self
    }

    pub fn with_dtype(mut self, dtype: DtypeSelector) -> Self {
        self.dtype = dtype;
        self
    }

    pub fn with_exclusion_mode(mut self, mode: ExclusionMode) -> Self {
        self.exclusion_mode = mode;
        self
    }

    pub fn dtypes(&self) -> Result<Vec<Dtype>> {
        resolve_dtypes(self.width, self.dtype)
    }
}

/// Raw locator hit, before scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub offset: usize,
    pub dtype: Dtype,
    pub values: [i64; 3],
    pub excluded: bool,
}

/// Scan every offset under every requested interpretation.
///
/// An offset inside the mask of any snapshot is skipped (or flagged, in
/// [`ExclusionMode::Demote`]). Offsets where a snapshot lacks `width` trailing
/// bytes are skipped silently. Output order is unspecified.
pub fn locate(
    blobs: [&[u8]; 3],
    masks: &[ExclusionMask; 3],
    request: &ScanRequest,
) -> Result<Vec<Match>> {
    let dtypes = request.dtypes()?;
    let [a, b, c] = blobs;
    let common = a.len().min(b.len()).min(c.len());
    let mut matches = Vec::new();

    for dtype in dtypes {
        let width = dtype.width();
        if common < width {
            continue;
        }
        let before = matches.len();

        for offset in 0..=common - width {
            let excluded = masks.iter().any(|mask| mask.contains(offset));
            if excluded && request.exclusion_mode == ExclusionMode::Skip {
                continue;
            }

            let (Some(va), Some(vb), Some(vc)) = (
                dtype.decode(a, offset),
                dtype.decode(b, offset),
                dtype.decode(c, offset),
            ) else {
                continue;
            };

            let values = [va, vb, vc];
            if request.target.matches(values) {
                matches.push(Match {
                    offset,
                    dtype,
                    values,
                    excluded,
                });
            }
        }

        debug!("{}: {} hit(s)", dtype, matches.len() - before);
    }

    Ok(matches)
}
