//! Exclusion regions
//!
//! Byte ranges that are unlikely to hold a plain numeric field are masked out
//! before scanning. Two independent detectors feed the mask:
//!
//! - [`png`]: embedded PNG containers, found by signature and chunk walk
//! - [`entropy`]: high-entropy windows (compressed or encrypted spans)
//!
//! Their regions are pooled and merged into an [`ExclusionMask`]: sorted by
//! start, with no overlapping or touching pairs.

pub mod entropy;
pub mod png;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use tracing::debug;

pub use entropy::{
    ENTROPY_STEP, ENTROPY_THRESHOLD, ENTROPY_WINDOW, EntropySample, entropy_profile,
    find_entropy_regions, shannon_entropy,
};
pub use png::{PNG_SIGNATURE, find_png_regions};

/// Half-open byte range `[start, end)` with its provenance tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub start: usize,
    pub end: usize,
    pub reason: String,
}

impl Region {
    pub fn new(start: usize, end: usize, reason: impl Into<String>) -> Self {
        Self {
            start,
            end,
            reason: reason.into(),
        }
    }

    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Detector selection for [`build_exclusion`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExclusionKind {
    Png,
    Entropy,
    /// Disables all exclusion, whatever else is selected
    None,
}

impl ExclusionKind {
    pub const DEFAULT: [ExclusionKind; 2] = [ExclusionKind::Png, ExclusionKind::Entropy];

    pub fn parse_list<S: AsRef<str>>(items: &[S]) -> crate::Result<Vec<Self>> {
        items
            .iter()
            .map(|s| {
                s.as_ref()
                    .parse::<Self>()
                    .map_err(|_| crate::Error::UnknownExclusion(s.as_ref().to_string()))
            })
            .collect()
    }
}

/// Coalesce regions into canonical form.
///
/// A region whose start is at or before the previous end is folded into it,
/// taking the larger end and appending its tag with `+`.
pub fn merge_regions(mut regions: Vec<Region>) -> Vec<Region> {
    regions.sort_by(|x, y| (x.start, x.end).cmp(&(y.start, y.end)));

    let mut merged: Vec<Region> = Vec::with_capacity(regions.len());
    for item in regions {
        match merged.last_mut() {
            Some(last) if item.start <= last.end => {
                last.end = last.end.max(item.end);
                last.reason.push('+');
                last.reason.push_str(&item.reason);
            }
            _ => merged.push(item),
        }
    }
    merged
}

/// Canonical, merged set of excluded regions for one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExclusionMask {
    regions: Vec<Region>,
}

impl ExclusionMask {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_regions(regions: Vec<Region>) -> Self {
        Self {
            regions: merge_regions(regions),
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Total number of excluded bytes
    pub fn excluded_bytes(&self) -> usize {
        self.regions.iter().map(Region::len).sum()
    }

    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        let idx = self.regions.partition_point(|r| r.end <= offset);
        self.regions.get(idx).is_some_and(|r| r.contains(offset))
    }
}

/// Compute the exclusion mask of one blob.
///
/// Pure function of the bytes. An empty or `none`-containing kind list
/// produces an empty mask.
pub fn build_exclusion(blob: &[u8], kinds: &[ExclusionKind]) -> ExclusionMask {
    if kinds.contains(&ExclusionKind::None) {
        return ExclusionMask::empty();
    }

    let mut regions = Vec::new();
    if kinds.contains(&ExclusionKind::Png) {
        regions.extend(find_png_regions(blob));
    }
    if kinds.contains(&ExclusionKind::Entropy) {
        regions.extend(find_entropy_regions(blob));
    }

    let mask = ExclusionMask::from_regions(regions);
    debug!(
        "Exclusion mask: {} region(s), {} of {} bytes",
        mask.regions().len(),
        mask.excluded_bytes(),
        blob.len()
    );
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overlapping_and_touching() {
        let merged = merge_regions(vec![
            Region::new(100, 200, "entropy"),
            Region::new(0, 10, "png"),
            Region::new(150, 300, "png"),
            Region::new(300, 310, "entropy"),
            Region::new(400, 410, "png"),
        ]);
        assert_eq!(
            merged,
            vec![
                Region::new(0, 10, "png"),
                Region::new(100, 310, "entropy+png+entropy"),
                Region::new(400, 410, "png"),
            ]
        );
    }

    #[test]
    fn test_merge_contained_region_keeps_outer_end() {
        let merged = merge_regions(vec![Region::new(0, 100, "png"), Region::new(10, 20, "entropy")]);
        assert_eq!(merged, vec![Region::new(0, 100, "png+entropy")]);
    }

    #[test]
    fn test_merge_idempotent() {
        let once = merge_regions(vec![
            Region::new(5, 50, "png"),
            Region::new(40, 60, "entropy"),
            Region::new(70, 80, "entropy"),
        ]);
        let twice = merge_regions(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_regions(Vec::new()).is_empty());
    }

    #[test]
    fn test_mask_contains() {
        let mask = ExclusionMask::from_regions(vec![
            Region::new(10, 20, "png"),
            Region::new(30, 40, "entropy"),
        ]);
        assert!(!mask.contains(9));
        assert!(mask.contains(10));
        assert!(mask.contains(19));
        assert!(!mask.contains(20));
        assert!(!mask.contains(25));
        assert!(mask.contains(30));
        assert!(!mask.contains(40));
        assert_eq!(mask.excluded_bytes(), 20);
    }

    #[test]
    fn test_parse_kinds() {
        let kinds = ExclusionKind::parse_list(&["png", "Entropy"]).unwrap();
        assert_eq!(kinds, vec![ExclusionKind::Png, ExclusionKind::Entropy]);
        assert!(matches!(
            ExclusionKind::parse_list(&["zip"]),
            Err(crate::Error::UnknownExclusion(_))
        ));
    }

    #[test]
    fn test_none_disables_everything() {
        let mut blob = vec![0u8; 64];
        blob[8..16].copy_from_slice(&PNG_SIGNATURE);
        let mask = build_exclusion(&blob, &[ExclusionKind::Png, ExclusionKind::None]);
        assert!(mask.is_empty());

        let mask = build_exclusion(&blob, &[ExclusionKind::Png]);
        assert_eq!(mask.regions().len(), 1);
    }
}
