//! Sliding-window entropy detection.
//!
//! Compressed and encrypted spans sit close to 8 bits/byte and match random
//! target values far more often than structured data does.

use serde::Serialize;

use super::{Region, merge_regions};

/// Window length in bytes
pub const ENTROPY_WINDOW: usize = 4096;
/// Window step (50% overlap)
pub const ENTROPY_STEP: usize = 2048;
/// Windows at or above this many bits/byte are excluded
pub const ENTROPY_THRESHOLD: f64 = 7.7;

/// Calculates the Shannon entropy of a byte slice, in bits per byte.
///
/// Returns 0.0 for empty input.
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut histogram = [0usize; 256];
    for &byte in data {
        histogram[byte as usize] += 1;
    }

    let len = data.len() as f64;
    let mut entropy = 0.0;
    for &count in &histogram {
        if count == 0 {
            continue;
        }
        let p = count as f64 / len;
        entropy -= p * p.log2();
    }
    entropy
}

/// Entropy of one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntropySample {
    pub offset: usize,
    pub entropy: f64,
}

/// Window entropies across the blob.
///
/// Only full windows are sampled; a blob shorter than `window` yields none.
pub fn entropy_profile(blob: &[u8], window: usize, step: usize) -> Vec<EntropySample> {
    if window == 0 || step == 0 || blob.len() < window {
        return Vec::new();
    }

    (0..=blob.len() - window)
        .step_by(step)
        .map(|offset| EntropySample {
            offset,
            entropy: shannon_entropy(&blob[offset..offset + window]),
        })
        .collect()
}

/// High-entropy regions, using the default window, step and threshold.
pub fn find_entropy_regions(blob: &[u8]) -> Vec<Region> {
    find_entropy_regions_with(blob, ENTROPY_WINDOW, ENTROPY_STEP, ENTROPY_THRESHOLD)
}

pub fn find_entropy_regions_with(
    blob: &[u8],
    window: usize,
    step: usize,
    threshold: f64,
) -> Vec<Region> {
    let regions = entropy_profile(blob, window, step)
        .into_iter()
        .filter(|sample| sample.entropy >= threshold)
        .map(|sample| Region::new(sample.offset, sample.offset + window, "entropy"))
        .collect();
    merge_regions(regions)
}
