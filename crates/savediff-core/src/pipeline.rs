//! End-to-end scan: load → exclude → locate → score → rank.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::numeric::Dtype;
use crate::region::{ExclusionKind, ExclusionMask, build_exclusion};
use crate::scan::{Candidate, ScanRequest, scan};
use crate::snapshot::SnapshotSet;

/// Outcome of one scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub paths: [PathBuf; 3],
    pub common_len: usize,
    /// Interpretations that were searched
    pub dtypes: Vec<Dtype>,
    /// Exclusion mask of A, B and C
    pub exclusions: [ExclusionMask; 3],
    /// Ranked, best first
    pub candidates: Vec<Candidate>,
}

impl ScanReport {
    pub fn top(&self, n: usize) -> &[Candidate] {
        &self.candidates[..n.min(self.candidates.len())]
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.candidates.first()
    }
}

/// Scan already-loaded snapshots.
pub fn run_scan(
    snapshots: &SnapshotSet,
    exclude: &[ExclusionKind],
    request: &ScanRequest,
) -> Result<ScanReport> {
    // Selector conflicts fail before any exclusion work
    let dtypes = request.dtypes()?;

    let blobs = snapshots.blobs();
    let exclusions = blobs.map(|blob| build_exclusion(blob, exclude));
    let candidates = scan(blobs, &exclusions, request)?;

    info!(
        "Scanned {} bytes as {:?}: {} candidate(s)",
        snapshots.common_len(),
        dtypes.iter().map(Dtype::label).collect::<Vec<_>>(),
        candidates.len()
    );

    Ok(ScanReport {
        paths: snapshots.paths().map(Path::to_path_buf),
        common_len: snapshots.common_len(),
        dtypes,
        exclusions,
        candidates,
    })
}

/// Load three snapshot files and scan them.
pub fn scan_files<P: AsRef<Path>>(
    paths: &[P],
    exclude: &[ExclusionKind],
    request: &ScanRequest,
) -> Result<ScanReport> {
    let snapshots = SnapshotSet::load(paths)?;
    run_scan(&snapshots, exclude, request)
}
