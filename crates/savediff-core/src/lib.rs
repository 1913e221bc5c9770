//! # savediff-core
//!
//! Locate and patch numeric fields in opaque binary save files by comparing
//! three snapshots taken at consecutive states.
//!
//! This crate provides:
//! - Snapshot loading (exactly three captures, A/B/C)
//! - Region exclusion for embedded PNG images and high-entropy spans
//! - Exact and constant-delta candidate search over u16/s16/u32/s32
//! - Heuristic scoring and deterministic ranking
//! - Patching with backup and read-back verification
//! - Single-file value lookup and two-file offset comparison
//! - JSON and Markdown reports

pub mod config;
pub mod diff;
pub mod error;
pub mod lookup;
pub mod numeric;
pub mod patch;
pub mod pipeline;
pub mod prelude;
pub mod region;
pub mod report;
pub mod scan;
pub mod snapshot;

pub use config::{CONFIG_FILE, SavediffConfig, SavediffConfigBuilder};
pub use diff::{ByteDiff, DiffSummary, diff_bytes};
pub use error::{Error, ErrorKind, Result};
pub use lookup::{ValueComparison, ValueHit, compare_values, find_value};
pub use numeric::{Dtype, DtypeSelector, WidthSelector, resolve_dtypes};
pub use patch::{BackupPolicy, PatchEngine, PatchRequest, PatchResult, read_value, verify};
pub use pipeline::{ScanReport, run_scan, scan_files};
pub use region::{
    ExclusionKind, ExclusionMask, Region, build_exclusion, entropy_profile, find_entropy_regions,
    find_png_regions, merge_regions,
};
pub use report::{JsonReport, MarkdownReport, ReportFormat};
pub use scan::{
    Candidate, ExclusionMode, ScanRequest, ScanTarget, compute_score, locate, rank, scan,
    scan_delta, scan_exact,
};
pub use snapshot::{Snapshot, SnapshotSet};
