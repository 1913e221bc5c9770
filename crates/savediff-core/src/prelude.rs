//! Prelude module for convenient imports
//!
//! ```ignore
//! use savediff_core::prelude::*;
//! ```
//!
//! This brings the following into scope:
//!
//! - Inputs: `Snapshot`, `SnapshotSet`, `SavediffConfig`
//! - Search: `ScanRequest`, `Dtype`, the width/dtype selectors, `ExclusionKind`
//! - Results: `Candidate`, `ScanReport`
//! - Patching: `PatchEngine`, `PatchRequest`, `BackupPolicy`
//! - Error handling: `Error`, `Result`

pub use crate::config::SavediffConfig;
pub use crate::error::{Error, Result};
pub use crate::numeric::{Dtype, DtypeSelector, WidthSelector};
pub use crate::patch::{BackupPolicy, PatchEngine, PatchRequest, PatchResult};
pub use crate::pipeline::{ScanReport, run_scan, scan_files};
pub use crate::region::ExclusionKind;
pub use crate::scan::{Candidate, ExclusionMode, ScanRequest};
pub use crate::snapshot::{Snapshot, SnapshotSet};

// Report format trait
pub use crate::report::ReportFormat;
