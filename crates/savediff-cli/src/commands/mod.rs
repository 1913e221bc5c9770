//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod compare;
pub mod context;
pub mod diff;
pub mod find;
pub mod hex_utils;
pub mod patch;
pub mod regions;
pub mod scan;
pub mod selftest;
pub mod verify;

use anyhow::Result;
use savediff_core::{ExclusionKind, SavediffConfig};

/// Exclusion kinds from the command line, or the configured default
pub(crate) fn exclusion_kinds(
    cli: Option<&[String]>,
    config: &SavediffConfig,
) -> Result<Vec<ExclusionKind>> {
    match cli {
        // A bare `--exclude` selects no kinds
        Some(items) => Ok(ExclusionKind::parse_list(items)?),
        None => Ok(config.exclude.clone()),
    }
}
