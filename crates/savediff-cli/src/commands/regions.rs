//! Regions command implementation.
//!
//! Shows what a scan would skip in one file, and optionally the entropy
//! profile behind the entropy exclusions.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use savediff_core::region::{ENTROPY_STEP, ENTROPY_THRESHOLD, ENTROPY_WINDOW};
use savediff_core::{SavediffConfig, Snapshot, build_exclusion, entropy_profile};

use super::exclusion_kinds;
use super::hex_utils::format_offset;

/// Run the regions command
pub fn run(
    file: &Path,
    exclude: Option<&[String]>,
    profile: bool,
    config: &SavediffConfig,
) -> Result<()> {
    let kinds = exclusion_kinds(exclude, config)?;
    let snapshot = Snapshot::load(file)?;
    let mask = build_exclusion(&snapshot.data, &kinds);

    println!("{} ({} bytes)", file.display(), snapshot.len());
    println!(
        "Excluded: {} region(s), {} bytes",
        mask.regions().len(),
        mask.excluded_bytes()
    );
    println!();

    for region in mask.regions() {
        println!(
            "  {:>10} .. {:<10} {:>8} bytes  {}",
            format_offset(region.start),
            format_offset(region.end),
            region.len(),
            region.reason.cyan()
        );
    }

    if profile {
        println!();
        println!(
            "Entropy profile (window {}, step {}, threshold {}):",
            ENTROPY_WINDOW, ENTROPY_STEP, ENTROPY_THRESHOLD
        );
        let samples = entropy_profile(&snapshot.data, ENTROPY_WINDOW, ENTROPY_STEP);
        if samples.is_empty() {
            println!("  (file shorter than one window)");
        }
        for sample in samples {
            let line = format!("  {:>10}  {:.3}", format_offset(sample.offset), sample.entropy);
            if sample.entropy >= ENTROPY_THRESHOLD {
                println!("{}", line.red());
            } else {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
