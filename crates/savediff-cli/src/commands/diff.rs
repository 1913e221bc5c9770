//! Diff command implementation.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use savediff_core::{Snapshot, diff_bytes};

use super::hex_utils::format_offset;

/// Run the diff command
pub fn run(a: &Path, b: &Path, limit: usize) -> Result<()> {
    let a = Snapshot::load(a)?;
    let b = Snapshot::load(b)?;
    let summary = diff_bytes(&a.data, &b.data, limit);

    println!("A: {} ({} bytes)", a.path.display(), summary.len_a);
    println!("B: {} ({} bytes)", b.path.display(), summary.len_b);
    if summary.length_delta() > 0 {
        println!(
            "{}",
            format!("Lengths differ by {} bytes; comparing the common prefix", summary.length_delta())
                .yellow()
        );
    }
    println!("Differing bytes: {}", summary.total.bold());
    println!();

    for diff in &summary.diffs {
        println!(
            "  {:>10}  {:02X} -> {:02X}",
            format_offset(diff.offset),
            diff.before,
            diff.after
        );
    }
    if summary.is_truncated() {
        println!("  ... {} more", summary.total - summary.diffs.len());
    }

    Ok(())
}
