//! Find command implementation.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use savediff_core::scan::hexdump_context;
use savediff_core::{DtypeSelector, Snapshot, find_value};

use super::hex_utils::format_offset;

/// Run the find command
pub fn run(file: &Path, value: i64, dtype: DtypeSelector, limit: usize) -> Result<()> {
    let snapshot = Snapshot::load(file)?;
    let hits = find_value(&snapshot.data, value, dtype);

    println!("{} ({} bytes)", file.display(), snapshot.len());
    if hits.is_empty() {
        println!("{}", format!("Value {} not found", value).yellow());
        return Ok(());
    }
    println!("Value {}: {} occurrence(s)", value, hits.len().bold());
    println!();

    for hit in hits.iter().take(limit) {
        println!("  {:>10}  {:<4}", format_offset(hit.offset), hit.dtype);
        println!("      {}", hexdump_context(&snapshot.data, hit.offset));
    }
    if hits.len() > limit {
        println!("  ... {} more", hits.len() - limit);
    }

    Ok(())
}
