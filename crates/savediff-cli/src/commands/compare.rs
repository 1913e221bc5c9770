//! Compare command implementation.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use savediff_core::{Dtype, Snapshot, compare_values};

use super::hex_utils::{format_offset, parse_offset};

/// Run the compare command
pub fn run(a: &Path, b: &Path, offsets: &[String], dtype: Dtype) -> Result<()> {
    let offsets = offsets
        .iter()
        .map(|s| parse_offset(s))
        .collect::<Result<Vec<_>>>()?;
    let a = Snapshot::load(a)?;
    let b = Snapshot::load(b)?;

    println!("A: {}", a.path.display());
    println!("B: {}", b.path.display());
    println!();
    println!("{:>10}  {:>12}  {:>12}  ({})", "offset", "A", "B", dtype);

    for row in compare_values(&a.data, &b.data, &offsets, dtype) {
        let offset = format_offset(row.offset);
        match (row.a, row.b) {
            (Some(va), Some(vb)) => {
                let status = if va == vb {
                    "same".green().to_string()
                } else {
                    "changed".yellow().to_string()
                };
                println!("{:>10}  {:>12}  {:>12}  {}", offset, va, vb, status);
            }
            _ => println!("{:>10}  {}", offset, "out of bounds".red()),
        }
    }

    Ok(())
}
