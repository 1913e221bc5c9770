//! Verify command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use savediff_core::{Dtype, read_value};

use super::hex_utils::{format_offset, parse_offset};

/// Run the verify command
pub fn run(file: &Path, offset: &str, dtype: Dtype, expected: i64) -> Result<()> {
    let offset = parse_offset(offset)?;
    let actual = read_value(file, offset, dtype)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    match actual {
        Some(value) if value == expected => {
            println!("{} {} @ {} = {}", "OK".green(), dtype, format_offset(offset), value);
            Ok(())
        }
        Some(value) => {
            println!(
                "{} {} @ {} = {} (expected {})",
                "MISMATCH".red(),
                dtype,
                format_offset(offset),
                value,
                expected
            );
            bail!("Verification failed")
        }
        None => bail!(
            "Offset {} (+{}) is past the end of {}",
            format_offset(offset),
            dtype.width(),
            file.display()
        ),
    }
}
