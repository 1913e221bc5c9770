//! Context command implementation.
//!
//! Displays file bytes around an offset in traditional hexdump format.
//!
//! # Output Format
//!
//! ```text
//! 0x00070: 53 41 56 45 11 11 11 11  11 11 11 11 11 11 11 11  |SAVE............|
//! ```

use std::path::Path;

use anyhow::{Result, bail};
use savediff_core::Snapshot;
use savediff_core::scan::CONTEXT_BEFORE;

use super::hex_utils::parse_offset;

/// Run the context command
pub fn run(file: &Path, offset: &str, size: usize, ascii: bool) -> Result<()> {
    let offset = parse_offset(offset)?;
    let snapshot = Snapshot::load(file)?;
    if offset >= snapshot.len() {
        bail!(
            "Offset 0x{:X} is past the end of {} ({} bytes)",
            offset,
            file.display(),
            snapshot.len()
        );
    }

    let start = offset.saturating_sub(CONTEXT_BEFORE);
    let end = start.saturating_add(size).min(snapshot.len());
    let bytes = &snapshot.data[start..end];

    println!("Hexdump at 0x{:X} ({} bytes from 0x{:X}):", offset, bytes.len(), start);
    println!();

    for line in format_rows(start, bytes, ascii) {
        println!("{}", line);
    }

    Ok(())
}

/// Format `bytes` as 16-byte rows, labelled from `base`.
pub fn format_rows(base: usize, bytes: &[u8], ascii: bool) -> Vec<String> {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            let mut line = format!("0x{:05X}: ", base + i * 16);

            // Hex bytes
            for (j, byte) in chunk.iter().enumerate() {
                if j == 8 {
                    line.push(' ');
                }
                line.push_str(&format!("{:02X} ", byte));
            }

            // Padding for incomplete lines
            for j in chunk.len()..16 {
                if j == 8 {
                    line.push(' ');
                }
                line.push_str("   ");
            }

            // ASCII representation
            if ascii {
                line.push_str(" |");
                for &byte in chunk {
                    if (0x20..0x7F).contains(&byte) {
                        line.push(byte as char);
                    } else {
                        line.push('.');
                    }
                }
                for _ in chunk.len()..16 {
                    line.push(' ');
                }
                line.push('|');
            }

            line.trim_end().to_string()
        })
        .collect()
}
