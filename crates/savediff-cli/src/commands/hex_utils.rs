//! Offset parsing and formatting utilities.

use anyhow::Result;

/// Parse a file offset: decimal, or hex with a 0x prefix.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_offset("0x80").unwrap(), 0x80);
/// assert_eq!(parse_offset("128").unwrap(), 128);
/// ```
pub fn parse_offset(s: &str) -> Result<usize> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse::<usize>(),
    };
    parsed.map_err(|e| anyhow::anyhow!("Invalid offset '{}': {}", s, e))
}

/// Format an offset as a hex string with 0x prefix.
pub fn format_offset(offset: usize) -> String {
    format!("0x{:X}", offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offset_hex() {
        assert_eq!(parse_offset("0x80").unwrap(), 0x80);
        assert_eq!(parse_offset("0X1F4").unwrap(), 500);
        assert_eq!(parse_offset(" 0xdeadbeef ").unwrap(), 0xDEADBEEF);
    }

    #[test]
    fn test_parse_offset_decimal() {
        assert_eq!(parse_offset("128").unwrap(), 128);
        assert_eq!(parse_offset("0").unwrap(), 0);
        // No prefix means decimal, even when the digits look like hex
        assert_eq!(parse_offset("10").unwrap(), 10);
    }

    #[test]
    fn test_parse_offset_invalid() {
        assert!(parse_offset("0xZZZ").is_err());
        assert!(parse_offset("80h").is_err());
        assert!(parse_offset("-1").is_err());
        assert!(parse_offset("").is_err());
        assert!(parse_offset("0x").is_err());
    }

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(0x80), "0x80");
        assert_eq!(format_offset(0xDEADBEEF), "0xDEADBEEF");
        assert_eq!(format_offset(0), "0x0");
    }
}
