//! Numeric interpretations of snapshot bytes.
//!
//! Every field is read little-endian as a 16 or 32-bit integer, signed or
//! unsigned. Decoded values are widened to `i64` so that the four
//! interpretations share one value type and delta arithmetic never overflows.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::{Error, Result};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Dtype {
    U16,
    S16,
    U32,
    S32,
}

impl Dtype {
    /// Canonical expansion order for `auto`.
    pub const ALL: [Dtype; 4] = [Dtype::U16, Dtype::S16, Dtype::U32, Dtype::S32];

    pub fn from_width(width: usize, signed: bool) -> Result<Self> {
        match (width, signed) {
            (2, false) => Ok(Self::U16),
            (2, true) => Ok(Self::S16),
            (4, false) => Ok(Self::U32),
            (4, true) => Ok(Self::S32),
            _ => Err(Error::UnsupportedWidth(width)),
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Self::U16 | Self::S16 => 2,
            Self::U32 | Self::S32 => 4,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Self::S16 | Self::S32)
    }

    pub fn label(&self) -> &'static str {
        self.into()
    }

    /// Inclusive value range representable by this interpretation
    pub fn range(&self) -> (i64, i64) {
        match self {
            Self::U16 => (0, u16::MAX as i64),
            Self::S16 => (i16::MIN as i64, i16::MAX as i64),
            Self::U32 => (0, u32::MAX as i64),
            Self::S32 => (i32::MIN as i64, i32::MAX as i64),
        }
    }

    pub fn fits(&self, value: i64) -> bool {
        let (lo, hi) = self.range();
        (lo..=hi).contains(&value)
    }

    /// Decode the field at `offset`, or `None` if the blob is too short.
    #[inline]
    pub fn decode(&self, blob: &[u8], offset: usize) -> Option<i64> {
        let end = offset.checked_add(self.width())?;
        let bytes = blob.get(offset..end)?;
        let value = match self {
            Self::U16 => u16::from_le_bytes([bytes[0], bytes[1]]) as i64,
            Self::S16 => i16::from_le_bytes([bytes[0], bytes[1]]) as i64,
            Self::U32 => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64,
            Self::S32 => i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64,
        };
        Some(value)
    }

    /// Little-endian encoding of `value`. Out-of-range values are rejected,
    /// never truncated.
    pub fn encode(&self, value: i64) -> Result<Vec<u8>> {
        if !self.fits(value) {
            return Err(Error::ValueOutOfRange {
                value,
                dtype: *self,
            });
        }
        let bytes = match self {
            Self::U16 => (value as u16).to_le_bytes().to_vec(),
            Self::S16 => (value as i16).to_le_bytes().to_vec(),
            Self::U32 => (value as u32).to_le_bytes().to_vec(),
            Self::S32 => (value as i32).to_le_bytes().to_vec(),
        };
        Ok(bytes)
    }
}

/// Field width requested for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthSelector {
    #[default]
    Auto,
    Two,
    Four,
}

impl WidthSelector {
    pub fn width(&self) -> Option<usize> {
        match self {
            Self::Auto => None,
            Self::Two => Some(2),
            Self::Four => Some(4),
        }
    }
}

impl FromStr for WidthSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "2" => Ok(Self::Two),
            "4" => Ok(Self::Four),
            other => match other.parse::<usize>() {
                Ok(width) => Err(Error::UnsupportedWidth(width)),
                Err(_) => Err(Error::UnknownWidth(other.to_string())),
            },
        }
    }
}

/// Interpretation requested for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DtypeSelector {
    #[default]
    Auto,
    Only(Dtype),
}

impl FromStr for DtypeSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        Dtype::from_str(s.trim())
            .map(Self::Only)
            .map_err(|_| Error::UnknownDtype(s.to_string()))
    }
}

/// Expand the width/dtype selectors into the interpretations to scan.
///
/// An explicit dtype that contradicts an explicit width is rejected.
pub fn resolve_dtypes(width: WidthSelector, dtype: DtypeSelector) -> Result<Vec<Dtype>> {
    match (dtype, width.width()) {
        (DtypeSelector::Only(dt), Some(w)) if dt.width() != w => {
            Err(Error::WidthDtypeMismatch { width: w, dtype: dt })
        }
        (DtypeSelector::Only(dt), _) => Ok(vec![dt]),
        (DtypeSelector::Auto, Some(w)) => {
            Ok(Dtype::ALL.into_iter().filter(|dt| dt.width() == w).collect())
        }
        (DtypeSelector::Auto, None) => Ok(Dtype::ALL.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_signedness() {
        let blob = [0xFF, 0xFF, 0xFF, 0xFF];
        assert_eq!(Dtype::U16.decode(&blob, 0), Some(0xFFFF));
        assert_eq!(Dtype::S16.decode(&blob, 0), Some(-1));
        assert_eq!(Dtype::U32.decode(&blob, 0), Some(0xFFFF_FFFF));
        assert_eq!(Dtype::S32.decode(&blob, 0), Some(-1));
    }

    #[test]
    fn test_decode_past_end() {
        let blob = [1, 2, 3];
        assert_eq!(Dtype::U16.decode(&blob, 1), Some(0x0302));
        assert_eq!(Dtype::U16.decode(&blob, 2), None);
        assert_eq!(Dtype::U32.decode(&blob, 0), None);
        assert_eq!(Dtype::U32.decode(&blob, usize::MAX), None);
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        assert!(matches!(
            Dtype::U16.encode(70000),
            Err(Error::ValueOutOfRange { value: 70000, .. })
        ));
        assert!(Dtype::U16.encode(-1).is_err());
        assert!(Dtype::S16.encode(32768).is_err());
        assert_eq!(Dtype::S16.encode(-2).unwrap(), vec![0xFE, 0xFF]);
        assert_eq!(Dtype::U32.encode(999).unwrap(), vec![0xE7, 0x03, 0, 0]);
    }

    #[test]
    fn test_from_width() {
        assert_eq!(Dtype::from_width(2, false).unwrap(), Dtype::U16);
        assert_eq!(Dtype::from_width(4, true).unwrap(), Dtype::S32);
        assert!(matches!(
            Dtype::from_width(8, false),
            Err(Error::UnsupportedWidth(8))
        ));
    }

    #[test]
    fn test_labels_parse_case_insensitive() {
        assert_eq!("U32".parse::<Dtype>().unwrap(), Dtype::U32);
        assert_eq!(Dtype::S16.to_string(), "s16");
        assert_eq!(
            "auto".parse::<DtypeSelector>().unwrap(),
            DtypeSelector::Auto
        );
        assert!(matches!(
            "f32".parse::<DtypeSelector>(),
            Err(Error::UnknownDtype(_))
        ));
        assert!(matches!(
            "8".parse::<WidthSelector>(),
            Err(Error::UnsupportedWidth(8))
        ));
    }

    #[test]
    fn test_resolve_dtypes() {
        assert_eq!(
            resolve_dtypes(WidthSelector::Auto, DtypeSelector::Auto).unwrap(),
            Dtype::ALL.to_vec()
        );
        assert_eq!(
            resolve_dtypes(WidthSelector::Two, DtypeSelector::Auto).unwrap(),
            vec![Dtype::U16, Dtype::S16]
        );
        assert_eq!(
            resolve_dtypes(WidthSelector::Four, DtypeSelector::Only(Dtype::S32)).unwrap(),
            vec![Dtype::S32]
        );
        assert!(matches!(
            resolve_dtypes(WidthSelector::Two, DtypeSelector::Only(Dtype::U32)),
            Err(Error::WidthDtypeMismatch { width: 2, .. })
        ));
    }
}
