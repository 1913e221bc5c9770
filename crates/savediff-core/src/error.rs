use std::path::PathBuf;

use thiserror::Error;

use crate::numeric::Dtype;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Exactly 3 snapshots are required, got {0}")]
    SnapshotCount(usize),

    #[error("Snapshot not found: {}", .0.display())]
    SnapshotMissing(PathBuf),

    #[error("File not found: {}", .0.display())]
    FileMissing(PathBuf),

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create backup {}: {source}", path.display())]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported width: {0} (expected 2 or 4)")]
    UnsupportedWidth(usize),

    #[error("Width {width} does not match dtype {dtype}")]
    WidthDtypeMismatch { width: usize, dtype: Dtype },

    #[error("Unknown width selector: {0}")]
    UnknownWidth(String),

    #[error("Unknown dtype: {0}")]
    UnknownDtype(String),

    #[error("Unknown exclusion kind: {0}")]
    UnknownExclusion(String),

    #[error("Value {value} out of range for {dtype}")]
    ValueOutOfRange { value: i64, dtype: Dtype },

    #[error("Offset {offset:#x} (+{width}) out of bounds for {len} bytes")]
    OffsetOutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },

    #[error(
        "Verification failed for {} at {offset:#x}: expected {expected}, got {actual:?}",
        path.display()
    )]
    VerificationFailed {
        path: PathBuf,
        offset: usize,
        expected: i64,
        actual: Option<i64>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Snapshot inputs are missing, unreadable or miscounted.
    Input,
    /// A request was rejected before any side effect.
    Validation,
    /// A write completed but the read-back did not match.
    Integrity,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SnapshotCount(_)
            | Error::SnapshotMissing(_)
            | Error::FileMissing(_)
            | Error::NotAFile(_)
            | Error::Io { .. }
            | Error::BackupFailed { .. }
            | Error::Json(_)
            | Error::Config(_) => ErrorKind::Input,
            Error::UnsupportedWidth(_)
            | Error::WidthDtypeMismatch { .. }
            | Error::UnknownWidth(_)
            | Error::UnknownDtype(_)
            | Error::UnknownExclusion(_)
            | Error::ValueOutOfRange { .. }
            | Error::OffsetOutOfBounds { .. } => ErrorKind::Validation,
            Error::VerificationFailed { .. } => ErrorKind::Integrity,
        }
    }

    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::SnapshotMissing(_) | Error::FileMissing(_) => true,
            Error::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io("save.sav", io_err);
        assert!(err.is_not_found());

        let other_io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err2 = Error::io("save.sav", other_io_err);
        assert!(!err2.is_not_found());

        assert!(Error::SnapshotMissing(PathBuf::from("x")).is_not_found());
        assert!(Error::FileMissing(PathBuf::from("x")).is_not_found());
        assert_eq!(Error::FileMissing(PathBuf::from("x")).kind(), ErrorKind::Input);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::SnapshotCount(2).kind(), ErrorKind::Input);
        assert_eq!(Error::UnsupportedWidth(3).kind(), ErrorKind::Validation);
        assert_eq!(
            Error::ValueOutOfRange {
                value: 70000,
                dtype: Dtype::U16
            }
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            Error::VerificationFailed {
                path: PathBuf::from("x"),
                offset: 0,
                expected: 1,
                actual: Some(2),
            }
            .kind(),
            ErrorKind::Integrity
        );
    }

    #[test]
    fn test_error_messages() {
        let err = Error::OffsetOutOfBounds {
            offset: 0x80,
            width: 4,
            len: 100,
        };
        assert_eq!(err.to_string(), "Offset 0x80 (+4) out of bounds for 100 bytes");

        let err = Error::ValueOutOfRange {
            value: 70000,
            dtype: Dtype::U16,
        };
        assert_eq!(err.to_string(), "Value 70000 out of range for u16");
    }
}
