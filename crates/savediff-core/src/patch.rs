//! Byte-level patching with backup and read-back verification.
//!
//! All request validation happens before the first write. A backup is taken
//! before the target is touched; if the backup cannot be written, nothing is
//! patched. The write itself is not atomic, so the backup is the recovery
//! path for a failed or unwanted patch.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::numeric::Dtype;

/// Default suffix for [`BackupPolicy::FixedSuffix`]
pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

/// Where the pre-patch image is saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum BackupPolicy {
    /// No backup
    Disabled,
    /// `<input><suffix>` next to the input, written only if absent
    FixedSuffix { suffix: String },
    /// `<dir>/<stem>_<YYYYmmdd_HHMMSS><.ext>.bak`, one per patch
    Timestamped { dir: PathBuf },
}

impl Default for BackupPolicy {
    fn default() -> Self {
        Self::FixedSuffix {
            suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

impl BackupPolicy {
    /// Write the backup of `input` (whose bytes are `blob`).
    ///
    /// Returns the backup path, or `None` when disabled.
    fn apply(&self, input: &Path, blob: &[u8]) -> Result<Option<PathBuf>> {
        let path = match self {
            Self::Disabled => return Ok(None),
            Self::FixedSuffix { suffix } => {
                let mut name = input.file_name().unwrap_or_default().to_os_string();
                name.push(suffix);
                let path = input.with_file_name(name);
                if path.exists() {
                    debug!("Keeping existing backup {}", path.display());
                    return Ok(Some(path));
                }
                path
            }
            Self::Timestamped { dir } => {
                fs::create_dir_all(dir).map_err(|e| Error::BackupFailed {
                    path: dir.clone(),
                    source: e,
                })?;
                timestamped_backup_path(dir, input)
            }
        };

        fs::write(&path, blob).map_err(|e| Error::BackupFailed {
            path: path.clone(),
            source: e,
        })?;
        info!("Backup: {}", path.display());
        Ok(Some(path))
    }
}

fn timestamped_backup_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "backup".to_string());
    let ext = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let stamp = Local::now().format("%Y%m%d_%H%M%S");

    let mut path = dir.join(format!("{}_{}{}.bak", stem, stamp, ext));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{}_{}_{}{}.bak", stem, stamp, n, ext));
        n += 1;
    }
    path
}

/// One field overwrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRequest {
    pub input: PathBuf,
    /// Write here instead of patching in place
    pub output: Option<PathBuf>,
    pub offset: usize,
    pub dtype: Dtype,
    pub value: i64,
    /// Validate and report, but write nothing
    pub dry_run: bool,
}

impl PatchRequest {
    pub fn new<P: Into<PathBuf>>(input: P, offset: usize, dtype: Dtype, value: i64) -> Self {
        Self {
            input: input.into(),
            output: None,
            offset,
            dtype,
            value,
            dry_run: false,
        }
    }

    pub fn output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn target(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.input)
    }
}

/// Receipt of a completed (or dry-run) patch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub backup_path: Option<PathBuf>,
    pub offset: usize,
    pub old_bytes: Vec<u8>,
    pub new_bytes: Vec<u8>,
    pub dry_run: bool,
}

/// Applies patches under one backup policy
#[derive(Debug, Clone, Default)]
pub struct PatchEngine {
    backup: BackupPolicy,
}

impl PatchEngine {
    pub fn new(backup: BackupPolicy) -> Self {
        Self { backup }
    }

    pub fn backup_policy(&self) -> &BackupPolicy {
        &self.backup
    }

    pub fn patch(&self, request: &PatchRequest) -> Result<PatchResult> {
        let input = request.input.as_path();
        let metadata = fs::metadata(input).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileMissing(input.to_path_buf())
            } else {
                Error::io(input, e)
            }
        })?;
        if !metadata.is_file() {
            return Err(Error::NotAFile(input.to_path_buf()));
        }

        let new_bytes = request.dtype.encode(request.value)?;
        let width = new_bytes.len();

        let blob = fs::read(input).map_err(|e| Error::io(input, e))?;
        let end = request
            .offset
            .checked_add(width)
            .filter(|&end| end <= blob.len())
            .ok_or(Error::OffsetOutOfBounds {
                offset: request.offset,
                width,
                len: blob.len(),
            })?;
        let old_bytes = blob[request.offset..end].to_vec();
        let target = request.target().to_path_buf();

        if request.dry_run {
            debug!(
                "Dry run: {} @ {:#x}: {:02x?} -> {:02x?}",
                input.display(),
                request.offset,
                old_bytes,
                new_bytes
            );
            return Ok(PatchResult {
                input_path: input.to_path_buf(),
                output_path: target,
                backup_path: None,
                offset: request.offset,
                old_bytes,
                new_bytes,
                dry_run: true,
            });
        }

        let backup_path = self.backup.apply(input, &blob)?;

        let mut patched = blob;
        patched[request.offset..end].copy_from_slice(&new_bytes);

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(&target, &patched).map_err(|e| Error::io(&target, e))?;

        info!(
            "Patched {} @ {:#x} ({}): {:02x?} -> {:02x?}",
            target.display(),
            request.offset,
            request.dtype,
            old_bytes,
            new_bytes
        );

        Ok(PatchResult {
            input_path: input.to_path_buf(),
            output_path: target,
            backup_path,
            offset: request.offset,
            old_bytes,
            new_bytes,
            dry_run: false,
        })
    }

    /// Patch, then re-read the target and compare.
    ///
    /// A mismatch is reported as [`Error::VerificationFailed`]; the backup is
    /// left in place and nothing is rolled back.
    pub fn patch_and_verify(&self, request: &PatchRequest) -> Result<PatchResult> {
        let result = self.patch(request)?;
        if result.dry_run {
            return Ok(result);
        }

        let actual = read_value(&result.output_path, result.offset, request.dtype)?;
        if actual != Some(request.value) {
            warn!(
                "Verification mismatch at {:#x}: expected {}, got {:?}",
                result.offset, request.value, actual
            );
            return Err(Error::VerificationFailed {
                path: result.output_path,
                offset: result.offset,
                expected: request.value,
                actual,
            });
        }
        Ok(result)
    }
}

/// Decode the field at `offset` from the file on disk.
///
/// `None` when the file is too short.
pub fn read_value<P: AsRef<Path>>(path: P, offset: usize, dtype: Dtype) -> Result<Option<i64>> {
    let path = path.as_ref();
    let blob = fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(dtype.decode(&blob, offset))
}

/// Re-read `path` and check that the field at `offset` holds `expected`.
pub fn verify<P: AsRef<Path>>(path: P, offset: usize, dtype: Dtype, expected: i64) -> Result<bool> {
    Ok(read_value(path, offset, dtype)? == Some(expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_blob(dir: &TempDir, name: &str, len: usize) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, vec![0x11u8; len]).unwrap();
        path
    }

    #[test]
    fn test_patch_in_place_with_fixed_suffix_backup() {
        let dir = TempDir::new().unwrap();
        let path = write_blob(&dir, "save.sav", 64);

        let engine = PatchEngine::default();
        let result = engine
            .patch(&PatchRequest::new(&path, 8, Dtype::U32, 999))
            .unwrap();

        assert_eq!(result.old_bytes, vec![0x11; 4]);
        assert_eq!(result.new_bytes, vec![0xE7, 0x03, 0x00, 0x00]);
        assert_eq!(result.output_path, path);

        let backup = result.backup_path.unwrap();
        assert_eq!(backup, dir.path().join("save.sav.bak"));
        assert_eq!(fs::read(&backup).unwrap(), vec![0x11u8; 64]);
        assert!(verify(&path, 8, Dtype::U32, 999).unwrap());
    }

    #[test]
    fn test_fixed_suffix_backup_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = write_blob(&dir, "save.sav", 16);
        let engine = PatchEngine::default();

        engine.patch(&PatchRequest::new(&path, 0, Dtype::U16, 1)).unwrap();
        engine.patch(&PatchRequest::new(&path, 0, Dtype::U16, 2)).unwrap();

        let backup = fs::read(dir.path().join("save.sav.bak")).unwrap();
        assert_eq!(backup, vec![0x11u8; 16]);
        assert_eq!(read_value(&path, 0, Dtype::U16).unwrap(), Some(2));
    }

    #[test]
    fn test_timestamped_backups_are_distinct() {
        let dir = TempDir::new().unwrap();
        let path = write_blob(&dir, "slot1.sav", 16);
        let backups = dir.path().join("backups");
        let engine = PatchEngine::new(BackupPolicy::Timestamped {
            dir: backups.clone(),
        });

        let first = engine
            .patch(&PatchRequest::new(&path, 0, Dtype::U16, 1))
            .unwrap();
        let second = engine
            .patch(&PatchRequest::new(&path, 0, Dtype::U16, 2))
            .unwrap();

        let first = first.backup_path.unwrap();
        let second = second.backup_path.unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with(&backups));
        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("slot1_"));
        assert!(name.ends_with(".sav.bak"));
        assert_eq!(fs::read(&second).unwrap()[..2], [1, 0]);
    }

    #[test]
    fn test_patch_to_output_leaves_input_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_blob(&dir, "save.sav", 32);
        let out = dir.path().join("out").join("patched.sav");

        let engine = PatchEngine::new(BackupPolicy::Disabled);
        let result = engine
            .patch_and_verify(&PatchRequest::new(&path, 4, Dtype::S16, -2).output(&out))
            .unwrap();

        assert!(result.backup_path.is_none());
        assert_eq!(fs::read(&path).unwrap(), vec![0x11u8; 32]);
        assert_eq!(fs::read(&out).unwrap()[4..6], [0xFE, 0xFF]);
    }

    #[test]
    fn test_out_of_range_value_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write_blob(&dir, "save.sav", 32);

        let err = PatchEngine::default()
            .patch(&PatchRequest::new(&path, 0, Dtype::U16, 70000))
            .unwrap_err();

        assert!(matches!(err, Error::ValueOutOfRange { value: 70000, .. }));
        assert_eq!(fs::read(&path).unwrap(), vec![0x11u8; 32]);
        assert!(!dir.path().join("save.sav.bak").exists());
    }

    #[test]
    fn test_offset_out_of_bounds() {
        let dir = TempDir::new().unwrap();
        let path = write_blob(&dir, "save.sav", 10);

        let err = PatchEngine::default()
            .patch(&PatchRequest::new(&path, 8, Dtype::U32, 1))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::OffsetOutOfBounds {
                offset: 8,
                width: 4,
                len: 10
            }
        ));

        let err = PatchEngine::default()
            .patch(&PatchRequest::new(&path, usize::MAX, Dtype::U16, 1))
            .unwrap_err();
        assert!(matches!(err, Error::OffsetOutOfBounds { .. }));
        assert!(!dir.path().join("save.sav.bak").exists());
    }

    #[test]
    fn test_missing_and_non_regular_input() {
        let dir = TempDir::new().unwrap();
        let engine = PatchEngine::default();

        let err = engine
            .patch(&PatchRequest::new(dir.path().join("nope.sav"), 0, Dtype::U16, 1))
            .unwrap_err();
        assert!(matches!(err, Error::FileMissing(_)));
        assert!(err.is_not_found());
        assert!(err.to_string().starts_with("File not found: "));

        let err = engine
            .patch(&PatchRequest::new(dir.path(), 0, Dtype::U16, 1))
            .unwrap_err();
        assert!(matches!(err, Error::NotAFile(_)));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write_blob(&dir, "save.sav", 16);

        let result = PatchEngine::default()
            .patch_and_verify(&PatchRequest::new(&path, 2, Dtype::U16, 0x1234).dry_run(true))
            .unwrap();

        assert!(result.dry_run);
        assert_eq!(result.new_bytes, vec![0x34, 0x12]);
        assert_eq!(fs::read(&path).unwrap(), vec![0x11u8; 16]);
        assert!(!dir.path().join("save.sav.bak").exists());
    }

    #[test]
    fn test_verify_past_end_is_false() {
        let dir = TempDir::new().unwrap();
        let path = write_blob(&dir, "save.sav", 4);
        assert!(!verify(&path, 3, Dtype::U16, 0x1111).unwrap());
        assert!(verify(&path, 2, Dtype::U16, 0x1111).unwrap());
    }

    #[test]
    fn test_backup_failure_blocks_write() {
        let dir = TempDir::new().unwrap();
        let path = write_blob(&dir, "save.sav", 16);
        // a regular file where the backup directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();

        let engine = PatchEngine::new(BackupPolicy::Timestamped { dir: blocker });
        let err = engine
            .patch(&PatchRequest::new(&path, 0, Dtype::U16, 7))
            .unwrap_err();

        assert!(matches!(err, Error::BackupFailed { .. }));
        assert_eq!(fs::read(&path).unwrap(), vec![0x11u8; 16]);
    }
}
