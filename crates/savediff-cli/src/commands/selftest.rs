//! Selftest command implementation.
//!
//! Writes three synthetic snapshots with a counter at 0x80 (111, 222, 333),
//! then runs the full scan/patch/verify cycle against them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use savediff_core::{
    BackupPolicy, Dtype, DtypeSelector, Error, ExclusionKind, PatchEngine, PatchRequest,
    ScanRequest, scan_files, verify,
};
use tracing::info;

const FIELD: usize = 0x80;
const SNAPSHOT_LEN: usize = 512;
const VALUES: [u32; 3] = [111, 222, 333];

fn scratch_dir() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir().context("Failed to determine cache directory")?;
    Ok(cache_dir.join("savediff").join("selftest"))
}

fn synthetic_snapshot(value: u32) -> Vec<u8> {
    let mut blob = vec![0x11u8; SNAPSHOT_LEN];
    blob[..4].copy_from_slice(b"SAVE");
    blob[FIELD..FIELD + 4].copy_from_slice(&value.to_le_bytes());
    blob
}

fn write_snapshots(dir: &Path) -> Result<[PathBuf; 3]> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let paths = ["a.sav", "b.sav", "c.sav"].map(|name| dir.join(name));
    for (path, value) in paths.iter().zip(VALUES) {
        fs::write(path, synthetic_snapshot(value))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(paths)
}

/// Outcome of one selftest step
struct Check {
    name: &'static str,
    passed: bool,
}

fn run_checks(paths: &[PathBuf; 3]) -> Result<Vec<Check>> {
    let mut checks = Vec::new();
    let values = VALUES.map(i64::from);

    let exact = ScanRequest::exact(values).with_dtype(DtypeSelector::Only(Dtype::U32));
    let report = scan_files(paths, &ExclusionKind::DEFAULT, &exact)?;
    checks.push(Check {
        name: "exact u32 scan ranks 0x80 first",
        passed: report
            .best()
            .is_some_and(|c| c.offset == FIELD && c.width == 4 && c.dtype == Dtype::U32),
    });

    let delta = ScanRequest::delta([values[1] - values[0], values[2] - values[1]]);
    let report = scan_files(paths, &ExclusionKind::DEFAULT, &delta)?;
    checks.push(Check {
        name: "delta scan ranks 0x80 first",
        passed: report.best().is_some_and(|c| c.offset == FIELD),
    });

    let target = &paths[2];
    let original = fs::read(target).with_context(|| format!("Failed to read {}", target.display()))?;
    let engine = PatchEngine::new(BackupPolicy::default());
    let result = engine.patch_and_verify(&PatchRequest::new(target, FIELD, Dtype::U32, 999))?;
    let backup_ok = match &result.backup_path {
        Some(path) => fs::read(path).is_ok_and(|bytes| bytes == original),
        None => false,
    };
    checks.push(Check {
        name: "patch to 999 verifies and keeps a backup",
        passed: verify(target, FIELD, Dtype::U32, 999)? && backup_ok,
    });

    let before = fs::read(&paths[0]).with_context(|| format!("Failed to read {}", paths[0].display()))?;
    let rejected = engine.patch(&PatchRequest::new(&paths[0], FIELD, Dtype::U16, 70000));
    let after = fs::read(&paths[0]).with_context(|| format!("Failed to read {}", paths[0].display()))?;
    checks.push(Check {
        name: "out-of-range u16 value is rejected without writing",
        passed: matches!(rejected, Err(Error::ValueOutOfRange { .. })) && before == after,
    });

    Ok(checks)
}

/// Run the selftest command
pub fn run(dir: Option<PathBuf>) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => scratch_dir()?,
    };
    info!("Selftest scratch directory: {}", dir.display());

    let paths = write_snapshots(&dir)?;
    // A backup left by an earlier run would hide a missing one
    let backup = dir.join("c.sav.bak");
    if backup.exists() {
        fs::remove_file(&backup).with_context(|| format!("Failed to remove {}", backup.display()))?;
    }

    let checks = run_checks(&paths)?;
    let failed = checks.iter().filter(|c| !c.passed).count();
    for check in &checks {
        if check.passed {
            println!("{} {}", "PASS".green(), check.name);
        } else {
            println!("{} {}", "FAIL".red(), check.name);
        }
    }

    if failed > 0 {
        bail!("{} of {} selftest check(s) failed", failed, checks.len());
    }
    println!();
    println!("All {} checks passed", checks.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_selftest_passes_in_scratch_dir() {
        let dir = TempDir::new().unwrap();
        run(Some(dir.path().to_path_buf())).unwrap();
        assert!(dir.path().join("c.sav.bak").exists());
    }

    #[test]
    fn test_selftest_checks_all_pass() {
        let dir = TempDir::new().unwrap();
        let paths = write_snapshots(dir.path()).unwrap();
        let checks = run_checks(&paths).unwrap();
        assert_eq!(checks.len(), 4);
        assert!(checks.iter().all(|c| c.passed));
    }
}
