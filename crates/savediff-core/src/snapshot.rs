//! Snapshot loading.
//!
//! A scan always compares exactly three captures of the same file, taken at
//! consecutive states A, B and C. Each capture is read fully into memory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// One full capture of a binary file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub path: PathBuf,
    pub data: Vec<u8>,
}

impl Snapshot {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::SnapshotMissing(path.to_path_buf())
            } else {
                Error::io(path, e)
            }
        })?;
        if !metadata.is_file() {
            return Err(Error::NotAFile(path.to_path_buf()));
        }

        let data = fs::read(path).map_err(|e| Error::io(path, e))?;
        debug!("Loaded snapshot {} ({} bytes)", path.display(), data.len());
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Wrap in-memory bytes, e.g. for tests or host applications.
    pub fn from_bytes<P: Into<PathBuf>>(path: P, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The ordered A/B/C snapshot triple
#[derive(Debug, Clone)]
pub struct SnapshotSet {
    pub a: Snapshot,
    pub b: Snapshot,
    pub c: Snapshot,
}

impl SnapshotSet {
    pub fn new(a: Snapshot, b: Snapshot, c: Snapshot) -> Self {
        Self { a, b, c }
    }

    /// Load exactly three snapshots, in order.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let [a, b, c] = paths else {
            return Err(Error::SnapshotCount(paths.len()));
        };
        Ok(Self {
            a: Snapshot::load(a)?,
            b: Snapshot::load(b)?,
            c: Snapshot::load(c)?,
        })
    }

    pub fn blobs(&self) -> [&[u8]; 3] {
        [&self.a.data, &self.b.data, &self.c.data]
    }

    pub fn paths(&self) -> [&Path; 3] {
        [&self.a.path, &self.b.path, &self.c.path]
    }

    /// Length shared by all three snapshots; no scan reads past it
    pub fn common_len(&self) -> usize {
        self.a.len().min(self.b.len()).min(self.c.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_three() {
        let dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..3)
            .map(|i| {
                let p = dir.path().join(format!("save_{}.sav", i));
                fs::write(&p, vec![i as u8; 10 + i]).unwrap();
                p
            })
            .collect();

        let set = SnapshotSet::load(&paths).unwrap();
        assert_eq!(set.a.data, vec![0u8; 10]);
        assert_eq!(set.c.len(), 12);
        assert_eq!(set.common_len(), 10);
        assert_eq!(set.paths()[1], paths[1].as_path());
    }

    #[test]
    fn test_load_wrong_count() {
        let paths = ["a.sav", "b.sav"];
        assert!(matches!(
            SnapshotSet::load(&paths),
            Err(Error::SnapshotCount(2))
        ));
    }

    #[test]
    fn test_load_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.sav");
        let err = Snapshot::load(&missing).unwrap_err();
        assert!(matches!(err, Error::SnapshotMissing(_)));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_directory_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Snapshot::load(dir.path()),
            Err(Error::NotAFile(_))
        ));
    }
}
