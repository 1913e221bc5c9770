//! Configuration shared by every entry surface.
//!
//! Defaults cover the common case. A TOML file can override any subset of
//! fields:
//!
//! ```toml
//! exclude = ["png", "entropy"]
//! top = 50
//!
//! [backup]
//! policy = "timestamped"
//! dir = "backups"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::patch::BackupPolicy;
use crate::region::ExclusionKind;
use crate::report::{DEFAULT_JSON_TOP, DEFAULT_MARKDOWN_TOP};

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "savediff.toml";

/// Candidates printed to the console by default
pub const DEFAULT_TOP: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavediffConfig {
    /// Exclusion detectors applied to every snapshot
    pub exclude: Vec<ExclusionKind>,
    /// Candidates shown on the console
    pub top: usize,
    /// Candidates written to JSON reports
    pub json_top: usize,
    /// Candidates written to Markdown reports
    pub markdown_top: usize,
    pub backup: BackupPolicy,
}

impl Default for SavediffConfig {
    fn default() -> Self {
        Self {
            exclude: ExclusionKind::DEFAULT.to_vec(),
            top: DEFAULT_TOP,
            json_top: DEFAULT_JSON_TOP,
            markdown_top: DEFAULT_MARKDOWN_TOP,
            backup: BackupPolicy::default(),
        }
    }
}

impl SavediffConfig {
    pub fn builder() -> SavediffConfigBuilder {
        SavediffConfigBuilder::default()
    }

    /// Load from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = toml::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when it is missing or invalid
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) if e.is_not_found() => {
                debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("Failed to load config: {}, using defaults", e);
                Self::default()
            }
        }
    }
}

/// Builder for SavediffConfig
#[derive(Debug, Clone, Default)]
pub struct SavediffConfigBuilder {
    exclude: Option<Vec<ExclusionKind>>,
    top: Option<usize>,
    json_top: Option<usize>,
    markdown_top: Option<usize>,
    backup: Option<BackupPolicy>,
}

impl SavediffConfigBuilder {
    pub fn exclude(mut self, kinds: Vec<ExclusionKind>) -> Self {
        self.exclude = Some(kinds);
        self
    }

    pub fn top(mut self, top: usize) -> Self {
        self.top = Some(top);
        self
    }

    pub fn json_top(mut self, top: usize) -> Self {
        self.json_top = Some(top);
        self
    }

    pub fn markdown_top(mut self, top: usize) -> Self {
        self.markdown_top = Some(top);
        self
    }

    pub fn backup(mut self, policy: BackupPolicy) -> Self {
        self.backup = Some(policy);
        self
    }

    /// Timestamped backups under `dir`
    pub fn backup_dir<P: Into<PathBuf>>(self, dir: P) -> Self {
        self.backup(BackupPolicy::Timestamped { dir: dir.into() })
    }

    pub fn build(self) -> SavediffConfig {
        let default = SavediffConfig::default();
        SavediffConfig {
            exclude: self.exclude.unwrap_or(default.exclude),
            top: self.top.unwrap_or(default.top),
            json_top: self.json_top.unwrap_or(default.json_top),
            markdown_top: self.markdown_top.unwrap_or(default.markdown_top),
            backup: self.backup.unwrap_or(default.backup),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = SavediffConfig::default();
        assert_eq!(config.exclude, vec![ExclusionKind::Png, ExclusionKind::Entropy]);
        assert_eq!(config.top, 30);
        assert_eq!(config.json_top, 500);
        assert_eq!(config.markdown_top, 80);
        assert_eq!(
            config.backup,
            BackupPolicy::FixedSuffix {
                suffix: ".bak".to_string()
            }
        );
    }

    #[test]
    fn test_partial_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "exclude = [\"entropy\"]\ntop = 5\n\n[backup]\npolicy = \"timestamped\"\ndir = \"bk\"\n",
        )
        .unwrap();

        let config = SavediffConfig::load(&path).unwrap();
        assert_eq!(config.exclude, vec![ExclusionKind::Entropy]);
        assert_eq!(config.top, 5);
        assert_eq!(config.json_top, 500);
        assert_eq!(
            config.backup,
            BackupPolicy::Timestamped {
                dir: PathBuf::from("bk")
            }
        );
    }

    #[test]
    fn test_load_or_default() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert_eq!(SavediffConfig::load_or_default(&missing), SavediffConfig::default());

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "top = \"many\"").unwrap();
        assert!(matches!(SavediffConfig::load(&broken), Err(Error::Config(_))));
        assert_eq!(SavediffConfig::load_or_default(&broken), SavediffConfig::default());
    }

    #[test]
    fn test_builder() {
        let config = SavediffConfig::builder().top(3).backup_dir("bk").build();
        assert_eq!(config.top, 3);
        assert_eq!(config.exclude, ExclusionKind::DEFAULT.to_vec());
        assert!(matches!(config.backup, BackupPolicy::Timestamped { .. }));
    }
}
