//! Patch command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use savediff_core::{BackupPolicy, Dtype, PatchEngine, PatchRequest, SavediffConfig};

use super::hex_utils::{format_offset, parse_offset};

pub struct PatchArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub offset: String,
    pub dtype: Dtype,
    pub value: i64,
    pub no_backup: bool,
    pub backup_dir: Option<PathBuf>,
    pub dry_run: bool,
}

impl PatchArgs {
    fn backup_policy(&self, config: &SavediffConfig) -> BackupPolicy {
        if self.no_backup {
            BackupPolicy::Disabled
        } else if let Some(dir) = &self.backup_dir {
            BackupPolicy::Timestamped { dir: dir.clone() }
        } else {
            config.backup.clone()
        }
    }
}

/// Run the patch command
pub fn run(args: PatchArgs, config: &SavediffConfig) -> Result<()> {
    let offset = parse_offset(&args.offset)?;
    let engine = PatchEngine::new(args.backup_policy(config));

    let mut request = PatchRequest::new(&args.input, offset, args.dtype, args.value)
        .dry_run(args.dry_run);
    if let Some(output) = &args.output {
        request = request.output(output);
    }

    let result = engine
        .patch_and_verify(&request)
        .with_context(|| format!("Failed to patch {}", args.input.display()))?;

    println!("Input:  {}", result.input_path.display());
    println!("Output: {}", result.output_path.display());
    if let Some(backup) = &result.backup_path {
        println!("Backup: {}", backup.display());
    }
    println!(
        "{} ({}): {:02X?} -> {:02X?}",
        format_offset(result.offset),
        args.dtype,
        result.old_bytes,
        result.new_bytes
    );

    if result.dry_run {
        println!("{}", "Dry run: nothing written".yellow());
    } else {
        println!("{} {}", "Verified:".green(), args.value);
    }

    Ok(())
}
