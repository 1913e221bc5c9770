mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use savediff_core::{CONFIG_FILE, Dtype, DtypeSelector, SavediffConfig, ScanTarget, WidthSelector};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "savediff")]
#[command(about = "Locate and patch numeric fields in binary save files")]
#[command(version)]
struct Cli {
    /// Config file (defaults to savediff.toml in the working directory)
    #[arg(short, long, global = true, env = "SAVEDIFF_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find offsets holding an exact value in each snapshot
    Scan {
        #[command(flatten)]
        opts: ScanOptions,

        /// Values in snapshots A, B and C
        #[arg(long, num_args = 3, required = true, allow_negative_numbers = true)]
        values: Vec<i64>,
    },
    /// Find offsets whose value changes by fixed steps
    Delta {
        #[command(flatten)]
        opts: ScanOptions,

        /// B - A and C - B
        #[arg(long, num_args = 2, required = true, allow_negative_numbers = true)]
        deltas: Vec<i64>,
    },
    /// Overwrite a field, with backup and read-back verification
    Patch {
        /// File to patch
        input: PathBuf,

        /// Write the patched image here instead of in place
        output: Option<PathBuf>,

        /// Field offset (decimal or 0x-prefixed hex)
        #[arg(long)]
        offset: String,

        #[arg(long)]
        dtype: Dtype,

        #[arg(long, allow_negative_numbers = true)]
        value: i64,

        /// Skip the backup
        #[arg(long, conflicts_with = "backup_dir")]
        no_backup: bool,

        /// Write a timestamped backup into this directory
        #[arg(long)]
        backup_dir: Option<PathBuf>,

        /// Validate and show the change without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Check that a field holds a value
    Verify {
        file: PathBuf,

        /// Field offset (decimal or 0x-prefixed hex)
        #[arg(long)]
        offset: String,

        #[arg(long)]
        dtype: Dtype,

        #[arg(long, allow_negative_numbers = true)]
        value: i64,
    },
    /// Show the regions excluded from scanning
    Regions {
        file: PathBuf,

        /// Exclusion kinds (png, entropy, none); bare flag for none
        #[arg(long, num_args = 0..)]
        exclude: Option<Vec<String>>,

        /// Also print the per-window entropy profile
        #[arg(long)]
        profile: bool,
    },
    /// Hexdump the bytes around an offset
    Context {
        file: PathBuf,

        /// Offset (decimal or 0x-prefixed hex)
        #[arg(long)]
        offset: String,

        /// Number of bytes to show
        #[arg(long, default_value = "64")]
        size: usize,

        /// Show the ASCII column
        #[arg(long)]
        ascii: bool,
    },
    /// Find every occurrence of a value in one file
    Find {
        file: PathBuf,

        #[arg(long, allow_negative_numbers = true)]
        value: i64,

        /// Interpretation: auto, u16, s16, u32 or s32
        #[arg(long, default_value = "auto")]
        dtype: DtypeSelector,

        /// Maximum number of occurrences to print
        #[arg(long, default_value = "100")]
        limit: usize,
    },
    /// Show the values at given offsets in two files
    Compare {
        a: PathBuf,
        b: PathBuf,

        /// Offsets (decimal or 0x-prefixed hex)
        #[arg(long, num_args = 1.., required = true)]
        offsets: Vec<String>,

        #[arg(long, default_value = "u16")]
        dtype: Dtype,
    },
    /// List byte differences between two snapshots
    Diff {
        a: PathBuf,
        b: PathBuf,

        /// Maximum number of differences to print
        #[arg(long, default_value = "64")]
        limit: usize,
    },
    /// Run a synthetic end-to-end check
    Selftest {
        /// Scratch directory (defaults to the user cache directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// Options shared by `scan` and `delta`
#[derive(Args)]
struct ScanOptions {
    /// Snapshots A, B and C, in order
    #[arg(num_args = 3, required = true)]
    files: Vec<PathBuf>,

    /// Field width: auto, 2 or 4
    #[arg(long, default_value = "auto")]
    width: WidthSelector,

    /// Interpretation: auto, u16, s16, u32 or s32
    #[arg(long, default_value = "auto")]
    dtype: DtypeSelector,

    /// Exclusion kinds (png, entropy, none); bare flag for none
    #[arg(long, num_args = 0..)]
    exclude: Option<Vec<String>>,

    /// Keep excluded offsets, with a score penalty
    #[arg(long)]
    demote_excluded: bool,

    /// Number of candidates to print
    #[arg(long)]
    top: Option<usize>,

    /// Write a JSON report
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write a Markdown report
    #[arg(long)]
    md: Option<PathBuf>,
}

impl ScanOptions {
    fn into_scan_args(self, target: ScanTarget) -> commands::scan::ScanArgs {
        commands::scan::ScanArgs {
            files: self.files,
            target,
            width: self.width,
            dtype: self.dtype,
            exclude: self.exclude,
            demote_excluded: self.demote_excluded,
            top: self.top,
            json: self.json,
            md: self.md,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let directive = if cli.verbose { "savediff=debug" } else { "savediff=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let config = SavediffConfig::load_or_default(&config_path);

    match cli.command {
        Command::Scan { opts, values } => {
            let target = ScanTarget::Exact([values[0], values[1], values[2]]);
            commands::scan::run(opts.into_scan_args(target), &config)
        }
        Command::Delta { opts, deltas } => {
            let target = ScanTarget::Delta([deltas[0], deltas[1]]);
            commands::scan::run(opts.into_scan_args(target), &config)
        }
        Command::Patch {
            input,
            output,
            offset,
            dtype,
            value,
            no_backup,
            backup_dir,
            dry_run,
        } => commands::patch::run(
            commands::patch::PatchArgs {
                input,
                output,
                offset,
                dtype,
                value,
                no_backup,
                backup_dir,
                dry_run,
            },
            &config,
        ),
        Command::Verify {
            file,
            offset,
            dtype,
            value,
        } => commands::verify::run(&file, &offset, dtype, value),
        Command::Regions {
            file,
            exclude,
            profile,
        } => commands::regions::run(&file, exclude.as_deref(), profile, &config),
        Command::Context {
            file,
            offset,
            size,
            ascii,
        } => commands::context::run(&file, &offset, size, ascii),
        Command::Find {
            file,
            value,
            dtype,
            limit,
        } => commands::find::run(&file, value, dtype, limit),
        Command::Compare {
            a,
            b,
            offsets,
            dtype,
        } => commands::compare::run(&a, &b, &offsets, dtype),
        Command::Diff { a, b, limit } => commands::diff::run(&a, &b, limit),
        Command::Selftest { dir } => commands::selftest::run(dir),
    }
}
