//! Scan and delta commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use savediff_core::{
    Candidate, DtypeSelector, ExclusionMode, JsonReport, MarkdownReport, ReportFormat,
    SavediffConfig, ScanReport, ScanRequest, ScanTarget, WidthSelector, scan_files,
};

use super::exclusion_kinds;
use super::hex_utils::format_offset;

pub struct ScanArgs {
    pub files: Vec<PathBuf>,
    pub target: ScanTarget,
    pub width: WidthSelector,
    pub dtype: DtypeSelector,
    pub exclude: Option<Vec<String>>,
    pub demote_excluded: bool,
    pub top: Option<usize>,
    pub json: Option<PathBuf>,
    pub md: Option<PathBuf>,
}

/// Run the scan command
pub fn run(args: ScanArgs, config: &SavediffConfig) -> Result<()> {
    let exclude = exclusion_kinds(args.exclude.as_deref(), config)?;
    let mode = if args.demote_excluded {
        ExclusionMode::Demote
    } else {
        ExclusionMode::Skip
    };
    let request = ScanRequest::new(args.target)
        .with_width(args.width)
        .with_dtype(args.dtype)
        .with_exclusion_mode(mode);

    let report = scan_files(&args.files, &exclude, &request).context("Scan failed")?;

    print_summary(&report);
    print_candidates(report.top(args.top.unwrap_or(config.top)));

    if let Some(path) = &args.json {
        JsonReport {
            top: config.json_top,
        }
        .write_to(&report.candidates, path)
        .with_context(|| format!("Failed to write JSON report to {}", path.display()))?;
    }
    if let Some(path) = &args.md {
        MarkdownReport {
            top: config.markdown_top,
        }
        .write_to(&report.candidates, path)
        .with_context(|| format!("Failed to write Markdown report to {}", path.display()))?;
    }

    Ok(())
}

fn print_summary(report: &ScanReport) {
    for (label, (path, mask)) in ["A", "B", "C"]
        .iter()
        .zip(report.paths.iter().zip(&report.exclusions))
    {
        println!(
            "{}: {} ({} excluded region(s), {} bytes)",
            label,
            path.display(),
            mask.regions().len(),
            mask.excluded_bytes()
        );
    }
    println!();
    println!(
        "Candidates: {}",
        report.candidates.len().to_string().bold()
    );
}

fn print_candidates(candidates: &[Candidate]) {
    if candidates.is_empty() {
        println!("{}", "No candidates found".yellow());
        return;
    }

    println!();
    println!(
        "{:>4}  {:>6}  {:<10}  {:<4}  {:<24}  {:>7}  {:>7}",
        "#", "score", "offset", "type", "values", "diff_ab", "diff_bc"
    );
    for (i, c) in candidates.iter().enumerate() {
        let values = format!("({}, {}, {})", c.values[0], c.values[1], c.values[2]);
        let score = format!("{:>6}", c.score);
        let score = if c.score >= 700 {
            score.green().to_string()
        } else if c.score < 0 {
            score.red().to_string()
        } else {
            score
        };
        println!(
            "{:>4}  {}  {:<10}  {:<4}  {:<24}  {:>7}  {:>7}",
            i + 1,
            score,
            format_offset(c.offset),
            c.dtype,
            values,
            c.diff_ab,
            c.diff_bc
        );
    }
}
