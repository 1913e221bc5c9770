//! Report serializers for ranked candidates.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::numeric::Dtype;
use crate::scan::Candidate;

pub const DEFAULT_JSON_TOP: usize = 500;
pub const DEFAULT_MARKDOWN_TOP: usize = 80;

/// Common interface for report formats
pub trait ReportFormat {
    /// Render the leading candidates, which must already be ranked.
    fn render(&self, candidates: &[Candidate]) -> Result<String>;

    /// Render and write to `path`, creating parent directories.
    fn write_to(&self, candidates: &[Candidate], path: &Path) -> Result<()> {
        let content = self.render(candidates)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(path, content).map_err(|e| Error::io(path, e))?;
        info!("Report written to {}", path.display());
        Ok(())
    }
}

/// One ranked candidate as it appears in a JSON report
#[derive(Debug, Clone, Serialize)]
pub struct CandidateRecord<'a> {
    pub rank: usize,
    pub offset: usize,
    pub offset_hex: String,
    pub width: usize,
    pub dtype: Dtype,
    pub values: [i64; 3],
    pub score: i64,
    pub diff_ab: usize,
    pub diff_bc: usize,
    pub context_hex: &'a str,
}

impl<'a> CandidateRecord<'a> {
    pub fn new(rank: usize, c: &'a Candidate) -> Self {
        Self {
            rank,
            offset: c.offset,
            offset_hex: format!("{:#x}", c.offset),
            width: c.width,
            dtype: c.dtype,
            values: c.values,
            score: c.score,
            diff_ab: c.diff_ab,
            diff_bc: c.diff_bc,
            context_hex: &c.context_hex,
        }
    }
}

/// Pretty-printed JSON array
#[derive(Debug, Clone, Copy)]
pub struct JsonReport {
    pub top: usize,
}

impl Default for JsonReport {
    fn default() -> Self {
        Self {
            top: DEFAULT_JSON_TOP,
        }
    }
}

impl ReportFormat for JsonReport {
    fn render(&self, candidates: &[Candidate]) -> Result<String> {
        let records: Vec<CandidateRecord> = candidates
            .iter()
            .take(self.top)
            .enumerate()
            .map(|(i, c)| CandidateRecord::new(i + 1, c))
            .collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }
}

/// Markdown table with a context quote under each row
#[derive(Debug, Clone, Copy)]
pub struct MarkdownReport {
    pub top: usize,
}

impl Default for MarkdownReport {
    fn default() -> Self {
        Self {
            top: DEFAULT_MARKDOWN_TOP,
        }
    }
}

impl ReportFormat for MarkdownReport {
    fn render(&self, candidates: &[Candidate]) -> Result<String> {
        let mut out = String::new();
        out.push_str("# savediff report\n\n");
        out.push_str(&format!("Candidates: **{}**\n\n", candidates.len()));
        out.push_str("| # | score | offset | width | dtype | values | diff_ab | diff_bc |\n");
        out.push_str("|---:|---:|---|---:|---|---|---:|---:|\n");

        for (i, c) in candidates.iter().take(self.top).enumerate() {
            out.push_str(&format!(
                "| {} | {} | `{:#x}` | {} | `{}` | `({}, {}, {})` | {} | {} |\n",
                i + 1,
                c.score,
                c.offset,
                c.width,
                c.dtype,
                c.values[0],
                c.values[1],
                c.values[2],
                c.diff_ab,
                c.diff_bc
            ));
            out.push_str(&format!("\n> ctx: `{}`\n\n", c.context_hex));
        }
        Ok(out)
    }
}
