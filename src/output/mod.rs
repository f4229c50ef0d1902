mod cli;
mod html;
mod json;

pub use cli::generate_table_string;
pub use html::generate_html_string;
pub use json::generate_json_string;

use crate::model::Analysis;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Output format for analysis reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Self-contained HTML document, opened in the default viewer
    Html,
    /// Human-readable terminal tables
    Table,
    /// JSON for programmatic use
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Table => "txt",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown format: {}. Use 'html', 'table', or 'json'",
                s
            )),
        }
    }
}

/// Render the analysis in the given format.
pub fn render(analysis: &Analysis, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Html => Ok(generate_html_string(analysis)),
        OutputFormat::Table => Ok(generate_table_string(analysis)),
        OutputFormat::Json => generate_json_string(analysis),
    }
}

/// Writes a rendered report to `path`, or to a new uniquely named temp file
/// that outlives the process. Returns where it was written.
pub fn write_report(contents: &str, path: Option<&Path>, format: OutputFormat) -> Result<PathBuf> {
    if let Some(path) = path {
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        return Ok(path.to_path_buf());
    }

    let mut file = tempfile::Builder::new()
        .prefix("refscan-")
        .suffix(&format!(".{}", format.extension()))
        .tempfile()
        .context("Failed to create temporary report file")?;
    file.write_all(contents.as_bytes())
        .context("Failed to write temporary report file")?;

    let (_, path) = file.keep().context("Failed to keep temporary report file")?;
    Ok(path)
}
