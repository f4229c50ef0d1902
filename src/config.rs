//! Configuration file handling.
//!
//! Configuration is read from a TOML file at:
//! - Linux: `~/.config/refscan/config.toml`
//! - macOS: `~/Library/Application Support/refscan/config.toml`
//! - Windows: `%APPDATA%\refscan\config.toml`
//!
//! Every key is optional.
//!
//! # Example Configuration
//!
//! ```toml
//! service_index_url = "https://api.nuget.org/v3/index.json"
//! project_extension = "csproj"
//! manifest_file = "packages.config"
//! default_format = "html"
//! open_report = true
//! abort_on_lookup_failure = false
//!
//! [ignore]
//! references = ["System*", "Microsoft.CSharp"]
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::registry::DEFAULT_SERVICE_INDEX;
use crate::resolver::LookupFailurePolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Registry service index fetched once per run.
    pub service_index_url: String,

    /// Extension of project files, compared case-insensitively.
    ///
    /// Default: "csproj"
    pub project_extension: String,

    /// File name of the package manifest next to each project file.
    ///
    /// Default: "packages.config"
    pub manifest_file: String,

    /// Output format when no `--format` flag is given.
    ///
    /// Valid values: "html", "table", "json"
    /// Default: "html"
    pub default_format: String,

    /// Whether to open the HTML report in the default viewer.
    pub open_report: bool,

    /// Abort the run when a single package lookup fails, instead of
    /// marking that reference as failed.
    pub abort_on_lookup_failure: bool,

    #[serde(default)]
    pub ignore: IgnoreConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Bare reference names left out of the analysis.
    ///
    /// Supports `*` wildcards (e.g. "System*").
    pub references: Vec<String>,
}

impl IgnoreConfig {
    /// Assembly names are case-insensitive, and so is the match.
    pub fn should_ignore_reference(&self, name: &str) -> bool {
        self.references
            .iter()
            .any(|pattern| glob_match(pattern, name))
    }
}

/// Case-insensitive glob matching where `*` stands for any run of characters.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    let text = text.to_ascii_lowercase();

    let mut segments: Vec<&str> = pattern.split('*').collect();
    let head = segments.remove(0);
    let Some(mut rest) = text.strip_prefix(head) else {
        return false;
    };

    let Some(tail) = segments.pop() else {
        return rest.is_empty();
    };

    for segment in segments {
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }

    rest.ends_with(tail)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_index_url: DEFAULT_SERVICE_INDEX.to_string(),
            project_extension: "csproj".to_string(),
            manifest_file: "packages.config".to_string(),
            default_format: "html".to_string(),
            open_report: true,
            abort_on_lookup_failure: false,
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads the configuration file, or defaults if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("refscan")
            .join("config.toml")
    }

    pub fn lookup_failure_policy(&self) -> LookupFailurePolicy {
        if self.abort_on_lookup_failure {
            LookupFailurePolicy::Abort
        } else {
            LookupFailurePolicy::Isolate
        }
    }
}
