use serde::{Deserialize, Serialize};

/// Separator used when a package reports several latest-version labels.
pub const LATEST_SEPARATOR: &str = ", ";

/// What the registry knows about a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegistryStatus {
    /// The declaring project had no manifest, so the registry was never asked.
    NotEvaluated,
    /// The manifest does not list this reference as a package.
    NotPackage,
    /// A registry package; `latest` holds the upper bound of every registration page.
    Package { latest: Vec<String> },
    /// A registry package whose lookup failed.
    LookupFailed { reason: String },
}

impl RegistryStatus {
    pub fn is_evaluated(&self) -> bool {
        !matches!(self, RegistryStatus::NotEvaluated)
    }

    pub fn is_package(&self) -> bool {
        matches!(
            self,
            RegistryStatus::Package { .. } | RegistryStatus::LookupFailed { .. }
        )
    }

    /// Single-character marker used in the report tables.
    pub fn marker(&self) -> &'static str {
        if self.is_package() {
            "Y"
        } else {
            "N"
        }
    }

    /// Latest-version label for display, if there is one.
    pub fn latest_label(&self) -> Option<String> {
        match self {
            RegistryStatus::Package { latest } => Some(latest.join(LATEST_SEPARATOR)),
            RegistryStatus::LookupFailed { .. } => Some("lookup failed".to_string()),
            RegistryStatus::NotEvaluated | RegistryStatus::NotPackage => None,
        }
    }
}

/// Bare name and version token split out of a declared reference such as
/// `Newtonsoft.Json, Version=12.0.0.0, Culture=neutral`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceName {
    pub name: String,
    pub version: String,
}

impl ReferenceName {
    /// Only the first qualifier is consulted, and only when it is `Version=`.
    pub fn parse(full_name: &str) -> Self {
        let mut tokens = full_name.split(',');
        let name = tokens.next().unwrap_or_default().trim().to_string();

        let version = tokens
            .next()
            .and_then(|qualifier| qualifier.split_once('='))
            .filter(|(key, _)| key.trim().eq_ignore_ascii_case("version"))
            .map(|(_, value)| value.trim().to_string())
            .unwrap_or_default();

        Self { name, version }
    }
}

/// One entry per unique bare name for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub name: String,
    pub full_name: String,
    pub version: String,
    #[serde(flatten)]
    pub status: RegistryStatus,
}

impl ReferenceRecord {
    pub fn new(full_name: impl Into<String>, status: RegistryStatus) -> Self {
        let full_name = full_name.into();
        let ReferenceName { name, version } = ReferenceName::parse(&full_name);
        Self {
            name,
            full_name,
            version,
            status,
        }
    }
}
