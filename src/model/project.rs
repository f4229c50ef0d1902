use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A `package` entry from a project's manifest file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestPackage {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_framework: Option<String>,
}

impl ManifestPackage {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
            target_framework: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_target_framework(mut self, target_framework: impl Into<String>) -> Self {
        self.target_framework = Some(target_framework.into());
        self
    }
}

/// A discovered project file.
///
/// `references` holds bare names; the records themselves live in the
/// run's [`ReferenceTable`](crate::model::ReferenceTable). `packages` is
/// `None` when the project has no manifest, which is not the same as a
/// manifest listing zero packages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub path: PathBuf,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_framework: Option<String>,
    pub references: Vec<String>,
    pub packages: Option<Vec<ManifestPackage>>,
}

impl ProjectDescriptor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = project_name(&path);
        Self {
            path,
            name,
            target_framework: None,
            references: Vec::new(),
            packages: None,
        }
    }

    pub fn with_target_framework(mut self, target_framework: Option<String>) -> Self {
        self.target_framework = target_framework;
        self
    }

    pub fn with_references(mut self, references: Vec<String>) -> Self {
        self.references = references;
        self
    }

    pub fn with_packages(mut self, packages: Option<Vec<ManifestPackage>>) -> Self {
        self.packages = packages;
        self
    }
}

fn project_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
