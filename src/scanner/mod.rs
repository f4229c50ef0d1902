//! Project discovery and file parsing.
//!
//! - [`discover_projects`] walks a folder for project files
//! - [`read_project_file`] extracts the framework version and declared references
//! - [`read_manifest`] reads the sibling package manifest, if any
//!
//! Parsing is best-effort: unreadable or malformed files are logged and
//! treated as empty, they never abort a run.
//!
//! # Example
//!
//! ```no_run
//! use refscan::scanner::{discover_projects, read_manifest, read_project_file};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! for path in discover_projects(Path::new("./src"), "csproj")? {
//!     let project = read_project_file(&path);
//!     let manifest = path.parent().and_then(|dir| read_manifest(dir, "packages.config"));
//!     println!("{}: {:?}, {} references, manifest: {}",
//!         path.display(),
//!         project.target_framework,
//!         project.references.len(),
//!         manifest.is_some());
//! }
//! # Ok(())
//! # }
//! ```

mod manifest;
mod project;

pub use manifest::{parse_manifest, read_manifest};
pub use project::{parse_project, read_project_file, ProjectFile, MSBUILD_NAMESPACE};

use anyhow::{bail, Result};
use quick_xml::events::BytesStart;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Recursively finds every file under `root` whose extension matches
/// `extension`, compared case-insensitively.
///
/// Entries are visited in file-name order so repeated runs see the same
/// project order.
///
/// # Errors
///
/// Returns an error if `root` is not a directory.
pub fn discover_projects(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    ensure_folder(root)?;

    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };

        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            debug!(path = %entry.path().display(), "found project file");
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Checks that `root` is a folder that can be analysed.
pub fn ensure_folder(root: &Path) -> Result<()> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }
    Ok(())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Reads an unescaped attribute value, `None` if the attribute is absent.
pub(crate) fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    match element.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}
