use super::attribute;
use crate::model::ManifestPackage;
use anyhow::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Reads the manifest named `file_name` in `dir`.
///
/// Returns `None` when there is no manifest. A manifest that can't be read
/// or parsed is logged and also treated as absent.
pub fn read_manifest(dir: &Path, file_name: &str) -> Option<Vec<ManifestPackage>> {
    let path = dir.join(file_name);
    if !path.is_file() {
        return None;
    }

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read manifest, ignoring it");
            return None;
        }
    };

    match parse_manifest(&content) {
        Ok(packages) => {
            debug!(path = %path.display(), packages = packages.len(), "read manifest");
            Some(packages)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "malformed manifest, ignoring it");
            None
        }
    }
}

/// Parses every `package` child of the manifest root.
pub fn parse_manifest(content: &str) -> Result<Vec<ManifestPackage>> {
    let mut reader = Reader::from_str(content);
    let mut packages = Vec::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                if depth == 2 {
                    push_package(&e, &mut packages)?;
                }
            }
            Event::Empty(e) => {
                if depth == 1 {
                    push_package(&e, &mut packages)?;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(packages)
}

fn push_package(element: &BytesStart<'_>, packages: &mut Vec<ManifestPackage>) -> Result<()> {
    if element.name().as_ref() != b"package" {
        return Ok(());
    }

    let Some(id) = attribute(element, "id")? else {
        debug!("skipping manifest package without id");
        return Ok(());
    };

    packages.push(ManifestPackage {
        id,
        version: attribute(element, "version")?,
        target_framework: attribute(element, "targetFramework")?,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<packages>
  <package id="Newtonsoft.Json" version="12.0.3" targetFramework="net472" />
  <package id="log4net" version="2.0.8"></package>
  <package version="1.0.0" />
  <other id="Ignored" />
</packages>
"#;

    #[test]
    fn test_parse_manifest() {
        let packages = parse_manifest(MANIFEST).unwrap();

        assert_eq!(
            packages,
            vec![
                ManifestPackage::new("Newtonsoft.Json")
                    .with_version("12.0.3")
                    .with_target_framework("net472"),
                ManifestPackage::new("log4net").with_version("2.0.8"),
            ]
        );
    }

    #[test]
    fn test_parse_empty_manifest() {
        assert!(parse_manifest("<packages />").unwrap().is_empty());
        assert!(parse_manifest("<packages></packages>").unwrap().is_empty());
    }

    #[test]
    fn test_nested_packages_are_ignored() {
        let xml = r#"<packages><group><package id="Deep" /></group></packages>"#;
        assert!(parse_manifest(xml).unwrap().is_empty());
    }

    #[test]
    fn test_read_manifest_absent_vs_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_manifest(dir.path(), "packages.config"), None);

        std::fs::write(dir.path().join("packages.config"), "<packages />").unwrap();
        assert_eq!(read_manifest(dir.path(), "packages.config"), Some(vec![]));
    }

    #[test]
    fn test_read_malformed_manifest_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("packages.config"),
            "<packages><package id=\"Foo\"></packages>",
        )
        .unwrap();

        assert_eq!(read_manifest(dir.path(), "packages.config"), None);
    }
}
