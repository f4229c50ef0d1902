use super::attribute;
use anyhow::Result;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Namespace all project elements must live in to be recognised.
pub const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

const FRAMEWORK_PATH: [&str; 3] = ["Project", "PropertyGroup", "TargetFrameworkVersion"];
const REFERENCE_PATH: [&str; 3] = ["Project", "ItemGroup", "Reference"];

/// What a project file declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFile {
    pub target_framework: Option<String>,
    /// `Include` values of every `Reference`, in document order.
    pub references: Vec<String>,
}

/// Reads and parses a project file.
///
/// Never fails: a file that can't be read or parsed is logged and yields
/// an absent framework version and no references.
pub fn read_project_file(path: &Path) -> ProjectFile {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read project file");
            return ProjectFile::default();
        }
    };

    match parse_project(&content) {
        Ok(project) => project,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to parse project file");
            ProjectFile::default()
        }
    }
}

/// Parses project XML.
///
/// Only the first `TargetFrameworkVersion` is consulted; blank text counts
/// as absent. `Reference` elements without an `Include` are skipped.
pub fn parse_project(content: &str) -> Result<ProjectFile> {
    let mut reader = NsReader::from_str(content);
    let mut project = ProjectFile::default();

    // Local names of the open elements, `None` for elements outside the MSBuild namespace.
    let mut stack: Vec<Option<String>> = Vec::new();
    let mut framework_seen = false;
    let mut framework_text: Option<String> = None;

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        let in_msbuild = is_msbuild(&ns);

        match event {
            Event::Start(e) => {
                stack.push(in_msbuild.then(|| local_name(e.local_name().as_ref())));
                if at_path(&stack, &REFERENCE_PATH) {
                    collect_reference(&e, &mut project)?;
                } else if !framework_seen && at_path(&stack, &FRAMEWORK_PATH) {
                    framework_seen = true;
                    framework_text = Some(String::new());
                }
            }
            Event::Empty(e) => {
                stack.push(in_msbuild.then(|| local_name(e.local_name().as_ref())));
                if at_path(&stack, &REFERENCE_PATH) {
                    collect_reference(&e, &mut project)?;
                } else if at_path(&stack, &FRAMEWORK_PATH) {
                    framework_seen = true;
                }
                stack.pop();
            }
            Event::Text(t) => {
                if let Some(text) = framework_text.as_mut() {
                    text.push_str(&t.unescape()?);
                }
            }
            Event::End(_) => {
                if at_path(&stack, &FRAMEWORK_PATH) {
                    if let Some(text) = framework_text.take() {
                        let text = text.trim();
                        if !text.is_empty() {
                            project.target_framework = Some(text.to_string());
                        }
                    }
                }
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(project)
}

fn collect_reference(
    element: &quick_xml::events::BytesStart<'_>,
    project: &mut ProjectFile,
) -> Result<()> {
    match attribute(element, "Include")? {
        Some(include) => project.references.push(include),
        None => tracing::debug!("skipping Reference without Include"),
    }
    Ok(())
}

fn is_msbuild(ns: &ResolveResult<'_>) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == MSBUILD_NAMESPACE.as_bytes())
}

fn local_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn at_path(stack: &[Option<String>], path: &[&str]) -> bool {
    stack.len() == path.len()
        && stack
            .iter()
            .zip(path)
            .all(|(element, expected)| element.as_deref() == Some(*expected))
}
