//! Drives a full analysis: discover project files, parse each project and its
//! manifest, resolve references, and aggregate the usage matrix.

use crate::config::Config;
use crate::model::{Analysis, ProjectDescriptor, ReferenceName};
use crate::registry::PackageRegistry;
use crate::resolver::ReferenceResolver;
use crate::scanner::{discover_projects, read_manifest, read_project_file};
use anyhow::Result;
use indicatif::ProgressBar;
use std::path::Path;
use tracing::{debug, info};

pub struct Analyzer<'a, R: PackageRegistry + ?Sized> {
    config: &'a Config,
    registry: &'a R,
    progress: ProgressBar,
}

impl<'a, R: PackageRegistry + ?Sized> Analyzer<'a, R> {
    pub fn new(config: &'a Config, registry: &'a R) -> Self {
        Self {
            config,
            registry,
            progress: ProgressBar::hidden(),
        }
    }

    /// Reports per-project progress on `progress`; its length is set once
    /// the project files are known.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Analyses every project file under `root`, sequentially.
    ///
    /// # Errors
    ///
    /// Fails if `root` is not a directory, or if a registry lookup fails while
    /// the config asks to abort on lookup failures.
    pub async fn run(&self, root: &Path) -> Result<Analysis> {
        info!(root = %root.display(), "analyzing project files");

        let files = discover_projects(root, &self.config.project_extension)?;
        self.progress.set_length(files.len() as u64);

        let mut resolver = ReferenceResolver::new(self.registry)
            .with_policy(self.config.lookup_failure_policy());
        let mut projects = Vec::with_capacity(files.len());

        for file in &files {
            self.progress
                .set_message(file.file_name().unwrap_or_default().to_string_lossy().into_owned());
            projects.push(self.read_project(root, file, &mut resolver).await?);
            self.progress.inc(1);
        }

        info!(
            projects = projects.len(),
            references = resolver.table().len(),
            lookups = resolver.lookups(),
            "analysis complete"
        );
        self.progress
            .finish_with_message(format!("Analyzed {} projects", projects.len()));

        Ok(Analysis::new(
            root.to_path_buf(),
            projects,
            resolver.into_table(),
        ))
    }

    async fn read_project(
        &self,
        root: &Path,
        file: &Path,
        resolver: &mut ReferenceResolver<'a, R>,
    ) -> Result<ProjectDescriptor> {
        debug!(path = %file.display(), "reading project");

        let packages = file
            .parent()
            .and_then(|dir| read_manifest(dir, &self.config.manifest_file));
        let parsed = read_project_file(file);

        let mut references = Vec::with_capacity(parsed.references.len());
        for full_name in &parsed.references {
            let name = ReferenceName::parse(full_name).name;
            if self.config.ignore.should_ignore_reference(&name) {
                debug!(reference = %name, "ignoring reference");
                continue;
            }
            references.push(resolver.resolve(full_name, packages.as_deref()).await?);
        }

        let relative = file.strip_prefix(root).unwrap_or(file);
        Ok(ProjectDescriptor::new(relative)
            .with_target_framework(parsed.target_framework)
            .with_references(references)
            .with_packages(packages))
    }
}
