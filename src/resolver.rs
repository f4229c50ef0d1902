//! Reference resolution and registry enrichment.
//!
//! A [`ReferenceResolver`] owns the run's [`ReferenceTable`]. Every declared
//! reference goes through [`ReferenceResolver::resolve`], which creates the
//! record the first time a bare name is seen and reuses it afterwards, so the
//! registry is asked about each name at most once.

use crate::model::{ManifestPackage, ReferenceName, ReferenceRecord, ReferenceTable, RegistryStatus};
use crate::registry::PackageRegistry;
use anyhow::{Context, Result};
use tracing::{debug, warn};

/// What to do when a registry lookup for a single package fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupFailurePolicy {
    /// Record the failure on the reference and keep going.
    #[default]
    Isolate,
    /// Abort the whole run.
    Abort,
}

pub struct ReferenceResolver<'r, R: PackageRegistry + ?Sized> {
    registry: &'r R,
    table: ReferenceTable,
    policy: LookupFailurePolicy,
    lookups: usize,
}

impl<'r, R: PackageRegistry + ?Sized> ReferenceResolver<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        Self {
            registry,
            table: ReferenceTable::new(),
            policy: LookupFailurePolicy::default(),
            lookups: 0,
        }
    }

    pub fn with_policy(mut self, policy: LookupFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolves one declared reference from a project whose manifest is
    /// `packages` (`None` when the project has none) and returns its bare name.
    ///
    /// The first mention of a bare name creates its record. A record that was
    /// created without a manifest is re-resolved by the first later mention
    /// that has one; once evaluated, a record never changes.
    ///
    /// # Errors
    ///
    /// Only with [`LookupFailurePolicy::Abort`], when the registry lookup fails.
    pub async fn resolve(
        &mut self,
        full_name: &str,
        packages: Option<&[ManifestPackage]>,
    ) -> Result<String> {
        let parsed = ReferenceName::parse(full_name);

        let evaluated = self
            .table
            .get(&parsed.name)
            .map(|record| record.status.is_evaluated());

        match (evaluated, packages) {
            (Some(true), _) | (Some(false), None) => {}
            (None, packages) => {
                let status = self.evaluate(&parsed.name, packages).await?;
                self.table.insert(ReferenceRecord::new(full_name, status));
            }
            (Some(false), Some(packages)) => {
                let status = self.evaluate(&parsed.name, Some(packages)).await?;
                if let Some(record) = self.table.get_mut(&parsed.name) {
                    record.full_name = full_name.to_string();
                    if !parsed.version.is_empty() {
                        record.version = parsed.version;
                    }
                    record.status = status;
                }
            }
        }

        Ok(parsed.name)
    }

    async fn evaluate(
        &mut self,
        name: &str,
        packages: Option<&[ManifestPackage]>,
    ) -> Result<RegistryStatus> {
        let Some(packages) = packages else {
            return Ok(RegistryStatus::NotEvaluated);
        };

        if !packages.iter().any(|package| package.id == name) {
            return Ok(RegistryStatus::NotPackage);
        }

        self.lookups += 1;
        debug!(package = name, registry = self.registry.name(), "looking up latest versions");

        match self.registry.latest_versions(name).await {
            Ok(latest) => Ok(RegistryStatus::Package { latest }),
            Err(err) if self.policy == LookupFailurePolicy::Isolate => {
                warn!(package = name, error = %err, "registry lookup failed");
                Ok(RegistryStatus::LookupFailed {
                    reason: err.to_string(),
                })
            }
            Err(err) => Err(err).with_context(|| format!("registry lookup for {} failed", name)),
        }
    }

    /// Number of registry lookups performed so far.
    pub fn lookups(&self) -> usize {
        self.lookups
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    pub fn into_table(self) -> ReferenceTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRegistry {
        versions: HashMap<String, Vec<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeRegistry {
        fn with(mut self, id: &str, versions: &[&str]) -> Self {
            self.versions
                .insert(id.to_string(), versions.iter().map(|v| v.to_string()).collect());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PackageRegistry for FakeRegistry {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn latest_versions(&self, package_id: &str) -> Result<Vec<String>, RegistryError> {
            self.calls.lock().unwrap().push(package_id.to_string());
            self.versions
                .get(package_id)
                .cloned()
                .ok_or_else(|| RegistryError::ServiceNotFound {
                    url: format!("fake://{}", package_id),
                    service: "registration".to_string(),
                })
        }
    }

    fn manifest(ids: &[&str]) -> Vec<ManifestPackage> {
        ids.iter().map(|id| ManifestPackage::new(*id)).collect()
    }

    #[tokio::test]
    async fn test_no_manifest_is_not_evaluated() {
        let registry = FakeRegistry::default();
        let mut resolver = ReferenceResolver::new(&registry);

        let name = resolver.resolve("Foo, Version=1.0.0.0", None).await.unwrap();

        assert_eq!(name, "Foo");
        let record = resolver.table().get("Foo").unwrap();
        assert_eq!(record.status, RegistryStatus::NotEvaluated);
        assert_eq!(record.version, "1.0.0.0");
        assert!(registry.calls().is_empty());
    }

    #[tokio::test]
    async fn test_manifest_without_reference_is_not_package() {
        let registry = FakeRegistry::default();
        let mut resolver = ReferenceResolver::new(&registry);
        let packages = manifest(&["Other"]);

        resolver.resolve("System.Xml", Some(&packages)).await.unwrap();

        assert_eq!(
            resolver.table().get("System.Xml").unwrap().status,
            RegistryStatus::NotPackage
        );
        assert_eq!(resolver.lookups(), 0);
    }

    #[tokio::test]
    async fn test_package_gets_latest_versions() {
        let registry = FakeRegistry::default().with("Newtonsoft.Json", &["9.0.1", "13.0.3"]);
        let mut resolver = ReferenceResolver::new(&registry);
        let packages = manifest(&["Newtonsoft.Json"]);

        resolver
            .resolve("Newtonsoft.Json, Version=12.0.0.0, Culture=neutral", Some(&packages))
            .await
            .unwrap();

        let record = resolver.table().get("Newtonsoft.Json").unwrap();
        assert!(record.status.is_package());
        assert_eq!(record.status.latest_label().as_deref(), Some("9.0.1, 13.0.3"));
    }

    #[tokio::test]
    async fn test_lookup_once_per_name() {
        let registry = FakeRegistry::default().with("Foo", &["2.0.0"]);
        let mut resolver = ReferenceResolver::new(&registry);
        let packages = manifest(&["Foo"]);

        for _ in 0..5 {
            resolver.resolve("Foo, Version=1.0.0.0", Some(&packages)).await.unwrap();
        }
        resolver.resolve("Foo", Some(&packages)).await.unwrap();

        assert_eq!(registry.calls(), vec!["Foo"]);
        assert_eq!(resolver.lookups(), 1);
        assert_eq!(resolver.table().len(), 1);
    }

    #[tokio::test]
    async fn test_first_evaluation_wins() {
        let registry = FakeRegistry::default().with("Foo", &["2.0.0"]);
        let mut resolver = ReferenceResolver::new(&registry);

        resolver
            .resolve("Foo, Version=1.0.0.0", Some(&manifest(&[])))
            .await
            .unwrap();
        resolver
            .resolve("Foo, Version=1.5.0.0", Some(&manifest(&["Foo"])))
            .await
            .unwrap();

        let record = resolver.table().get("Foo").unwrap();
        assert_eq!(record.status, RegistryStatus::NotPackage);
        assert_eq!(record.version, "1.0.0.0");
        assert!(registry.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unevaluated_record_upgraded_by_manifest() {
        let registry = FakeRegistry::default().with("Foo", &["2.0.0"]);
        let mut resolver = ReferenceResolver::new(&registry);

        resolver.resolve("Foo", None).await.unwrap();
        resolver
            .resolve("Foo, Version=1.0.0.0", Some(&manifest(&["Foo"])))
            .await
            .unwrap();

        let record = resolver.table().get("Foo").unwrap();
        assert_eq!(record.version, "1.0.0.0");
        assert_eq!(record.full_name, "Foo, Version=1.0.0.0");
        assert_eq!(record.status.latest_label().as_deref(), Some("2.0.0"));
        assert_eq!(registry.calls(), vec!["Foo"]);
    }

    #[tokio::test]
    async fn test_upgrade_keeps_version_when_mention_has_none() {
        let registry = FakeRegistry::default().with("Foo", &["2.0.0"]);
        let mut resolver = ReferenceResolver::new(&registry);

        resolver.resolve("Foo, Version=1.0.0.0", None).await.unwrap();
        resolver.resolve("Foo", Some(&manifest(&["Foo"]))).await.unwrap();

        assert_eq!(resolver.table().get("Foo").unwrap().version, "1.0.0.0");
    }

    #[tokio::test]
    async fn test_isolated_lookup_failure() {
        let registry = FakeRegistry::default();
        let mut resolver = ReferenceResolver::new(&registry);

        resolver.resolve("Gone", Some(&manifest(&["Gone"]))).await.unwrap();

        let status = &resolver.table().get("Gone").unwrap().status;
        assert!(matches!(status, RegistryStatus::LookupFailed { .. }));
        assert_eq!(status.marker(), "Y");
    }

    #[tokio::test]
    async fn test_abort_on_lookup_failure() {
        let registry = FakeRegistry::default();
        let mut resolver = ReferenceResolver::new(&registry).with_policy(LookupFailurePolicy::Abort);

        let err = resolver
            .resolve("Gone", Some(&manifest(&["Gone"])))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Gone"));
        assert!(resolver.table().is_empty());
    }
}
