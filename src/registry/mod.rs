//! Package registry lookups.
//!
//! The [`PackageRegistry`] trait is the seam between reference resolution and
//! the network. [`NugetRegistry`] talks to a NuGet v3 feed.

mod nuget;

pub use nuget::{NugetRegistry, ServiceIndex, DEFAULT_SERVICE_INDEX, REGISTRATIONS_SERVICE};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// The service index does not advertise the requested service type.
    #[error("service index {url} has no `{service}` resource")]
    ServiceNotFound { url: String, service: String },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Resolves package identifiers against a remote registry.
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Human-readable registry name, used in logs.
    fn name(&self) -> &'static str;

    /// Returns the latest published version label of every registration page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response can't be decoded.
    async fn latest_versions(&self, package_id: &str) -> Result<Vec<String>, RegistryError>;
}
