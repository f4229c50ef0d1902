use super::{PackageRegistry, RegistryError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// Public NuGet v3 service index.
pub const DEFAULT_SERVICE_INDEX: &str = "https://api.nuget.org/v3/index.json";

/// Service type carrying package registration metadata.
pub const REGISTRATIONS_SERVICE: &str = "RegistrationsBaseUrl";

/// The registry root document listing the feed's services.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceIndex {
    #[serde(skip)]
    url: String,
    resources: Vec<ServiceResource>,
}

#[derive(Debug, Clone, Deserialize)]
struct ServiceResource {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@type")]
    kind: String,
}

impl ServiceIndex {
    pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<Self, RegistryError> {
        let mut index: ServiceIndex = get_json(client, url).await?;
        index.url = url.to_string();
        Ok(index)
    }

    /// URL of the first resource whose type tag is exactly `service`.
    pub fn service_url(&self, service: &str) -> Result<&str, RegistryError> {
        self.resources
            .iter()
            .find(|resource| resource.kind == service)
            .map(|resource| resource.id.as_str())
            .ok_or_else(|| RegistryError::ServiceNotFound {
                url: self.url.clone(),
                service: service.to_string(),
            })
    }
}

#[derive(Deserialize)]
struct RegistrationIndex {
    #[serde(default)]
    items: Vec<RegistrationPage>,
}

#[derive(Deserialize)]
struct RegistrationPage {
    upper: String,
}

/// NuGet v3 client.
///
/// The service index is fetched and the registration endpoint resolved once,
/// in [`NugetRegistry::connect`]; package lookups reuse it.
pub struct NugetRegistry {
    client: reqwest::Client,
    registrations_url: String,
}

impl NugetRegistry {
    /// Connects to the feed described by the service index at `index_url`.
    ///
    /// # Errors
    ///
    /// Fails if the index can't be fetched or lists no
    /// [`REGISTRATIONS_SERVICE`] resource.
    pub async fn connect(index_url: &str) -> Result<Self, RegistryError> {
        let client = reqwest::Client::new();
        let index = ServiceIndex::fetch(&client, index_url).await?;
        let registrations_url = index.service_url(REGISTRATIONS_SERVICE)?.to_string();
        debug!(%registrations_url, "resolved registration service");

        Ok(Self {
            client,
            registrations_url,
        })
    }

    pub fn registration_url(&self, package_id: &str) -> String {
        format!(
            "{}{}/index.json",
            self.registrations_url,
            package_id.to_lowercase()
        )
    }
}

#[async_trait]
impl PackageRegistry for NugetRegistry {
    fn name(&self) -> &'static str {
        "NuGet"
    }

    async fn latest_versions(&self, package_id: &str) -> Result<Vec<String>, RegistryError> {
        let url = self.registration_url(package_id);
        debug!(package = package_id, %url, "fetching registration");

        let registration: RegistrationIndex = get_json(&self.client, &url).await?;
        Ok(registration.items.into_iter().map(|page| page.upper).collect())
    }
}

async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T, RegistryError> {
    let http_error = |source| RegistryError::Http {
        url: url.to_string(),
        source,
    };

    client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(http_error)?
        .json()
        .await
        .map_err(http_error)
}
