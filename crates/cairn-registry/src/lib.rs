//! Registry metadata queries and package fetching. Blocking HTTP with
//! bounded retry; version listings are memoized per process.

pub mod git;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use cairn_constants::{MAX_ATTEMPTS, REGISTRY_HOST, STORAGE_HOST, USER_AGENT};
use cairn_error::Result;
use cairn_naming::{PackageSource, classify_source, to_cache_key};
use cairn_resolver::{DependencyProvider, DependencyRequest};

pub use git::clone_repository;

lazy_static::lazy_static! {
    static ref VERSION_CACHE: Mutex<HashMap<String, Vec<String>>> = Mutex::new(HashMap::new());
}

pub struct RegistryClient {
    client: reqwest::blocking::Client,
    registry_host: String,
    storage_host: String,
}

/// `boost/config` + `1.66.0` -> `{host}/archives/boost-config-1.66.0.tar.gz`
#[must_use]
pub fn archive_url(storage_host: &str, name: &str, version: &str) -> String {
    let cache_key = to_cache_key(PackageSource::Registry, name, version);
    format!("{storage_host}/archives/{cache_key}.tar.gz")
}

impl RegistryClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_hosts(REGISTRY_HOST, STORAGE_HOST)
    }

    #[must_use]
    pub fn with_hosts(registry_host: &str, storage_host: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(45))
            .connect_timeout(Duration::from_secs(20))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());

        Self {
            client,
            registry_host: registry_host.to_string(),
            storage_host: storage_host.to_string(),
        }
    }

    fn get_json(&self, url: &str) -> anyhow::Result<Value> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            let resp = match self
                .client
                .get(url)
                .header("Accept", "application/json")
                .send()
            {
                Ok(resp) => resp,
                Err(e) => {
                    if attempts < MAX_ATTEMPTS {
                        backoff(attempts);
                        continue;
                    }
                    return Err(anyhow::anyhow!(
                        "Network error for {url} after {attempts} attempts: {e}"
                    ));
                }
            };

            let resp = match resp.error_for_status() {
                Ok(resp) => resp,
                Err(e) => {
                    let retryable = matches!(
                        e.status(),
                        Some(reqwest::StatusCode::TOO_MANY_REQUESTS)
                            | Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR)
                            | Some(reqwest::StatusCode::SERVICE_UNAVAILABLE)
                    );
                    if retryable && attempts < MAX_ATTEMPTS {
                        backoff(attempts);
                        continue;
                    }
                    return Err(anyhow::anyhow!("HTTP error for {url}: {e}"));
                }
            };

            match resp.json::<Value>() {
                Ok(json) => return Ok(json),
                Err(e) => {
                    if attempts < MAX_ATTEMPTS {
                        backoff(attempts);
                        continue;
                    }
                    return Err(anyhow::anyhow!("Failed to parse JSON from {url}: {e}"));
                }
            }
        }
    }

    /// All published versions of a registry package, memoized.
    pub fn versions(&self, name: &str) -> anyhow::Result<Vec<String>> {
        if let Ok(cache) = VERSION_CACHE.lock() {
            if let Some(cached) = cache.get(name) {
                return Ok(cached.clone());
            }
        }

        let url = format!("{}/packages/{name}/versions", self.registry_host);
        let json = self.get_json(&url)?;
        let versions: Vec<String> = json
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("Invalid versions listing for {name}"))?
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();

        if let Ok(mut cache) = VERSION_CACHE.lock() {
            cache.insert(name.to_string(), versions.clone());
        }
        Ok(versions)
    }

    /// Declared dependencies of one registry package version, in the order
    /// the registry reports them.
    pub fn dependencies(&self, name: &str, version: &str) -> anyhow::Result<Vec<(String, String)>> {
        let url = format!("{}/packages/{name}/{version}/deps", self.registry_host);
        let json = self.get_json(&url)?;
        let deps = json
            .as_object()
            .ok_or_else(|| anyhow::anyhow!("Invalid deps listing for {name} {version}"))?
            .iter()
            .map(|(dep, spec)| (dep.clone(), spec.as_str().unwrap_or_default().to_string()))
            .collect();
        Ok(deps)
    }

    /// Download a pre-built archive next to its future cache entry. The
    /// caller extracts it and treats any failure as a per-package flag.
    pub fn fetch_archive(&self, name: &str, version: &str, dest: &Path) -> anyhow::Result<()> {
        let url = archive_url(&self.storage_host, name, version);
        let resp = self.client.get(&url).send()?.error_for_status()?;
        let bytes = resp.bytes()?;
        std::fs::write(dest, &bytes)?;
        Ok(())
    }
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyProvider for RegistryClient {
    fn latest_version(&self, name: &str) -> Result<String> {
        let versions = self.versions(name).map_err(cairn_error::PackageError::from)?;
        cairn_semver::latest(&versions).ok_or_else(|| {
            cairn_error::PackageError::ResolutionIo(format!("No published versions for {name}"))
        })
    }

    fn dependencies_of(
        &self,
        name: &str,
        version: &str,
        source: PackageSource,
    ) -> Result<Vec<DependencyRequest>> {
        match source {
            // Repository manifests are not discoverable before cloning.
            PackageSource::Git => Ok(Vec::new()),
            PackageSource::Registry => {
                let deps = self
                    .dependencies(name, version)
                    .map_err(cairn_error::PackageError::from)?;
                Ok(deps
                    .into_iter()
                    .map(|(raw_name, spec)| {
                        let (dep_source, dep_name) = classify_source(&raw_name);
                        DependencyRequest::new(dep_name, spec, dep_source)
                    })
                    .collect())
            }
        }
    }
}

fn backoff(attempts: u32) {
    let delay = std::cmp::min(1000 * u64::from(attempts), 5000);
    std::thread::sleep(Duration::from_millis(delay));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_url_uses_cache_key() {
        assert_eq!(
            archive_url("https://archives.cairnpkg.dev", "boost/config", "1.66.0"),
            "https://archives.cairnpkg.dev/archives/boost-config-1.66.0.tar.gz"
        );
    }

    #[test]
    fn test_git_dependencies_are_not_discovered() {
        let client = RegistryClient::with_hosts("http://127.0.0.1:1", "http://127.0.0.1:1");
        let deps = client
            .dependencies_of("curl/curl", "7_61_0", PackageSource::Git)
            .unwrap();
        assert!(deps.is_empty());
    }
}
