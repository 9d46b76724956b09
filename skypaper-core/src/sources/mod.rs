pub mod filename;
pub mod http;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::{Result, SkypaperError};
use crate::models::ProviderState;

pub use http::{build_client, HttpProvider};

/// A remote image that may change over time.
///
/// One cycle calls `check_for_update`, then (only if it returned `true`)
/// `download` followed by `derive_filename`.
#[async_trait]
pub trait WallpaperProvider: Send + Sync {
    /// Registry name (e.g. "fengyun-4b", "bing")
    fn name(&self) -> &str;
    fn state(&self) -> &ProviderState;
    /// Whether the remote image differs from the last one seen.
    async fn check_for_update(&mut self) -> Result<bool>;
    async fn download(&mut self) -> Result<bytes::Bytes>;
    /// Name for the most recent download. Never empty.
    fn derive_filename(&self) -> String;
}

pub type ProviderFactory = Box<dyn Fn(reqwest::Client) -> Box<dyn WallpaperProvider> + Send + Sync>;

struct RegistryEntry {
    description: &'static str,
    factory: ProviderFactory,
}

/// Name to constructor map, filled once at startup by each source crate.
pub struct ProviderRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn register<F>(&mut self, name: &str, description: &'static str, factory: F)
    where
        F: Fn(reqwest::Client) -> Box<dyn WallpaperProvider> + Send + Sync + 'static,
    {
        let key = name.to_ascii_lowercase();
        if self.entries.contains_key(&key) {
            tracing::warn!("provider {name} registered twice, keeping the latest");
        }
        self.entries.insert(
            key,
            RegistryEntry {
                description,
                factory: Box::new(factory),
            },
        );
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn describe(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.description))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    pub fn create(
        &self,
        name: &str,
        client: reqwest::Client,
    ) -> Result<Box<dyn WallpaperProvider>> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|entry| (entry.factory)(client))
            .ok_or_else(|| SkypaperError::UnknownSource(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        registry.register("beta", "second", |client| {
            Box::new(HttpProvider::new("beta", "https://example.com/b.jpg", client))
        });
        registry.register("alpha", "first", |client| {
            Box::new(HttpProvider::new("alpha", "https://example.com/a.jpg", client))
        });
        registry
    }

    #[test]
    fn test_names_are_sorted_and_exact() {
        let registry = registry();
        assert_eq!(registry.names(), vec!["alpha", "beta"]);
        assert_eq!(registry.len(), 2);
        let described: Vec<_> = registry.describe().collect();
        assert_eq!(described, vec![("alpha", "first"), ("beta", "second")]);
    }

    #[test]
    fn test_create_is_case_insensitive() {
        let registry = registry();
        let provider = registry.create("ALPHA", reqwest::Client::new()).unwrap();
        assert_eq!(provider.name(), "alpha");
        assert_eq!(provider.state().endpoint(), "https://example.com/a.jpg");
        assert!(registry.contains("Beta"));
    }

    #[test]
    fn test_unknown_source() {
        let registry = registry();
        let err = registry
            .create("gamma", reqwest::Client::new())
            .err()
            .unwrap();
        assert!(matches!(err, SkypaperError::UnknownSource(ref n) if n == "gamma"));
    }
}
