use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::realm::RealmManager;

use super::provider::Provider;
use super::registry::{ProviderContext, ProviderRegistry};

/// Maps a version key to the ordered local classpath of that runtime and
/// its runtime-scope dependencies. Artifact coordinate handling lives
/// behind this seam; the loader only consumes resolved file locations.
pub trait ArtifactResolver: Send + Sync {
    fn runtime_classpath(&self, key: &str) -> Result<Vec<PathBuf>>;
}

/// Resolver over a fixed on-disk repository layout: `<root>/<key>/` holds
/// the artifacts for a version, resolved in sorted file-name order so
/// repeated builds see an identical classpath.
pub struct DirectoryArtifactResolver {
    root: PathBuf,
}

impl DirectoryArtifactResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactResolver for DirectoryArtifactResolver {
    fn runtime_classpath(&self, key: &str) -> Result<Vec<PathBuf>> {
        let dir = self.root.join(key);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut entries: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect();
        entries.sort();
        Ok(entries)
    }
}

/// Resolver with a fixed in-memory mapping, for embedders and tests
#[derive(Default)]
pub struct StaticArtifactResolver {
    classpaths: HashMap<String, Vec<PathBuf>>,
}

impl StaticArtifactResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classpath(mut self, key: impl Into<String>, classpath: Vec<PathBuf>) -> Self {
        self.classpaths.insert(key.into(), classpath);
        self
    }
}

impl ArtifactResolver for StaticArtifactResolver {
    fn runtime_classpath(&self, key: &str) -> Result<Vec<PathBuf>> {
        Ok(self.classpaths.get(key).cloned().unwrap_or_default())
    }
}

/// One link of the manager's loader chain.
///
/// `Ok(None)` means "this loader cannot satisfy the key" and the chain moves
/// on; `Err` means the loader owned the key but materialization failed.
pub trait ProviderLoader: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<Arc<dyn Provider>>>;
}

/// Artifact-backed loader: resolve the runtime classpath, stage an isolated
/// provider realm, instantiate the provider through the registry, and only
/// then register the realm.
pub struct ArtifactProviderLoader {
    resolver: Box<dyn ArtifactResolver>,
    registry: Arc<ProviderRegistry>,
    realms: Arc<RealmManager>,
}

impl ArtifactProviderLoader {
    pub fn new(
        resolver: Box<dyn ArtifactResolver>,
        registry: Arc<ProviderRegistry>,
        realms: Arc<RealmManager>,
    ) -> Self {
        Self {
            resolver,
            registry,
            realms,
        }
    }
}

impl ProviderLoader for ArtifactProviderLoader {
    fn load(&self, key: &str) -> Result<Option<Arc<dyn Provider>>> {
        if !self.registry.contains(key) {
            return Ok(None);
        }

        let classpath = self
            .resolver
            .runtime_classpath(key)
            .map_err(|e| Error::provider_load(key, "artifact resolution failed", e))?;
        tracing::debug!("Resolved {} classpath entries for '{}'", classpath.len(), key);

        let staged = self.realms.stage_provider_realm(key, classpath, None)?;

        let context = ProviderContext {
            key: key.to_string(),
            realm: staged.realm().clone(),
            realms: self.realms.clone(),
        };
        let provider = self.registry.instantiate(&context)?;

        // The realm becomes visible only after the provider exists; a failed
        // construction leaves no realm behind
        staged.commit()?;
        tracing::debug!("Loaded provider '{}'", key);
        Ok(Some(provider))
    }
}
