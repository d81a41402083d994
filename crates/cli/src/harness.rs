use std::path::PathBuf;
use std::sync::Arc;

use groovy_runner_core::{
    ArtifactProviderLoader, DirectoryArtifactResolver, ProviderManager, ProviderRegistry,
    RealmManager, StaticArtifactResolver,
};

/// Everything a command needs: the realm universe and the provider manager
/// wired to the bundled runtime registry.
pub struct Harness {
    pub realms: Arc<RealmManager>,
    pub registry: Arc<ProviderRegistry>,
    pub manager: ProviderManager,
}

/// Default runtime version when none is requested
pub const DEFAULT_VERSION: &str = "2.0";

impl Harness {
    /// Build a harness, optionally resolving runtime artifacts out of a
    /// local repository directory (`<repo>/<version>/*`).
    pub fn new(repository: Option<PathBuf>) -> Self {
        let realms = Arc::new(RealmManager::new());
        let registry = Arc::new(ProviderRegistry::with_bundled_runtimes());

        let resolver: Box<dyn groovy_runner_core::ArtifactResolver> = match repository {
            Some(root) => Box::new(DirectoryArtifactResolver::new(root)),
            None => Box::new(StaticArtifactResolver::new()),
        };
        let loader = ArtifactProviderLoader::new(resolver, registry.clone(), realms.clone());
        let manager = ProviderManager::new(vec![Box::new(loader)], DEFAULT_VERSION);

        Self {
            realms,
            registry,
            manager,
        }
    }
}
