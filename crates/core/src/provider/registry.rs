use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::realm::{Realm, RealmManager};

use super::provider::Provider;

/// Handed to a provider factory when its version is materialized
pub struct ProviderContext {
    pub key: String,
    pub realm: Arc<Realm>,
    pub realms: Arc<RealmManager>,
}

type ProviderFactory = Box<dyn Fn(&ProviderContext) -> Result<Arc<dyn Provider>> + Send + Sync>;

/// Explicit mapping from version key to provider factory.
///
/// This is the late-binding point for runtime versions: the registry ships
/// pre-populated with the bundled runtimes and accepts further
/// registrations from plugins before (or after) the manager starts
/// selecting providers.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: Mutex<HashMap<String, ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with every runtime version this crate bundles
    pub fn with_bundled_runtimes() -> Self {
        let registry = Self::new();
        crate::runtimes::register_all(&registry);
        registry
    }

    pub fn register<F>(&self, key: impl Into<String>, factory: F)
    where
        F: Fn(&ProviderContext) -> Result<Arc<dyn Provider>> + Send + Sync + 'static,
    {
        let key = key.into();
        tracing::debug!("Registered provider factory for '{}'", key);
        self.factories
            .lock()
            .expect("provider registry poisoned")
            .insert(key, Box::new(factory));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories
            .lock()
            .expect("provider registry poisoned")
            .contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .factories
            .lock()
            .expect("provider registry poisoned")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Run the registered factory for `context.key`
    pub(crate) fn instantiate(&self, context: &ProviderContext) -> Result<Arc<dyn Provider>> {
        let factories = self.factories.lock().expect("provider registry poisoned");
        let factory = factories.get(&context.key).ok_or_else(|| {
            Error::provider_load_msg(&context.key, "no factory registered for this version")
        })?;
        factory(context).map_err(|e| {
            Error::provider_load(&context.key, "provider construction failed", e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_visible_in_keys() {
        let registry = ProviderRegistry::new();
        assert!(!registry.contains("9.9"));
        registry.register("9.9", |_ctx| {
            Err(Error::Other("factory should not run in this test".into()))
        });
        assert!(registry.contains("9.9"));
        assert_eq!(registry.keys(), vec!["9.9".to_string()]);
    }

    #[test]
    fn instantiate_without_factory_is_a_load_error() {
        let registry = ProviderRegistry::new();
        let context = ProviderContext {
            key: "3.0".into(),
            realm: crate::realm::Realm::new("r", crate::realm::Delegation::ParentFirst, vec![], None),
            realms: Arc::new(RealmManager::new()),
        };
        assert!(matches!(
            registry.instantiate(&context),
            Err(Error::ProviderLoad { .. })
        ));
    }
}
