use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::error::{Error, Result};
use crate::realm::{Realm, RealmManager};
use crate::version::Version;

use super::component::Component;
use super::feature::{Feature, FeatureContext};

/// Key under which the delegating default provider is selected
pub const DEFAULT_KEY: &str = "default";

/// One bundled runtime version, exposing its capabilities by feature key.
pub trait Provider: Send + Sync {
    /// Version key, e.g. `"1.7"`, `"2.0"`, or [`DEFAULT_KEY`]
    fn key(&self) -> &str;

    /// The concrete runtime version. `None` only for a delegating provider
    /// that has not resolved its target yet.
    fn version(&self) -> Option<&Version>;

    fn feature(&self, key: &str) -> Option<&Feature>;

    fn feature_keys(&self) -> Vec<&'static str>;

    /// The component for a feature key, created lazily on first request and
    /// cached for the provider's lifetime.
    fn component(&self, key: &str) -> Result<Arc<dyn Component>>;
}

/// Standard provider implementation backing the bundled runtimes.
///
/// Owns its realm, a feature map built once at construction, and the lazy
/// component cache. The cache lock is held across component creation so at
/// most one live component ever exists per feature key.
pub struct RuntimeProvider {
    key: String,
    version: Version,
    realm: Arc<Realm>,
    realms: Arc<RealmManager>,
    features: Vec<Feature>,
    components: Mutex<HashMap<&'static str, Arc<dyn Component>>>,
}

impl RuntimeProvider {
    pub fn new(
        key: impl Into<String>,
        version: Version,
        realm: Arc<Realm>,
        realms: Arc<RealmManager>,
        features: Vec<Feature>,
    ) -> Self {
        Self {
            key: key.into(),
            version,
            realm,
            realms,
            features,
            components: Mutex::new(HashMap::new()),
        }
    }

    pub fn realm(&self) -> &Arc<Realm> {
        &self.realm
    }
}

impl Provider for RuntimeProvider {
    fn key(&self) -> &str {
        &self.key
    }

    fn version(&self) -> Option<&Version> {
        Some(&self.version)
    }

    fn feature(&self, key: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.key() == key)
    }

    fn feature_keys(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.key()).collect()
    }

    fn component(&self, key: &str) -> Result<Arc<dyn Component>> {
        let mut cache = self.components.lock().expect("component cache poisoned");
        if let Some(component) = cache.get(key) {
            return Ok(component.clone());
        }

        let feature = self.feature(key).ok_or_else(|| Error::UnsupportedFeature {
            provider: self.key.clone(),
            feature: key.to_string(),
        })?;

        let context = FeatureContext {
            provider_key: &self.key,
            version: &self.version,
            realm: &self.realm,
            realms: &self.realms,
        };
        let component = feature.create(&context)?;
        cache.insert(feature.key(), component.clone());
        Ok(component)
    }
}

type ProviderResolver = Box<dyn Fn() -> Result<Arc<dyn Provider>> + Send + Sync>;

/// Delegating provider behind the `"default"` key.
///
/// Holds a lazily-initialized inner provider and forwards every call to it;
/// the target is resolved through the selection policy the first time any
/// forwarding method runs.
pub struct DefaultProvider {
    resolve: ProviderResolver,
    inner: OnceLock<Arc<dyn Provider>>,
}

impl DefaultProvider {
    pub fn new<F>(resolve: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Provider>> + Send + Sync + 'static,
    {
        Self {
            resolve: Box::new(resolve),
            inner: OnceLock::new(),
        }
    }

    fn inner(&self) -> Result<&Arc<dyn Provider>> {
        if let Some(provider) = self.inner.get() {
            return Ok(provider);
        }
        let resolved = (self.resolve)()?;
        // Losing a resolution race is fine, both closures resolve the same key
        let _ = self.inner.set(resolved);
        Ok(self.inner.get().expect("default provider just resolved"))
    }

    /// Like [`Self::inner`] for signatures that cannot carry the error; the
    /// failure still lands in the log
    fn inner_or_log(&self) -> Option<&Arc<dyn Provider>> {
        match self.inner() {
            Ok(provider) => Some(provider),
            Err(err) => {
                tracing::warn!("Default provider failed to resolve its target: {}", err);
                None
            }
        }
    }
}

impl Provider for DefaultProvider {
    fn key(&self) -> &str {
        DEFAULT_KEY
    }

    fn version(&self) -> Option<&Version> {
        self.inner.get().and_then(|p| p.version())
    }

    fn feature(&self, key: &str) -> Option<&Feature> {
        self.inner_or_log().and_then(|p| p.feature(key))
    }

    fn feature_keys(&self) -> Vec<&'static str> {
        self.inner_or_log()
            .map(|p| p.feature_keys())
            .unwrap_or_default()
    }

    fn component(&self, key: &str) -> Result<Arc<dyn Component>> {
        self.inner()?.component(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_default_resolution_degrades_features_but_not_components() {
        let provider = DefaultProvider::new(|| Err(Error::ProviderNotFound("9.9".into())));
        // Option-shaped accessors degrade; the Result-shaped path keeps the
        // underlying load error
        assert!(provider.feature("groovy.feature.shell").is_none());
        assert!(provider.feature_keys().is_empty());
        assert!(matches!(
            provider.component("groovy.feature.shell"),
            Err(Error::ProviderNotFound(_))
        ));
    }
}
