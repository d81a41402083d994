use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};

use super::loader::ProviderLoader;
use super::provider::{DefaultProvider, Provider, DEFAULT_KEY};

type ProviderCache = Arc<Mutex<HashMap<String, Arc<dyn Provider>>>>;
type LoaderChain = Arc<Vec<Box<dyn ProviderLoader>>>;
type KeyLocks = Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>;

/// Selects the provider answering a request: a specific version key, or the
/// configured default.
///
/// Successful loads are cached; reselecting a key is a map lookup. Loads of
/// the same key are serialized through a per-key lock, so concurrent
/// selection never races two realms into existence; distinct keys still
/// load in parallel.
pub struct ProviderManager {
    providers: ProviderCache,
    loaders: LoaderChain,
    load_locks: KeyLocks,
    default_version: String,
}

impl ProviderManager {
    pub fn new(loaders: Vec<Box<dyn ProviderLoader>>, default_version: impl Into<String>) -> Self {
        Self {
            providers: Arc::new(Mutex::new(HashMap::new())),
            loaders: Arc::new(loaders),
            load_locks: Arc::new(Mutex::new(HashMap::new())),
            default_version: default_version.into(),
        }
    }

    /// `select(Some(key))` resolves that version; `select(None)` applies the
    /// default policy, returning a delegating provider that resolves the
    /// configured default version on first use.
    pub fn select(&self, requested: Option<&str>) -> Result<Arc<dyn Provider>> {
        match requested {
            Some(key) if key != DEFAULT_KEY => {
                resolve_key(&self.providers, &self.load_locks, &self.loaders, key)
            }
            _ => self.select_default(),
        }
    }

    fn select_default(&self) -> Result<Arc<dyn Provider>> {
        let mut cache = self.providers.lock().expect("provider cache poisoned");
        if let Some(provider) = cache.get(DEFAULT_KEY) {
            return Ok(provider.clone());
        }

        let providers = self.providers.clone();
        let load_locks = self.load_locks.clone();
        let loaders = self.loaders.clone();
        let target = self.default_version.clone();
        let provider: Arc<dyn Provider> = Arc::new(DefaultProvider::new(move || {
            resolve_key(&providers, &load_locks, &loaders, &target)
        }));
        cache.insert(DEFAULT_KEY.to_string(), provider.clone());
        Ok(provider)
    }

    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    /// Keys of all providers selected so far
    pub fn loaded_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .providers
            .lock()
            .expect("provider cache poisoned")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

fn resolve_key(
    providers: &ProviderCache,
    load_locks: &KeyLocks,
    loaders: &[Box<dyn ProviderLoader>],
    key: &str,
) -> Result<Arc<dyn Provider>> {
    if let Some(provider) = providers.lock().expect("provider cache poisoned").get(key) {
        return Ok(provider.clone());
    }

    // One load at a time per key. A thread that loses the race blocks here,
    // then finds the winner's provider in the cache.
    let key_lock = load_locks
        .lock()
        .expect("load lock table poisoned")
        .entry(key.to_string())
        .or_default()
        .clone();
    let _loading = key_lock.lock().expect("key load lock poisoned");

    if let Some(provider) = providers.lock().expect("provider cache poisoned").get(key) {
        return Ok(provider.clone());
    }

    for loader in loaders {
        match loader.load(key)? {
            Some(provider) => {
                providers
                    .lock()
                    .expect("provider cache poisoned")
                    .insert(key.to_string(), provider.clone());
                return Ok(provider);
            }
            None => continue,
        }
    }

    Err(Error::ProviderNotFound(key.to_string()))
}
