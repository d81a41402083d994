use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

use super::realm::{Delegation, Realm};

/// Creates and disposes classpath realms.
///
/// The manager is the sole owner of the provider-key to provider-realm
/// mapping; all mutation goes through its mutex so concurrent builds cannot
/// race two realms into existence for the same runtime version.
#[derive(Debug, Default)]
pub struct RealmManager {
    providers: Mutex<HashMap<String, Arc<Realm>>>,
    components: Mutex<HashMap<String, Arc<Realm>>>,
    counter: AtomicU64,
}

impl RealmManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare a provider realm without registering it.
    ///
    /// Registration happens through [`StagedRealm::commit`], after the
    /// provider has been successfully instantiated from the realm, so a
    /// failed load never leaves a half-initialized realm behind. Staging a
    /// key that already has a live realm fails.
    pub fn stage_provider_realm(
        &self,
        key: &str,
        classpath: Vec<PathBuf>,
        parent: Option<Arc<Realm>>,
    ) -> Result<StagedRealm<'_>> {
        let providers = self.providers.lock().expect("realm registry poisoned");
        if providers.contains_key(key) {
            return Err(Error::DuplicateRealm(key.to_string()));
        }
        drop(providers);

        // Provider realms are always parent-first so host classes shadow
        // anything the runtime ships copies of
        let realm = Realm::new(
            format!("groovy.runtime-{key}"),
            Delegation::ParentFirst,
            classpath,
            parent,
        );
        tracing::debug!("Staged provider realm '{}' for '{}'", realm.id(), key);

        Ok(StagedRealm {
            manager: self,
            key: key.to_string(),
            realm,
        })
    }

    /// The registered realm for a provider key, if any
    pub fn provider_realm(&self, key: &str) -> Option<Arc<Realm>> {
        self.providers
            .lock()
            .expect("realm registry poisoned")
            .get(key)
            .cloned()
    }

    /// Create a uniquely-named child realm under a provider's realm.
    ///
    /// Extra classpath entries are visible only inside the returned realm,
    /// never to sibling components.
    pub fn create_component_realm(
        &self,
        provider_key: &str,
        classpath: Vec<PathBuf>,
    ) -> Result<Arc<Realm>> {
        let parent = self
            .provider_realm(provider_key)
            .ok_or_else(|| Error::NoProviderRealm(provider_key.to_string()))?;

        let serial = self.counter.fetch_add(1, Ordering::SeqCst);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let id = format!("{provider_key}.component-{serial}-{millis}");

        let realm = Realm::new(&id, Delegation::ParentFirst, classpath, Some(parent));
        self.components
            .lock()
            .expect("realm registry poisoned")
            .insert(id.clone(), realm.clone());
        tracing::debug!("Created component realm '{}'", id);

        Ok(realm)
    }

    /// Remove a component realm from the classloading universe.
    ///
    /// Once the last `Arc` to the realm drops, everything resolved only
    /// through it becomes collectable. Releasing an unknown or
    /// already-released realm is a reported lifecycle error.
    pub fn release_component_realm(&self, realm_id: &str) -> Result<()> {
        let removed = self
            .components
            .lock()
            .expect("realm registry poisoned")
            .remove(realm_id);
        match removed {
            Some(_) => {
                tracing::debug!("Released component realm '{}'", realm_id);
                Ok(())
            }
            None => Err(Error::RealmDisposal(format!(
                "component realm '{realm_id}' is not registered (double release?)"
            ))),
        }
    }

    /// Tear down a provider realm and every component realm under it
    pub fn dispose_provider_realm(&self, key: &str) -> Result<()> {
        let removed = self
            .providers
            .lock()
            .expect("realm registry poisoned")
            .remove(key);
        let Some(realm) = removed else {
            return Err(Error::RealmDisposal(format!(
                "no provider realm registered for '{key}'"
            )));
        };

        let mut components = self.components.lock().expect("realm registry poisoned");
        components.retain(|_, child| !child.is_descendant_of(&realm));
        tracing::debug!("Disposed provider realm '{}'", realm.id());
        Ok(())
    }

    /// Keys of all currently registered provider realms
    pub fn provider_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .providers
            .lock()
            .expect("realm registry poisoned")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

/// A provider realm that has been built but not yet registered
#[must_use = "a staged realm does nothing until committed"]
pub struct StagedRealm<'a> {
    manager: &'a RealmManager,
    key: String,
    realm: Arc<Realm>,
}

impl StagedRealm<'_> {
    pub fn realm(&self) -> &Arc<Realm> {
        &self.realm
    }

    /// Register the realm under its provider key.
    ///
    /// Re-checks for a racing registration; losing the race is a
    /// duplicate-realm error and the staged realm is discarded.
    pub fn commit(self) -> Result<Arc<Realm>> {
        let mut providers = self.manager.providers.lock().expect("realm registry poisoned");
        if providers.contains_key(&self.key) {
            return Err(Error::DuplicateRealm(self.key));
        }
        providers.insert(self.key.clone(), self.realm.clone());
        tracing::debug!("Registered provider realm '{}'", self.realm.id());
        Ok(self.realm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit_realm(manager: &RealmManager, key: &str) -> Arc<Realm> {
        manager
            .stage_provider_realm(key, vec![], None)
            .unwrap()
            .commit()
            .unwrap()
    }

    #[test]
    fn duplicate_provider_realm_is_rejected() {
        let manager = RealmManager::new();
        commit_realm(&manager, "1.7");
        assert!(matches!(
            manager.stage_provider_realm("1.7", vec![], None),
            Err(Error::DuplicateRealm(_))
        ));
    }

    #[test]
    fn uncommitted_stage_registers_nothing() {
        let manager = RealmManager::new();
        {
            let _stage = manager.stage_provider_realm("2.0", vec![], None).unwrap();
        }
        assert!(manager.provider_realm("2.0").is_none());
        // The key is free again once the stage is dropped
        commit_realm(&manager, "2.0");
    }

    #[test]
    fn component_realm_requires_provider_realm() {
        let manager = RealmManager::new();
        assert!(matches!(
            manager.create_component_realm("1.7", vec![]),
            Err(Error::NoProviderRealm(_))
        ));
    }

    #[test]
    fn component_realm_ids_are_unique() {
        let manager = RealmManager::new();
        commit_realm(&manager, "1.7");
        let a = manager.create_component_realm("1.7", vec![]).unwrap();
        let b = manager.create_component_realm("1.7", vec![]).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.parent().unwrap().id(), b.parent().unwrap().id());
    }

    #[test]
    fn double_release_is_an_error() {
        let manager = RealmManager::new();
        commit_realm(&manager, "1.7");
        let realm = manager.create_component_realm("1.7", vec![]).unwrap();
        let id = realm.id().to_string();
        manager.release_component_realm(&id).unwrap();
        assert!(matches!(
            manager.release_component_realm(&id),
            Err(Error::RealmDisposal(_))
        ));
    }

    #[test]
    fn disposing_provider_realm_drops_its_components() {
        let manager = RealmManager::new();
        commit_realm(&manager, "1.7");
        let component = manager.create_component_realm("1.7", vec![]).unwrap();
        let id = component.id().to_string();

        manager.dispose_provider_realm("1.7").unwrap();
        assert!(manager.provider_realm("1.7").is_none());
        assert!(manager.release_component_realm(&id).is_err());
        // Unknown key disposal is reported, not a crash
        assert!(matches!(
            manager.dispose_provider_realm("1.7"),
            Err(Error::RealmDisposal(_))
        ));
    }

    #[test]
    fn concurrent_component_creation_never_collides() {
        let manager = Arc::new(RealmManager::new());
        commit_realm(&manager, "2.0");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let manager = manager.clone();
            handles.push(std::thread::spawn(move || {
                (0..16)
                    .map(|_| {
                        manager
                            .create_component_realm("2.0", vec![])
                            .unwrap()
                            .id()
                            .to_string()
                    })
                    .collect::<Vec<_>>()
            }));
        }

        let mut ids: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
