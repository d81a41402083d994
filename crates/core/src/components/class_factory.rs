use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::realm::Realm;
use crate::source::ClassSource;

/// Suffix forced onto normalized script resource names
pub const SCRIPT_SUFFIX: &str = ".groovy";

/// A class the runtime materialized from script source.
///
/// Carries the id of the realm it was loaded through; classes with the same
/// name loaded through different realms are distinct types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedClass {
    pub name: String,
    pub realm_id: String,
    pub origin: String,
}

/// Bridges a logical script name to a byte source on disk
pub trait ResourceLoader: Send + Sync {
    fn load_resource(&self, name: &str) -> Result<Option<PathBuf>>;
}

/// Default resource loader: resolves normalized names through a realm's
/// classpath.
pub struct RealmResourceLoader {
    realm: Arc<Realm>,
}

impl RealmResourceLoader {
    pub fn new(realm: Arc<Realm>) -> Self {
        Self { realm }
    }
}

impl ResourceLoader for RealmResourceLoader {
    fn load_resource(&self, name: &str) -> Result<Option<PathBuf>> {
        let normalized = normalize_resource_name(name);
        Ok(self.realm.find_resource(&normalized))
    }
}

/// Normalize a logical script name into a resource path: dotted names turn
/// into path segments, the script suffix is forced when absent, and a
/// leading `/` is enforced.
pub fn normalize_resource_name(name: &str) -> String {
    let mut normalized = name.trim().to_string();
    if !normalized.ends_with(SCRIPT_SUFFIX) {
        normalized = normalized.replace('.', "/");
        normalized.push_str(SCRIPT_SUFFIX);
    }
    if !normalized.starts_with('/') {
        normalized.insert(0, '/');
    }
    normalized
}

/// Turns a class source into a loaded class, scoped to the given realm.
pub trait ClassFactory: Send + Sync {
    fn create(
        &self,
        source: &ClassSource,
        realm: &Arc<Realm>,
        resources: Option<&dyn ResourceLoader>,
    ) -> Result<LoadedClass>;
}
