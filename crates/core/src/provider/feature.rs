use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::realm::{Realm, RealmManager};
use crate::version::Version;

use super::component::Component;

/// Everything a feature factory may need to build its component: the owning
/// provider's identity, realm, and the realm manager for child realms.
pub struct FeatureContext<'a> {
    pub provider_key: &'a str,
    pub version: &'a Version,
    pub realm: &'a Arc<Realm>,
    pub realms: &'a Arc<RealmManager>,
}

type ComponentFactory = Box<dyn Fn(&FeatureContext<'_>) -> Result<Arc<dyn Component>> + Send + Sync>;

/// A capability descriptor: a stable key plus a factory producing exactly
/// one component type. Stateless aside from identity; the owning provider
/// caches the created component.
pub struct Feature {
    key: &'static str,
    factory: ComponentFactory,
}

impl Feature {
    pub fn new<F>(key: &'static str, factory: F) -> Self
    where
        F: Fn(&FeatureContext<'_>) -> Result<Arc<dyn Component>> + Send + Sync + 'static,
    {
        Self {
            key,
            factory: Box::new(factory),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub(crate) fn create(&self, context: &FeatureContext<'_>) -> Result<Arc<dyn Component>> {
        tracing::debug!(
            "Creating component for feature '{}' of provider '{}'",
            self.key,
            context.provider_key
        );
        (self.factory)(context)
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature").field("key", &self.key).finish()
    }
}
