//! Runtime version providers and their selection machinery.
//!
//! A provider bundles one runtime version's identity with the features it
//! supports. The manager resolves version keys through a loader chain; the
//! artifact-backed loader materializes a version inside its own realm.

mod component;
mod feature;
mod loader;
mod manager;
mod provider;
mod registry;

pub use component::{keys, Component};
pub use feature::{Feature, FeatureContext};
pub use loader::{
    ArtifactProviderLoader, ArtifactResolver, DirectoryArtifactResolver, ProviderLoader,
    StaticArtifactResolver,
};
pub use manager::ProviderManager;
pub use provider::{DefaultProvider, Provider, RuntimeProvider, DEFAULT_KEY};
pub use registry::{ProviderContext, ProviderRegistry};
