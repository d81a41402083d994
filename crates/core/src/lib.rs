//! groovy-runner - multi-version Groovy runtime loading for build tooling
//!
//! This crate provides functionality to:
//! - Select, load and isolate one of several incompatible runtime versions
//!   inside a single host process, each behind its own classpath realm
//! - Expose a uniform capability ("feature") interface across versions whose
//!   concrete APIs differ
//! - Compile scripts, generate Java stub skeletons, execute scripts, and run
//!   interactive shells through the selected runtime

pub mod components;
pub mod error;
pub mod exit_guard;
pub mod provider;
pub mod realm;
pub mod runtimes;
pub mod source;
pub mod stubgen;
pub mod version;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use provider::{
    keys, ArtifactProviderLoader, ArtifactResolver, Component, DirectoryArtifactResolver, Feature,
    Provider, ProviderManager, ProviderRegistry, StaticArtifactResolver, DEFAULT_KEY,
};
pub use realm::{Delegation, Realm, RealmManager};
pub use source::ClassSource;
pub use version::Version;
