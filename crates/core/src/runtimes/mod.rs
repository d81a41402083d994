//! The runtime versions this crate bundles.
//!
//! Each version module contributes a provider factory keyed by its version;
//! external runtimes plug in through [`ProviderRegistry::register`].

mod dialect;
mod support;
pub mod v1_7;
pub mod v2_0;

use crate::provider::ProviderRegistry;

pub use support::{build_provider, RuntimeSpec};

/// Register every bundled runtime with a registry
pub fn register_all(registry: &ProviderRegistry) {
    registry.register(v1_7::KEY, v1_7::factory);
    registry.register(v2_0::KEY, v2_0::factory);
}
