//! Provider for the 1.7 runtime line.

use std::sync::{Arc, OnceLock};

use crate::error::Result;
use crate::provider::{Provider, ProviderContext};
use crate::version::Version;

use super::support::{build_provider, RuntimeSpec};

pub const KEY: &str = "1.7";

/// Parser token constants as the 1.7 grammar numbers them
const TOKENS: &[(&str, i32)] = &[
    ("EOF", 1),
    ("IDENT", 2),
    ("CLASS", 3),
    ("INTERFACE", 4),
    ("ENUM", 5),
    ("LBRACE", 6),
    ("RBRACE", 7),
];

/// Runtime scaffolding packages elided from user-facing traces
const INTERNAL_PREFIXES: &[&str] = &[
    "org.codehaus.groovy.",
    "groovy.lang.",
    "gjdk.groovy.",
    "sun.",
    "java.lang.reflect.",
];

fn spec() -> Arc<RuntimeSpec> {
    static SPEC: OnceLock<Arc<RuntimeSpec>> = OnceLock::new();
    SPEC.get_or_init(|| {
        Arc::new(RuntimeSpec {
            key: KEY,
            version: Version::new(1, 7, 0),
            // GString interpolation and enum stubs arrived with the 2.x line
            interpolation: false,
            supports_enums: false,
            tokens: TOKENS,
            internal_prefixes: INTERNAL_PREFIXES,
        })
    })
    .clone()
}

pub fn factory(context: &ProviderContext) -> Result<Arc<dyn Provider>> {
    build_provider(spec(), context)
}
