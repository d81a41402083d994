//! Provider for the 2.0 runtime line.

use std::sync::{Arc, OnceLock};

use crate::error::Result;
use crate::provider::{Provider, ProviderContext};
use crate::version::Version;

use super::support::{build_provider, RuntimeSpec};

pub const KEY: &str = "2.0";

/// The 2.0 grammar renumbered everything past EOF
const TOKENS: &[(&str, i32)] = &[
    ("EOF", 1),
    ("IDENT", 10),
    ("CLASS", 11),
    ("INTERFACE", 12),
    ("ENUM", 13),
    ("TRAIT", 14),
    ("LBRACE", 20),
    ("RBRACE", 21),
];

const INTERNAL_PREFIXES: &[&str] = &[
    "org.codehaus.groovy.",
    "org.codehaus.groovy.vmplugin.",
    "org.codehaus.groovy.runtime.callsite.",
    "groovy.lang.",
    "sun.",
    "java.lang.reflect.",
    "jdk.internal.",
];

fn spec() -> Arc<RuntimeSpec> {
    static SPEC: OnceLock<Arc<RuntimeSpec>> = OnceLock::new();
    SPEC.get_or_init(|| {
        Arc::new(RuntimeSpec {
            key: KEY,
            version: Version::new(2, 0, 0),
            interpolation: true,
            supports_enums: true,
            tokens: TOKENS,
            internal_prefixes: INTERNAL_PREFIXES,
        })
    })
    .clone()
}

pub fn factory(context: &ProviderContext) -> Result<Arc<dyn Provider>> {
    build_provider(spec(), context)
}
