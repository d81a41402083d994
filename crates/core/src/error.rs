use std::io;

/// Errors that can occur while loading providers, managing realms, or
/// compiling and executing script sources
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No provider found for version '{0}'")]
    ProviderNotFound(String),

    #[error("Failed to load provider '{key}': {reason}")]
    ProviderLoad {
        key: String,
        reason: String,
        #[source]
        source: Option<Box<Error>>,
    },

    #[error("No realm registered for provider '{0}'")]
    NoProviderRealm(String),

    #[error("A realm already exists for provider '{0}'")]
    DuplicateRealm(String),

    #[error("Provider '{provider}' does not support feature '{feature}'")]
    UnsupportedFeature { provider: String, feature: String },

    #[error("Invalid class source: {0}")]
    InvalidSource(String),

    #[error("Compilation failed: {0}")]
    Compilation(String),

    #[error("Realm disposal error: {0}")]
    RealmDisposal(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap a failure with provider-load context, preserving the cause chain
    pub fn provider_load(key: impl Into<String>, reason: impl Into<String>, source: Error) -> Self {
        Error::ProviderLoad {
            key: key.into(),
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn provider_load_msg(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ProviderLoad {
            key: key.into(),
            reason: reason.into(),
            source: None,
        }
    }
}

/// Result type alias for groovy-runner operations
pub type Result<T> = std::result::Result<T, Error>;
