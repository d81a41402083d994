use std::any::Any;

use crate::components::{
    ClassCompiler, ClassFactory, Console, ScriptExecutor, Shell, StubCompiler, TraceSanitizer,
};

/// Stable feature keys.
///
/// External callers select capabilities by these keys, never by
/// provider-specific types, so they must stay identical across runtime
/// versions.
pub mod keys {
    pub const CLASS_FACTORY: &str = "groovy.feature.class-factory";
    pub const SCRIPT_EXECUTOR: &str = "groovy.feature.script-executor";
    pub const CLASS_COMPILER: &str = "groovy.feature.class-compiler";
    pub const STUB_COMPILER: &str = "groovy.feature.stub-compiler";
    pub const SHELL: &str = "groovy.feature.shell";
    pub const CONSOLE: &str = "groovy.feature.console";
    pub const TRACE_SANITIZER: &str = "groovy.feature.trace-sanitizer";
}

/// A live capability instance created by a [`Feature`](super::Feature).
///
/// Implementations override the accessor for the contract they provide;
/// everything else stays `None`. Callers go from a feature key to the typed
/// contract without knowing the provider-specific concrete type.
pub trait Component: Any + Send + Sync {
    /// Key of the feature that created this component
    fn feature_key(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_class_factory(&self) -> Option<&dyn ClassFactory> {
        None
    }

    fn as_script_executor(&self) -> Option<&dyn ScriptExecutor> {
        None
    }

    fn as_class_compiler(&self) -> Option<&dyn ClassCompiler> {
        None
    }

    fn as_stub_compiler(&self) -> Option<&dyn StubCompiler> {
        None
    }

    fn as_shell(&self) -> Option<&dyn Shell> {
        None
    }

    fn as_console(&self) -> Option<&dyn Console> {
        None
    }

    fn as_trace_sanitizer(&self) -> Option<&dyn TraceSanitizer> {
        None
    }
}

impl std::fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("feature_key", &self.feature_key())
            .finish()
    }
}
