//! The component contracts providers expose through features: class
//! factory, script executor, batch compilers, shell, console, and trace
//! sanitizer.

pub mod batch;
mod class_factory;
mod compiler;
mod executor;
mod trace;

pub use batch::{BatchSources, SourceUnit};
pub use class_factory::{
    normalize_resource_name, ClassFactory, LoadedClass, RealmResourceLoader, ResourceLoader,
    SCRIPT_SUFFIX,
};
pub use compiler::{ClassCompiler, StubCompiler};
pub use executor::{Console, ExecutionResult, ScriptExecutor, Shell};
pub use trace::{Trace, TraceFrame, TraceSanitizer};
