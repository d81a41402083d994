use std::path::PathBuf;

use crate::error::Result;
use crate::source::ClassSource;

/// Batch compiler for accumulated script sources.
///
/// `compile` returns the number of units compiled; with nothing accumulated
/// it short-circuits to zero without touching the underlying compiler.
pub trait ClassCompiler: Send + Sync {
    fn add_source(&self, source: &ClassSource) -> Result<()>;

    /// Compile-classpath entries beyond the provider's realm; they end up in
    /// a component realm invisible to sibling components
    fn add_classpath_entry(&self, entry: PathBuf);

    fn set_target_dir(&self, dir: PathBuf);

    fn compile(&self) -> Result<usize>;
}

/// Batch stub generator.
///
/// Intentionally partial: compilation only progresses far enough to yield a
/// Java skeleton per unit, so a downstream Java compiler pass can resolve
/// cross-references between Java and script sources. The tolerance bounds
/// how many non-fatal diagnostics one run absorbs before the batch aborts;
/// output from a failed run is build-poisoning and cleanup is the caller's
/// responsibility.
pub trait StubCompiler: Send + Sync {
    fn add_source(&self, source: &ClassSource) -> Result<()>;

    fn set_target_dir(&self, dir: PathBuf);

    fn set_tolerance(&self, tolerance: usize);

    fn compile(&self) -> Result<usize>;
}
