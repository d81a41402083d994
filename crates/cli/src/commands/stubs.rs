use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use groovy_runner_core::{keys, ClassSource};

use crate::harness::Harness;

pub fn stubs_command(
    harness: &Harness,
    sources: &[PathBuf],
    output: PathBuf,
    version: Option<&str>,
    tolerance: usize,
) -> Result<()> {
    let provider = harness
        .manager
        .select(version)
        .context("Failed to select a runtime provider")?;
    debug!("Generating stubs through provider '{}'", provider.key());

    let component = provider.component(keys::STUB_COMPILER)?;
    let stubs = component
        .as_stub_compiler()
        .ok_or_else(|| anyhow!("Stub compiler feature returned a foreign component"))?;

    stubs.set_target_dir(output.clone());
    stubs.set_tolerance(tolerance);
    for path in sources {
        stubs
            .add_source(&ClassSource::for_file(path))
            .with_context(|| format!("Cannot add source '{}'", path.display()))?;
    }

    let count = stubs.compile().context("Stub generation failed")?;
    info!("Generated {} stub(s) into {}", count, output.display());
    println!("Generated {count} stub(s)");
    Ok(())
}
