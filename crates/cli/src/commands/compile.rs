use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use groovy_runner_core::{keys, ClassSource};

use crate::harness::Harness;

pub fn compile_command(
    harness: &Harness,
    sources: &[PathBuf],
    output: PathBuf,
    version: Option<&str>,
    classpath: &[PathBuf],
) -> Result<()> {
    let provider = harness
        .manager
        .select(version)
        .context("Failed to select a runtime provider")?;
    debug!("Compiling through provider '{}'", provider.key());

    let component = provider.component(keys::CLASS_COMPILER)?;
    let compiler = component
        .as_class_compiler()
        .ok_or_else(|| anyhow!("Class compiler feature returned a foreign component"))?;

    compiler.set_target_dir(output.clone());
    for entry in classpath {
        compiler.add_classpath_entry(entry.clone());
    }
    for path in sources {
        compiler
            .add_source(&ClassSource::for_file(path))
            .with_context(|| format!("Cannot add source '{}'", path.display()))?;
    }

    let count = compiler.compile().context("Compilation failed")?;
    info!("Compiled {} class(es) into {}", count, output.display());
    println!("Compiled {count} class(es)");
    Ok(())
}
