use anyhow::{anyhow, Context, Result};
use tracing::debug;

use groovy_runner_core::keys;

use crate::harness::Harness;

pub fn shell_command(harness: &Harness, version: Option<&str>, console: bool) -> Result<()> {
    let provider = harness
        .manager
        .select(version)
        .context("Failed to select a runtime provider")?;
    debug!("Opening shell on provider '{}'", provider.key());

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();

    if console {
        let component = provider.component(keys::CONSOLE)?;
        let console = component
            .as_console()
            .ok_or_else(|| anyhow!("Console feature returned a foreign component"))?;
        console.open(&mut input, &mut output)?;
    } else {
        let component = provider.component(keys::SHELL)?;
        let shell = component
            .as_shell()
            .ok_or_else(|| anyhow!("Shell feature returned a foreign component"))?;
        shell.run(&mut input, &mut output)?;
    }
    Ok(())
}
