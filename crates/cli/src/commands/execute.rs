use anyhow::{anyhow, Context, Result};
use tracing::debug;

use groovy_runner_core::components::{Trace, TraceSanitizer};
use groovy_runner_core::{keys, ClassSource};

use crate::harness::Harness;

pub fn execute_command(
    harness: &Harness,
    source_arg: &str,
    version: Option<&str>,
) -> Result<()> {
    let provider = harness
        .manager
        .select(version)
        .context("Failed to select a runtime provider")?;
    debug!("Executing through provider '{}'", provider.key());

    let component = provider.component(keys::SCRIPT_EXECUTOR)?;
    let executor = component
        .as_script_executor()
        .ok_or_else(|| anyhow!("Script executor feature returned a foreign component"))?;

    let source = ClassSource::for_value(source_arg);
    debug!("Classified source as '{}'", source.name());

    match executor.execute(&source) {
        Ok(result) => {
            print!("{}", result.output);
            if let Some(value) = result.value {
                println!("===> {value}");
            }
            Ok(())
        }
        Err(err) => {
            // Keep runtime scaffolding out of the user-facing trace
            let sanitizer_component = provider.component(keys::TRACE_SANITIZER)?;
            if let Some(sanitizer) = sanitizer_component.as_trace_sanitizer() {
                eprint!("{}", sanitizer.print(&trace_of(&err), true));
            }
            Err(anyhow!("Script execution failed"))
        }
    }
}

/// Flatten an error's cause chain into a printable trace
fn trace_of(err: &groovy_runner_core::Error) -> Trace {
    let mut messages = vec![err.to_string()];
    let mut cursor = std::error::Error::source(err);
    while let Some(cause) = cursor {
        messages.push(cause.to_string());
        cursor = cause.source();
    }

    let mut trace: Option<Box<Trace>> = None;
    for message in messages.into_iter().rev() {
        let mut outer = Trace::new(message);
        outer.cause = trace.take();
        trace = Some(Box::new(outer));
    }
    *trace.unwrap_or_else(|| Box::new(Trace::new("unknown failure")))
}
