use anyhow::Result;

use crate::harness::{Harness, DEFAULT_VERSION};

pub fn versions_command(harness: &Harness, json: bool) -> Result<()> {
    let available = harness.registry.keys();
    let loaded = harness.realms.provider_keys();

    if json {
        let report = serde_json::json!({
            "default": DEFAULT_VERSION,
            "available": available,
            "loaded": loaded,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Available runtime versions:");
    for key in &available {
        let marker = if key == DEFAULT_VERSION { " (default)" } else { "" };
        println!("  {key}{marker}");
    }
    Ok(())
}
