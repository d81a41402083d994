//! Integration tests for the stub-generation pipeline and its tolerance
//! policy.

use std::fs;
use std::sync::Arc;

use groovy_runner_core::source::ClassSource;
use groovy_runner_core::{
    keys, ArtifactProviderLoader, ProviderManager, ProviderRegistry, RealmManager,
    StaticArtifactResolver,
};
use tempfile::TempDir;

fn manager() -> ProviderManager {
    let realms = Arc::new(RealmManager::new());
    let registry = Arc::new(ProviderRegistry::with_bundled_runtimes());
    let loader =
        ArtifactProviderLoader::new(Box::new(StaticArtifactResolver::new()), registry, realms);
    ProviderManager::new(vec![Box::new(loader)], "2.0")
}

#[test]
fn stubs_land_in_package_directories() {
    let manager = manager();
    let provider = manager.select(Some("2.0")).unwrap();
    let component = provider.component(keys::STUB_COMPILER).unwrap();
    let stubs = component.as_stub_compiler().unwrap();

    let dir = TempDir::new().unwrap();
    let source = dir.path().join("Widget.groovy");
    fs::write(
        &source,
        "package acme.parts\n\nclass Widget extends Base {\n}\ninterface Part {\n}\n",
    )
    .unwrap();
    let target = dir.path().join("stubs");

    stubs.set_target_dir(target.clone());
    stubs.add_source(&ClassSource::for_file(&source)).unwrap();
    assert_eq!(stubs.compile().unwrap(), 2);

    let widget = fs::read_to_string(target.join("acme/parts/Widget.java")).unwrap();
    assert!(widget.starts_with("package acme.parts;"));
    assert!(widget.contains("public class Widget extends Base {"));
    // Stub bodies stay hollow
    assert!(widget.trim_end().ends_with("}"));
    assert!(!widget.contains("println"));

    let part = fs::read_to_string(target.join("acme/parts/Part.java")).unwrap();
    assert!(part.contains("public interface Part {"));
}

#[test]
fn tolerance_bounds_diagnostics_before_abort() {
    let manager = manager();
    let provider = manager.select(Some("2.0")).unwrap();
    let component = provider.component(keys::STUB_COMPILER).unwrap();
    let stubs = component.as_stub_compiler().unwrap();

    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("Broken.groovy");
    fs::write(&bad, "class {\nclass Ok {\n}\n").unwrap();
    let good = dir.path().join("Fine.groovy");
    fs::write(&good, "class Fine {\n}\n").unwrap();

    stubs.set_target_dir(dir.path().join("stubs"));
    stubs.add_source(&ClassSource::for_file(&bad)).unwrap();
    stubs.add_source(&ClassSource::for_file(&good)).unwrap();

    // Default tolerance is zero: a single malformed declaration aborts
    let err = stubs.compile().unwrap_err();
    assert!(err.to_string().contains("malformed class declaration"));
}

#[test]
fn raised_tolerance_lets_the_batch_finish() {
    let manager = manager();
    let provider = manager.select(Some("2.0")).unwrap();
    let component = provider.component(keys::STUB_COMPILER).unwrap();
    let stubs = component.as_stub_compiler().unwrap();

    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("Broken.groovy");
    fs::write(&bad, "class {\nclass Ok {\n}\n").unwrap();

    stubs.set_target_dir(dir.path().join("stubs"));
    stubs.set_tolerance(1);
    stubs.add_source(&ClassSource::for_file(&bad)).unwrap();
    assert_eq!(stubs.compile().unwrap(), 1);
    assert!(dir.path().join("stubs/Ok.java").exists());
}

#[test]
fn legacy_runtime_rejects_enum_stubs() {
    let manager = manager();
    let provider = manager.select(Some("1.7")).unwrap();
    let component = provider.component(keys::STUB_COMPILER).unwrap();
    let stubs = component.as_stub_compiler().unwrap();

    let dir = TempDir::new().unwrap();
    let source = dir.path().join("Color.groovy");
    fs::write(&source, "enum Color {\n}\n").unwrap();

    stubs.set_target_dir(dir.path().join("stubs"));
    stubs.add_source(&ClassSource::for_file(&source)).unwrap();
    let err = stubs.compile().unwrap_err();
    assert!(err.to_string().contains("requires runtime 2.0"));
}
