//! Integration tests for provider loading, realm isolation, and component
//! caching across the bundled runtime versions.

use std::fs;
use std::sync::Arc;

use groovy_runner_core::components::LoadedClass;
use groovy_runner_core::source::ClassSource;
use groovy_runner_core::{
    keys, ArtifactProviderLoader, Provider, ProviderManager, ProviderRegistry, RealmManager,
    StaticArtifactResolver,
};
use tempfile::TempDir;

fn harness() -> (Arc<RealmManager>, ProviderManager) {
    let realms = Arc::new(RealmManager::new());
    let registry = Arc::new(ProviderRegistry::with_bundled_runtimes());
    let loader = ArtifactProviderLoader::new(
        Box::new(StaticArtifactResolver::new()),
        registry,
        realms.clone(),
    );
    let manager = ProviderManager::new(vec![Box::new(loader)], "2.0");
    (realms, manager)
}

fn create_class(provider: &dyn Provider, realms: &RealmManager, script: &str) -> LoadedClass {
    let component = provider.component(keys::CLASS_FACTORY).unwrap();
    let factory = component.as_class_factory().unwrap();
    let realm = realms.provider_realm(provider.key()).unwrap();
    factory
        .create(&ClassSource::for_value(script), &realm, None)
        .unwrap()
}

#[test]
fn same_named_classes_from_different_versions_are_distinct() {
    let (realms, manager) = harness();
    let v17 = manager.select(Some("1.7")).unwrap();
    let v20 = manager.select(Some("2.0")).unwrap();

    let a = create_class(v17.as_ref(), &realms, "println 'x'");
    let b = create_class(v20.as_ref(), &realms, "println 'x'");

    assert_ne!(a.realm_id, b.realm_id);
    assert_ne!(a, b);
}

#[test]
fn components_are_cached_per_provider_and_feature() {
    let (_realms, manager) = harness();
    let provider = manager.select(Some("1.7")).unwrap();

    let first = provider.component(keys::CLASS_COMPILER).unwrap();
    let second = provider.component(keys::CLASS_COMPILER).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // A different feature key yields a different component
    let other = provider.component(keys::STUB_COMPILER).unwrap();
    assert!(!Arc::ptr_eq(&first, &other));
}

#[test]
fn default_provider_forwards_to_the_configured_version() {
    let (_realms, manager) = harness();
    let provider = manager.select(None).unwrap();
    assert_eq!(provider.key(), "default");

    let component = provider.component(keys::SCRIPT_EXECUTOR).unwrap();
    let executor = component.as_script_executor().unwrap();
    // Interpolation proves the 2.0 runtime answered
    let result = executor
        .execute(&ClassSource::for_value("def who = 'world'\n\"hi ${who}\""))
        .unwrap();
    assert_eq!(result.value.as_deref(), Some("hi world"));

    assert_eq!(provider.version().map(|v| v.to_string()).as_deref(), Some("2.0.0"));
}

#[test]
fn version_specific_behavior_diverges() {
    let (_realms, manager) = harness();
    let provider = manager.select(Some("1.7")).unwrap();
    let component = provider.component(keys::SCRIPT_EXECUTOR).unwrap();
    let executor = component.as_script_executor().unwrap();

    let result = executor
        .execute(&ClassSource::for_value("def who = 'world'\n\"hi ${who}\""))
        .unwrap();
    // The 1.7 line has no interpolation
    assert_eq!(result.value.as_deref(), Some("hi ${who}"));
}

#[test]
fn concurrent_selection_never_races_two_realms() {
    let (realms, manager) = harness();
    let manager = Arc::new(manager);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = manager.clone();
            std::thread::spawn(move || manager.select(Some("1.7")).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(realms.provider_keys(), vec!["1.7".to_string()]);
}

#[test]
fn shell_keeps_bindings_between_lines() {
    let (_realms, manager) = harness();
    let provider = manager.select(Some("2.0")).unwrap();
    let component = provider.component(keys::SHELL).unwrap();
    let shell = component.as_shell().unwrap();

    let mut input = std::io::Cursor::new(b"def x = 41\nx + 1\n".to_vec());
    let mut output = Vec::new();
    shell.run(&mut input, &mut output).unwrap();

    let transcript = String::from_utf8(output).unwrap();
    assert!(transcript.contains("===> 42"), "transcript: {transcript}");
    assert!(!transcript.contains("ERROR"), "transcript: {transcript}");
}

#[test]
fn unsupported_feature_is_reported_by_key() {
    let (_realms, manager) = harness();
    let provider = manager.select(Some("1.7")).unwrap();
    let err = provider.component("groovy.feature.does-not-exist").unwrap_err();
    assert!(err.to_string().contains("does-not-exist"));
}

#[test]
fn class_compiler_compiles_into_target_dir() {
    let (_realms, manager) = harness();
    let provider = manager.select(Some("2.0")).unwrap();
    let component = provider.component(keys::CLASS_COMPILER).unwrap();
    let compiler = component.as_class_compiler().unwrap();

    let dir = TempDir::new().unwrap();
    let source_path = dir.path().join("Greeter.groovy");
    fs::write(&source_path, "def msg = 'hello'\nprintln msg\n").unwrap();
    let target = dir.path().join("classes");

    compiler.set_target_dir(target.clone());
    compiler
        .add_source(&ClassSource::for_file(&source_path))
        .unwrap();
    assert_eq!(compiler.compile().unwrap(), 1);

    let class_file = target.join("Greeter.class");
    let loaded: LoadedClass =
        serde_json::from_slice(&fs::read(&class_file).unwrap()).unwrap();
    assert_eq!(loaded.name, "Greeter");
    assert_eq!(loaded.realm_id, "groovy.runtime-2.0");
}

#[test]
fn zero_sources_compile_to_zero_without_invoking_the_compiler() {
    let (_realms, manager) = harness();
    let provider = manager.select(Some("2.0")).unwrap();

    let dir = TempDir::new().unwrap();

    let component = provider.component(keys::CLASS_COMPILER).unwrap();
    let compiler = component.as_class_compiler().unwrap();
    compiler.set_target_dir(dir.path().join("classes"));
    assert_eq!(compiler.compile().unwrap(), 0);

    let component = provider.component(keys::STUB_COMPILER).unwrap();
    let stubs = component.as_stub_compiler().unwrap();
    stubs.set_target_dir(dir.path().join("stubs"));
    assert_eq!(stubs.compile().unwrap(), 0);

    // Directory creation is the only side effect
    assert!(dir.path().join("classes").is_dir());
    assert_eq!(fs::read_dir(dir.path().join("classes")).unwrap().count(), 0);
    assert_eq!(fs::read_dir(dir.path().join("stubs")).unwrap().count(), 0);
}
