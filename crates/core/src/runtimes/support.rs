use std::any::Any;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::components::{
    BatchSources, ClassCompiler, ClassFactory, Console, ExecutionResult, LoadedClass,
    RealmResourceLoader, ResourceLoader, ScriptExecutor, Shell, StubCompiler, TraceSanitizer,
};
use crate::error::{Error, Result};
use crate::exit_guard::ExitGuard;
use crate::provider::{keys, Component, Feature, Provider, ProviderContext, RuntimeProvider};
use crate::realm::{Realm, RealmManager};
use crate::source::{ClassSource, SourceKind};
use crate::stubgen::{self, DynamicTokens, TypeKind};
use crate::version::Version;

use super::dialect::{imports_of, Interp};

/// Everything that distinguishes one bundled runtime version from another
pub struct RuntimeSpec {
    pub key: &'static str,
    pub version: Version,
    pub interpolation: bool,
    pub supports_enums: bool,
    pub tokens: &'static [(&'static str, i32)],
    pub internal_prefixes: &'static [&'static str],
}

impl RuntimeSpec {
    fn interp(&self) -> Interp {
        Interp {
            interpolation: self.interpolation,
        }
    }

    fn tokens(&self) -> DynamicTokens {
        DynamicTokens::new(self.tokens)
    }
}

/// Assemble a provider for a runtime spec: the full feature set wired to
/// the provider's realm
pub fn build_provider(spec: Arc<RuntimeSpec>, context: &ProviderContext) -> Result<Arc<dyn Provider>> {
    let features = vec![
        feature(keys::CLASS_FACTORY, spec.clone(), |spec, _ctx| {
            Arc::new(FactoryComponent { spec })
        }),
        feature(keys::SCRIPT_EXECUTOR, spec.clone(), |spec, _ctx| {
            Arc::new(ExecutorComponent { spec })
        }),
        feature(keys::CLASS_COMPILER, spec.clone(), |spec, ctx| {
            Arc::new(CompilerComponent {
                spec,
                provider_key: ctx.provider_key.to_string(),
                realm: ctx.realm.clone(),
                realms: ctx.realms.clone(),
                batch: BatchSources::new(),
                extra_classpath: Mutex::new(Vec::new()),
            })
        }),
        feature(keys::STUB_COMPILER, spec.clone(), |spec, _ctx| {
            Arc::new(StubComponent {
                spec,
                batch: BatchSources::new(),
            })
        }),
        feature(keys::SHELL, spec.clone(), |spec, _ctx| {
            Arc::new(ShellComponent::new(spec))
        }),
        feature(keys::CONSOLE, spec.clone(), |spec, _ctx| {
            Arc::new(ConsoleComponent {
                shell: ShellComponent::new(spec),
            })
        }),
        feature(keys::TRACE_SANITIZER, spec.clone(), |spec, _ctx| {
            Arc::new(SanitizerComponent { spec })
        }),
    ];

    Ok(Arc::new(RuntimeProvider::new(
        spec.key,
        spec.version.clone(),
        context.realm.clone(),
        context.realms.clone(),
        features,
    )))
}

fn feature<C, F>(key: &'static str, spec: Arc<RuntimeSpec>, build: F) -> Feature
where
    C: Component,
    F: Fn(Arc<RuntimeSpec>, &crate::provider::FeatureContext<'_>) -> Arc<C> + Send + Sync + 'static,
{
    Feature::new(key, move |ctx| {
        Ok(build(spec.clone(), ctx) as Arc<dyn Component>)
    })
}

/// Resolve a source to (unit name, content). Only `file://` URLs carry
/// readable content; remote schemes are a compilation error.
fn source_content(source: &ClassSource) -> Result<(String, String)> {
    match source.kind()? {
        SourceKind::Body(body) => Ok((body.name.clone(), body.content.clone())),
        SourceKind::File(path) => {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("script.groovy")
                .to_string();
            Ok((name, std::fs::read_to_string(path)?))
        }
        SourceKind::Url(url) => {
            let path = url.strip_prefix("file://").ok_or_else(|| {
                Error::Compilation(format!("unsupported URL scheme for source '{url}'"))
            })?;
            let name = path.rsplit('/').next().unwrap_or(path).to_string();
            Ok((name, std::fs::read_to_string(path)?))
        }
    }
}

fn resolve_imports(content: &str, loader: &dyn ResourceLoader) -> Result<()> {
    for import in imports_of(content) {
        if loader.load_resource(&import)?.is_none() {
            return Err(Error::Compilation(format!("unresolved import '{import}'")));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ClassFactory

struct FactoryComponent {
    spec: Arc<RuntimeSpec>,
}

impl ClassFactory for FactoryComponent {
    fn create(
        &self,
        source: &ClassSource,
        realm: &Arc<Realm>,
        resources: Option<&dyn ResourceLoader>,
    ) -> Result<LoadedClass> {
        let (unit_name, content) = source_content(source)?;

        let diagnostics = self.spec.interp().check(&content);
        if !diagnostics.is_empty() {
            return Err(Error::Compilation(format!(
                "{unit_name}: {}",
                diagnostics.join("; ")
            )));
        }

        let default_loader;
        let loader: &dyn ResourceLoader = match resources {
            Some(loader) => loader,
            None => {
                default_loader = RealmResourceLoader::new(realm.clone());
                &default_loader
            }
        };
        resolve_imports(&content, loader)?;

        Ok(LoadedClass {
            name: stubgen::script_class_name(&unit_name),
            realm_id: realm.id().to_string(),
            origin: source.name(),
        })
    }
}

impl Component for FactoryComponent {
    fn feature_key(&self) -> &'static str {
        keys::CLASS_FACTORY
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_class_factory(&self) -> Option<&dyn ClassFactory> {
        Some(self)
    }
}

// ---------------------------------------------------------------------------
// ScriptExecutor

struct ExecutorComponent {
    spec: Arc<RuntimeSpec>,
}

impl ScriptExecutor for ExecutorComponent {
    fn execute(&self, source: &ClassSource) -> Result<ExecutionResult> {
        let (unit_name, content) = source_content(source)?;
        tracing::debug!("Executing script '{}'", unit_name);

        let guard = ExitGuard::acquire();
        let outcome = self.spec.interp().eval(&content)?;
        if let Some(code) = outcome.exit {
            tracing::debug!("Script '{}' requested exit {} (intercepted)", unit_name, code);
        }
        drop(guard);

        Ok(outcome.result)
    }
}

impl Component for ExecutorComponent {
    fn feature_key(&self) -> &'static str {
        keys::SCRIPT_EXECUTOR
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_script_executor(&self) -> Option<&dyn ScriptExecutor> {
        Some(self)
    }
}

// ---------------------------------------------------------------------------
// ClassCompiler

struct CompilerComponent {
    spec: Arc<RuntimeSpec>,
    provider_key: String,
    realm: Arc<Realm>,
    realms: Arc<RealmManager>,
    batch: BatchSources,
    extra_classpath: Mutex<Vec<PathBuf>>,
}

impl CompilerComponent {
    fn compile_batch(&self, loader: &dyn ResourceLoader, realm: &Arc<Realm>) -> Result<usize> {
        let target = self.batch.ensure_target_dir()?;
        let mut compiled = 0;

        for unit in self.batch.sources() {
            let content = self.batch.read_unit(&unit)?;
            let diagnostics = self.spec.interp().check(&content);
            if !diagnostics.is_empty() {
                return Err(Error::Compilation(format!(
                    "{}: {}",
                    unit.display_name(),
                    diagnostics.join("; ")
                )));
            }
            resolve_imports(&content, loader)?;

            let name = stubgen::script_class_name(&unit.display_name());
            let class = LoadedClass {
                name: name.clone(),
                realm_id: realm.id().to_string(),
                origin: unit.display_name(),
            };
            let out = target.join(format!("{name}.class"));
            std::fs::write(&out, serde_json::to_vec_pretty(&class)?)?;
            compiled += 1;
        }

        tracing::debug!("Compiled {} class(es) for runtime {}", compiled, self.spec.key);
        Ok(compiled)
    }
}

impl ClassCompiler for CompilerComponent {
    fn add_source(&self, source: &ClassSource) -> Result<()> {
        self.batch.add_source(source)
    }

    fn add_classpath_entry(&self, entry: PathBuf) {
        self.extra_classpath
            .lock()
            .expect("compiler classpath poisoned")
            .push(entry);
    }

    fn set_target_dir(&self, dir: PathBuf) {
        self.batch.set_target_dir(dir);
    }

    fn compile(&self) -> Result<usize> {
        // Target directory exists before anything else happens
        self.batch.ensure_target_dir()?;
        if self.batch.is_empty() {
            tracing::debug!("No sources found to compile");
            return Ok(0);
        }

        let extras = self
            .extra_classpath
            .lock()
            .expect("compiler classpath poisoned")
            .clone();

        if extras.is_empty() {
            let loader = RealmResourceLoader::new(self.realm.clone());
            return self.compile_batch(&loader, &self.realm);
        }

        // Caller-specific classpath lives in a child realm, invisible to
        // sibling components and torn down when the batch ends
        let child = self.realms.create_component_realm(&self.provider_key, extras)?;
        let loader = RealmResourceLoader::new(child.clone());
        let result = self.compile_batch(&loader, &child);
        if let Err(err) = self.realms.release_component_realm(child.id()) {
            tracing::warn!("Failed to release component realm: {}", err);
        }
        result
    }
}

impl Component for CompilerComponent {
    fn feature_key(&self) -> &'static str {
        keys::CLASS_COMPILER
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_class_compiler(&self) -> Option<&dyn ClassCompiler> {
        Some(self)
    }
}

// ---------------------------------------------------------------------------
// StubCompiler

struct StubComponent {
    spec: Arc<RuntimeSpec>,
    batch: BatchSources,
}

impl StubCompiler for StubComponent {
    fn add_source(&self, source: &ClassSource) -> Result<()> {
        self.batch.add_source(source)
    }

    fn set_target_dir(&self, dir: PathBuf) {
        self.batch.set_target_dir(dir);
    }

    fn set_tolerance(&self, tolerance: usize) {
        self.batch.set_tolerance(tolerance);
    }

    fn compile(&self) -> Result<usize> {
        let target = self.batch.ensure_target_dir()?;
        if self.batch.is_empty() {
            tracing::debug!("No sources found to compile");
            return Ok(0);
        }

        let tokens = self.spec.tokens();
        let tolerance = self.batch.tolerance();
        let mut diagnostics: Vec<String> = Vec::new();
        let mut generated = 0;

        for unit in self.batch.sources() {
            let unit_name = unit.display_name();
            let content = self.batch.read_unit(&unit)?;
            let mut model = stubgen::parse_unit(&unit_name, &content, &tokens)?;
            diagnostics.append(&mut model.diagnostics);

            for type_def in &model.types {
                if type_def.kind == TypeKind::Enum && !self.spec.supports_enums {
                    diagnostics.push(format!(
                        "{unit_name}: enum '{}' requires runtime 2.0 or newer",
                        type_def.name
                    ));
                    continue;
                }
                let rel = stubgen::stub_path(&model, type_def);
                let out = target.join(&rel);
                if let Some(parent) = out.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&out, stubgen::render_stub(&model, type_def))?;
                generated += 1;
            }

            if diagnostics.len() > tolerance {
                return Err(Error::Compilation(format!(
                    "stub generation aborted after {} diagnostic(s) (tolerance {}): {}",
                    diagnostics.len(),
                    tolerance,
                    diagnostics.join("; ")
                )));
            }
        }

        if !diagnostics.is_empty() {
            tracing::warn!(
                "Stub generation finished with {} tolerated diagnostic(s)",
                diagnostics.len()
            );
        }
        tracing::debug!("Generated {} stub(s) for runtime {}", generated, self.spec.key);
        Ok(generated)
    }
}

impl Component for StubComponent {
    fn feature_key(&self) -> &'static str {
        keys::STUB_COMPILER
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_stub_compiler(&self) -> Option<&dyn StubCompiler> {
        Some(self)
    }
}

// ---------------------------------------------------------------------------
// Shell and Console

struct ShellComponent {
    spec: Arc<RuntimeSpec>,
    // Session bindings: a def on one line stays visible to later lines
    bindings: Mutex<HashMap<String, String>>,
}

impl ShellComponent {
    fn new(spec: Arc<RuntimeSpec>) -> Self {
        Self {
            spec,
            bindings: Mutex::new(HashMap::new()),
        }
    }

    fn eval_in_session(&self, script: &str) -> Result<super::dialect::EvalOutcome> {
        let mut bindings = self.bindings.lock().expect("shell bindings poisoned");
        self.spec.interp().eval_with(script, &mut bindings)
    }

    fn repl(&self, prompt: &str, input: &mut dyn BufRead, output: &mut dyn Write) -> Result<()> {
        let guard = ExitGuard::acquire();
        let mut line = String::new();
        loop {
            write!(output, "{prompt}")?;
            output.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let script = line.trim();
            if script.is_empty() {
                continue;
            }
            match self.eval_in_session(script) {
                Ok(outcome) => {
                    write!(output, "{}", outcome.result.output)?;
                    if let Some(value) = outcome.result.value {
                        writeln!(output, "===> {value}")?;
                    }
                    if outcome.exit.is_some() {
                        break;
                    }
                }
                Err(err) => writeln!(output, "ERROR: {err}")?,
            }
        }
        let attempts = guard.attempts();
        if !attempts.is_empty() {
            tracing::debug!("Shell session intercepted exit request(s): {:?}", attempts);
        }
        Ok(())
    }
}

impl Shell for ShellComponent {
    fn evaluate(&self, script: &str) -> Result<ExecutionResult> {
        let _guard = ExitGuard::acquire();
        Ok(self.eval_in_session(script)?.result)
    }

    fn run(&self, input: &mut dyn BufRead, output: &mut dyn Write) -> Result<()> {
        self.repl("groovy> ", input, output)
    }
}

impl Component for ShellComponent {
    fn feature_key(&self) -> &'static str {
        keys::SHELL
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_shell(&self) -> Option<&dyn Shell> {
        Some(self)
    }
}

struct ConsoleComponent {
    shell: ShellComponent,
}

impl Console for ConsoleComponent {
    fn banner(&self) -> String {
        format!(
            "Groovy Console (runtime {})\nType 'exit' to leave.",
            self.shell.spec.version
        )
    }

    fn open(&self, input: &mut dyn BufRead, output: &mut dyn Write) -> Result<()> {
        writeln!(output, "{}", self.banner())?;
        self.shell.repl("> ", input, output)
    }
}

impl Component for ConsoleComponent {
    fn feature_key(&self) -> &'static str {
        keys::CONSOLE
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_console(&self) -> Option<&dyn Console> {
        Some(self)
    }
}

// ---------------------------------------------------------------------------
// TraceSanitizer

struct SanitizerComponent {
    spec: Arc<RuntimeSpec>,
}

impl TraceSanitizer for SanitizerComponent {
    fn filter(&self, class_name: &str) -> bool {
        self.spec
            .internal_prefixes
            .iter()
            .any(|prefix| class_name.starts_with(prefix))
    }
}

impl Component for SanitizerComponent {
    fn feature_key(&self) -> &'static str {
        keys::TRACE_SANITIZER
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_trace_sanitizer(&self) -> Option<&dyn TraceSanitizer> {
        Some(self)
    }
}
