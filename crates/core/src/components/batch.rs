use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::source::{ClassSource, SourceKind};

/// A single compilation unit: a URL or a file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceUnit {
    Url(String),
    File(PathBuf),
}

impl SourceUnit {
    pub fn display_name(&self) -> String {
        match self {
            SourceUnit::Url(url) => url.clone(),
            SourceUnit::File(path) => path.display().to_string(),
        }
    }

    /// Local path of the unit's content, when it has one
    pub fn local_path(&self) -> Option<PathBuf> {
        match self {
            SourceUnit::File(path) => Some(path.clone()),
            SourceUnit::Url(url) => url
                .strip_prefix("file://")
                .map(PathBuf::from),
        }
    }
}

/// Shared state for batch compilers: accumulated sources (insertion-ordered,
/// deduplicated), the target directory, and the diagnostic tolerance.
///
/// Interior mutability because compiler components are cached and shared by
/// their provider.
#[derive(Debug, Default)]
pub struct BatchSources {
    sources: Mutex<Vec<SourceUnit>>,
    target_dir: Mutex<Option<PathBuf>>,
    tolerance: Mutex<usize>,
}

impl BatchSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl Into<PathBuf>) {
        self.push(SourceUnit::File(path.into()));
    }

    pub fn add_url(&self, url: impl Into<String>) {
        self.push(SourceUnit::Url(url.into()));
    }

    /// Accumulate a class source; inline bodies are not batchable
    pub fn add_source(&self, source: &ClassSource) -> Result<()> {
        match source.kind()? {
            SourceKind::Url(url) => self.add_url(url),
            SourceKind::File(path) => self.add_file(path),
            SourceKind::Body(_) => {
                return Err(Error::InvalidSource(
                    "batch compilation accepts URL and file sources only".into(),
                ));
            }
        }
        Ok(())
    }

    fn push(&self, unit: SourceUnit) {
        let mut sources = self.sources.lock().expect("batch sources poisoned");
        if !sources.contains(&unit) {
            sources.push(unit);
        }
    }

    pub fn sources(&self) -> Vec<SourceUnit> {
        self.sources.lock().expect("batch sources poisoned").clone()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.lock().expect("batch sources poisoned").is_empty()
    }

    pub fn clear(&self) {
        self.sources.lock().expect("batch sources poisoned").clear();
    }

    pub fn set_target_dir(&self, dir: impl Into<PathBuf>) {
        *self.target_dir.lock().expect("batch sources poisoned") = Some(dir.into());
    }

    pub fn target_dir(&self) -> Result<PathBuf> {
        self.target_dir
            .lock()
            .expect("batch sources poisoned")
            .clone()
            .ok_or_else(|| Error::Other("no target directory configured".into()))
    }

    /// Create the target directory eagerly and return it
    pub fn ensure_target_dir(&self) -> Result<PathBuf> {
        let dir = self.target_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn set_tolerance(&self, tolerance: usize) {
        *self.tolerance.lock().expect("batch sources poisoned") = tolerance;
    }

    pub fn tolerance(&self) -> usize {
        *self.tolerance.lock().expect("batch sources poisoned")
    }

    /// Read a unit's content from disk
    pub fn read_unit(&self, unit: &SourceUnit) -> Result<String> {
        let path = unit.local_path().ok_or_else(|| {
            Error::Compilation(format!("cannot read remote source '{}'", unit.display_name()))
        })?;
        Ok(std::fs::read_to_string(&path)?)
    }
}
