use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Codebase assigned to inline script bodies
pub const BODY_CODEBASE: &str = "/groovy/script";

/// An inline script body with a logical name and codebase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub name: String,
    pub codebase: String,
    pub content: String,
}

impl PartialEq for Body {
    // Auto-generated names are timestamp-seeded, so equality is structural
    // over codebase and content only
    fn eq(&self, other: &Self) -> bool {
        self.codebase == other.codebase && self.content == other.content
    }
}

impl Eq for Body {}

/// Describes where a script class comes from: a URL, a file on disk, or an
/// inline body.
///
/// Exactly one variant must be populated. This is checked when the source is
/// used (via [`ClassSource::kind`]), not at construction, so partially built
/// or conflicting sources fail fast at the point of compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSource {
    pub url: Option<String>,
    pub file: Option<PathBuf>,
    pub body: Option<Body>,
}

/// Borrowed view of the single populated variant of a [`ClassSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind<'a> {
    Url(&'a str),
    File(&'a Path),
    Body(&'a Body),
}

impl ClassSource {
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn for_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn for_body(content: impl Into<String>) -> Self {
        // The timestamp alone can collide within one millisecond; the
        // process-wide serial keeps every generated name distinct
        static BODY_SERIAL: AtomicU64 = AtomicU64::new(0);
        let serial = BODY_SERIAL.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self {
            body: Some(Body {
                name: format!("script{millis}-{serial}.groovy"),
                codebase: BODY_CODEBASE.to_string(),
                content: content.into(),
            }),
            ..Default::default()
        }
    }

    /// Classify a free-form string into a source.
    ///
    /// The string is trimmed, then tried in order: absolute URL, existing
    /// file path, inline script body.
    pub fn for_value(value: &str) -> Self {
        let value = value.trim();

        if is_absolute_url(value) {
            return Self::for_url(value);
        }

        let path = Path::new(value);
        if path.exists() {
            return Self::for_file(path);
        }

        Self::for_body(value)
    }

    /// Resolve the populated variant, failing when zero or more than one
    /// variant is set.
    pub fn kind(&self) -> Result<SourceKind<'_>> {
        match (&self.url, &self.file, &self.body) {
            (Some(url), None, None) => Ok(SourceKind::Url(url)),
            (None, Some(file), None) => Ok(SourceKind::File(file)),
            (None, None, Some(body)) => Ok(SourceKind::Body(body)),
            _ => {
                let populated = usize::from(self.url.is_some())
                    + usize::from(self.file.is_some())
                    + usize::from(self.body.is_some());
                Err(Error::InvalidSource(format!(
                    "expected exactly one of url/file/body to be set, found {populated}"
                )))
            }
        }
    }

    /// Logical name of the source, for diagnostics
    pub fn name(&self) -> String {
        match self.kind() {
            Ok(SourceKind::Url(url)) => url.to_string(),
            Ok(SourceKind::File(path)) => path.display().to_string(),
            Ok(SourceKind::Body(body)) => body.name.clone(),
            Err(_) => "<invalid source>".to_string(),
        }
    }
}

impl fmt::Display for ClassSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// True when the string looks like an absolute URL (scheme followed by `://`)
fn is_absolute_url(value: &str) -> bool {
    match value.split_once("://") {
        Some((scheme, rest)) => {
            !rest.is_empty()
                && !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
                && scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn classifies_absolute_urls() {
        let source = ClassSource::for_value("  https://example.com/foo.groovy ");
        assert_eq!(source.url.as_deref(), Some("https://example.com/foo.groovy"));
        assert!(source.file.is_none());
        assert!(source.body.is_none());
    }

    #[test]
    fn classifies_existing_files() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "println 'hi'").unwrap();
        let path = tmp.path().to_str().unwrap().to_string();

        let source = ClassSource::for_value(&format!(" {path} "));
        assert_eq!(source.file.as_deref(), Some(Path::new(&path)));
        assert!(source.url.is_none());
        assert!(source.body.is_none());
    }

    #[test]
    fn falls_back_to_inline_body() {
        let source = ClassSource::for_value("println 'hello'");
        let body = source.body.as_ref().unwrap();
        assert!(body.name.starts_with("script"));
        assert!(body.name.ends_with(".groovy"));
        assert_eq!(body.codebase, BODY_CODEBASE);
        assert_eq!(body.content, "println 'hello'");
    }

    #[test]
    fn inline_bodies_are_structurally_equal_with_distinct_names() {
        // Back-to-back classifications land in the same millisecond; names
        // must still differ
        let a = ClassSource::for_value("1 + 1");
        let b = ClassSource::for_value("1 + 1");
        let (a, b) = (a.body.unwrap(), b.body.unwrap());
        assert_ne!(a.name, b.name);
        assert_eq!(a, b);
    }

    #[test]
    fn kind_rejects_empty_and_conflicting_sources() {
        assert!(ClassSource::default().kind().is_err());

        let mut conflicting = ClassSource::for_url("https://example.com/a.groovy");
        conflicting.file = Some(PathBuf::from("/tmp/a.groovy"));
        assert!(conflicting.kind().is_err());
    }

    #[test]
    fn kind_resolves_single_variant() {
        let source = ClassSource::for_file("/tmp/a.groovy");
        assert!(matches!(source.kind().unwrap(), SourceKind::File(_)));
    }

    #[test]
    fn windows_style_paths_are_not_urls() {
        assert!(!is_absolute_url("C:\\scripts\\foo.groovy"));
        assert!(!is_absolute_url("://missing-scheme"));
        assert!(is_absolute_url("file:///tmp/foo.groovy"));
    }
}
