use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Language of a compilation unit, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    Groovy,
    Java,
}

impl SourceType {
    pub fn for_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::Other(format!("no file extension on '{}'", path.display())))?;
        Self::for_extension(ext)
    }

    pub fn for_url(url: &str) -> Result<Self> {
        let ext = url
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .ok_or_else(|| Error::Other(format!("no file extension on '{url}'")))?;
        Self::for_extension(ext)
    }

    fn for_extension(ext: &str) -> Result<Self> {
        if ext.eq_ignore_ascii_case("groovy") {
            Ok(SourceType::Groovy)
        } else if ext.eq_ignore_ascii_case("java") {
            Ok(SourceType::Java)
        } else {
            Err(Error::Other(format!("unsupported source extension '{ext}'")))
        }
    }
}

/// Kind of a top-level type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
}

impl TypeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
        }
    }
}

/// A top-level type found in a script unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeKind,
    pub extends: Option<String>,
}

/// Parsed skeleton of one script unit: just enough structure to render a
/// Java stub, nothing more
#[derive(Debug, Clone, Default)]
pub struct UnitModel {
    pub package: Option<String>,
    pub types: Vec<TypeDef>,
    pub diagnostics: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn classifies_extensions_case_insensitively() {
        assert_eq!(SourceType::for_url("file:///a/b.groovy").unwrap(), SourceType::Groovy);
        assert_eq!(SourceType::for_url("file:///a/b.GrooVY").unwrap(), SourceType::Groovy);
        assert_eq!(SourceType::for_url("https://x/y.java").unwrap(), SourceType::Java);
        assert_eq!(SourceType::for_url("https://x/y.jaVA").unwrap(), SourceType::Java);
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(SourceType::for_url("file:///a/b.scala").is_err());
        assert!(SourceType::for_url("no-extension").is_err());
        assert!(SourceType::for_path(&PathBuf::from("/a/Makefile")).is_err());
    }

    #[test]
    fn path_classification_matches_url_classification() {
        assert_eq!(
            SourceType::for_path(&PathBuf::from("/src/Foo.Groovy")).unwrap(),
            SourceType::Groovy
        );
    }
}
