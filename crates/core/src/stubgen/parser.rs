use crate::error::Result;

use super::model::{TypeDef, TypeKind, UnitModel};
use super::tokens::DynamicTokens;

/// Extract the stub-relevant skeleton of a script unit.
///
/// This deliberately stops at the declaration level: packages, top-level
/// type declarations, and their `extends` clause. Bodies are never parsed.
/// A unit with no type declaration at all is a script; it is modeled as a
/// single class named after the unit.
pub fn parse_unit(unit_name: &str, content: &str, tokens: &DynamicTokens) -> Result<UnitModel> {
    let class_kw = tokens.value("CLASS")?;
    let interface_kw = tokens.value("INTERFACE")?;
    let enum_kw = tokens.value("ENUM")?;

    let mut model = UnitModel::default();

    for (lineno, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if let Some(rest) = line.strip_prefix("package ") {
            let package = rest.trim_end_matches(';').trim();
            if package.is_empty() || !package.split('.').all(is_identifier) {
                model
                    .diagnostics
                    .push(format!("{unit_name}:{}: malformed package declaration", lineno + 1));
            } else {
                model.package = Some(package.to_string());
            }
            continue;
        }

        let kind_code = if line.starts_with("class ") || line.contains(" class ") {
            Some(class_kw)
        } else if line.starts_with("interface ") || line.contains(" interface ") {
            Some(interface_kw)
        } else if line.starts_with("enum ") || line.contains(" enum ") {
            Some(enum_kw)
        } else {
            None
        };

        let Some(code) = kind_code else { continue };
        let keyword = tokens.name(code)?.to_ascii_lowercase();
        let kind = match keyword.as_str() {
            "interface" => TypeKind::Interface,
            "enum" => TypeKind::Enum,
            _ => TypeKind::Class,
        };

        match parse_declaration(line, &keyword) {
            Some((name, extends)) => model.types.push(TypeDef { name, kind, extends }),
            None => model.diagnostics.push(format!(
                "{unit_name}:{}: malformed {keyword} declaration",
                lineno + 1
            )),
        }
    }

    if model.types.is_empty() && model.diagnostics.is_empty() {
        // Script without declarations compiles to a class named after it
        model.types.push(TypeDef {
            name: script_class_name(unit_name),
            kind: TypeKind::Class,
            extends: None,
        });
    }

    Ok(model)
}

fn parse_declaration(line: &str, keyword: &str) -> Option<(String, Option<String>)> {
    let after = line.split_once(&format!("{keyword} "))?.1;
    let mut words = after.split_whitespace();
    let name = words.next()?.trim_end_matches('{').trim_end_matches(';');
    if !is_identifier(name) {
        return None;
    }
    let mut extends = None;
    let rest: Vec<&str> = words.collect();
    if let Some(pos) = rest.iter().position(|w| *w == "extends") {
        let parent = rest.get(pos + 1)?.trim_end_matches('{');
        if !is_identifier_path(parent) {
            return None;
        }
        extends = Some(parent.to_string());
    }
    Some((name.to_string(), extends))
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn is_identifier_path(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_identifier)
}

/// Derive the implicit class name of a declaration-less script
pub fn script_class_name(unit_name: &str) -> String {
    let stem = unit_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(unit_name)
        .trim_end_matches(".groovy");
    let mut name: String = stem
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if name.chars().next().is_none_or(|c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> DynamicTokens {
        DynamicTokens::new(&[("EOF", 1), ("CLASS", 3), ("INTERFACE", 4), ("ENUM", 5)])
    }

    #[test]
    fn extracts_package_and_types() {
        let content = "package foo.bar\n\nclass Widget extends Base {\n}\ninterface Part {\n}\n";
        let model = parse_unit("Widget.groovy", content, &tokens()).unwrap();
        assert_eq!(model.package.as_deref(), Some("foo.bar"));
        assert_eq!(model.types.len(), 2);
        assert_eq!(model.types[0].name, "Widget");
        assert_eq!(model.types[0].extends.as_deref(), Some("Base"));
        assert_eq!(model.types[1].kind, TypeKind::Interface);
        assert!(model.diagnostics.is_empty());
    }

    #[test]
    fn scripts_synthesize_a_class() {
        let model = parse_unit("my-script.groovy", "println 'hi'\n", &tokens()).unwrap();
        assert_eq!(model.types.len(), 1);
        assert_eq!(model.types[0].name, "my_script");
    }

    #[test]
    fn malformed_declarations_become_diagnostics() {
        let content = "class {\npackage 1bad.pkg\nenum Color {\n}\n";
        let model = parse_unit("Bad.groovy", content, &tokens()).unwrap();
        assert_eq!(model.diagnostics.len(), 2);
        assert_eq!(model.types.len(), 1);
        assert_eq!(model.types[0].kind, TypeKind::Enum);
    }

    #[test]
    fn missing_token_constant_is_an_error() {
        let incomplete = DynamicTokens::new(&[("EOF", 1)]);
        assert!(parse_unit("X.groovy", "class X {}", &incomplete).is_err());
    }
}
