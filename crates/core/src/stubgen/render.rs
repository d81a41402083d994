use std::fmt::Write as _;

use super::model::{TypeDef, TypeKind, UnitModel};

/// Render one type's Java stub.
///
/// Stubs are deliberately hollow: a downstream Java compiler only needs the
/// names to resolve cross-references, so bodies stay empty.
pub fn render_stub(model: &UnitModel, type_def: &TypeDef) -> String {
    let mut out = String::new();
    if let Some(package) = &model.package {
        let _ = writeln!(out, "package {package};");
        out.push('\n');
    }

    let _ = write!(out, "public {} {}", type_def.kind.keyword(), type_def.name);
    if let Some(parent) = &type_def.extends {
        let _ = write!(out, " extends {parent}");
    } else if type_def.kind == TypeKind::Class {
        let _ = write!(out, " extends groovy.lang.Script");
    }
    out.push_str(" {\n}\n");
    out
}

/// Relative output path for a type's stub, package segments as directories
pub fn stub_path(model: &UnitModel, type_def: &TypeDef) -> String {
    match &model.package {
        Some(package) => format!("{}/{}.java", package.replace('.', "/"), type_def.name),
        None => format!("{}.java", type_def.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(package: Option<&str>) -> UnitModel {
        UnitModel {
            package: package.map(String::from),
            types: vec![],
            diagnostics: vec![],
        }
    }

    #[test]
    fn classes_without_parent_extend_script() {
        let def = TypeDef {
            name: "Widget".into(),
            kind: TypeKind::Class,
            extends: None,
        };
        let stub = render_stub(&model(Some("foo.bar")), &def);
        assert!(stub.starts_with("package foo.bar;\n"));
        assert!(stub.contains("public class Widget extends groovy.lang.Script {"));
    }

    #[test]
    fn interfaces_get_no_implicit_parent() {
        let def = TypeDef {
            name: "Part".into(),
            kind: TypeKind::Interface,
            extends: None,
        };
        let stub = render_stub(&model(None), &def);
        assert_eq!(stub, "public interface Part {\n}\n");
    }

    #[test]
    fn stub_paths_follow_package_segments() {
        let def = TypeDef {
            name: "Widget".into(),
            kind: TypeKind::Class,
            extends: None,
        };
        assert_eq!(stub_path(&model(Some("foo.bar")), &def), "foo/bar/Widget.java");
        assert_eq!(stub_path(&model(None), &def), "Widget.java");
    }
}
