use std::collections::HashMap;

use crate::components::ExecutionResult;
use crate::error::{Error, Result};
use crate::exit_guard;

/// Line-oriented evaluator for the bundled runtimes.
///
/// Statements: `import a.b.C`, `def name = expr`, `println expr`, `exit N`,
/// or a bare expression (its value becomes the script result). Expressions
/// are integer and string literals, variables, and `+` chains. Runtime 2.0
/// additionally interpolates `${name}` inside double-quoted strings.
pub struct Interp {
    pub interpolation: bool,
}

/// Result of an evaluation, including any intercepted exit request
#[derive(Debug)]
pub struct EvalOutcome {
    pub result: ExecutionResult,
    pub exit: Option<i32>,
}

impl Interp {
    pub fn eval(&self, script: &str) -> Result<EvalOutcome> {
        let mut vars = HashMap::new();
        self.eval_with(script, &mut vars)
    }

    /// Evaluate against a caller-owned binding environment.
    ///
    /// Interactive sessions pass the same map for every line, so a `def` on
    /// one line stays visible to the next.
    pub fn eval_with(
        &self,
        script: &str,
        vars: &mut HashMap<String, String>,
    ) -> Result<EvalOutcome> {
        let mut output = String::new();
        let mut value: Option<String> = None;

        for (lineno, raw) in script.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            if let Some(rest) = line.strip_prefix("import ") {
                let path = rest.trim_end_matches(';').trim();
                if !is_import_path(path) {
                    return Err(Error::Compilation(format!(
                        "line {}: malformed import '{path}'",
                        lineno + 1
                    )));
                }
                continue;
            }

            if let Some(rest) = line.strip_prefix("exit") {
                let rest = rest.trim().trim_end_matches(';');
                if rest.is_empty() || rest.chars().all(|c| c.is_ascii_digit() || c == '-') {
                    let code = rest.parse::<i32>().unwrap_or(0);
                    if !exit_guard::request_exit(code) {
                        return Err(Error::Other(format!(
                            "script requested process exit with code {code} outside an exit guard"
                        )));
                    }
                    return Ok(EvalOutcome {
                        result: ExecutionResult { output, value },
                        exit: Some(code),
                    });
                }
            }

            if let Some(rest) = line.strip_prefix("def ") {
                let (name, expr) = rest.split_once('=').ok_or_else(|| {
                    Error::Compilation(format!("line {}: expected '=' in definition", lineno + 1))
                })?;
                let name = name.trim();
                if !is_identifier(name) {
                    return Err(Error::Compilation(format!(
                        "line {}: invalid variable name '{name}'",
                        lineno + 1
                    )));
                }
                let value = self.eval_expr(expr.trim().trim_end_matches(';'), &vars, lineno)?;
                vars.insert(name.to_string(), value);
                continue;
            }

            if let Some(rest) = line.strip_prefix("println") {
                let expr = rest.trim().trim_end_matches(';');
                let printed = if expr.is_empty() {
                    String::new()
                } else {
                    self.eval_expr(expr, &vars, lineno)?
                };
                output.push_str(&printed);
                output.push('\n');
                continue;
            }

            value = Some(self.eval_expr(line.trim_end_matches(';'), &vars, lineno)?);
        }

        Ok(EvalOutcome {
            result: ExecutionResult { output, value },
            exit: None,
        })
    }

    /// Syntax-check a script without executing it
    pub fn check(&self, script: &str) -> Vec<String> {
        let mut diagnostics = Vec::new();
        for (lineno, raw) in script.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            if let Some(rest) = line.strip_prefix("import ") {
                if !is_import_path(rest.trim_end_matches(';').trim()) {
                    diagnostics.push(format!("line {}: malformed import", lineno + 1));
                }
            } else if let Some(rest) = line.strip_prefix("def ") {
                if !rest.contains('=') {
                    diagnostics.push(format!("line {}: expected '=' in definition", lineno + 1));
                }
            } else if self.check_expr_line(line) {
                diagnostics.push(format!("line {}: unparseable statement", lineno + 1));
            }
        }
        diagnostics
    }

    fn check_expr_line(&self, line: &str) -> bool {
        let expr = line
            .strip_prefix("println")
            .unwrap_or(line)
            .trim()
            .trim_end_matches(';');
        if expr.is_empty() {
            return false;
        }
        expr.split(" + ").any(|term| {
            let term = term.trim();
            !(is_quoted(term) || term.parse::<i64>().is_ok() || is_identifier(term)
                || term == "exit"
                || term.starts_with("exit "))
        })
    }

    fn eval_expr(
        &self,
        expr: &str,
        vars: &HashMap<String, String>,
        lineno: usize,
    ) -> Result<String> {
        let terms: Vec<String> = expr
            .split(" + ")
            .map(|term| self.eval_term(term.trim(), vars, lineno))
            .collect::<Result<_>>()?;

        // Numeric addition when every term is an integer, otherwise concat
        if terms.len() > 1 && terms.iter().all(|t| t.parse::<i64>().is_ok()) {
            let sum: i64 = terms.iter().map(|t| t.parse::<i64>().unwrap_or(0)).sum();
            return Ok(sum.to_string());
        }
        Ok(terms.concat())
    }

    fn eval_term(
        &self,
        term: &str,
        vars: &HashMap<String, String>,
        lineno: usize,
    ) -> Result<String> {
        if let Some(inner) = term.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
            return Ok(inner.to_string());
        }
        if let Some(inner) = term.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
            return if self.interpolation {
                self.interpolate(inner, vars, lineno)
            } else {
                Ok(inner.to_string())
            };
        }
        if term.parse::<i64>().is_ok() {
            return Ok(term.to_string());
        }
        if is_identifier(term) {
            return vars.get(term).cloned().ok_or_else(|| {
                Error::Compilation(format!("line {}: unknown variable '{term}'", lineno + 1))
            });
        }
        Err(Error::Compilation(format!(
            "line {}: unparseable expression '{term}'",
            lineno + 1
        )))
    }

    fn interpolate(
        &self,
        text: &str,
        vars: &HashMap<String, String>,
        lineno: usize,
    ) -> Result<String> {
        let mut out = String::new();
        let mut rest = text;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find('}').ok_or_else(|| {
                Error::Compilation(format!("line {}: unterminated interpolation", lineno + 1))
            })?;
            let name = &after[..end];
            let value = vars.get(name).ok_or_else(|| {
                Error::Compilation(format!("line {}: unknown variable '{name}'", lineno + 1))
            })?;
            out.push_str(value);
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Import paths declared at the top of a script
pub fn imports_of(script: &str) -> Vec<String> {
    script
        .lines()
        .filter_map(|line| line.trim().strip_prefix("import "))
        .map(|rest| rest.trim_end_matches(';').trim().to_string())
        .collect()
}

fn is_quoted(s: &str) -> bool {
    s.len() >= 2
        && ((s.starts_with('\'') && s.ends_with('\''))
            || (s.starts_with('"') && s.ends_with('"')))
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn is_import_path(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_guard::ExitGuard;

    fn interp(interpolation: bool) -> Interp {
        Interp { interpolation }
    }

    #[test]
    fn prints_and_returns_last_value() {
        let outcome = interp(false)
            .eval("println 'hello'\ndef x = 20\nx + 22\n")
            .unwrap();
        assert_eq!(outcome.result.output, "hello\n");
        assert_eq!(outcome.result.value.as_deref(), Some("42"));
        assert!(outcome.exit.is_none());
    }

    #[test]
    fn string_concat_beats_numeric_add_when_mixed() {
        let outcome = interp(false).eval("def n = 3\n'count: ' + n\n").unwrap();
        assert_eq!(outcome.result.value.as_deref(), Some("count: 3"));
    }

    #[test]
    fn interpolation_is_version_gated() {
        let script = "def name = 'world'\n\"hello ${name}\"\n";
        let modern = interp(true).eval(script).unwrap();
        assert_eq!(modern.result.value.as_deref(), Some("hello world"));

        let legacy = interp(false).eval(script).unwrap();
        assert_eq!(legacy.result.value.as_deref(), Some("hello ${name}"));
    }

    #[test]
    fn bindings_persist_across_evaluations() {
        let interp = interp(false);
        let mut vars = HashMap::new();
        interp.eval_with("def x = 41\n", &mut vars).unwrap();
        let outcome = interp.eval_with("x + 1\n", &mut vars).unwrap();
        assert_eq!(outcome.result.value.as_deref(), Some("42"));
    }

    #[test]
    fn unknown_variable_is_a_compilation_error() {
        assert!(matches!(
            interp(false).eval("println missing\n"),
            Err(Error::Compilation(_))
        ));
    }

    #[test]
    fn exit_is_intercepted_under_a_guard() {
        let _serial = crate::exit_guard::TEST_MUTEX
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let _guard = ExitGuard::acquire();
        let outcome = interp(false).eval("println 'bye'\nexit 7\n").unwrap();
        assert_eq!(outcome.exit, Some(7));
        assert_eq!(outcome.result.output, "bye\n");
    }

    #[test]
    fn check_reports_without_executing() {
        let diagnostics = interp(false).check("def x\nprintln 'ok'\n???\n");
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn imports_are_collected() {
        assert_eq!(
            imports_of("import foo.Bar;\nimport baz.Qux\nprintln 'x'\n"),
            vec!["foo.Bar".to_string(), "baz.Qux".to_string()]
        );
    }
}
