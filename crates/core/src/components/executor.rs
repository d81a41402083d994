use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::source::ClassSource;

/// Outcome of evaluating a script: anything it printed plus the value of
/// its last expression
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub output: String,
    pub value: Option<String>,
}

/// Executes a script from any class source
pub trait ScriptExecutor: Send + Sync {
    fn execute(&self, source: &ClassSource) -> Result<ExecutionResult>;
}

/// Line-oriented interactive shell over a runtime.
///
/// Evaluation runs under an exit guard: a script calling `exit` ends the
/// session instead of terminating the host process.
pub trait Shell: Send + Sync {
    /// Evaluate a single chunk of script text
    fn evaluate(&self, script: &str) -> Result<ExecutionResult>;

    /// Read-evaluate-print until EOF or an intercepted exit
    fn run(&self, input: &mut dyn BufRead, output: &mut dyn Write) -> Result<()>;
}

/// Interactive console: a shell with a banner and prompt
pub trait Console: Send + Sync {
    fn banner(&self) -> String;

    fn open(&self, input: &mut dyn BufRead, output: &mut dyn Write) -> Result<()>;
}
