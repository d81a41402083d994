use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// One stack frame of a runtime failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceFrame {
    pub class_name: String,
    pub method: String,
    pub location: Option<String>,
}

impl TraceFrame {
    pub fn new(class_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            method: method.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// A captured failure trace with an optional cause chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub message: String,
    pub frames: Vec<TraceFrame>,
    pub cause: Option<Box<Trace>>,
}

impl Trace {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            frames: Vec::new(),
            cause: None,
        }
    }

    pub fn frame(mut self, frame: TraceFrame) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn caused_by(mut self, cause: Trace) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Textual stack dump, `Caused by:` lines included
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, false);
        out
    }

    fn render_into(&self, out: &mut String, nested: bool) {
        if nested {
            let _ = write!(out, "Caused by: ");
        }
        let _ = writeln!(out, "{}", self.message);
        for frame in &self.frames {
            match &frame.location {
                Some(loc) => {
                    let _ = writeln!(out, "    at {}.{}({})", frame.class_name, frame.method, loc);
                }
                None => {
                    let _ = writeln!(out, "    at {}.{}", frame.class_name, frame.method);
                }
            }
        }
        if let Some(cause) = &self.cause {
            cause.render_into(out, true);
        }
    }
}

/// Elides internal runtime scaffolding from user-facing traces.
///
/// `sanitize` never mutates its input; it returns a filtered copy. With
/// `deep` it recurses into the cause chain, otherwise only the top-level
/// frames are filtered.
pub trait TraceSanitizer: Send + Sync {
    /// True when the named class is internal scaffolding to elide
    fn filter(&self, class_name: &str) -> bool;

    fn sanitize(&self, trace: &Trace, deep: bool) -> Trace {
        let mut sanitized = Trace {
            message: trace.message.clone(),
            frames: trace
                .frames
                .iter()
                .filter(|f| !self.filter(&f.class_name))
                .cloned()
                .collect(),
            cause: trace.cause.clone(),
        };
        if deep {
            sanitized.cause = trace
                .cause
                .as_ref()
                .map(|cause| Box::new(self.sanitize(cause, true)));
        }
        sanitized
    }

    /// Sanitize and render in one step
    fn print(&self, trace: &Trace, deep: bool) -> String {
        self.sanitize(trace, deep).render()
    }
}
