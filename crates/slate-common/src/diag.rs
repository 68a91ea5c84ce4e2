use serde::Serialize;

use crate::pos::Pos;

/// How bad a diagnostic is.
///
/// Slate parsing never aborts: every structural problem is recorded as a
/// [`Diagnostic`] and parsing continues on a best-effort basis. Severity is
/// what downstream policy (e.g. strict validation) keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// A structural diagnostic with location information.
///
/// Carries the position where the problem was detected, a human-readable
/// message, and an optional context string (e.g. the offending key name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    pub pos: Pos,
    pub context: Option<String>,
}

impl Diagnostic {
    /// Create an error-severity diagnostic.
    pub fn error(message: impl Into<String>, pos: Pos) -> Self {
        Self::new(message, Severity::Error, pos)
    }

    /// Create a warning-severity diagnostic.
    pub fn warning(message: impl Into<String>, pos: Pos) -> Self {
        Self::new(message, Severity::Warning, pos)
    }

    /// Create an info-severity diagnostic.
    pub fn info(message: impl Into<String>, pos: Pos) -> Self {
        Self::new(message, Severity::Info, pos)
    }

    fn new(message: impl Into<String>, severity: Severity, pos: Pos) -> Self {
        Self { message: message.into(), severity, pos, context: None }
    }

    /// Attach a context string (offending key, snippet, etc.).
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} at {}", self.severity, self.message, self.pos)?;
        if let Some(context) = &self.context {
            write!(f, " ({context})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_info_warning_error() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn constructors_set_severity() {
        let pos = Pos::new(2, 1, 8);
        assert_eq!(Diagnostic::error("boom", pos).severity, Severity::Error);
        assert_eq!(Diagnostic::warning("hm", pos).severity, Severity::Warning);
        assert_eq!(Diagnostic::info("fyi", pos).severity, Severity::Info);
    }

    #[test]
    fn display_includes_position_and_context() {
        let diag = Diagnostic::warning("tab in indentation", Pos::new(4, 1, 30))
            .with_context("use spaces");
        assert_eq!(diag.to_string(), "warning: tab in indentation at 4:1 (use spaces)");
    }
}
