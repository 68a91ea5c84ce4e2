//! Slate: a streaming parser for a restricted, indentation-structured data
//! notation, built for output that arrives one model token at a time.
//!
//! The pipeline maintains a stable, JSON-compatible tree at every byte
//! boundary of the input, so consumers can act on partial output long
//! before generation completes:
//!
//! ```text
//! chunks ──> tokenizer ──> parser (tree + events) ──> IR (serde_json::Value)
//! ```
//!
//! # One-shot parsing
//!
//! ```
//! let result = slate::parse("count: 42\nitems:\n  - a\n  - b\n");
//! assert_eq!(result.value["count"], 42);
//! assert_eq!(result.value["items"][1], "b");
//! ```
//!
//! # Streaming
//!
//! ```
//! use slate::StreamParser;
//!
//! let mut parser = StreamParser::new();
//! parser.on_intent_ready(|kind, payload| {
//!     println!("intent {kind}: {payload}");
//! });
//! parser.write("intent:\n  type: se");
//! parser.write("arch\n  q: rust parsers\n");
//! let result = parser.end();
//! assert_eq!(result.value["intent"]["q"], "rust parsers");
//! ```

pub mod noise;
pub mod render;
mod stream;

use serde_json::{Map, Value};

pub use slate_common::{Diagnostic, ParseOptions, Pos, Severity};
pub use slate_ir::{IrDiagnostic, IrResult, MAX_SAFE_INTEGER, REF_SENTINEL_KEY};
pub use slate_parser::{BlockKind, Event, EventKind, NodeId};
pub use stream::{HandlerId, StreamParser};

/// The complete outcome of parsing one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// The JSON-compatible value. An empty document yields `{}`.
    pub value: Value,
    /// Identifier registry snapshot from the final IR build.
    pub registry: Map<String, Value>,
    /// Reference targets that could not be resolved, in first-seen order.
    pub unresolved_refs: Vec<String>,
    /// Structural diagnostics from tokenizer and parser, in source order.
    pub errors: Vec<Diagnostic>,
    /// Path-addressed diagnostics from the IR build.
    pub ir_errors: Vec<IrDiagnostic>,
}

impl ParseResult {
    /// Whether parsing completed without any diagnostic at all.
    pub fn ok(&self) -> bool {
        self.errors.is_empty() && self.ir_errors.is_empty()
    }
}

/// Parse a complete document with default options.
pub fn parse(input: &str) -> ParseResult {
    parse_with_options(input, ParseOptions::default())
}

/// Parse a complete document.
pub fn parse_with_options(input: &str, options: ParseOptions) -> ParseResult {
    let mut parser = StreamParser::with_options(options);
    parser.write(input);
    parser.end()
}

/// Check a document without caring about its value.
///
/// Returns the offending diagnostics when any reaches the failure
/// threshold: error severity normally, warning and above under
/// `options.strict`. IR diagnostics participate with their path rendered
/// into the context field.
pub fn validate(input: &str, options: ParseOptions) -> Result<(), Vec<Diagnostic>> {
    let strict = options.strict;
    let result = parse_with_options(input, options);
    let threshold = if strict { Severity::Warning } else { Severity::Error };

    let mut failing: Vec<Diagnostic> = result
        .errors
        .into_iter()
        .filter(|d| d.severity >= threshold)
        .collect();
    for ir in &result.ir_errors {
        if ir.severity >= threshold {
            failing.push(
                Diagnostic::error(ir.message.clone(), Pos::start())
                    .with_context(ir.path.join(".")),
            );
        }
    }
    if failing.is_empty() {
        Ok(())
    } else {
        Err(failing)
    }
}
