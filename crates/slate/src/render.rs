//! Terminal rendering of parse diagnostics with ariadne.

use ariadne::{Config, Label, Report, ReportKind, Source};

use slate_common::{Diagnostic, Severity};

/// Render diagnostics against their source as plain (uncolored) text, one
/// report per diagnostic, in order.
pub fn render_diagnostics(source: &str, diagnostics: &[Diagnostic]) -> String {
    let config = Config::default().with_color(false);
    let mut out = String::new();
    for diag in diagnostics {
        let kind = match diag.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
            Severity::Info => ReportKind::Advice,
        };
        // Clamp to a non-empty in-bounds span; ariadne needs at least one
        // character to label.
        let start = (diag.pos.offset as usize).min(source.len().saturating_sub(1));
        let end = (start + 1).min(source.len()).max(start);
        let span = start..end;

        let mut builder = Report::build(kind, span.clone())
            .with_message(&diag.message)
            .with_config(config);
        builder.add_label(Label::new(span).with_message(&diag.message));
        if let Some(context) = &diag.context {
            builder = builder.with_note(context);
        }

        let mut buf = Vec::new();
        if builder.finish().write(Source::from(source), &mut buf).is_ok() {
            out.push_str(&String::from_utf8_lossy(&buf));
        }
    }
    out
}
