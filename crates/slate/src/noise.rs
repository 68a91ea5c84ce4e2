//! Noise stripping for raw LLM responses.
//!
//! Models wrap structured output in prose and markdown fences. [`strip`]
//! recovers the Slate payload: the first fenced code block tagged `yaml`,
//! `yml`, `slate`, or nothing wins; otherwise the text is trimmed to the
//! span between the first and last line that look structural (a `key:` or
//! a `- ` item).

use std::sync::LazyLock;

use regex::Regex;

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:yaml|yml|slate)?[ \t]*\n(.*?)```").expect("fence pattern is valid")
});

static STRUCTURAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:-\s+\S|-\s*$|[^#\s][^:]*:(?:\s|$))").expect("line pattern is valid")
});

/// Extract the Slate payload from a raw response.
///
/// Returns a subslice of the input; no allocation happens. Input with no
/// fence and no structural-looking lines passes through trimmed.
pub fn strip(text: &str) -> &str {
    if let Some(captures) = FENCE_RE.captures(text) {
        if let Some(inner) = captures.get(1) {
            return inner.as_str().trim();
        }
    }

    let mut start = None;
    let mut end = None;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        if STRUCTURAL_RE.is_match(content) {
            if start.is_none() {
                start = Some(offset);
            }
            end = Some(offset + line.len());
        }
        offset += line.len();
    }
    match (start, end) {
        (Some(start), Some(end)) => text[start..end].trim(),
        _ => text.trim(),
    }
}
