use serde::Serialize;

use crate::pos::Pos;

/// A token produced by the Slate tokenizer.
///
/// `indent` is the indent *level* of the token's line, in units of the
/// configured indent size. Tokens following a `-` on the same line carry the
/// dash's level plus one, because the dash opens one nesting unit inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Textual payload. Empty for purely structural tokens
    /// (`Colon`, `Dash`, `Indent`, `Dedent`, `Newline`, `Eof`).
    pub text: String,
    pub pos: Pos,
    pub indent: u32,
}

impl Token {
    /// Create a token with a textual payload.
    pub fn new(kind: TokenKind, text: impl Into<String>, pos: Pos, indent: u32) -> Self {
        Self { kind, text: text.into(), pos, indent }
    }

    /// Create a structural token with no payload.
    pub fn structural(kind: TokenKind, pos: Pos, indent: u32) -> Self {
        Self { kind, text: String::new(), pos, indent }
    }
}

/// Every kind of token in the Slate notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// A mapping key: a bareword terminated by a `: ` separator.
    Key,
    /// The `:` mapping separator.
    Colon,
    /// A `- ` sequence-item marker.
    Dash,
    /// An unquoted scalar (barewords, block scalars, inline flow spans).
    Scalar,
    /// A quoted scalar. Quoting is preserved so coercion can be bypassed.
    Quoted,
    /// The line's indent level rose by one stack entry.
    Indent,
    /// The line's indent level dropped to the carried target level.
    Dedent,
    /// End of a line (also emitted for blank and comment-only lines).
    Newline,
    /// A `# ...` comment, emitted only when comment preservation is on.
    Comment,
    /// End of input, emitted exactly once by `finalize`.
    Eof,
}
