use serde::Serialize;

/// A position in the input stream.
///
/// Line and column are 1-based; `column` counts characters, not bytes.
/// `offset` is the 0-based byte offset into the logical input (the
/// concatenation of every chunk written so far).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Pos {
    /// Create a position from its parts.
    pub fn new(line: u32, column: u32, offset: u32) -> Self {
        Self { line, column, offset }
    }

    /// The position of the very first character of a stream.
    pub fn start() -> Self {
        Self { line: 1, column: 1, offset: 0 }
    }
}

impl Default for Pos {
    fn default() -> Self {
        Self::start()
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
