use serde::Serialize;

/// The default key under which actionable "intent" subtrees are expected.
pub const DEFAULT_INTENT_KEY: &str = "intent";

/// Tokenizer configuration, fixed at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenizerConfig {
    /// Spaces per indent level. Must be at least 1.
    pub indent_size: u32,
    /// Whether tabs are accepted in indentation without a diagnostic.
    /// A tab always counts as `indent_size` spaces for width either way.
    pub allow_tabs: bool,
    /// Whether comments emit `Comment` tokens or are consumed silently.
    pub preserve_comments: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self { indent_size: 2, allow_tabs: false, preserve_comments: false }
    }
}

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParserConfig {
    /// Root-mapping keys recognised as intent containers. Never empty.
    pub intent_keys: Vec<String>,
    /// Whether optional diagnostics (duplicate keys) are recorded.
    pub strict: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { intent_keys: vec![DEFAULT_INTENT_KEY.to_string()], strict: false }
    }
}

/// Combined options for the streaming facade, flattened across stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseOptions {
    pub indent_size: u32,
    pub allow_tabs: bool,
    pub preserve_comments: bool,
    pub strict: bool,
    pub intent_keys: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            indent_size: 2,
            allow_tabs: false,
            preserve_comments: false,
            strict: false,
            intent_keys: vec![DEFAULT_INTENT_KEY.to_string()],
        }
    }
}

impl ParseOptions {
    /// Set a single intent key, replacing the default.
    pub fn with_intent_key(mut self, key: impl Into<String>) -> Self {
        self.intent_keys = vec![key.into()];
        self
    }

    /// The tokenizer's slice of these options.
    pub fn tokenizer(&self) -> TokenizerConfig {
        TokenizerConfig {
            indent_size: self.indent_size.max(1),
            allow_tabs: self.allow_tabs,
            preserve_comments: self.preserve_comments,
        }
    }

    /// The parser's slice of these options.
    pub fn parser(&self) -> ParserConfig {
        let intent_keys = if self.intent_keys.is_empty() {
            vec![DEFAULT_INTENT_KEY.to_string()]
        } else {
            self.intent_keys.clone()
        };
        ParserConfig { intent_keys, strict: self.strict }
    }
}
