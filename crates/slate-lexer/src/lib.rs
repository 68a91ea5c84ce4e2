//! Incremental tokenizer for the Slate data notation.
//!
//! The tokenizer consumes an append-only character buffer and produces a
//! token stream that is safe to drain between arbitrary chunk boundaries:
//! a token that *might* continue past the end of the buffer is withheld --
//! the scan position rewinds to the token start and [`Tokenizer::next_token`]
//! returns `None` until more input arrives or [`Tokenizer::finalize`] lifts
//! the restriction.
//!
//! Indentation is significant. At each content line the tokenizer measures
//! leading whitespace, converts it to a level (`width / indent_size`), and
//! emits `Indent`/`Dedent` tokens against an indent stack. Blank and
//! comment-only lines leave the stack untouched.
//!
//! The tokenizer never fails: malformed runs degrade into scalars, and
//! anything noteworthy (tabs in indentation, unterminated quotes,
//! inconsistent dedents) is recorded as a [`Diagnostic`].

mod cursor;

use std::collections::VecDeque;

use cursor::Cursor;
use slate_common::{Diagnostic, Pos, Token, TokenKind, TokenizerConfig};

/// Outcome of one lexing step.
enum Step {
    /// One or more tokens were queued.
    Produced,
    /// The buffer ends inside a token; the position was rewound.
    NeedMore,
    /// Input was consumed without queueing anything (skipped comment).
    Continue,
}

/// The Slate tokenizer. See the crate docs for the streaming contract.
#[derive(Debug)]
pub struct Tokenizer {
    config: TokenizerConfig,
    cursor: Cursor,
    pending: VecDeque<Token>,
    /// Open indent levels. The bottom entry is always 0 and never popped.
    indent_stack: Vec<u32>,
    at_line_start: bool,
    /// Indent level carried on this line's tokens. Bumped by one per `Dash`
    /// so that inline nested content sits one level deeper.
    line_indent: u32,
    /// Whether the next token sits in value position (after `:` or `- `),
    /// which is where block scalars are recognised.
    at_value: bool,
    finishing: bool,
    done: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            config,
            cursor: Cursor::new(),
            pending: VecDeque::new(),
            indent_stack: vec![0],
            at_line_start: true,
            line_indent: 0,
            at_value: false,
            finishing: false,
            done: false,
            diagnostics: Vec::new(),
        }
    }

    /// Append a chunk to the buffer. Never scans the chunk contents.
    pub fn write(&mut self, chunk: &str) {
        self.cursor.push(chunk);
    }

    /// The accumulated input, for diagnostics rendering.
    pub fn source(&self) -> &str {
        self.cursor.source()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain the diagnostics recorded so far.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Produce the next token, or `None` when the remaining buffer cannot
    /// yield a complete token without more input (or, after finalization,
    /// when the stream is exhausted).
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            if let Some(tok) = self.pending.pop_front() {
                return Some(tok);
            }
            if self.done {
                return None;
            }
            let step = if self.at_line_start { self.lex_line_start() } else { self.lex_content() };
            match step {
                Step::Produced | Step::Continue => continue,
                Step::NeedMore => return None,
            }
        }
    }

    /// Enter the terminal drain phase: partial tokens at the tail are now
    /// allowed to resolve, open indent levels are closed with synthetic
    /// `Dedent`s, and a single `Eof` ends the stream.
    pub fn finalize(&mut self) -> Vec<Token> {
        self.finishing = true;
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token() {
            tokens.push(tok);
        }
        tokens
    }

    /// Drop the buffer and rebuild the initial state. Configuration is kept.
    pub fn reset(&mut self) {
        *self = Tokenizer::new(self.config.clone());
    }

    /// Convenience: tokenize a complete source in one go.
    pub fn tokenize(source: &str, config: TokenizerConfig) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokenizer = Tokenizer::new(config);
        tokenizer.write(source);
        let tokens = tokenizer.finalize();
        (tokens, tokenizer.take_diagnostics())
    }

    fn current_level(&self) -> u32 {
        *self.indent_stack.last().unwrap_or(&0)
    }

    fn queue(&mut self, token: Token) {
        self.at_value = matches!(token.kind, TokenKind::Colon | TokenKind::Dash);
        self.pending.push_back(token);
    }

    /// Close all open indent levels and end the stream. Only reachable while
    /// finalizing.
    fn queue_closers(&mut self) {
        let pos = self.cursor.position();
        while self.current_level() > 0 {
            self.indent_stack.pop();
            let target = self.current_level();
            self.pending.push_back(Token::structural(TokenKind::Dedent, pos, target));
        }
        self.pending.push_back(Token::structural(TokenKind::Eof, pos, 0));
        self.done = true;
    }

    // ── Line starts ────────────────────────────────────────────────────

    /// Measure leading whitespace and update the indent stack. Blank and
    /// comment-only lines are consumed here without touching the stack.
    fn lex_line_start(&mut self) -> Step {
        let cp = self.cursor.checkpoint();
        let mut width = 0u32;
        let mut tab_seen = false;
        loop {
            match self.cursor.peek() {
                Some(' ') => {
                    self.cursor.advance();
                    width += 1;
                }
                Some('\t') => {
                    self.cursor.advance();
                    width += self.config.indent_size;
                    tab_seen = true;
                }
                Some('\n') | Some('\r') => return self.lex_line_end_at_start(cp),
                Some('#') => return self.lex_comment_line(cp),
                Some(_) => break,
                None => {
                    if self.finishing {
                        // Whitespace-only tail; nothing left but the closers.
                        self.queue_closers();
                        return Step::Produced;
                    }
                    self.cursor.rewind(cp);
                    return Step::NeedMore;
                }
            }
        }

        if tab_seen && !self.config.allow_tabs {
            self.diagnostics.push(Diagnostic::warning("tab in indentation", self.cursor.position()));
        }

        let level = width / self.config.indent_size;
        let current = self.current_level();
        let pos = self.cursor.position();
        if level > current {
            self.indent_stack.push(level);
            self.pending.push_back(Token::structural(TokenKind::Indent, pos, level));
        } else if level < current {
            while self.current_level() > level {
                self.indent_stack.pop();
                let target = self.current_level();
                self.pending.push_back(Token::structural(TokenKind::Dedent, pos, target));
            }
            if self.current_level() != level {
                self.diagnostics.push(Diagnostic::warning("inconsistent indentation", pos));
            }
        }
        self.line_indent = self.current_level();
        self.at_line_start = false;
        self.at_value = false;
        if self.pending.is_empty() { Step::Continue } else { Step::Produced }
    }

    /// A blank line: consume its terminator and emit a `Newline` without
    /// leaving line-start state.
    fn lex_line_end_at_start(&mut self, cp: cursor::Checkpoint) -> Step {
        let pos = self.cursor.position();
        if self.cursor.peek() == Some('\r') {
            match self.cursor.peek_second() {
                Some('\n') => {
                    self.cursor.advance();
                }
                None if !self.finishing => {
                    self.cursor.rewind(cp);
                    return Step::NeedMore;
                }
                _ => {}
            }
        }
        self.cursor.advance();
        self.pending.push_back(Token::structural(TokenKind::Newline, pos, self.current_level()));
        Step::Produced
    }

    /// A comment-only line: consume the comment (emitting it if configured),
    /// then let the line terminator through as a normal `Newline`. The
    /// indent stack is left untouched and line-start state is kept.
    fn lex_comment_line(&mut self, cp: cursor::Checkpoint) -> Step {
        let start = self.cursor.position();
        let comment_start = self.cursor.offset();
        loop {
            match self.cursor.peek() {
                Some('\n') => break,
                Some(_) => {
                    self.cursor.advance();
                }
                None => {
                    if self.finishing {
                        break;
                    }
                    self.cursor.rewind(cp);
                    return Step::NeedMore;
                }
            }
        }
        let mut produced = false;
        if self.config.preserve_comments {
            let raw = self.cursor.slice(comment_start, self.cursor.offset());
            let text = raw.trim_start_matches('#').trim().to_string();
            self.pending.push_back(Token::new(TokenKind::Comment, text, start, self.current_level()));
            produced = true;
        }
        if self.cursor.peek() == Some('\n') {
            let pos = self.cursor.position();
            self.cursor.advance();
            self.pending.push_back(Token::structural(TokenKind::Newline, pos, self.current_level()));
            produced = true;
        }
        if produced { Step::Produced } else { Step::Continue }
    }

    // ── Content tokens ─────────────────────────────────────────────────

    fn lex_content(&mut self) -> Step {
        // Inline whitespace separates tokens and is never part of one.
        while matches!(self.cursor.peek(), Some(' ') | Some('\t')) {
            self.cursor.advance();
        }

        let Some(c) = self.cursor.peek() else {
            if self.finishing {
                self.queue_closers();
                return Step::Produced;
            }
            return Step::NeedMore;
        };

        match c {
            '\n' | '\r' => self.lex_newline(),
            '#' => self.lex_inline_comment(),
            ':' => self.lex_colon(),
            '-' => self.lex_dash(),
            '"' | '\'' => self.lex_quoted(),
            '|' if self.at_value => self.lex_block_scalar(),
            '{' | '[' => self.lex_flow(),
            _ => self.lex_bareword(),
        }
    }

    fn lex_newline(&mut self) -> Step {
        let cp = self.cursor.checkpoint();
        let pos = self.cursor.position();
        if self.cursor.peek() == Some('\r') {
            match self.cursor.peek_second() {
                Some('\n') => {
                    self.cursor.advance();
                }
                None if !self.finishing => {
                    self.cursor.rewind(cp);
                    return Step::NeedMore;
                }
                _ => {}
            }
        }
        self.cursor.advance();
        self.queue(Token::structural(TokenKind::Newline, pos, self.line_indent));
        self.at_line_start = true;
        Step::Produced
    }

    fn lex_inline_comment(&mut self) -> Step {
        let cp = self.cursor.checkpoint();
        let start = self.cursor.position();
        let comment_start = self.cursor.offset();
        loop {
            match self.cursor.peek() {
                Some('\n') | Some('\r') => break,
                Some(_) => {
                    self.cursor.advance();
                }
                None => {
                    if self.finishing {
                        break;
                    }
                    self.cursor.rewind(cp);
                    return Step::NeedMore;
                }
            }
        }
        if self.config.preserve_comments {
            let raw = self.cursor.slice(comment_start, self.cursor.offset());
            let text = raw.trim_start_matches('#').trim().to_string();
            self.queue(Token::new(TokenKind::Comment, text, start, self.line_indent));
            Step::Produced
        } else {
            Step::Continue
        }
    }

    fn lex_colon(&mut self) -> Step {
        match self.cursor.peek_second() {
            Some(' ') | Some('\t') | Some('\n') | Some('\r') => {}
            None if self.finishing => {}
            None => return Step::NeedMore,
            Some(_) => return self.lex_bareword(),
        }
        let pos = self.cursor.position();
        self.cursor.advance();
        self.queue(Token::structural(TokenKind::Colon, pos, self.line_indent));
        Step::Produced
    }

    fn lex_dash(&mut self) -> Step {
        match self.cursor.peek_second() {
            Some(' ') => {}
            None if !self.finishing => return Step::NeedMore,
            _ => return self.lex_bareword(),
        }
        let pos = self.cursor.position();
        self.cursor.advance();
        self.cursor.advance();
        let indent = self.line_indent;
        self.queue(Token::structural(TokenKind::Dash, pos, indent));
        // Content after the dash sits one nesting unit deeper.
        self.line_indent = indent + 1;
        Step::Produced
    }

    /// Barewords serve as both keys and scalars: a run terminated by a
    /// mapping separator is a `Key`, anything else is a `Scalar`.
    fn lex_bareword(&mut self) -> Step {
        let cp = self.cursor.checkpoint();
        let start = self.cursor.position();
        let text_start = self.cursor.offset();
        let kind = loop {
            match self.cursor.peek() {
                None => {
                    if self.finishing {
                        break TokenKind::Scalar;
                    }
                    self.cursor.rewind(cp);
                    return Step::NeedMore;
                }
                Some('\n') | Some('\r') | Some('#') => break TokenKind::Scalar,
                Some(':') => match self.cursor.peek_second() {
                    Some(' ') | Some('\t') | Some('\n') | Some('\r') => break TokenKind::Key,
                    None if self.finishing => break TokenKind::Key,
                    None => {
                        self.cursor.rewind(cp);
                        return Step::NeedMore;
                    }
                    Some(_) => {
                        self.cursor.advance();
                    }
                },
                Some(_) => {
                    self.cursor.advance();
                }
            }
        };
        let text = self.cursor.slice(text_start, self.cursor.offset()).trim_end().to_string();
        self.queue(Token::new(kind, text, start, self.line_indent));
        Step::Produced
    }

    fn lex_quoted(&mut self) -> Step {
        let cp = self.cursor.checkpoint();
        let start = self.cursor.position();
        let quote = self.cursor.advance().unwrap_or('"');
        let mut text = String::new();
        loop {
            match self.cursor.peek() {
                None => {
                    if !self.finishing {
                        self.cursor.rewind(cp);
                        return Step::NeedMore;
                    }
                    self.diagnostics.push(Diagnostic::error("unterminated quoted scalar", start));
                    break;
                }
                Some('\n') | Some('\r') => {
                    // The newline ends the scalar but is not consumed.
                    self.diagnostics.push(Diagnostic::error("unterminated quoted scalar", start));
                    break;
                }
                Some('\\') => match self.cursor.peek_second() {
                    None if !self.finishing => {
                        self.cursor.rewind(cp);
                        return Step::NeedMore;
                    }
                    None => {
                        self.cursor.advance();
                    }
                    Some(escaped) => {
                        self.cursor.advance();
                        self.cursor.advance();
                        text.push(match escaped {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            // Unknown escapes pass the trailing character through.
                            other => other,
                        });
                    }
                },
                Some(c) if c == quote => {
                    self.cursor.advance();
                    break;
                }
                Some(c) => {
                    self.cursor.advance();
                    text.push(c);
                }
            }
        }
        self.queue(Token::new(TokenKind::Quoted, text, start, self.line_indent));
        Step::Produced
    }

    /// Literal block scalar: `|`, rest of the header line ignored, then every
    /// following line whose leading whitespace is at least the first content
    /// line's width, with exactly that width stripped. Any line of width
    /// zero (including empty lines) terminates the block; the terminator is
    /// not consumed.
    fn lex_block_scalar(&mut self) -> Step {
        let block_cp = self.cursor.checkpoint();
        let start = self.cursor.position();
        let indent = self.line_indent;
        self.cursor.advance();

        // Skip the remainder of the header line.
        loop {
            match self.cursor.peek() {
                Some('\n') => {
                    self.cursor.advance();
                    break;
                }
                Some(_) => {
                    self.cursor.advance();
                }
                None => {
                    if !self.finishing {
                        self.cursor.rewind(block_cp);
                        return Step::NeedMore;
                    }
                    // Header at end of input: the block is empty.
                    self.queue(Token::new(TokenKind::Scalar, "", start, indent));
                    self.at_line_start = true;
                    return Step::Produced;
                }
            }
        }

        let mut strip: Option<u32> = None;
        let mut lines: Vec<String> = Vec::new();
        loop {
            let line_cp = self.cursor.checkpoint();
            let mut width = 0u32;
            while let Some(c) = self.cursor.peek() {
                match c {
                    ' ' => {
                        self.cursor.advance();
                        width += 1;
                    }
                    '\t' => {
                        self.cursor.advance();
                        width += self.config.indent_size;
                    }
                    _ => break,
                }
            }
            match self.cursor.peek() {
                None => {
                    if !self.finishing {
                        self.cursor.rewind(block_cp);
                        return Step::NeedMore;
                    }
                    // Trailing whitespace-only tail; not part of the block.
                    break;
                }
                Some('\n') | Some('\r') => {
                    if width == 0 {
                        self.cursor.rewind(line_cp);
                        break;
                    }
                    match strip {
                        Some(n) if width < n => {
                            self.cursor.rewind(line_cp);
                            break;
                        }
                        Some(n) => lines.push(" ".repeat((width - n) as usize)),
                        None => lines.push(String::new()),
                    }
                    if self.cursor.peek() == Some('\r') && self.cursor.peek_second() == Some('\n') {
                        self.cursor.advance();
                    }
                    self.cursor.advance();
                }
                Some(_) => {
                    if width == 0 {
                        self.cursor.rewind(line_cp);
                        break;
                    }
                    let n = *strip.get_or_insert(width);
                    if width < n {
                        self.cursor.rewind(line_cp);
                        break;
                    }
                    let content_start = self.cursor.offset();
                    let ended = loop {
                        match self.cursor.peek() {
                            Some('\n') => break true,
                            Some(_) => {
                                self.cursor.advance();
                            }
                            None => {
                                if !self.finishing {
                                    self.cursor.rewind(block_cp);
                                    return Step::NeedMore;
                                }
                                break false;
                            }
                        }
                    };
                    let content = self.cursor.slice(content_start, self.cursor.offset());
                    let mut line = " ".repeat((width - n) as usize);
                    line.push_str(content.trim_end_matches('\r'));
                    lines.push(line);
                    if ended {
                        self.cursor.advance();
                    }
                }
            }
        }

        let text = if strip.is_some() { lines.join("\n") } else { String::new() };
        self.queue(Token::new(TokenKind::Scalar, text, start, indent));
        self.at_line_start = true;
        Step::Produced
    }

    /// Inline flow span: a `{`/`[` opener captured verbatim until the
    /// bracket depth returns to zero or the line ends. The interior is not
    /// parsed here; the IR builder decides whether it is JSON.
    fn lex_flow(&mut self) -> Step {
        let cp = self.cursor.checkpoint();
        let start = self.cursor.position();
        let text_start = self.cursor.offset();
        let mut depth = 0i32;
        loop {
            match self.cursor.peek() {
                None => {
                    if !self.finishing {
                        self.cursor.rewind(cp);
                        return Step::NeedMore;
                    }
                    break;
                }
                Some('\n') | Some('\r') => break,
                Some(c) => {
                    self.cursor.advance();
                    match c {
                        '{' | '[' => depth += 1,
                        '}' | ']' => {
                            depth -= 1;
                            if depth <= 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
        let text = self.cursor.slice(text_start, self.cursor.offset()).to_string();
        self.queue(Token::new(TokenKind::Scalar, text, start, self.line_indent));
        Step::Produced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    fn texts(tokens: &[Token], kind: TokenKind) -> Vec<String> {
        tokens.iter().filter(|t| t.kind == kind).map(|t| t.text.clone()).collect()
    }

    fn tokenize(source: &str) -> Vec<Token> {
        Tokenizer::tokenize(source, TokenizerConfig::default()).0
    }

    #[test]
    fn simple_key_value() {
        let tokens = tokenize("name: search\n");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Key,
                TokenKind::Colon,
                TokenKind::Scalar,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[0].text, "name");
        assert_eq!(tokens[2].text, "search");
        assert_eq!(tokens[0].pos, Pos::new(1, 1, 0));
        assert_eq!(tokens[2].pos, Pos::new(1, 7, 6));
    }

    #[test]
    fn indent_and_dedent() {
        let tokens = tokenize("a:\n  b: 1\nc: 2\n");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Key,
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Key,
                TokenKind::Colon,
                TokenKind::Scalar,
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Key,
                TokenKind::Colon,
                TokenKind::Scalar,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[3].indent, 1);
        assert_eq!(tokens[8].indent, 0);
    }

    #[test]
    fn finalize_closes_open_levels() {
        let tokens = tokenize("a:\n  b:\n    c: 1");
        let tail: Vec<TokenKind> = kinds(&tokens)[kinds(&tokens).len() - 3..].to_vec();
        assert_eq!(tail, vec![TokenKind::Dedent, TokenKind::Dedent, TokenKind::Eof]);
        let targets: Vec<u32> =
            tokens.iter().filter(|t| t.kind == TokenKind::Dedent).map(|t| t.indent).collect();
        assert_eq!(targets, vec![1, 0]);
    }

    #[test]
    fn partial_bareword_is_withheld() {
        let mut tokenizer = Tokenizer::new(TokenizerConfig::default());
        tokenizer.write("inte");
        assert_eq!(tokenizer.next_token(), None);
        tokenizer.write("nt:\n");
        let tok = tokenizer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Key);
        assert_eq!(tok.text, "intent");
        assert_eq!(tok.pos, Pos::start());
    }

    #[test]
    fn colon_at_buffer_end_is_ambiguous() {
        let mut tokenizer = Tokenizer::new(TokenizerConfig::default());
        tokenizer.write("key:");
        // `key:x` would retain the colon in the bareword, so nothing can be
        // emitted yet.
        assert_eq!(tokenizer.next_token(), None);
        tokenizer.write(" 1\n");
        let tok = tokenizer.next_token().unwrap();
        assert_eq!((tok.kind, tok.text.as_str()), (TokenKind::Key, "key"));
    }

    #[test]
    fn colon_inside_bareword_is_retained() {
        let tokens = tokenize("url: http://example.com\n");
        assert_eq!(texts(&tokens, TokenKind::Scalar), vec!["http://example.com"]);
    }

    #[test]
    fn dash_with_space_and_lone_dash() {
        let tokens = tokenize("- item\n");
        assert_eq!(tokens[0].kind, TokenKind::Dash);
        assert_eq!(tokens[1].kind, TokenKind::Scalar);
        assert_eq!(tokens[1].indent, 1);

        let tokens = tokenize("-item\n");
        assert_eq!(tokens[0].kind, TokenKind::Scalar);
        assert_eq!(tokens[0].text, "-item");
    }

    #[test]
    fn nested_dashes_on_one_line() {
        let tokens = tokenize("- - a\n");
        assert_eq!(kinds(&tokens)[..3], [TokenKind::Dash, TokenKind::Dash, TokenKind::Scalar]);
        assert_eq!(tokens[0].indent, 0);
        assert_eq!(tokens[1].indent, 1);
        assert_eq!(tokens[2].indent, 2);
    }

    #[test]
    fn quoted_scalars_and_escapes() {
        let tokens = tokenize("a: \"hi\\nthere\"\nb: 'single'\n");
        assert_eq!(texts(&tokens, TokenKind::Quoted), vec!["hi\nthere", "single"]);

        let tokens = tokenize("a: \"unknown \\q\"\n");
        assert_eq!(texts(&tokens, TokenKind::Quoted), vec!["unknown q"]);
    }

    #[test]
    fn unterminated_quote_degrades_with_diagnostic() {
        let (tokens, diags) = Tokenizer::tokenize("a: \"oops\nb: 1\n", TokenizerConfig::default());
        assert_eq!(texts(&tokens, TokenKind::Quoted), vec!["oops"]);
        assert!(diags.iter().any(|d| d.message == "unterminated quoted scalar"));
        // The newline after the broken quote is still a line break.
        assert_eq!(texts(&tokens, TokenKind::Key), vec!["a", "b"]);
    }

    #[test]
    fn comments_are_silent_by_default() {
        let tokens = tokenize("a: 1 # trailing\n# full line\nb: 2\n");
        assert!(texts(&tokens, TokenKind::Comment).is_empty());
        assert_eq!(texts(&tokens, TokenKind::Key), vec!["a", "b"]);
    }

    #[test]
    fn comments_emit_when_preserved() {
        let config = TokenizerConfig { preserve_comments: true, ..Default::default() };
        let (tokens, _) = Tokenizer::tokenize("a: 1 # trailing\n# full line\n", config);
        assert_eq!(texts(&tokens, TokenKind::Comment), vec!["trailing", "full line"]);
    }

    #[test]
    fn comment_only_lines_do_not_dedent() {
        let tokens = tokenize("a:\n  b: 1\n# note\n  c: 2\n");
        // The only dedent is the synthetic closer at finalize.
        let dedents = tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
        assert_eq!(dedents, 1);
        assert_eq!(texts(&tokens, TokenKind::Key), vec!["a", "b", "c"]);
    }

    #[test]
    fn blank_lines_keep_the_stack() {
        let tokens = tokenize("a:\n  b: 1\n\n  c: 2\n");
        assert_eq!(texts(&tokens, TokenKind::Key), vec!["a", "b", "c"]);
        let dedents = tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
        assert_eq!(dedents, 1); // only the synthetic closer
    }

    #[test]
    fn block_scalar_strips_and_joins() {
        let tokens = tokenize("description: |\n  line one\n  line two\nnext: end\n");
        assert_eq!(
            texts(&tokens, TokenKind::Scalar),
            vec!["line one\nline two".to_string(), "end".to_string()]
        );
        assert_eq!(texts(&tokens, TokenKind::Key), vec!["description", "next"]);
    }

    #[test]
    fn block_scalar_keeps_deeper_indent() {
        let tokens = tokenize("code: |\n  fn main() {\n      body\n  }\nafter: 1\n");
        assert_eq!(
            texts(&tokens, TokenKind::Scalar)[0],
            "fn main() {\n    body\n}".to_string()
        );
    }

    #[test]
    fn block_scalar_with_zero_indent_content_is_empty() {
        let tokens = tokenize("a: |\nb: 1\n");
        assert_eq!(texts(&tokens, TokenKind::Scalar), vec!["".to_string(), "1".to_string()]);
        assert_eq!(texts(&tokens, TokenKind::Key), vec!["a", "b"]);
    }

    #[test]
    fn block_scalar_is_withheld_until_terminated() {
        let mut tokenizer = Tokenizer::new(TokenizerConfig::default());
        tokenizer.write("a: |\n  one\n");
        // "a" and ":" come through; the block cannot end yet.
        assert_eq!(tokenizer.next_token().map(|t| t.kind), Some(TokenKind::Key));
        assert_eq!(tokenizer.next_token().map(|t| t.kind), Some(TokenKind::Colon));
        assert_eq!(tokenizer.next_token(), None);
        tokenizer.write("  two\nb: 1\n");
        let tok = tokenizer.next_token().unwrap();
        assert_eq!((tok.kind, tok.text.as_str()), (TokenKind::Scalar, "one\ntwo"));
    }

    #[test]
    fn flow_span_is_one_scalar() {
        let tokens = tokenize("config: {a: 1, b: [2, 3]}\n");
        assert_eq!(texts(&tokens, TokenKind::Scalar), vec!["{a: 1, b: [2, 3]}"]);
    }

    #[test]
    fn flow_span_stops_at_newline() {
        let tokens = tokenize("config: {a: 1,\n");
        assert_eq!(texts(&tokens, TokenKind::Scalar), vec!["{a: 1,"]);
    }

    #[test]
    fn tabs_warn_unless_allowed() {
        let (_, diags) = Tokenizer::tokenize("a:\n\tb: 1\n", TokenizerConfig::default());
        assert!(diags.iter().any(|d| d.message == "tab in indentation"));

        let config = TokenizerConfig { allow_tabs: true, ..Default::default() };
        let (tokens, diags) = Tokenizer::tokenize("a:\n\tb: 1\n", config);
        assert!(diags.is_empty());
        // The tab still counts as one indent level.
        assert!(kinds(&tokens).contains(&TokenKind::Indent));
    }

    #[test]
    fn inconsistent_dedent_recovers() {
        let (tokens, diags) = Tokenizer::tokenize("a:\n    b: 1\n  c: 2\n", TokenizerConfig::default());
        assert!(diags.iter().any(|d| d.message == "inconsistent indentation"));
        assert_eq!(texts(&tokens, TokenKind::Key), vec!["a", "b", "c"]);
    }

    #[test]
    fn crlf_is_one_newline() {
        let tokens = tokenize("a: 1\r\nb: 2\r\n");
        assert_eq!(texts(&tokens, TokenKind::Key), vec!["a", "b"]);
        assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Newline).count(), 2);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut tokenizer = Tokenizer::new(TokenizerConfig::default());
        tokenizer.write("a:\n  b:\n");
        while tokenizer.next_token().is_some() {}
        tokenizer.reset();
        tokenizer.write("x: 1\n");
        let tok = tokenizer.next_token().unwrap();
        assert_eq!((tok.kind, tok.text.as_str()), (TokenKind::Key, "x"));
        assert_eq!(tok.pos, Pos::start());
    }

    #[test]
    fn empty_input_finalizes_to_eof_only() {
        let tokens = tokenize("");
        assert_eq!(kinds(&tokens), vec![TokenKind::Eof]);
    }

    #[test]
    fn byte_by_byte_equals_whole() {
        let source = "intent:\n  type: tool_call\n  args:\n    - \"q\"\n    - 42\n";
        let whole = tokenize(source);
        let mut tokenizer = Tokenizer::new(TokenizerConfig::default());
        let mut streamed = Vec::new();
        for (i, _) in source.char_indices() {
            let end = source[i..].chars().next().map(|c| i + c.len_utf8()).unwrap();
            tokenizer.write(&source[i..end]);
            while let Some(tok) = tokenizer.next_token() {
                streamed.push(tok);
            }
        }
        streamed.extend(tokenizer.finalize());
        assert_eq!(whole, streamed);
    }
}
