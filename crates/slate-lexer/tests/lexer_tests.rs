//! Tokenizer integration tests: token dumps over fixtures and inline
//! sources, plus the streaming-boundary guarantees.

use insta::assert_snapshot;
use slate_common::{TokenizerConfig, Token, TokenKind};
use slate_lexer::Tokenizer;

/// One line per token: kind, payload (when any), position, indent level.
fn dump(source: &str) -> String {
    let (tokens, _) = Tokenizer::tokenize(source, TokenizerConfig::default());
    tokens
        .iter()
        .map(|tok| {
            if tok.text.is_empty() {
                format!("{:?} @{}:{} i{}", tok.kind, tok.pos.line, tok.pos.column, tok.indent)
            } else {
                format!(
                    "{:?} {:?} @{}:{} i{}",
                    tok.kind, tok.text, tok.pos.line, tok.pos.column, tok.indent
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn flat_key_value() {
    assert_snapshot!(dump("a: 1\n"), @r#"
Key "a" @1:1 i0
Colon @1:2 i0
Scalar "1" @1:4 i0
Newline @1:5 i0
Eof @2:1 i0
"#);
}

#[test]
fn nested_block() {
    assert_snapshot!(dump("a:\n  b: 1\n"), @r#"
Key "a" @1:1 i0
Colon @1:2 i0
Newline @1:3 i0
Indent @2:3 i1
Key "b" @2:3 i1
Colon @2:4 i1
Scalar "1" @2:6 i1
Newline @2:7 i1
Dedent @3:1 i0
Eof @3:1 i0
"#);
}

#[test]
fn sequence_items() {
    assert_snapshot!(dump("- a\n- b: 1\n"), @r#"
Dash @1:1 i0
Scalar "a" @1:3 i1
Newline @1:4 i1
Dash @2:1 i0
Key "b" @2:3 i1
Colon @2:4 i1
Scalar "1" @2:6 i1
Newline @2:7 i1
Eof @3:1 i0
"#);
}

#[test]
fn fixture_intent_has_stable_shape() {
    let source = include_str!("../../../tests/fixtures/intent.slate");
    let (tokens, diags) = Tokenizer::tokenize(source, TokenizerConfig::default());
    assert!(diags.is_empty());

    let keys: Vec<&str> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Key)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(keys, vec!["intent", "type", "name", "args", "q", "limit", "status"]);

    let indents: Vec<u32> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Indent)
        .map(|t| t.indent)
        .collect();
    assert_eq!(indents, vec![1, 2]);
}

#[test]
fn fixture_kitchen_tokenizes_without_diagnostics() {
    let source = include_str!("../../../tests/fixtures/kitchen.slate");
    let (tokens, diags) = Tokenizer::tokenize(source, TokenizerConfig::default());
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));

    let block = tokens
        .iter()
        .find(|t| t.kind == TokenKind::Scalar && t.text.contains('\n'))
        .expect("the block scalar survives tokenization");
    assert_eq!(block.text, "first line\n  indented line\nlast line");
}

#[test]
fn every_split_point_yields_the_same_stream() {
    let source = include_str!("../../../tests/fixtures/kitchen.slate");
    let (whole, _) = Tokenizer::tokenize(source, TokenizerConfig::default());

    for split in (0..=source.len()).filter(|i| source.is_char_boundary(*i)) {
        let mut tokenizer = Tokenizer::new(TokenizerConfig::default());
        let mut streamed: Vec<Token> = Vec::new();
        tokenizer.write(&source[..split]);
        while let Some(tok) = tokenizer.next_token() {
            streamed.push(tok);
        }
        tokenizer.write(&source[split..]);
        while let Some(tok) = tokenizer.next_token() {
            streamed.push(tok);
        }
        streamed.extend(tokenizer.finalize());
        assert_eq!(whole, streamed, "split at byte {split}");
    }
}

#[test]
fn draining_between_writes_never_loses_position() {
    let source = "intent:\n  type: tool_call\n";
    let mut tokenizer = Tokenizer::new(TokenizerConfig::default());
    let mut streamed: Vec<Token> = Vec::new();
    for chunk in ["inte", "nt:", "\n  ty", "pe: tool", "_call\n"] {
        tokenizer.write(chunk);
        while let Some(tok) = tokenizer.next_token() {
            streamed.push(tok);
        }
    }
    streamed.extend(tokenizer.finalize());

    let (whole, _) = Tokenizer::tokenize(source, TokenizerConfig::default());
    assert_eq!(whole, streamed);
}
