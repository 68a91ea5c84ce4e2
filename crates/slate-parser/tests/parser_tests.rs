//! Parser integration tests: tree dumps over fixtures plus the event-order
//! guarantees a streaming consumer relies on.

use insta::assert_snapshot;
use slate_common::{ParserConfig, TokenizerConfig};
use slate_lexer::Tokenizer;
use slate_parser::{debug_tree, Event, EventKind, Parser};

fn parse(source: &str) -> Parser {
    let (tokens, _) = Tokenizer::tokenize(source, TokenizerConfig::default());
    let mut parser = Parser::new(ParserConfig::default());
    for token in tokens {
        parser.feed(token);
    }
    parser
}

fn tree(source: &str) -> String {
    let parser = parse(source);
    debug_tree(parser.ast(), parser.root())
}

/// Events a consumer observes for structure, in order.
fn structural_events(source: &str) -> Vec<Event> {
    let mut parser = parse(source);
    parser
        .take_events()
        .into_iter()
        .filter(|e| {
            matches!(
                e.kind(),
                EventKind::Key | EventKind::Value | EventKind::BlockStart | EventKind::BlockEnd
            )
        })
        .collect()
}

#[test]
fn intent_fixture_tree() {
    let source = include_str!("../../../tests/fixtures/intent.slate");
    assert_snapshot!(tree(source), @r#"
mapping
  intent:
    mapping
      type:
        scalar "tool_call"
      name:
        scalar "search"
      args:
        mapping
          q:
            scalar "streaming parsers"
          limit:
            scalar "5"
  status:
    scalar "drafting"
"#);
}

#[test]
fn components_fixture_tree_rewrites_refs() {
    let source = include_str!("../../../tests/fixtures/components.slate");
    let dump = tree(source);
    assert!(dump.contains("ref -> btn"));
    assert!(dump.contains("ref -> field"));
    // Bare names in the layout list stay scalars at the AST level; only
    // the IR resolves them.
    assert!(dump.contains("scalar \"btn\""));
}

#[test]
fn kitchen_fixture_parses_clean() {
    let source = include_str!("../../../tests/fixtures/kitchen.slate");
    let parser = parse(source);
    assert!(parser.diagnostics().is_empty(), "{:?}", parser.diagnostics());
    let dump = debug_tree(parser.ast(), parser.root());
    assert!(dump.contains("empty (mapping)")); // the trailing dangling key
    assert!(dump.contains("scalar \"first line\\n  indented line\\nlast line\""));
}

#[test]
fn event_stream_for_a_sequence_document() {
    let events = structural_events("items:\n  - a\n");
    let kinds: Vec<EventKind> = events.iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::Key,        // items
            EventKind::BlockStart, // sequence item marker
            EventKind::BlockStart, // the sequence for the pending key
            EventKind::Value,      // a
            EventKind::BlockEnd,   // sequence closes at eof
        ]
    );
}

#[test]
fn event_growth_is_monotonic_across_prefixes() {
    let source = "intent:\n  type: search\n  args:\n    q: a\nitems:\n  - 1\n  - 2\n";
    let mut previous: Vec<Event> = Vec::new();
    for split in (0..=source.len()).filter(|i| source.is_char_boundary(*i)) {
        let mut tokenizer = Tokenizer::new(TokenizerConfig::default());
        let mut parser = Parser::new(ParserConfig::default());
        tokenizer.write(&source[..split]);
        while let Some(token) = tokenizer.next_token() {
            parser.feed(token);
        }
        let events: Vec<Event> = parser
            .take_events()
            .into_iter()
            .filter(|e| {
                matches!(
                    e.kind(),
                    EventKind::Key
                        | EventKind::Value
                        | EventKind::BlockStart
                        | EventKind::BlockEnd
                )
            })
            .collect();
        assert!(
            events.len() >= previous.len() && events[..previous.len()] == previous[..],
            "events for prefix {split} do not extend the previous prefix"
        );
        previous = events;
    }
}

#[test]
fn comments_surface_as_line_events_when_preserved() {
    let config = TokenizerConfig { preserve_comments: true, ..Default::default() };
    let (tokens, _) = Tokenizer::tokenize("a: 1 # inline\n# standalone\n", config);
    let mut parser = Parser::new(ParserConfig::default());
    for token in tokens {
        parser.feed(token);
    }
    let lines: Vec<String> = parser
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            Event::Line { text, .. } => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(lines, vec!["inline", "standalone"]);
}

#[test]
fn intent_probe_waits_for_the_discriminator() {
    let (tokens, _) =
        Tokenizer::tokenize("intent:\n  name: early\nother: 1\n", TokenizerConfig::default());
    let mut parser = Parser::new(ParserConfig::default());
    for token in tokens {
        parser.feed(token);
        // No token may trigger an intent without a `type` entry.
        assert!(!parser
            .take_events()
            .iter()
            .any(|e| matches!(e, Event::IntentReady { .. })));
    }
}
