//! The streaming facade: one object owning the whole pipeline.
//!
//! [`StreamParser`] wires tokenizer, parser, and IR builder together behind
//! `write`/`peek`/`end`/`reset`, and dispatches the parser's drained events
//! to subscribers. All dispatch is synchronous: every event produced by a
//! `write` is delivered before that `write` returns.

use std::time::{Duration, Instant};

use serde_json::Value;

use slate_common::{Diagnostic, ParseOptions};
use slate_ir::IrResult;
use slate_lexer::Tokenizer;
use slate_parser::{AstNode, Event, EventKind, NodeId, Parser};

use crate::ParseResult;

type EventHandler = Box<dyn FnMut(&Event)>;
type IntentHandler = Box<dyn FnMut(&str, &Value)>;

/// Ticket returned by a subscription, used to unsubscribe.
///
/// Closures have no identity in Rust, so removal goes through the id the
/// registration returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerId(u64);

/// A partial-intent subscriber with its debounce state.
struct PartialSub {
    id: u64,
    handler: IntentHandler,
    debounce: Option<Duration>,
    last_emit: Option<Instant>,
    pending: bool,
}

/// Streaming Slate parser.
///
/// Single-owner and synchronous: feed chunks with [`write`](Self::write),
/// snapshot the partial tree with [`peek`](Self::peek) as often as needed,
/// and close the stream with [`end`](Self::end). [`reset`](Self::reset)
/// restarts the document while keeping every subscription.
pub struct StreamParser {
    options: ParseOptions,
    tokenizer: Tokenizer,
    parser: Parser,
    handlers: [Vec<(u64, EventHandler)>; EventKind::COUNT],
    intent_ready_subs: Vec<(u64, IntentHandler)>,
    partial_subs: Vec<PartialSub>,
    next_handler: u64,
}

impl Default for StreamParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamParser {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            tokenizer: Tokenizer::new(options.tokenizer()),
            parser: Parser::new(options.parser()),
            options,
            handlers: std::array::from_fn(|_| Vec::new()),
            intent_ready_subs: Vec::new(),
            partial_subs: Vec::new(),
            next_handler: 0,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// The input accumulated so far, for diagnostics rendering.
    pub fn source(&self) -> &str {
        self.tokenizer.source()
    }

    /// Feed a chunk. Every event the chunk completes is dispatched before
    /// this returns.
    pub fn write(&mut self, chunk: &str) {
        self.tokenizer.write(chunk);
        while let Some(token) = self.tokenizer.next_token() {
            self.parser.feed(token);
        }
        self.dispatch();
    }

    /// Build an IR snapshot of the current partial tree.
    ///
    /// Never advances the tokenizer, so it is idempotent between writes and
    /// invisible to later ones.
    pub fn peek(&self) -> Value {
        slate_ir::build(self.parser.ast(), self.parser.root()).value
    }

    /// Like [`peek`](Self::peek), but with registry, unresolved references,
    /// and IR diagnostics included.
    pub fn peek_result(&self) -> IrResult {
        slate_ir::build(self.parser.ast(), self.parser.root())
    }

    /// Parse diagnostics recorded so far (tokenizer's first, then parser's).
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut all = self.tokenizer.diagnostics().to_vec();
        all.extend_from_slice(self.parser.diagnostics());
        all
    }

    /// Close the stream: resolve withheld tokens, close open blocks,
    /// dispatch terminal events (including any final `intent_ready`), and
    /// build the final IR.
    pub fn end(&mut self) -> ParseResult {
        for token in self.tokenizer.finalize() {
            self.parser.feed(token);
        }
        self.dispatch();
        self.flush_partials();
        let ir = slate_ir::build(self.parser.ast(), self.parser.root());
        let mut errors = self.tokenizer.take_diagnostics();
        errors.extend(self.parser.take_diagnostics());
        ParseResult {
            value: ir.value,
            registry: ir.registry,
            unresolved_refs: ir.unresolved_refs,
            errors,
            ir_errors: ir.errors,
        }
    }

    /// Restart for a new document. Subscriptions (and their debounce
    /// configuration) survive; the already-emitted intent set does not.
    pub fn reset(&mut self) {
        self.tokenizer.reset();
        self.parser.reset();
        for sub in &mut self.partial_subs {
            sub.last_emit = None;
            sub.pending = false;
        }
    }

    // ── Subscriptions ──────────────────────────────────────────────────

    /// Subscribe to one event kind. Handlers run in registration order,
    /// synchronously, within the `write`/`end` that produced the event.
    pub fn on(&mut self, kind: EventKind, handler: impl FnMut(&Event) + 'static) -> HandlerId {
        let id = self.next_id();
        self.handlers[kind.index()].push((id, Box::new(handler)));
        HandlerId(id)
    }

    /// Remove a subscription. Unknown ids are ignored.
    pub fn off(&mut self, id: HandlerId) {
        for list in &mut self.handlers {
            list.retain(|(handler_id, _)| *handler_id != id.0);
        }
        self.intent_ready_subs.retain(|(handler_id, _)| *handler_id != id.0);
        self.partial_subs.retain(|sub| sub.id != id.0);
    }

    /// Subscribe to completed intents. The handler receives the intent's
    /// discriminator and the IR build of its subtree at emission time.
    pub fn on_intent_ready(
        &mut self,
        handler: impl FnMut(&str, &Value) + 'static,
    ) -> HandlerId {
        let id = self.next_id();
        self.intent_ready_subs.push((id, Box::new(handler)));
        HandlerId(id)
    }

    /// Subscribe to in-progress intents. After every `value` and
    /// `block_end` event the root is rescanned and each intent-key entry is
    /// emitted as `(key, IR snapshot)`. An optional debounce coalesces
    /// bursts; anything suppressed by the window is flushed at `end`.
    pub fn on_intent_partial(
        &mut self,
        handler: impl FnMut(&str, &Value) + 'static,
        debounce: Option<Duration>,
    ) -> HandlerId {
        let id = self.next_id();
        self.partial_subs.push(PartialSub {
            id,
            handler: Box::new(handler),
            debounce,
            last_emit: None,
            pending: false,
        });
        HandlerId(id)
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_handler;
        self.next_handler += 1;
        id
    }

    // ── Dispatch ───────────────────────────────────────────────────────

    fn dispatch(&mut self) {
        let events = self.parser.take_events();
        for event in &events {
            for (_, handler) in &mut self.handlers[event.kind().index()] {
                handler(event);
            }
            if let Event::IntentReady { intent_type, node } = event {
                if !self.intent_ready_subs.is_empty() {
                    let payload = slate_ir::build(self.parser.ast(), *node).value;
                    for (_, handler) in &mut self.intent_ready_subs {
                        handler(intent_type, &payload);
                    }
                }
            }
            if matches!(event, Event::Value { .. } | Event::BlockEnd { .. }) {
                self.emit_partials(false);
            }
        }
    }

    fn flush_partials(&mut self) {
        self.emit_partials(true);
    }

    /// Emit current intent snapshots to partial subscribers. With `flush`,
    /// only debounce-suppressed subscribers emit (the window no longer
    /// applies); otherwise the window decides per subscriber.
    fn emit_partials(&mut self, flush: bool) {
        if self.partial_subs.is_empty() {
            return;
        }
        let payloads: Vec<(String, Value)> = {
            let ast = self.parser.ast();
            let AstNode::Mapping { entries, .. } = ast.get(self.parser.root()) else {
                return;
            };
            let targets: Vec<(String, NodeId)> = entries
                .iter()
                .filter(|entry| self.options.intent_keys.iter().any(|k| *k == entry.key))
                .map(|entry| (entry.key.clone(), entry.value))
                .collect();
            targets
                .into_iter()
                .map(|(key, node)| (key, slate_ir::build(ast, node).value))
                .collect()
        };
        if payloads.is_empty() {
            return;
        }
        let now = Instant::now();
        for sub in &mut self.partial_subs {
            let due = if flush {
                sub.pending
            } else {
                match (sub.debounce, sub.last_emit) {
                    (None, _) => true,
                    (Some(_), None) => true,
                    (Some(window), Some(last)) => now.duration_since(last) >= window,
                }
            };
            if !due {
                sub.pending = true;
                continue;
            }
            sub.last_emit = Some(now);
            sub.pending = false;
            for (key, value) in &payloads {
                (sub.handler)(key, value);
            }
        }
    }
}
