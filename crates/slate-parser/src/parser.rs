//! The frame-stack parser.
//!
//! Tokens are fed one at a time; the parser maintains a stack of open
//! frames (one per unclosed block), attaches nodes eagerly so a partial
//! tree is observable at any byte boundary, and collects [`Event`]s for the
//! caller to drain.
//!
//! # Holdback
//!
//! Two token kinds need to see their successor before they can be acted on:
//! a `Dash` (does the item hold a mapping, a nested list, or a bare
//! scalar?) and an `Indent` over a pending key (is the indented block a
//! mapping, or will a dash build a sequence?). Mid-stream the successor may
//! not exist yet, so such a token is *held*; trivia arriving meanwhile is
//! deferred and replayed once the successor (or end of input) resolves the
//! hold. This is what keeps one-token lookahead compatible with `peek`
//! at arbitrary chunk boundaries.

use rustc_hash::FxHashSet;

use slate_common::{Diagnostic, ParserConfig, Pos, Token, TokenKind};

use crate::ast::{Ast, AstNode, ContainerHint, MapEntry, NodeId};
use crate::event::{BlockKind, Event};

/// A key waiting for its value.
#[derive(Debug)]
struct PendingKey {
    name: String,
    pos: Pos,
}

/// One level of the open-block stack. The bottom frame is the root and is
/// never popped; a frame's node is already attached to its parent, so
/// popping is pure bookkeeping.
#[derive(Debug)]
struct Frame {
    node: NodeId,
    indent: u32,
    pending_key: Option<PendingKey>,
}

/// The Slate structural parser. See the module docs for the feeding model.
pub struct Parser {
    config: ParserConfig,
    ast: Ast,
    root: NodeId,
    stack: Vec<Frame>,
    held: Option<Token>,
    deferred: Vec<Token>,
    events: Vec<Event>,
    diagnostics: Vec<Diagnostic>,
    emitted_intents: FxHashSet<NodeId>,
    finished: bool,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        let mut ast = Ast::new();
        let root = ast.alloc(AstNode::Mapping { entries: Vec::new(), pos: Pos::start() });
        Self {
            config,
            ast,
            root,
            stack: vec![Frame { node: root, indent: 0, pending_key: None }],
            held: None,
            deferred: Vec::new(),
            events: Vec::new(),
            diagnostics: Vec::new(),
            emitted_intents: FxHashSet::default(),
            finished: false,
        }
    }

    /// The node arena. Borrow it together with [`Parser::root`] to inspect
    /// the partial tree between feeds.
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// The root node. A mapping unless the document opened with a dash.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `Eof` has been consumed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drain the events produced since the last call.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Drop the tree, the stack, and the emitted-intent set. Configuration
    /// is kept.
    pub fn reset(&mut self) {
        *self = Parser::new(self.config.clone());
    }

    /// Consume one token. Tokens after `Eof` are ignored.
    pub fn feed(&mut self, token: Token) {
        if self.finished {
            return;
        }
        if self.held.is_some() {
            if matches!(token.kind, TokenKind::Newline | TokenKind::Comment | TokenKind::Indent) {
                self.deferred.push(token);
                return;
            }
            self.resolve_held(Some(&token));
        }
        if self.needs_hold(&token) {
            self.held = Some(token);
            return;
        }
        self.process(token);
    }

    fn needs_hold(&self, token: &Token) -> bool {
        match token.kind {
            TokenKind::Dash => true,
            TokenKind::Indent => {
                let top = self.top();
                top.pending_key.is_some() && top.indent < token.indent
            }
            _ => false,
        }
    }

    /// Act on a held token now that its successor (or end of input) is
    /// known, then replay deferred trivia.
    fn resolve_held(&mut self, successor: Option<&Token>) {
        let Some(held) = self.held.take() else { return };
        let deferred = std::mem::take(&mut self.deferred);
        match held.kind {
            TokenKind::Dash => {
                self.on_dash(&held, successor);
            }
            TokenKind::Indent => {
                self.events.push(Event::Indent { level: held.indent, pos: held.pos });
                if !matches!(successor.map(|t| t.kind), Some(TokenKind::Dash)) {
                    self.open_nested_mapping(held.indent, held.pos);
                }
                // A following dash builds the sequence itself.
            }
            _ => {}
        }
        for token in deferred {
            self.process(token);
        }
    }

    fn process(&mut self, token: Token) {
        match token.kind {
            TokenKind::Key => self.on_key(token),
            TokenKind::Colon => {}
            TokenKind::Scalar | TokenKind::Quoted => self.on_value(token),
            TokenKind::Dash => self.on_dash(&token, None),
            TokenKind::Indent => self.on_indent(token),
            TokenKind::Dedent => self.on_dedent(token),
            TokenKind::Newline => {}
            TokenKind::Comment => {
                self.events.push(Event::Line { text: token.text, pos: token.pos });
            }
            TokenKind::Eof => self.on_eof(token),
        }
    }

    // ── Token handlers ─────────────────────────────────────────────────

    fn on_key(&mut self, token: Token) {
        self.events.push(Event::Key { name: token.text.clone(), pos: token.pos });
        if self.top_is_sequence() {
            // A key directly inside a sequence opens a mapping item.
            let seq = self.top().node;
            let mapping = self.ast.alloc(AstNode::Mapping { entries: Vec::new(), pos: token.pos });
            self.push_item(seq, mapping);
            self.stack.push(Frame {
                node: mapping,
                indent: token.indent,
                pending_key: None,
            });
            self.events.push(Event::BlockStart { container: BlockKind::Mapping, pos: token.pos });
        }
        // A pending key followed by another key never got a value.
        self.flush_pending(self.stack.len() - 1);
        let top = self.stack.last_mut().expect("stack is never empty");
        top.pending_key = Some(PendingKey { name: token.text, pos: token.pos });
    }

    fn on_value(&mut self, token: Token) {
        let quoted = token.kind == TokenKind::Quoted;
        self.events.push(Event::Value { raw: token.text.clone(), quoted, pos: token.pos });
        let index = self.stack.len() - 1;
        if let Some(pending) = self.stack[index].pending_key.take() {
            let parent = self.stack[index].node;
            let node = self.ast.alloc(AstNode::Scalar { value: token.text, quoted, pos: token.pos });
            self.attach_entry(parent, pending.name, pending.pos, node);
        } else if self.top_is_sequence() {
            let seq = self.stack[index].node;
            let node = self.ast.alloc(AstNode::Scalar { value: token.text, quoted, pos: token.pos });
            self.push_item(seq, node);
        } else {
            self.diagnostics.push(
                Diagnostic::warning("scalar without a key", token.pos).with_context(token.text),
            );
        }
    }

    fn on_dash(&mut self, dash: &Token, successor: Option<&Token>) {
        self.events.push(Event::BlockStart { container: BlockKind::SequenceItem, pos: dash.pos });
        self.pop_above(dash.indent, dash.pos);

        let index = self.stack.len() - 1;
        let seq = if self.stack[index].pending_key.is_some() {
            let pending = self.stack[index].pending_key.take().expect("checked above");
            let parent = self.stack[index].node;
            let seq = self.ast.alloc(AstNode::Sequence { items: Vec::new(), pos: dash.pos });
            self.attach_entry(parent, pending.name, pending.pos, seq);
            self.stack.push(Frame {
                node: seq,
                indent: dash.indent,
                pending_key: None,
            });
            self.events.push(Event::BlockStart { container: BlockKind::Sequence, pos: dash.pos });
            seq
        } else if self.top_is_sequence() {
            self.stack[index].node
        } else if self.stack.len() == 1 && self.root_is_empty_mapping() {
            // The first structural token decides the root's kind.
            *self.ast.get_mut(self.root) =
                AstNode::Sequence { items: Vec::new(), pos: dash.pos };
            self.root
        } else {
            self.diagnostics
                .push(Diagnostic::error("sequence item outside a sequence", dash.pos));
            return;
        };

        // What the item holds depends on the next token: a deeper key opens
        // a map-in-sequence item, a deeper dash opens a nested list, a
        // scalar needs no frame, and anything else (a sibling marker, a
        // dedent, end of input) means the item never received content.
        match successor {
            Some(tok) if tok.kind == TokenKind::Key && tok.indent > dash.indent => {
                let mapping = self.ast.alloc(AstNode::Mapping { entries: Vec::new(), pos: dash.pos });
                self.push_item(seq, mapping);
                self.stack.push(Frame {
                    node: mapping,
                    indent: tok.indent,
                    pending_key: None,
                });
                self.events.push(Event::BlockStart { container: BlockKind::Mapping, pos: dash.pos });
            }
            Some(tok) if tok.kind == TokenKind::Dash && tok.indent > dash.indent => {
                let inner = self.ast.alloc(AstNode::Sequence { items: Vec::new(), pos: dash.pos });
                self.push_item(seq, inner);
                self.stack.push(Frame {
                    node: inner,
                    indent: tok.indent,
                    pending_key: None,
                });
                self.events.push(Event::BlockStart { container: BlockKind::Sequence, pos: dash.pos });
            }
            Some(tok) if matches!(tok.kind, TokenKind::Scalar | TokenKind::Quoted) => {}
            _ => {
                let empty =
                    self.ast.alloc(AstNode::Empty { hint: ContainerHint::Mapping, pos: dash.pos });
                self.push_item(seq, empty);
            }
        }
    }

    fn on_indent(&mut self, token: Token) {
        self.events.push(Event::Indent { level: token.indent, pos: token.pos });
        let top = self.top();
        if top.indent >= token.indent {
            return;
        }
        if top.pending_key.is_some() {
            self.open_nested_mapping(token.indent, token.pos);
        } else {
            self.diagnostics.push(Diagnostic::warning("unexpected indent", token.pos));
        }
    }

    fn on_dedent(&mut self, token: Token) {
        self.events.push(Event::Dedent { level: token.indent, pos: token.pos });
        self.pop_above(token.indent, token.pos);
        self.probe_intents();
    }

    fn on_eof(&mut self, token: Token) {
        while self.stack.len() > 1 {
            self.flush_pending(self.stack.len() - 1);
            self.stack.pop();
            self.events.push(Event::BlockEnd { pos: token.pos });
        }
        self.flush_pending(0);
        self.probe_intents();
        self.finished = true;
    }

    // ── Tree construction ──────────────────────────────────────────────

    /// Attach a mapping entry, rewriting `ref: <scalar>` into a reference
    /// node at insertion time.
    fn attach_entry(&mut self, mapping: NodeId, key: String, key_pos: Pos, value: NodeId) {
        if key == "ref" {
            if let AstNode::Scalar { value: text, pos, .. } = self.ast.get(value) {
                let (target, pos) = (text.clone(), *pos);
                *self.ast.get_mut(value) = AstNode::Ref { target, pos };
            }
        }
        if self.config.strict {
            if let AstNode::Mapping { entries, .. } = self.ast.get(mapping) {
                if entries.iter().any(|e| e.key == key) {
                    self.diagnostics.push(
                        Diagnostic::warning("duplicate mapping key", key_pos)
                            .with_context(key.clone()),
                    );
                }
            }
        }
        if let AstNode::Mapping { entries, .. } = self.ast.get_mut(mapping) {
            entries.push(MapEntry { key, value, pos: key_pos });
        }
    }

    fn push_item(&mut self, seq: NodeId, item: NodeId) {
        if let AstNode::Sequence { items, .. } = self.ast.get_mut(seq) {
            items.push(item);
        }
    }

    /// Materialise the nested mapping a pending key's indented block opens.
    fn open_nested_mapping(&mut self, level: u32, pos: Pos) {
        let index = self.stack.len() - 1;
        let Some(pending) = self.stack[index].pending_key.take() else { return };
        let parent = self.stack[index].node;
        let mapping = self.ast.alloc(AstNode::Mapping { entries: Vec::new(), pos });
        self.attach_entry(parent, pending.name, pending.pos, mapping);
        self.stack.push(Frame { node: mapping, indent: level, pending_key: None });
        self.events.push(Event::BlockStart { container: BlockKind::Mapping, pos });
    }

    /// Close frames opened deeper than `level`. A pending key in a closing
    /// frame resolves to an empty mapping.
    fn pop_above(&mut self, level: u32, pos: Pos) {
        while self.stack.len() > 1 && self.top().indent > level {
            self.flush_pending(self.stack.len() - 1);
            self.stack.pop();
            self.events.push(Event::BlockEnd { pos });
        }
    }

    fn flush_pending(&mut self, index: usize) {
        let Some(pending) = self.stack[index].pending_key.take() else { return };
        let parent = self.stack[index].node;
        let empty =
            self.ast.alloc(AstNode::Empty { hint: ContainerHint::Mapping, pos: pending.pos });
        self.attach_entry(parent, pending.name, pending.pos, empty);
    }

    fn top(&self) -> &Frame {
        self.stack.last().expect("stack is never empty")
    }

    fn top_is_sequence(&self) -> bool {
        matches!(self.ast.get(self.top().node), AstNode::Sequence { .. })
    }

    fn root_is_empty_mapping(&self) -> bool {
        matches!(self.ast.get(self.root), AstNode::Mapping { entries, .. } if entries.is_empty())
    }

    // ── Intent detection ───────────────────────────────────────────────

    /// Inspect the root mapping for intent-key entries whose discriminator
    /// is known, and emit `IntentReady` at most once per node identity.
    /// Runs after every dedent and at end of input, so handlers receive
    /// structurally settled subtrees.
    fn probe_intents(&mut self) {
        let AstNode::Mapping { entries, .. } = self.ast.get(self.root) else { return };
        let mut candidates: Vec<NodeId> = Vec::new();
        for entry in entries {
            if !self.config.intent_keys.iter().any(|k| *k == entry.key) {
                continue;
            }
            match self.ast.get(entry.value) {
                AstNode::Mapping { .. } => candidates.push(entry.value),
                AstNode::Sequence { items, .. } => {
                    for item in items {
                        if matches!(self.ast.get(*item), AstNode::Mapping { .. }) {
                            candidates.push(*item);
                        }
                    }
                }
                _ => {}
            }
        }
        for node in candidates {
            if self.emitted_intents.contains(&node) {
                continue;
            }
            let Some(type_id) = self.ast.entry_value(node, "type") else { continue };
            let AstNode::Scalar { value, .. } = self.ast.get(type_id) else { continue };
            let intent_type = value.clone();
            self.emitted_intents.insert(node);
            self.events.push(Event::IntentReady { intent_type, node });
        }
    }
}
