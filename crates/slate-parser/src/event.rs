//! Structural events emitted by the parser.
//!
//! Events are collected into a flat `Vec` while tokens are fed and drained
//! by the caller afterwards. That decouples event production from handler
//! dispatch, so subscribers can inspect the (immutably borrowed) tree while
//! the parser is not mid-mutation.

use serde::Serialize;
use slate_common::Pos;

use crate::ast::NodeId;

/// What kind of block a `BlockStart` opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockKind {
    Mapping,
    Sequence,
    SequenceItem,
}

/// A structural event. Fired in the exact order tokens are consumed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Event {
    /// A comment line passed through (only with comment preservation on).
    Line { text: String, pos: Pos },
    /// A mapping key was read.
    Key { name: String, pos: Pos },
    /// A scalar value was read.
    Value { raw: String, quoted: bool, pos: Pos },
    /// A block (mapping, sequence, or sequence item) opened.
    BlockStart { container: BlockKind, pos: Pos },
    /// An open block closed (one event per popped frame).
    BlockEnd { pos: Pos },
    /// The indent level rose.
    Indent { level: u32, pos: Pos },
    /// The indent level fell.
    Dedent { level: u32, pos: Pos },
    /// An intent subtree's discriminator became known. Fired at most once
    /// per node identity for the life of the parser.
    IntentReady { intent_type: String, node: NodeId },
}

/// Discriminant of [`Event`], used to index subscriber lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    Line,
    Key,
    Value,
    BlockStart,
    BlockEnd,
    Indent,
    Dedent,
    IntentReady,
}

impl EventKind {
    /// Number of event kinds; sizes the subscriber table.
    pub const COUNT: usize = 8;

    pub fn index(self) -> usize {
        self as usize
    }
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Line { .. } => EventKind::Line,
            Event::Key { .. } => EventKind::Key,
            Event::Value { .. } => EventKind::Value,
            Event::BlockStart { .. } => EventKind::BlockStart,
            Event::BlockEnd { .. } => EventKind::BlockEnd,
            Event::Indent { .. } => EventKind::Indent,
            Event::Dedent { .. } => EventKind::Dedent,
            Event::IntentReady { .. } => EventKind::IntentReady,
        }
    }
}
