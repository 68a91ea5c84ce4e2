//! Slate structural parser: token stream in, partial tree and events out.
//!
//! This crate turns the token stream from `slate-lexer` into an arena AST
//! of mappings, sequences, scalars, references, and empty placeholders. The
//! parser is built for incomplete input: nodes attach to their parents the
//! moment they open, every token leaves the tree in a walkable state, and
//! the structural [`Event`]s it collects let a streaming facade surface
//! progress (including "intent ready" notifications) between chunks.
//!
//! Structural problems never abort parsing; they are recorded as
//! diagnostics and the best-effort tree keeps growing.

pub mod ast;
pub mod event;
mod parser;

pub use ast::{debug_tree, Ast, AstNode, ContainerHint, MapEntry, NodeId};
pub use event::{BlockKind, Event, EventKind};
pub use parser::Parser;
