//! The Slate AST: an arena of nodes addressed by [`NodeId`].
//!
//! Nodes never move once allocated, so a `NodeId` is a stable identity for
//! the life of the parser (until `reset`). That identity is what the
//! at-most-once intent emission set is keyed on, and what makes cycle
//! bookkeeping independent of pointer identity.

use serde::Serialize;
use slate_common::Pos;

/// Index of a node in the [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One entry of a mapping. `pos` records the key's position, not the
/// value's.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapEntry {
    pub key: String,
    pub value: NodeId,
    pub pos: Pos,
}

/// What an [`AstNode::Empty`] placeholder would have become had its value
/// block materialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContainerHint {
    Mapping,
    Sequence,
}

/// A node of the Slate tree. A closed union: the parser matches on the tag
/// exhaustively, and no other kinds exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AstNode {
    /// A raw textual value. Quoted scalars bypass all type coercion.
    Scalar { value: String, quoted: bool, pos: Pos },
    /// An ordered mapping. Duplicate keys are retained here; the IR
    /// builder applies last-write-wins.
    Mapping { entries: Vec<MapEntry>, pos: Pos },
    Sequence { items: Vec<NodeId>, pos: Pos },
    /// A reference to a registered identifier. Produced only by the
    /// mapping-entry builder when the literal key `ref` attaches a scalar.
    Ref { target: String, pos: Pos },
    /// Placeholder for a key whose value block never materialised.
    Empty { hint: ContainerHint, pos: Pos },
}

/// Node arena. Allocation is push-only; `reset` drops everything at once.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Vec<AstNode>,
}

impl Ast {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, node: AstNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut AstNode {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The value of the last entry named `key` in a mapping node, if any.
    /// Last occurrence wins, matching the IR's duplicate-key rule.
    pub fn entry_value(&self, mapping: NodeId, key: &str) -> Option<NodeId> {
        match self.get(mapping) {
            AstNode::Mapping { entries, .. } => {
                entries.iter().rev().find(|e| e.key == key).map(|e| e.value)
            }
            _ => None,
        }
    }
}

/// Render a subtree as an indented debug dump, for tests and tooling.
pub fn debug_tree(ast: &Ast, id: NodeId) -> String {
    let mut out = String::new();
    write_node(ast, id, 0, &mut out);
    out
}

fn write_node(ast: &Ast, id: NodeId, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    match ast.get(id) {
        AstNode::Scalar { value, quoted, .. } => {
            if *quoted {
                out.push_str(&format!("{pad}quoted {value:?}\n"));
            } else {
                out.push_str(&format!("{pad}scalar {value:?}\n"));
            }
        }
        AstNode::Mapping { entries, .. } => {
            out.push_str(&format!("{pad}mapping\n"));
            for entry in entries {
                out.push_str(&format!("{pad}  {}:\n", entry.key));
                write_node(ast, entry.value, depth + 2, out);
            }
        }
        AstNode::Sequence { items, .. } => {
            out.push_str(&format!("{pad}sequence\n"));
            for item in items {
                write_node(ast, *item, depth + 1, out);
            }
        }
        AstNode::Ref { target, .. } => {
            out.push_str(&format!("{pad}ref -> {target}\n"));
        }
        AstNode::Empty { hint, .. } => {
            let hint = match hint {
                ContainerHint::Mapping => "mapping",
                ContainerHint::Sequence => "sequence",
            };
            out.push_str(&format!("{pad}empty ({hint})\n"));
        }
    }
}
