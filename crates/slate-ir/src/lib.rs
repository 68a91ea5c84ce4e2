//! IR builder: Slate AST to a JSON-compatible value tree.
//!
//! Building happens in three passes over the (possibly partial) tree:
//!
//! 1. **Transform** -- recursive descent that coerces scalars, materialises
//!    insertion-ordered objects and arrays, and registers every mapping
//!    that carries a string `id` entry.
//! 2. **Resolve** -- `{"$ref": id}` sentinels and bare string array items
//!    naming a registered id are replaced in place with deep copies;
//!    cycles keep their sentinels (see [`resolve`] module docs).
//! 3. **Lift** -- `{ref: <value>}` single-entry mappings collapse to the
//!    value itself.
//!
//! Every build starts from a clean registry; results are snapshots, not
//! live views. The value type is [`serde_json::Value`] with insertion-
//! ordered objects, so mapping order and the integer/float distinction
//! survive into the IR.

mod coerce;
mod resolve;

use serde::Serialize;
use serde_json::{Map, Value};
use slate_common::Severity;
use slate_parser::{Ast, AstNode, ContainerHint, NodeId};

pub use coerce::{coerce_scalar, MAX_SAFE_INTEGER};
pub use resolve::REF_SENTINEL_KEY;

/// A diagnostic produced during IR construction, addressed by path rather
/// than source position (`["form", "child", "[0]"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IrDiagnostic {
    pub message: String,
    pub severity: Severity,
    pub path: Vec<String>,
}

/// The output of one IR build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrResult {
    /// The JSON-compatible value. An empty document yields `{}`.
    pub value: Value,
    /// Identifier registry snapshot: id to registered value, in
    /// registration order.
    pub registry: Map<String, Value>,
    /// Reference targets that were not found, in first-seen order.
    pub unresolved_refs: Vec<String>,
    pub errors: Vec<IrDiagnostic>,
}

impl IrResult {
    /// Whether the build produced neither unresolved references nor
    /// diagnostics.
    pub fn ok(&self) -> bool {
        self.unresolved_refs.is_empty() && self.errors.is_empty()
    }
}

/// Build the IR for the subtree rooted at `node`.
///
/// Safe to call on a partial tree at any byte boundary; repeated calls
/// without intervening parses return deep-equal results.
pub fn build(ast: &Ast, node: NodeId) -> IrResult {
    let mut registry = Map::new();
    let mut value = transform(ast, node, &mut registry);
    let mut resolver = resolve::Resolver::new(&registry);
    resolver.resolve(&mut value);
    let unresolved = std::mem::take(&mut resolver.unresolved);
    let errors = std::mem::take(&mut resolver.errors);
    resolve::lift(&mut value);
    if value.is_null() {
        value = Value::Object(Map::new());
    }
    IrResult { value, registry, unresolved_refs: unresolved, errors }
}

/// Pass 1: node to value, registering `id`-carrying mappings.
fn transform(ast: &Ast, id: NodeId, registry: &mut Map<String, Value>) -> Value {
    match ast.get(id) {
        AstNode::Scalar { value, quoted, .. } => coerce_scalar(value, *quoted),
        AstNode::Mapping { entries, .. } => {
            let mut map = Map::new();
            for entry in entries {
                let value = transform(ast, entry.value, registry);
                // Duplicate keys: last write wins, first occurrence keeps
                // its position.
                map.insert(entry.key.clone(), value);
            }
            if let Some(Value::String(name)) = map.get("id") {
                // The registered snapshot carries everything but the id
                // itself, and is taken before any reference resolves.
                let name = name.clone();
                let mut snapshot = map.clone();
                snapshot.shift_remove("id");
                registry.insert(name, Value::Object(snapshot));
            }
            Value::Object(map)
        }
        AstNode::Sequence { items, .. } => {
            Value::Array(items.iter().map(|item| transform(ast, *item, registry)).collect())
        }
        AstNode::Ref { target, .. } => {
            let mut sentinel = Map::new();
            sentinel.insert(REF_SENTINEL_KEY.to_string(), Value::String(target.clone()));
            Value::Object(sentinel)
        }
        AstNode::Empty { hint, .. } => match hint {
            ContainerHint::Mapping => Value::Object(Map::new()),
            ContainerHint::Sequence => Value::Array(Vec::new()),
        },
    }
}
