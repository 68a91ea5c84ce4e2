//! Reference resolution and ref-only lifting (passes 2 and 3).
//!
//! Resolution replaces `{"$ref": id}` sentinels (and bare string array
//! items that name a registered id) with deep copies of the registered
//! value. Copies are walked in turn so chained references resolve, with the
//! set of ids currently being inlined acting as the cycle guard: a sentinel
//! for an id already on the inlining path is left in place, which is what
//! gives self-references their registration-time snapshot semantics.

use rustc_hash::FxHashSet;
use serde_json::{Map, Value};
use slate_common::Severity;

use crate::IrDiagnostic;

/// The key of the reference sentinel object.
pub const REF_SENTINEL_KEY: &str = "$ref";

/// The target of a sentinel object, if `map` is exactly `{"$ref": "<id>"}`.
fn sentinel_target(map: &Map<String, Value>) -> Option<String> {
    if map.len() != 1 {
        return None;
    }
    match map.get(REF_SENTINEL_KEY) {
        Some(Value::String(target)) => Some(target.clone()),
        _ => None,
    }
}

pub(crate) struct Resolver<'a> {
    registry: &'a Map<String, Value>,
    pub(crate) unresolved: Vec<String>,
    pub(crate) errors: Vec<IrDiagnostic>,
    path: Vec<String>,
    inlining: FxHashSet<String>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(registry: &'a Map<String, Value>) -> Self {
        Self {
            registry,
            unresolved: Vec::new(),
            errors: Vec::new(),
            path: Vec::new(),
            inlining: FxHashSet::default(),
        }
    }

    /// Pass 2: resolve references in place.
    pub(crate) fn resolve(&mut self, value: &mut Value) {
        match value {
            Value::Object(map) => {
                if let Some(target) = sentinel_target(map) {
                    self.resolve_sentinel(value, target);
                    return;
                }
                // Collect keys up front so the walk can borrow values mutably.
                let keys: Vec<String> = map.keys().cloned().collect();
                for key in keys {
                    if let Some(child) = value.get_mut(&key) {
                        self.path.push(key);
                        self.resolve(child);
                        self.path.pop();
                    }
                }
            }
            Value::Array(items) => {
                for index in 0..items.len() {
                    self.path.push(format!("[{index}]"));
                    let item = &mut items[index];
                    let registered_name = match item {
                        Value::String(name) if self.registry.contains_key(name) => {
                            Some(name.clone())
                        }
                        _ => None,
                    };
                    if let Some(name) = registered_name {
                        self.inline(item, &name);
                    } else {
                        self.resolve(item);
                    }
                    self.path.pop();
                }
            }
            _ => {}
        }
    }

    fn resolve_sentinel(&mut self, value: &mut Value, target: String) {
        if self.inlining.contains(&target) {
            // A cycle: keep the sentinel exactly as the snapshot recorded it.
            return;
        }
        if self.registry.contains_key(&target) {
            self.inline(value, &target);
        } else {
            if !self.unresolved.contains(&target) {
                self.unresolved.push(target.clone());
            }
            self.errors.push(IrDiagnostic {
                message: format!("unresolved reference `{target}`"),
                severity: Severity::Warning,
                path: self.path.clone(),
            });
        }
    }

    /// Replace `value` with a deep copy of the registered `id`, then walk
    /// the copy with `id` held on the inlining path.
    fn inline(&mut self, value: &mut Value, id: &str) {
        let mut copy = self.registry[id].clone();
        self.inlining.insert(id.to_string());
        self.resolve(&mut copy);
        self.inlining.remove(id);
        *value = copy;
    }
}

/// Pass 3: replace every mapping whose sole entry is `ref` by that entry's
/// value, bottom-up. Applying it twice changes nothing.
pub(crate) fn lift(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (_, child) in map.iter_mut() {
                lift(child);
            }
            if map.len() == 1 {
                if let Some(inner) = map.get("ref") {
                    let inner = inner.clone();
                    *value = inner;
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                lift(item);
            }
        }
        _ => {}
    }
}
