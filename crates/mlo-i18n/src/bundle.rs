//! Message bundles: nested translation trees addressed by dotted paths.
//!
//! # Invariants
//!
//! 1. **Leaf-level override**: [`MessageBundle::merge`] replaces leaves and
//!    recurses into objects. Sibling keys from both sides survive.
//! 2. **Objects win over leaves**: merging an object onto a non-object value
//!    replaces that value with an (initially empty) object first.
//! 3. **Deterministic**: merging the same inputs in the same order yields
//!    equal bundles.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A nested mapping from dotted key paths to translated strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageBundle {
    root: Map<String, Value>,
}

impl MessageBundle {
    /// Create an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON object. Any other JSON value is rejected.
    pub fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(other),
        }
    }

    /// Parse a JSON object from text. Any other JSON value is a type error.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let root: Map<String, Value> = serde_json::from_str(text)?;
        Ok(Self { root })
    }

    /// Deep-merge `other` into `self`; `other` wins at the leaves.
    pub fn merge(&mut self, other: &MessageBundle) {
        deep_merge(&mut self.root, &other.root);
    }

    /// Deep-merge `other` into the object found (or created) at `path`.
    pub fn merge_at(&mut self, path: &str, other: &Map<String, Value>) {
        let target = object_at_mut(&mut self.root, path);
        deep_merge(target, other);
    }

    /// Set a leaf, creating intermediate objects along the way.
    pub fn insert(&mut self, path: &str, value: impl Into<Value>) {
        let (parent, leaf) = match path.rsplit_once('.') {
            Some((parent, leaf)) => (object_at_mut(&mut self.root, parent), leaf),
            None => (&mut self.root, path),
        };
        parent.insert(leaf.to_string(), value.into());
    }

    /// Look up the JSON value at `path`.
    #[must_use]
    pub fn get_value(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Look up a string leaf at `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.get_value(path).and_then(Value::as_str)
    }

    /// The object at `path`, if `path` names an object.
    #[must_use]
    pub fn subtree(&self, path: &str) -> Option<&Map<String, Value>> {
        self.get_value(path).and_then(Value::as_object)
    }

    /// Whether the bundle has no top-level keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Number of string leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut count = 0;
        walk_leaves(&self.root, &mut String::new(), &mut |_, _| count += 1);
        count
    }

    /// Dotted paths of every string leaf, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        walk_leaves(&self.root, &mut String::new(), &mut |path, _| {
            keys.push(path.to_string());
        });
        keys.sort_unstable();
        keys
    }

    /// The underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }
}

/// Recursive merge with leaf-level override.
pub fn deep_merge(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        match value {
            Value::Object(child) => {
                let slot = target
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(slot_map) = slot {
                    deep_merge(slot_map, child);
                }
            }
            leaf => {
                target.insert(key.clone(), leaf.clone());
            }
        }
    }
}

/// Walk (creating as needed) to the object at `path`.
fn object_at_mut<'a>(root: &'a mut Map<String, Value>, path: &str) -> &'a mut Map<String, Value> {
    let mut current = root;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            _ => unreachable!("slot was just made an object"),
        };
    }
    current
}

fn walk_leaves(map: &Map<String, Value>, prefix: &mut String, f: &mut dyn FnMut(&str, &str)) {
    for (key, value) in map {
        let restore = prefix.len();
        if !prefix.is_empty() {
            prefix.push('.');
        }
        prefix.push_str(key);
        match value {
            Value::Object(child) => walk_leaves(child, prefix, f),
            Value::String(text) => f(prefix, text),
            _ => {}
        }
        prefix.truncate(restore);
    }
}
