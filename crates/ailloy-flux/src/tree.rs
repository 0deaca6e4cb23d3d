use std::collections::BTreeMap;

/// The tagged-variant tree that every dotted-path operation is implemented
/// on once: flux values are untyped YAML at the input boundary, and this is
/// the single internal representation for them.
#[derive(Debug, Clone, PartialEq)]
pub enum FluxTree {
    Null,
    Str(String),
    Int(i64),
    Bool(bool),
    List(Vec<FluxTree>),
    Map(BTreeMap<String, FluxTree>),
}

impl FluxTree {
    pub fn empty_map() -> Self {
        FluxTree::Map(BTreeMap::new())
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FluxTree>> {
        match self {
            FluxTree::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FluxTree::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FluxTree::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_empty_leaf(&self) -> bool {
        matches!(self, FluxTree::Null)
            || matches!(self, FluxTree::Str(s) if s.is_empty())
            || matches!(self, FluxTree::List(l) if l.is_empty())
    }

    /// Render a value for display purposes (wizard review section, `anneal
    /// --list`): scalars as their natural text form, collections as YAML flow.
    pub fn display_value(&self) -> String {
        match self {
            FluxTree::Null => String::new(),
            FluxTree::Str(s) => s.clone(),
            FluxTree::Int(i) => i.to_string(),
            FluxTree::Bool(b) => b.to_string(),
            FluxTree::List(items) => items
                .iter()
                .map(FluxTree::display_value)
                .collect::<Vec<_>>()
                .join(", "),
            FluxTree::Map(_) => "{ ... }".to_string(),
        }
    }

    /// Read a dotted path (`a.b.c`), traversing `Map` levels. Returns `None`
    /// for an undefined path — callers in the template engine treat that as
    /// the empty string.
    pub fn get_path(&self, dotted: &str) -> Option<&FluxTree> {
        let mut node = self;
        for segment in dotted.split('.') {
            node = match node {
                FluxTree::Map(m) => m.get(segment)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Write a dotted path, creating missing intermediate maps.
    pub fn set_path(&mut self, dotted: &str, value: FluxTree) {
        let segments: Vec<&str> = dotted.split('.').collect();
        self.set_path_segments(&segments, value);
    }

    fn set_path_segments(&mut self, segments: &[&str], value: FluxTree) {
        let Some((head, rest)) = segments.split_first() else {
            return;
        };
        if !matches!(self, FluxTree::Map(_)) {
            *self = FluxTree::empty_map();
        }
        let FluxTree::Map(map) = self else { unreachable!() };
        if rest.is_empty() {
            map.insert((*head).to_string(), value);
        } else {
            let entry = map
                .entry((*head).to_string())
                .or_insert_with(FluxTree::empty_map);
            entry.set_path_segments(rest, value);
        }
    }

    /// Remove a dotted path if present (`anneal --delete`). A no-op if the
    /// path, or any intermediate segment, doesn't exist.
    pub fn remove_path(&mut self, dotted: &str) {
        let segments: Vec<&str> = dotted.split('.').collect();
        self.remove_path_segments(&segments);
    }

    fn remove_path_segments(&mut self, segments: &[&str]) {
        let FluxTree::Map(map) = self else { return };
        let Some((head, rest)) = segments.split_first() else { return };
        if rest.is_empty() {
            map.remove(*head);
        } else if let Some(child) = map.get_mut(*head) {
            child.remove_path_segments(rest);
        }
    }

    /// Deep-merge `other` into `self` in place: where both sides are maps at
    /// a key, recurse; otherwise `other` replaces. Lists are replaced, never
    /// concatenated.
    pub fn deep_merge(&mut self, other: FluxTree) {
        match (self, other) {
            (FluxTree::Map(dst), FluxTree::Map(src)) => {
                for (key, value) in src {
                    match dst.get_mut(&key) {
                        Some(existing) if matches!(existing, FluxTree::Map(_)) && matches!(value, FluxTree::Map(_)) => {
                            existing.deep_merge(value);
                        }
                        _ => {
                            dst.insert(key, value);
                        }
                    }
                }
            }
            (dst, other) => {
                *dst = other;
            }
        }
    }

    /// Coerce a default value's string form: `"true"`/`"false"`
    /// become bool, integer-like text becomes int, otherwise string.
    pub fn coerce_default(raw: &str) -> FluxTree {
        match raw {
            "true" => FluxTree::Bool(true),
            "false" => FluxTree::Bool(false),
            _ => {
                if let Ok(i) = raw.parse::<i64>() {
                    FluxTree::Int(i)
                } else {
                    FluxTree::Str(raw.to_string())
                }
            }
        }
    }
}
