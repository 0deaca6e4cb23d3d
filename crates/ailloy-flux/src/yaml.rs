use std::collections::BTreeMap;

use crate::error::FluxError;
use crate::tree::FluxTree;

impl FluxTree {
    pub fn from_yaml(raw: &str) -> Result<FluxTree, FluxError> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(raw).map_err(|e| FluxError::parse("<flux>", e.to_string()))?;
        Ok(from_yaml_value(&value))
    }

    pub fn to_yaml(&self) -> Result<String, FluxError> {
        let value = to_yaml_value(self);
        serde_yaml::to_string(&value).map_err(|e| FluxError::parse("<flux>", e.to_string()))
    }

    pub fn to_json(&self) -> serde_json::Value {
        to_json_value(self)
    }
}

fn from_yaml_value(value: &serde_yaml::Value) -> FluxTree {
    match value {
        serde_yaml::Value::Null => FluxTree::Null,
        serde_yaml::Value::Bool(b) => FluxTree::Bool(*b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                FluxTree::Int(i)
            } else {
                FluxTree::Str(n.to_string())
            }
        }
        serde_yaml::Value::String(s) => FluxTree::Str(s.clone()),
        serde_yaml::Value::Sequence(seq) => FluxTree::List(seq.iter().map(from_yaml_value).collect()),
        serde_yaml::Value::Mapping(map) => {
            let mut out = BTreeMap::new();
            for (k, v) in map {
                if let Some(key) = k.as_str() {
                    out.insert(key.to_string(), from_yaml_value(v));
                }
            }
            FluxTree::Map(out)
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml_value(&tagged.value),
    }
}

fn to_yaml_value(tree: &FluxTree) -> serde_yaml::Value {
    match tree {
        FluxTree::Null => serde_yaml::Value::Null,
        FluxTree::Str(s) => serde_yaml::Value::String(s.clone()),
        FluxTree::Int(i) => serde_yaml::Value::Number((*i).into()),
        FluxTree::Bool(b) => serde_yaml::Value::Bool(*b),
        FluxTree::List(items) => serde_yaml::Value::Sequence(items.iter().map(to_yaml_value).collect()),
        FluxTree::Map(map) => {
            let mut out = serde_yaml::Mapping::new();
            for (k, v) in map {
                out.insert(serde_yaml::Value::String(k.clone()), to_yaml_value(v));
            }
            serde_yaml::Value::Mapping(out)
        }
    }
}

fn to_json_value(tree: &FluxTree) -> serde_json::Value {
    match tree {
        FluxTree::Null => serde_json::Value::Null,
        FluxTree::Str(s) => serde_json::Value::String(s.clone()),
        FluxTree::Int(i) => serde_json::Value::from(*i),
        FluxTree::Bool(b) => serde_json::Value::Bool(*b),
        FluxTree::List(items) => serde_json::Value::Array(items.iter().map(to_json_value).collect()),
        FluxTree::Map(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                out.insert(k.clone(), to_json_value(v));
            }
            serde_json::Value::Object(out)
        }
    }
}

/// Parse a single `"dotted.path=value"` inline override. The
/// value half is parsed as a YAML scalar so `true`, `42`, `null`, and quoted
/// strings all behave as an author would expect.
pub fn parse_inline_override(raw: &str) -> Result<(String, FluxTree), FluxError> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| FluxError::InvalidOverride { raw: raw.to_string() })?;
    if path.is_empty() {
        return Err(FluxError::InvalidOverride { raw: raw.to_string() });
    }
    let parsed: serde_yaml::Value =
        serde_yaml::from_str(value).unwrap_or_else(|_| serde_yaml::Value::String(value.to_string()));
    Ok((path.to_string(), from_yaml_value(&parsed)))
}
