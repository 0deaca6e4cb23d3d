use serde::{Deserialize, Serialize};

use crate::error::FoundryError;

pub const API_VERSION: &str = "v1";
pub const KIND: &str = "foundry-index";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub source: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoundryIndex {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub molds: Vec<CatalogEntry>,
}

impl FoundryIndex {
    pub fn parse(raw: &str, source: &str) -> Result<Self, FoundryError> {
        let index: FoundryIndex = serde_yaml::from_str(raw).map_err(|e| FoundryError::Parse {
            source: source.to_string(),
            message: e.to_string(),
        })?;
        if index.api_version != API_VERSION {
            return Err(FoundryError::UnrecognizedApiVersion {
                source: source.to_string(),
                found: index.api_version,
                expected: API_VERSION.to_string(),
            });
        }
        if index.kind != KIND {
            return Err(FoundryError::UnrecognizedKind {
                source: source.to_string(),
                found: index.kind,
                expected: KIND.to_string(),
            });
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_index() {
        let raw = "apiVersion: v1\nkind: foundry-index\nname: acme\nmolds:\n  - name: x\n    source: github.com/a/x\n";
        let index = FoundryIndex::parse(raw, "acme.yaml").unwrap();
        assert_eq!(index.molds.len(), 1);
    }

    #[test]
    fn rejects_unrecognized_api_version() {
        let raw = "apiVersion: v2\nkind: foundry-index\nname: acme\n";
        let err = FoundryIndex::parse(raw, "acme.yaml").unwrap_err();
        assert!(matches!(err, FoundryError::UnrecognizedApiVersion { .. }));
    }

    #[test]
    fn rejects_wrong_kind() {
        let raw = "apiVersion: v1\nkind: mold\nname: acme\n";
        let err = FoundryIndex::parse(raw, "acme.yaml").unwrap_err();
        assert!(matches!(err, FoundryError::UnrecognizedKind { .. }));
    }
}
