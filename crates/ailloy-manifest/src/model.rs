use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const API_VERSION: &str = "v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FluxType {
    String,
    Bool,
    Int,
    List,
    Select,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverSpec {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub also_sets: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FluxVar {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: FluxType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discover: Option<DiscoverSpec>,
}

/// A single entry in an `output` collection.
///
/// The distinction between directory form and explicit form
/// is resolved against the bundle filesystem, not at parse time: both
/// shapes deserialize into this same struct, `process` simply stays
/// `None` when the author didn't set it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSpec {
    pub src: String,
    pub dst: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputCategory {
    /// Bare string sugar: `commands: .claude/commands/` — src defaults to
    /// the category name.
    Bare(String),
    Specs(Vec<FileSpec>),
}

impl OutputCategory {
    /// Normalize this category into its explicit `FileSpec` list, expanding
    /// the bare-string sugar form.
    pub fn specs(&self, category_name: &str) -> Vec<FileSpec> {
        match self {
            OutputCategory::Bare(dst) => vec![FileSpec {
                src: category_name.to_string(),
                dst: dst.clone(),
                process: None,
            }],
            OutputCategory::Specs(specs) => specs.clone(),
        }
    }
}

pub type OutputSpec = BTreeMap<String, OutputCategory>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoldManifest {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub author: Author,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingots: Vec<String>,
    #[serde(default, rename = "flux-schema", skip_serializing_if = "Vec::is_empty")]
    pub flux_schema: Vec<FluxVar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngotManifest {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
}

/// A resolved (source, destination, process-flag) triple produced by the
/// output resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFile {
    pub src: String,
    pub dest: String,
    pub process: bool,
}
