use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::atomic::write_atomic;
use crate::error::LockfileError;

const API_VERSION: &str = "v1";
const KIND: &str = "ailloy-lock";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEntry {
    pub name: String,
    pub source: String,
    #[serde(default)]
    pub version: String,
    pub commit: String,
    #[serde(default)]
    pub subpath: String,
    pub timestamp: String,
}

impl LockEntry {
    pub fn cache_key(&self) -> String {
        if self.subpath.is_empty() {
            self.source.clone()
        } else {
            format!("{}//{}", self.source, self.subpath)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LockFileDocument {
    #[serde(rename = "apiVersion")]
    api_version: String,
    kind: String,
    #[serde(default)]
    molds: Vec<LockEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct LockFile {
    pub entries: Vec<LockEntry>,
}

impl LockFile {
    pub fn read(path: &Utf8Path) -> Result<LockFile, LockfileError> {
        if !path.exists() {
            return Ok(LockFile::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| LockfileError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let doc: LockFileDocument = serde_yaml::from_str(&raw).map_err(|e| LockfileError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(LockFile { entries: doc.molds })
    }

    pub fn write(&self, path: &Utf8Path) -> Result<(), LockfileError> {
        let doc = LockFileDocument {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            molds: self.entries.clone(),
        };
        let rendered = serde_yaml::to_string(&doc).map_err(|e| LockfileError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        write_atomic(path, &rendered).map_err(|e| LockfileError::Write {
            path: path.to_path_buf(),
            cause: e,
        })
    }

    pub fn find_by_key(&self, key: &str) -> Option<&LockEntry> {
        self.entries.iter().find(|e| e.cache_key() == key)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&LockEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Replace any existing entry sharing `entry`'s cache-key: at most
    /// one entry per cache-key.
    pub fn upsert(&mut self, entry: LockEntry) {
        let key = entry.cache_key();
        self.entries.retain(|e| e.cache_key() != key);
        self.entries.push(entry);
        self.entries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// `quench`: assert every entry is fully pinned; never mutates.
    pub fn assert_pinned(&self) -> Result<(), LockfileError> {
        for entry in &self.entries {
            if entry.commit.is_empty() {
                return Err(LockfileError::Incomplete {
                    name: entry.name.clone(),
                    field: "commit".to_string(),
                });
            }
        }
        Ok(())
    }
}

pub fn default_lockfile_path(project_root: &Utf8Path) -> Utf8PathBuf {
    project_root.join("ailloy.lock")
}
