//! User-home configuration: the persisted foundry registry at
//! `~/.ailloy/config.yaml`, plus `$AILLOY_HOME`/`~/.ailloy` home
//! resolution, split as `Config::discover`/`discover_from` — a
//! path-driven variant for tests, a real-home-driven variant for the
//! CLI.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use ailloy_cache::write_atomic;

use crate::error::AilloyError;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundryRegistryEntry {
    pub name: String,
    pub url: String,
    #[serde(rename = "type", default = "default_foundry_type")]
    pub kind: String,
    #[serde(default = "default_foundry_status")]
    pub status: String,
    #[serde(default)]
    pub last_updated: Option<String>,
}

fn default_foundry_type() -> String {
    "index".to_string()
}

fn default_foundry_status() -> String {
    "active".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub foundries: Vec<FoundryRegistryEntry>,
}

impl GlobalConfig {
    /// Resolve from `$AILLOY_HOME` (falling back to `~/.ailloy`) and load.
    pub fn discover() -> Result<(GlobalConfig, Utf8PathBuf), AilloyError> {
        let home = home_dir()?;
        GlobalConfig::discover_from(&home)
    }

    /// Load from an explicit home directory — used directly by tests so
    /// they never depend on the real `$HOME`.
    pub fn discover_from(home: &Utf8Path) -> Result<(GlobalConfig, Utf8PathBuf), AilloyError> {
        let path = home.join(CONFIG_FILE);
        if !path.exists() {
            return Ok((GlobalConfig::default(), path));
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| AilloyError::io(path.clone(), e))?;
        let config: GlobalConfig = serde_yaml::from_str(&raw).map_err(|e| {
            AilloyError::Manifest(ailloy_manifest::ManifestError::ParseError {
                file: path.clone(),
                message: e.to_string(),
            })
        })?;
        Ok((config, path))
    }

    pub fn save(&self, path: &Utf8Path) -> Result<(), AilloyError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AilloyError::io(parent.to_path_buf(), e))?;
        }
        let rendered = serde_yaml::to_string(self).map_err(|e| {
            AilloyError::Manifest(ailloy_manifest::ManifestError::ParseError {
                file: path.to_path_buf(),
                message: e.to_string(),
            })
        })?;
        write_atomic(path, &rendered).map_err(|e| AilloyError::io(path.to_path_buf(), e))
    }

    /// `foundry add`: insert or replace the entry sharing `name`.
    pub fn upsert_foundry(&mut self, entry: FoundryRegistryEntry) {
        self.foundries.retain(|f| f.name != entry.name);
        self.foundries.push(entry);
        self.foundries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// `foundry remove NAME|URL`: matches on either field.
    pub fn remove_foundry(&mut self, name_or_url: &str) -> bool {
        let before = self.foundries.len();
        self.foundries.retain(|f| f.name != name_or_url && f.url != name_or_url);
        self.foundries.len() != before
    }
}

/// `$AILLOY_HOME` env var, falling back to `~/.ailloy`.
pub fn home_dir() -> Result<Utf8PathBuf, AilloyError> {
    if let Ok(raw) = std::env::var("AILLOY_HOME") {
        return Ok(Utf8PathBuf::from(raw));
    }
    let home = dirs::home_dir().ok_or_else(|| {
        AilloyError::io(
            Utf8PathBuf::from("~"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "could not determine home directory"),
        )
    })?;
    Utf8PathBuf::from_path_buf(home.join(".ailloy")).map_err(|raw| {
        AilloyError::io(
            Utf8PathBuf::from(raw.to_string_lossy().into_owned()),
            std::io::Error::new(std::io::ErrorKind::InvalidData, "home directory is not valid UTF-8"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(name: &str) -> FoundryRegistryEntry {
        FoundryRegistryEntry {
            name: name.to_string(),
            url: format!("https://example.com/{name}.yaml"),
            kind: "index".to_string(),
            status: "active".to_string(),
            last_updated: None,
        }
    }

    #[test]
    fn missing_config_discovers_as_empty() {
        let dir = TempDir::new().unwrap();
        let home = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let (config, _path) = GlobalConfig::discover_from(&home).unwrap();
        assert!(config.foundries.is_empty());
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let home = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let mut config = GlobalConfig::default();
        config.upsert_foundry(entry("acme"));
        config.save(&home.join(CONFIG_FILE)).unwrap();

        let (reloaded, _) = GlobalConfig::discover_from(&home).unwrap();
        assert_eq!(reloaded.foundries, config.foundries);
    }

    #[test]
    fn upsert_replaces_same_name() {
        let mut config = GlobalConfig::default();
        config.upsert_foundry(entry("acme"));
        let mut replacement = entry("acme");
        replacement.url = "https://example.com/new.yaml".to_string();
        config.upsert_foundry(replacement);
        assert_eq!(config.foundries.len(), 1);
        assert_eq!(config.foundries[0].url, "https://example.com/new.yaml");
    }

    #[test]
    fn remove_matches_name_or_url() {
        let mut config = GlobalConfig::default();
        config.upsert_foundry(entry("acme"));
        assert!(config.remove_foundry("https://example.com/acme.yaml"));
        assert!(config.foundries.is_empty());
    }
}
