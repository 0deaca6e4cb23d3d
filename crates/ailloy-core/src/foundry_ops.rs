//! `foundry add/list/remove/update/search`: wires the persisted
//! `GlobalConfig` registry to `ailloy-foundry`'s index fetcher
//! and searcher.

use camino::Utf8Path;

use ailloy_foundry::{fetch_index, search, CatalogEntry, FoundryIndex, HttpGetter, SearchOptions, SearchRunner};
use ailloy_runner::ProcessRunner;

use crate::config::{FoundryRegistryEntry, GlobalConfig};
use crate::error::AilloyError;

/// `foundry add URL`: fetch the index once (to fail fast on a bad URL),
/// then persist the registry entry. `name` is the short alias users
/// reference it by in `foundry remove`/`foundry update`.
#[allow(clippy::too_many_arguments)]
pub async fn foundry_add<G: HttpGetter, R: ProcessRunner>(
    config: &mut GlobalConfig,
    config_path: &Utf8Path,
    name: &str,
    url: &str,
    foundry_cache_dir: &Utf8Path,
    http: &G,
    runner: &R,
    timestamp: &str,
) -> Result<FoundryIndex, AilloyError> {
    let index = fetch_index(url, name, foundry_cache_dir, http, runner).await?;
    config.upsert_foundry(FoundryRegistryEntry {
        name: name.to_string(),
        url: url.to_string(),
        kind: "index".to_string(),
        status: "active".to_string(),
        last_updated: Some(timestamp.to_string()),
    });
    config.save(config_path)?;
    Ok(index)
}

/// `foundry list`: read-only view of the persisted registry.
pub fn foundry_list(config: &GlobalConfig) -> &[FoundryRegistryEntry] {
    &config.foundries
}

/// `foundry remove NAME|URL`. Returns whether an entry was actually removed.
pub fn foundry_remove(config: &mut GlobalConfig, config_path: &Utf8Path, name_or_url: &str) -> Result<bool, AilloyError> {
    let removed = config.remove_foundry(name_or_url);
    if removed {
        config.save(config_path)?;
    }
    Ok(removed)
}

/// `foundry update`: re-fetch every registered index. Doesn't mutate the
/// registry itself — only the on-disk foundry cache the fetcher writes to.
pub async fn foundry_update<G: HttpGetter, R: ProcessRunner>(
    config: &GlobalConfig,
    foundry_cache_dir: &Utf8Path,
    http: &G,
    runner: &R,
) -> Result<Vec<FoundryIndex>, AilloyError> {
    let mut indexes = Vec::with_capacity(config.foundries.len());
    for entry in &config.foundries {
        let index = fetch_index(&entry.url, &entry.name, foundry_cache_dir, http, runner).await?;
        indexes.push(index);
    }
    Ok(indexes)
}

/// `foundry search QUERY [--index-only|--github-only]`.
pub async fn foundry_search(
    indexes: &[FoundryIndex],
    query: &str,
    options: &SearchOptions,
    github_search: Option<&dyn SearchRunner>,
) -> Result<Vec<CatalogEntry>, AilloyError> {
    Ok(search(indexes, query, options, github_search).await?)
}
