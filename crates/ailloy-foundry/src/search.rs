use async_trait::async_trait;

use crate::error::FoundryError;
use crate::model::{CatalogEntry, FoundryIndex};

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub index_only: bool,
    pub github_only: bool,
}

/// A GitHub-topic search, abstracted the same way the reference resolver
/// abstracts `git`: the concrete implementation shells out to
/// `gh search repos --topic ...` through a `ProcessRunner`, but search logic
/// never depends on that directly.
#[async_trait]
pub trait SearchRunner: Send + Sync {
    async fn search_topic(&self, topic: &str, query: &str) -> Result<Vec<CatalogEntry>, FoundryError>;
}

fn matches_query(entry: &CatalogEntry, query: &str) -> bool {
    let query = query.to_lowercase();
    entry.name.to_lowercase().contains(&query) || entry.tags.iter().any(|t| t.to_lowercase().contains(&query))
}

/// Search across `indexes` for `query`. When `options.github_only`
/// is set, `github_search` is also consulted and its results merged in.
pub async fn search(
    indexes: &[FoundryIndex],
    query: &str,
    options: &SearchOptions,
    github_search: Option<&dyn SearchRunner>,
) -> Result<Vec<CatalogEntry>, FoundryError> {
    let mut results: Vec<CatalogEntry> = Vec::new();

    if !options.index_only || github_search.is_none() {
        for index in indexes {
            for entry in &index.molds {
                if matches_query(entry, query) {
                    results.push(entry.clone());
                }
            }
        }
    }

    if options.github_only {
        if let Some(runner) = github_search {
            let found = runner.search_topic("ailloy-mold", query).await?;
            results.extend(found);
        }
    }

    let mut seen = std::collections::BTreeSet::new();
    results.retain(|entry| seen.insert(entry.source.clone()));
    results.sort_by(|a, b| b.verified.cmp(&a.verified).then_with(|| a.name.cmp(&b.name)));
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, verified: bool) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            source: format!("github.com/x/{name}"),
            description: String::new(),
            tags: vec!["cli".to_string()],
            verified,
        }
    }

    fn index_with(entries: Vec<CatalogEntry>) -> FoundryIndex {
        FoundryIndex {
            api_version: "v1".to_string(),
            kind: "foundry-index".to_string(),
            name: "demo".to_string(),
            description: String::new(),
            author: None,
            molds: entries,
        }
    }

    #[tokio::test]
    async fn orders_verified_first_then_by_name() {
        let index = index_with(vec![entry("zeta", false), entry("alpha", true), entry("beta", false)]);
        let results = search(&[index], "", &SearchOptions::default(), None).await.unwrap();
        let names: Vec<_> = results.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta", "zeta"]);
    }

    #[tokio::test]
    async fn filters_by_query_against_name_or_tags() {
        let index = index_with(vec![entry("web-mold", false), entry("other", false)]);
        let results = search(&[index], "web", &SearchOptions::default(), None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "web-mold");
    }

    #[tokio::test]
    async fn dedups_by_source() {
        let a = entry("dup", false);
        let mut b = entry("dup", false);
        b.verified = true;
        let index = index_with(vec![a, b]);
        let results = search(&[index], "", &SearchOptions::default(), None).await.unwrap();
        assert_eq!(results.len(), 1);
    }
}
