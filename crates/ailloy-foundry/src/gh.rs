//! `foundry search --github-only`: a `SearchRunner` backed by the `gh` CLI,
//! shelled out through `ProcessRunner` exactly as `ProcessGitRunner` shells
//! out to `git` — the GitHub CLI boundary named in the scope notes stays an
//! actual seam rather than a direct `std::process::Command` call.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use ailloy_runner::{CommandSpec, ProcessRunner};

use crate::error::FoundryError;
use crate::model::CatalogEntry;
use crate::search::SearchRunner;

const GH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct GhRepo {
    #[serde(rename = "fullName")]
    full_name: String,
    #[serde(default)]
    description: Option<String>,
}

pub struct GhSearchRunner<R: ProcessRunner> {
    runner: R,
}

impl<R: ProcessRunner> GhSearchRunner<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl<R: ProcessRunner + Send + Sync> SearchRunner for GhSearchRunner<R> {
    async fn search_topic(&self, topic: &str, query: &str) -> Result<Vec<CatalogEntry>, FoundryError> {
        let cmd = CommandSpec::new("gh").args(vec!["search", "repos", "--topic", topic, query, "--json", "fullName,description"]);
        let output = self.runner.run(&cmd, GH_TIMEOUT)?;
        if !output.success() {
            return Err(FoundryError::Runner(ailloy_runner::RunnerError::NonZeroExit {
                program: "gh".to_string(),
                code: output.exit_code,
                stderr: output.stderr_string(),
            }));
        }
        let repos: Vec<GhRepo> = serde_json::from_str(&output.stdout_string())
            .map_err(|e| FoundryError::Parse { source: "gh search repos --json".to_string(), message: e.to_string() })?;
        Ok(repos
            .into_iter()
            .map(|repo| CatalogEntry {
                name: repo.full_name.rsplit('/').next().unwrap_or(&repo.full_name).to_string(),
                source: format!("github.com/{}", repo.full_name),
                description: repo.description.unwrap_or_default(),
                tags: vec![topic.to_string()],
                verified: false,
            })
            .collect())
    }
}
