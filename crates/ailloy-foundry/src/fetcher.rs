use async_trait::async_trait;
use camino::Utf8Path;

use ailloy_runner::{CommandSpec, ProcessRunner};

use crate::error::FoundryError;
use crate::model::FoundryIndex;

/// Abstracts the HTTP GET half of the fetcher so index fetching
/// is testable without a live network call.
#[async_trait]
pub trait HttpGetter: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, FoundryError>;
}

/// A `HttpGetter` backed by `reqwest`.
pub struct ReqwestGetter {
    client: reqwest::Client,
}

impl Default for ReqwestGetter {
    fn default() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

#[async_trait]
impl HttpGetter for ReqwestGetter {
    async fn get(&self, url: &str) -> Result<String, FoundryError> {
        let response = self.client.get(url).send().await.map_err(|e| FoundryError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let response = response.error_for_status().map_err(|e| FoundryError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        response.text().await.map_err(|e| FoundryError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

fn is_yaml_url(url: &str) -> bool {
    url.ends_with(".yaml") || url.ends_with(".yml")
}

/// Fetch the index for `foundry_name` from `url`: a direct
/// `.yaml`/`.yml` URL is GETed, otherwise the URL is treated as a git
/// repository and shallow-cloned into `<foundry_cache_dir>/<foundry_name>/`
/// before reading `foundry.yaml` from its root.
pub async fn fetch_index<G: HttpGetter, R: ProcessRunner>(
    url: &str,
    foundry_name: &str,
    foundry_cache_dir: &Utf8Path,
    http: &G,
    runner: &R,
) -> Result<FoundryIndex, FoundryError> {
    if is_yaml_url(url) {
        let raw = http.get(url).await?;
        return FoundryIndex::parse(&raw, url);
    }

    let dest = foundry_cache_dir.join(foundry_name);
    clone_or_update(url, &dest, runner)?;
    let manifest_path = dest.join("foundry.yaml");
    let raw = std::fs::read_to_string(&manifest_path).map_err(|e| FoundryError::Io {
        path: manifest_path.clone(),
        source: e,
    })?;
    FoundryIndex::parse(&raw, manifest_path.as_str())
}

fn clone_or_update<R: ProcessRunner>(url: &str, dest: &Utf8Path, runner: &R) -> Result<(), FoundryError> {
    use std::time::Duration;

    if dest.join(".git").exists() {
        let cmd = CommandSpec::new("git").args(vec!["pull", "--quiet", "--ff-only"]).cwd(dest.to_path_buf());
        runner.run(&cmd, Duration::from_secs(60))?;
        return Ok(());
    }

    std::fs::create_dir_all(dest).map_err(|e| FoundryError::Io { path: dest.to_path_buf(), source: e })?;
    let cmd = CommandSpec::new("git").args(vec!["clone", "--quiet", "--depth", "1", url]).arg(dest.as_str());
    runner.run(&cmd, Duration::from_secs(120))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeHttp {
        body: String,
    }

    #[async_trait]
    impl HttpGetter for FakeHttp {
        async fn get(&self, _url: &str) -> Result<String, FoundryError> {
            Ok(self.body.clone())
        }
    }

    struct NoopRunner {
        calls: Mutex<usize>,
    }

    impl ProcessRunner for NoopRunner {
        fn run(&self, _cmd: &CommandSpec, _timeout: std::time::Duration) -> Result<ailloy_runner::ProcessOutput, ailloy_runner::RunnerError> {
            *self.calls.lock().unwrap() += 1;
            Ok(ailloy_runner::ProcessOutput { stdout: Vec::new(), stderr: Vec::new(), exit_code: Some(0) })
        }
    }

    #[tokio::test]
    async fn yaml_url_fetches_without_touching_the_runner() {
        let http = FakeHttp {
            body: "apiVersion: v1\nkind: foundry-index\nname: demo\nmolds: []\n".to_string(),
        };
        let runner = NoopRunner { calls: Mutex::new(0) };
        let index = fetch_index(
            "https://example.com/foundry.yaml",
            "demo",
            Utf8Path::new("/tmp/does-not-matter"),
            &http,
            &runner,
        )
        .await
        .unwrap();
        assert_eq!(index.name, "demo");
        assert_eq!(*runner.calls.lock().unwrap(), 0);
    }
}
