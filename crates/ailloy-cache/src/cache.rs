use std::io::Write;
use std::time::{Duration, SystemTime};

use camino::{Utf8Path, Utf8PathBuf};
use fd_lock::RwLock;

use ailloy_reference::{ParsedReference, ResolvedVersion};
use ailloy_runner::{CommandSpec, ProcessRunner};

use crate::atomic::rename_into_place;
use crate::error::CacheError;

/// Bit-exact cache path layout:
/// `<cacheRoot>/<host>/<owner>/<repo>/<ref-label>/`.
pub fn ref_label(resolved: &ResolvedVersion) -> String {
    match &resolved.tag {
        Some(tag) => {
            let short = &resolved.commit[..resolved.commit.len().min(7)];
            format!("{tag}@{short}")
        }
        None => resolved.commit.clone(),
    }
}

pub fn cache_entry_path(cache_root: &Utf8Path, reference: &ParsedReference, resolved: &ResolvedVersion) -> Utf8PathBuf {
    cache_root
        .join(&reference.host)
        .join(&reference.owner)
        .join(&reference.repo)
        .join(ref_label(resolved))
}

/// A named directory that satisfies the `git clone`-into-cache half of the
/// fetcher, abstracted behind `ProcessRunner` so no shell
/// string is ever built from a reference or commit sha.
pub trait GitCloner {
    fn shallow_clone_commit(
        &self,
        host: &str,
        owner: &str,
        repo: &str,
        commit: &str,
        dest: &Utf8Path,
    ) -> Result<(), CacheError>;
}

pub struct ProcessGitCloner<R: ProcessRunner> {
    runner: R,
}

impl<R: ProcessRunner> ProcessGitCloner<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    fn run(&self, args: Vec<&str>, cwd: Option<&Utf8Path>) -> Result<(), CacheError> {
        let mut cmd = CommandSpec::new("git").args(args);
        if let Some(cwd) = cwd {
            cmd = cmd.cwd(cwd.to_path_buf());
        }
        let output = self.runner.run(&cmd, Duration::from_secs(120))?;
        if !output.success() {
            return Err(CacheError::Runner(ailloy_runner::RunnerError::NonZeroExit {
                program: "git".to_string(),
                code: output.exit_code,
                stderr: output.stderr_string(),
            }));
        }
        Ok(())
    }
}

impl<R: ProcessRunner> GitCloner for ProcessGitCloner<R> {
    fn shallow_clone_commit(
        &self,
        host: &str,
        owner: &str,
        repo: &str,
        commit: &str,
        dest: &Utf8Path,
    ) -> Result<(), CacheError> {
        std::fs::create_dir_all(dest).map_err(|e| CacheError::Io {
            path: dest.to_path_buf(),
            cause: e,
        })?;
        let url = format!("https://{host}/{owner}/{repo}.git");
        self.run(vec!["init", "--quiet"], Some(dest))?;
        self.run(vec!["remote", "add", "origin", &url], Some(dest))?;
        self.run(vec!["fetch", "--quiet", "--depth", "1", "origin", commit], Some(dest))?;
        self.run(vec!["checkout", "--quiet", "FETCH_HEAD"], Some(dest))?;
        Ok(())
    }
}

/// A per-commit advisory lock file with stale-lock reclaim. Combines
/// the marker-file-with-mtime staleness check
/// with a real `fd_lock::RwLock` held for the lifetime of the guard, so a
/// live holder is excluded at the OS level rather than only by convention.
pub struct FetchLock {
    path: Utf8PathBuf,
    _fd_lock: Box<RwLock<std::fs::File>>,
}

impl FetchLock {
    /// Acquire the lock for `entry_path`, reclaiming it if its marker file
    /// is older than `stale_after`. Returns `Err(Locked)` if another live
    /// holder exists.
    pub fn acquire(entry_path: &Utf8Path, stale_after: Duration) -> Result<FetchLock, CacheError> {
        let lock_path = Utf8PathBuf::from(format!("{entry_path}.lock"));
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CacheError::Io {
                path: parent.to_path_buf(),
                cause: e,
            })?;
        }
        if let Ok(metadata) = std::fs::metadata(&lock_path) {
            if let Ok(modified) = metadata.modified() {
                if SystemTime::now().duration_since(modified).unwrap_or_default() > stale_after {
                    let _ = std::fs::remove_file(&lock_path);
                }
            }
        }

        let file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| CacheError::Io { path: lock_path.clone(), cause: e })?;

        let mut rw_lock = Box::new(RwLock::new(file));
        {
            let mut guard = rw_lock
                .try_write()
                .map_err(|_| CacheError::Locked { path: lock_path.clone() })?;
            let pid = std::process::id().to_string();
            guard.set_len(0).map_err(|e| CacheError::Io { path: lock_path.clone(), cause: e })?;
            guard.write_all(pid.as_bytes()).map_err(|e| CacheError::Io { path: lock_path.clone(), cause: e })?;
            guard.flush().map_err(|e| CacheError::Io { path: lock_path.clone(), cause: e })?;
        }

        Ok(FetchLock { path: lock_path, _fd_lock: rw_lock })
    }
}

impl Drop for FetchLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Satisfy the entry for `(reference, resolved)`: return the cache path
/// with no network if it already exists, otherwise shallow-clone into a
/// temp staging dir under a per-commit advisory lock and atomically
/// rename into place.
pub fn fetch(
    cache_root: &Utf8Path,
    reference: &ParsedReference,
    resolved: &ResolvedVersion,
    cloner: &dyn GitCloner,
    stale_lock_after: Duration,
) -> Result<Utf8PathBuf, CacheError> {
    let entry_path = cache_entry_path(cache_root, reference, resolved);
    if entry_path.exists() {
        return Ok(entry_path);
    }

    let _lock = FetchLock::acquire(&entry_path, stale_lock_after)?;
    if entry_path.exists() {
        return Ok(entry_path);
    }

    let staging = Utf8PathBuf::from(format!("{entry_path}.tmp-{}", std::process::id()));
    if staging.exists() {
        std::fs::remove_dir_all(&staging).ok();
    }
    cloner.shallow_clone_commit(&reference.host, &reference.owner, &reference.repo, &resolved.commit, &staging)?;
    rename_into_place(&staging, &entry_path).map_err(|e| CacheError::Io {
        path: entry_path.clone(),
        cause: e,
    })?;
    Ok(entry_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailloy_reference::parse_reference;

    #[test]
    fn ref_label_uses_tag_and_short_sha_for_tag_refs() {
        let resolved = ResolvedVersion {
            tag: Some("v1.2.3".to_string()),
            commit: "6e5b3c1234567890abcdef1234567890abcdef12".to_string(),
        };
        assert_eq!(ref_label(&resolved), "v1.2.3@6e5b3c1");
    }

    #[test]
    fn ref_label_uses_full_sha_for_sha_refs() {
        let resolved = ResolvedVersion {
            tag: None,
            commit: "6e5b3c1234567890abcdef1234567890abcdef12".to_string(),
        };
        assert_eq!(ref_label(&resolved), resolved.commit);
    }

    #[test]
    fn cache_path_layout_is_bit_exact() {
        let reference = parse_reference("github.com/nimble-giant/my-mold").unwrap();
        let resolved = ResolvedVersion {
            tag: Some("v1.2.3".to_string()),
            commit: "6e5b3c1234567890abcdef1234567890abcdef12".to_string(),
        };
        let path = cache_entry_path(Utf8Path::new("/cache"), &reference, &resolved);
        assert_eq!(path.as_str(), "/cache/github.com/nimble-giant/my-mold/v1.2.3@6e5b3c1");
    }
}
