//! Resolves a mold reference (or the current project directory) into a
//! `BundleFs` + loaded manifest, gluing the reference resolver, the cache,
//! and the manifest loader together.

use std::sync::Arc;
use std::time::Duration;

use camino::Utf8Path;

use ailloy_cache::{fetch, GitCloner, LockEntry, LockFile};
use ailloy_manifest::{load_mold, BundleFs, DirBundleFs, MoldManifest};
use ailloy_reference::{parse_reference, resolve_version, GitRunner, ParsedReference, ResolvedVersion};

use crate::error::AilloyError;

const STALE_LOCK_AFTER: Duration = Duration::from_secs(10 * 60);

pub struct ResolvedBundle {
    pub fs: Arc<dyn BundleFs + Send + Sync>,
    pub manifest: MoldManifest,
    pub reference: Option<ParsedReference>,
    pub resolved_version: Option<ResolvedVersion>,
}

/// `reference = None` reads the bundle directly out of `project_root` (the
/// `forge`/`temper` "no REFERENCE given" case: operate on the project's own
/// `mold.yaml`). Otherwise the reference is parsed and, when `lockfile`
/// already carries a fully-pinned entry for its cache key, that pin is
/// reused rather than re-resolved — this is what makes repeated `cast` of
/// the same reference idempotent instead of hitting the network
/// every time.
pub fn resolve_bundle(
    reference: Option<&str>,
    project_root: &Utf8Path,
    cache_root: &Utf8Path,
    lockfile: &LockFile,
    git: &dyn GitRunner,
    cloner: &dyn GitCloner,
) -> Result<ResolvedBundle, AilloyError> {
    let Some(raw) = reference else {
        let fs: Arc<dyn BundleFs + Send + Sync> = Arc::new(DirBundleFs::new(project_root.to_path_buf()));
        let manifest = load_mold(fs.as_ref(), "mold.yaml")?;
        return Ok(ResolvedBundle { fs, manifest, reference: None, resolved_version: None });
    };

    let parsed = parse_reference(raw)?;
    let cache_key = parsed.cache_key();

    let resolved = match lockfile.find_by_key(&cache_key) {
        Some(entry) if !entry.commit.is_empty() => pinned_version(entry),
        _ => resolve_version(&parsed, git)?,
    };

    let entry_path = fetch(cache_root, &parsed, &resolved, cloner, STALE_LOCK_AFTER)?;
    let bundle_root = match &parsed.subpath {
        Some(sub) if !sub.is_empty() => entry_path.join(sub),
        _ => entry_path,
    };

    let fs: Arc<dyn BundleFs + Send + Sync> = Arc::new(DirBundleFs::new(bundle_root));
    let manifest = load_mold(fs.as_ref(), "mold.yaml")?;
    Ok(ResolvedBundle { fs, manifest, reference: Some(parsed), resolved_version: Some(resolved) })
}

fn pinned_version(entry: &LockEntry) -> ResolvedVersion {
    ResolvedVersion {
        tag: if entry.version.is_empty() { None } else { Some(entry.version.clone()) },
        commit: entry.commit.clone(),
    }
}

/// Build the `LockEntry` a successful `cast`/`recast` of a remote
/// reference should upsert, given `timestamp` (caller-supplied since this
/// crate never calls `chrono::Utc::now()` itself — see module docs on
/// determinism).
pub fn lock_entry_for(manifest: &MoldManifest, reference: &ParsedReference, resolved: &ResolvedVersion, timestamp: &str) -> LockEntry {
    LockEntry {
        name: manifest.name.clone(),
        source: format!("{}/{}/{}", reference.host, reference.owner, reference.repo),
        version: resolved.tag.clone().unwrap_or_default(),
        commit: resolved.commit.clone(),
        subpath: reference.subpath.clone().unwrap_or_default(),
        timestamp: timestamp.to_string(),
    }
}
