//! Top-level operations: `cast`, `forge`, `quench`, `recast`, `smelt`.
//! Each composes the bundle resolver, the flux layering pipeline, the
//! template engine, and the output resolver into the behavior one CLI
//! verb needs, the same way a top-level orchestration module wires
//! together otherwise-independent phase components.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};

use ailloy_cache::{default_lockfile_path, GitCloner, LockEntry, LockFile};
use ailloy_flux::FluxTree;
use ailloy_reference::GitRunner;
use ailloy_template::{IngotResolver, TemplateEngine};

use crate::bundle::{lock_entry_for, resolve_bundle, ResolvedBundle};
use crate::error::AilloyError;
use crate::flux_scope::build_flux_scope;
use crate::ingot::FsIngotResolver;
use crate::output::resolve_output;

/// `-f/--values` file contents and `--set` overrides, already read off
/// disk / parsed off argv by the caller — this module never touches argv
/// or stdin itself.
#[derive(Debug, Clone, Default)]
pub struct FluxOverrides {
    pub overlay_yaml: Vec<String>,
    pub inline_overrides: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub dest: Utf8PathBuf,
    pub contents: Vec<u8>,
}

/// Where the ingot resolver's project- and user-level search paths live,
/// when those directories exist on disk.
#[derive(Debug, Clone, Default)]
pub struct IngotSearchDirs {
    pub project_ailloy_dir: Option<Utf8PathBuf>,
    pub global_ailloy_dir: Option<Utf8PathBuf>,
}

/// Render a resolved bundle's declared `output` tree against `flux`.
/// `with_workflows` gates the `workflows` output category, matching
/// `cast --with-workflows`; `forge` always passes `true` since it's a
/// preview of everything the mold would produce.
pub fn render_bundle(
    bundle: &ResolvedBundle,
    flux: &FluxTree,
    with_workflows: bool,
    ingot_dirs: &IngotSearchDirs,
) -> Result<Vec<RenderedFile>, AilloyError> {
    let output = bundle.manifest.output.clone().unwrap_or_default();
    let filtered: ailloy_manifest::OutputSpec = output
        .into_iter()
        .filter(|(name, _)| with_workflows || name != "workflows")
        .collect();

    let resolved = resolve_output(bundle.fs.as_ref(), &filtered)?;

    let ingot_resolver = FsIngotResolver::new(
        Arc::clone(&bundle.fs),
        ingot_dirs.project_ailloy_dir.clone(),
        ingot_dirs.global_ailloy_dir.clone(),
    );
    let engine = TemplateEngine::new();
    let flux_json = flux.to_json();

    let mut files = Vec::with_capacity(resolved.len());
    for file in resolved {
        let src = Utf8Path::new(&file.src);
        let raw = bundle.fs.read_to_string(src).map_err(|e| AilloyError::io(src.to_path_buf(), e))?;
        let contents = if file.process {
            engine
                .render_with_resolver(&file.src, &raw, flux_json.clone(), Some(Arc::clone(&ingot_resolver) as Arc<dyn IngotResolver>))?
                .into_bytes()
        } else {
            raw.into_bytes()
        };
        files.push(RenderedFile { dest: Utf8PathBuf::from(file.dest), contents });
    }
    Ok(files)
}

/// `forge [REFERENCE]`: dry-run render, no writes. The caller decides
/// whether to print to stdout or fan the results out under `-o DIR`.
#[allow(clippy::too_many_arguments)]
pub fn forge(
    reference: Option<&str>,
    project_root: &Utf8Path,
    cache_root: &Utf8Path,
    lockfile: &LockFile,
    git: &dyn GitRunner,
    cloner: &dyn GitCloner,
    overrides: &FluxOverrides,
    ingot_dirs: &IngotSearchDirs,
) -> Result<Vec<RenderedFile>, AilloyError> {
    let bundle = resolve_bundle(reference, project_root, cache_root, lockfile, git, cloner)?;
    let flux = build_flux_scope(bundle.fs.as_ref(), &bundle.manifest.flux_schema, &overrides.overlay_yaml, &overrides.inline_overrides)?;
    render_bundle(&bundle, &flux, true, ingot_dirs)
}

#[derive(Debug, Clone)]
pub struct CastReport {
    pub files_written: Vec<Utf8PathBuf>,
    pub lock_entry: Option<LockEntry>,
}

/// `cast [REFERENCE]`: resolve, render, and write into `write_root`
/// (the project root, or the user's home when `-g/--global` is set).
/// Remote references upsert a lockfile entry; `timestamp` is supplied by
/// the caller so this function stays a pure-given-its-inputs operation
///` from
/// inside a leaf/core crate).
#[allow(clippy::too_many_arguments)]
pub fn cast(
    reference: Option<&str>,
    project_root: &Utf8Path,
    write_root: &Utf8Path,
    cache_root: &Utf8Path,
    lockfile: &mut LockFile,
    git: &dyn GitRunner,
    cloner: &dyn GitCloner,
    overrides: &FluxOverrides,
    with_workflows: bool,
    ingot_dirs: &IngotSearchDirs,
    timestamp: &str,
) -> Result<CastReport, AilloyError> {
    let bundle = resolve_bundle(reference, project_root, cache_root, lockfile, git, cloner)?;
    let flux = build_flux_scope(bundle.fs.as_ref(), &bundle.manifest.flux_schema, &overrides.overlay_yaml, &overrides.inline_overrides)?;
    let rendered = render_bundle(&bundle, &flux, with_workflows, ingot_dirs)?;

    let mut files_written = Vec::with_capacity(rendered.len());
    for file in &rendered {
        let dest = write_root.join(&file.dest);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AilloyError::io(parent.to_path_buf(), e))?;
        }
        std::fs::write(&dest, &file.contents).map_err(|e| AilloyError::io(dest.clone(), e))?;
        files_written.push(dest);
    }

    let lock_entry = match (&bundle.reference, &bundle.resolved_version) {
        (Some(reference), Some(resolved_version)) => {
            let entry = lock_entry_for(&bundle.manifest, reference, resolved_version, timestamp);
            lockfile.upsert(entry.clone());
            lockfile.write(&default_lockfile_path(project_root))?;
            Some(entry)
        }
        _ => None,
    };

    Ok(CastReport { files_written, lock_entry })
}

/// `quench`: assert the project lockfile is fully pinned. Never mutates
/// anything — a pure read-and-check.
pub fn quench(project_root: &Utf8Path) -> Result<(), AilloyError> {
    let lockfile = LockFile::read(&default_lockfile_path(project_root))?;
    lockfile.assert_pinned()?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct RecastChange {
    pub name: String,
    pub old_commit: String,
    pub new_commit: String,
}

/// `recast [NAME]`: re-resolve one dependency (or every entry when `name`
/// is `None`) against the git runner, ignoring any existing pin, and
/// report what changed. `dry_run` computes the changes without writing
/// the lockfile back.
pub fn recast(
    project_root: &Utf8Path,
    cache_root: &Utf8Path,
    name: Option<&str>,
    git: &dyn GitRunner,
    cloner: &dyn GitCloner,
    dry_run: bool,
    timestamp: &str,
) -> Result<Vec<RecastChange>, AilloyError> {
    let lockfile_path = default_lockfile_path(project_root);
    let mut lockfile = LockFile::read(&lockfile_path)?;
    let empty_lockfile = LockFile::default();

    let targets: Vec<LockEntry> = match name {
        Some(n) => lockfile.find_by_name(n).cloned().into_iter().collect(),
        None => lockfile.entries.clone(),
    };

    let mut changes = Vec::new();
    for entry in targets {
        let resolved = resolve_bundle(Some(&reference_string(&entry)), project_root, cache_root, &empty_lockfile, git, cloner)?;
        let (Some(parsed), Some(new_version)) = (&resolved.reference, &resolved.resolved_version) else {
            continue;
        };
        if new_version.commit != entry.commit {
            changes.push(RecastChange { name: entry.name.clone(), old_commit: entry.commit.clone(), new_commit: new_version.commit.clone() });
        }
        if !dry_run {
            let new_entry = lock_entry_for(&resolved.manifest, parsed, new_version, timestamp);
            lockfile.upsert(new_entry);
        }
    }

    if !dry_run && !changes.is_empty() {
        lockfile.write(&lockfile_path)?;
    }
    Ok(changes)
}

fn reference_string(entry: &LockEntry) -> String {
    if entry.subpath.is_empty() {
        entry.source.clone()
    } else {
        format!("{}//{}", entry.source, entry.subpath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct PanicGit;
    impl GitRunner for PanicGit {
        fn list_tags(&self, _: &str, _: &str, _: &str) -> Result<Vec<String>, ailloy_reference::ReferenceError> {
            panic!("not reached in these tests")
        }
        fn resolve_ref_to_sha(&self, _: &str, _: &str, _: &str, _: &str) -> Result<String, ailloy_reference::ReferenceError> {
            panic!("not reached in these tests")
        }
        fn default_branch_head(&self, _: &str, _: &str, _: &str) -> Result<String, ailloy_reference::ReferenceError> {
            panic!("not reached in these tests")
        }
        fn sha_exists(&self, _: &str, _: &str, _: &str, _: &str) -> Result<bool, ailloy_reference::ReferenceError> {
            panic!("not reached in these tests")
        }
    }
    struct PanicCloner;
    impl GitCloner for PanicCloner {
        fn shallow_clone_commit(&self, _: &str, _: &str, _: &str, _: &str, _: &Utf8Path) -> Result<(), ailloy_cache::CacheError> {
            panic!("not reached in these tests")
        }
    }

    fn write(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn cast_renders_and_writes_local_bundle_without_touching_network() {
        let project = TempDir::new().unwrap();
        write(&project, "mold.yaml", "apiVersion: v1\nkind: mold\nname: demo\nversion: 1.0.0\nauthor:\n  name: a\noutput:\n  commands: .claude/commands\n");
        write(&project, "commands/a.md", "hello {{.name}}");

        let root = Utf8PathBuf::from_path_buf(project.path().to_path_buf()).unwrap();
        let mut lockfile = LockFile::default();
        let overrides = FluxOverrides { overlay_yaml: vec![], inline_overrides: vec!["name=world".to_string()] };

        let report = cast(
            None,
            &root,
            &root,
            &root,
            &mut lockfile,
            &PanicGit,
            &PanicCloner,
            &overrides,
            false,
            &IngotSearchDirs::default(),
            "2026-01-01T00:00:00Z",
        )
        .unwrap();

        assert_eq!(report.files_written.len(), 1);
        assert!(report.lock_entry.is_none());
        let written = fs::read_to_string(root.join(".claude/commands/a.md")).unwrap();
        assert_eq!(written, "hello world");
    }

    #[test]
    fn quench_rejects_an_unpinned_lockfile() {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let mut lockfile = LockFile::default();
        lockfile.upsert(LockEntry {
            name: "demo".to_string(),
            source: "github.com/a/b".to_string(),
            version: String::new(),
            commit: String::new(),
            subpath: String::new(),
            timestamp: "2026-01-01T00:00:00Z".to_string(),
        });
        lockfile.write(&default_lockfile_path(&root)).unwrap();

        assert!(quench(&root).is_err());
    }

    #[test]
    fn quench_accepts_a_fully_pinned_lockfile() {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let mut lockfile = LockFile::default();
        lockfile.upsert(LockEntry {
            name: "demo".to_string(),
            source: "github.com/a/b".to_string(),
            version: "v1.0.0".to_string(),
            commit: "a".repeat(40),
            subpath: String::new(),
            timestamp: "2026-01-01T00:00:00Z".to_string(),
        });
        lockfile.write(&default_lockfile_path(&root)).unwrap();

        assert!(quench(&root).is_ok());
    }

    #[test]
    fn quench_with_no_lockfile_passes() {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        assert!(quench(&root).is_ok());
    }
}
