//! Per-verb command implementations. Each function does its own
//! printing; `run::run` only maps the returned `Result` to an exit code.

use std::io::Write as _;

use camino::{Utf8Path, Utf8PathBuf};

use ailloy_cache::{LockFile, ProcessGitCloner};
use ailloy_core::config::{home_dir, GlobalConfig};
use ailloy_core::error::AilloyError;
use ailloy_core::{CastReport, FluxOverrides, IngotSearchDirs};
use ailloy_flux::FluxTree;
use ailloy_foundry::{GhSearchRunner, ReqwestGetter, SearchOptions, SearchRunner};
use ailloy_manifest::{load_mold, DirBundleFs};
use ailloy_reference::ProcessGitRunner;
use ailloy_runner::NativeRunner;
use ailloy_wizard::WizardEngine;

use super::args::FoundryCommands;
use super::discover_runner::ShellDiscoverRunner;

fn current_dir() -> Result<Utf8PathBuf, AilloyError> {
    let raw = std::env::current_dir().map_err(|e| AilloyError::io(Utf8PathBuf::from("."), e))?;
    Utf8PathBuf::from_path_buf(raw).map_err(|p| {
        AilloyError::io(
            Utf8PathBuf::from(p.to_string_lossy().into_owned()),
            std::io::Error::new(std::io::ErrorKind::InvalidData, "current directory is not valid UTF-8"),
        )
    })
}

fn cache_root() -> Result<Utf8PathBuf, AilloyError> {
    Ok(home_dir()?.join("cache"))
}

fn foundry_cache_dir() -> Result<Utf8PathBuf, AilloyError> {
    Ok(home_dir()?.join("cache/foundries"))
}

/// Where `anneal` persists flux values outside of an interactive session:
/// `.ailloy/flux.yaml` under the project root, or `flux.yaml` directly
/// under the user's home when `-g/--global`.
fn anneal_flux_path(global: bool) -> Result<Utf8PathBuf, AilloyError> {
    if global {
        Ok(home_dir()?.join("flux.yaml"))
    } else {
        Ok(current_dir()?.join(".ailloy/flux.yaml"))
    }
}

fn read_flux_file(path: &Utf8Path) -> Result<FluxTree, AilloyError> {
    if !path.exists() {
        return Ok(FluxTree::empty_map());
    }
    let raw = std::fs::read_to_string(path).map_err(|e| AilloyError::io(path.to_path_buf(), e))?;
    Ok(FluxTree::from_yaml(&raw)?)
}

fn write_flux_file(path: &Utf8Path, tree: &FluxTree) -> Result<(), AilloyError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AilloyError::io(parent.to_path_buf(), e))?;
    }
    let rendered = tree.to_yaml()?;
    std::fs::write(path, rendered).map_err(|e| AilloyError::io(path.to_path_buf(), e))
}

fn read_overlays(values: &[Utf8PathBuf]) -> Result<Vec<String>, AilloyError> {
    values.iter().map(|path| std::fs::read_to_string(path).map_err(|e| AilloyError::io(path.clone(), e))).collect()
}

fn print_leaves(tree: &FluxTree, prefix: &str) {
    let Some(map) = tree.as_map() else {
        return;
    };
    for (key, value) in map {
        let path = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
        if value.as_map().is_some() {
            print_leaves(value, &path);
        } else {
            println!("{path} = {}", value.display_value());
        }
    }
}

fn git_runner() -> ProcessGitRunner<NativeRunner> {
    ProcessGitRunner::new(NativeRunner::default())
}

fn git_cloner() -> ProcessGitCloner<NativeRunner> {
    ProcessGitCloner::new(NativeRunner::default())
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

// --- anneal ----------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
pub fn anneal(set: &[String], values: &[Utf8PathBuf], global: bool, list: bool, delete: Option<&str>) -> Result<(), AilloyError> {
    let flux_path = anneal_flux_path(global)?;

    if list {
        let tree = read_flux_file(&flux_path)?;
        print_leaves(&tree, "");
        return Ok(());
    }

    if let Some(key) = delete {
        let mut tree = read_flux_file(&flux_path)?;
        tree.remove_path(key);
        write_flux_file(&flux_path, &tree)?;
        println!("removed {key}");
        return Ok(());
    }

    if !set.is_empty() || !values.is_empty() {
        let mut tree = read_flux_file(&flux_path)?;
        for overlay_raw in read_overlays(values)? {
            tree.deep_merge(FluxTree::from_yaml(&overlay_raw)?);
        }
        for raw in set {
            let (name, value) = ailloy_flux::parse_inline_override(raw)?;
            tree.set_path(&name, value);
        }
        write_flux_file(&flux_path, &tree)?;
        print_leaves(&tree, "");
        return Ok(());
    }

    interactive_anneal(&flux_path)
}

/// A plain stdin/stdout line-prompt loop over `WizardEngine`'s form groups,
/// driving the wizard's reactive state machine with ordinary
/// `Read`/`Write` rather than any TUI widget set.
fn interactive_anneal(flux_path: &Utf8Path) -> Result<(), AilloyError> {
    let project_root = current_dir()?;
    let fs = DirBundleFs::new(project_root.clone());
    let manifest = load_mold(&fs, "mold.yaml")?;

    let initial = read_flux_file(flux_path)?;
    let mut engine = WizardEngine::new(manifest.flux_schema.clone(), initial);
    let discover_runner = ShellDiscoverRunner::new();

    let stdin = std::io::stdin();
    let groups = engine.groups().to_vec();
    for group in &groups {
        if !group.prefix.is_empty() {
            println!("== {} ==", group.prefix);
        }
        for field in &group.fields {
            if let Some(enabled_by) = &group.enabled_by {
                if enabled_by != &field.name && !engine.flux().get_path(enabled_by).and_then(FluxTree::as_bool).unwrap_or(false) {
                    continue;
                }
            }
            prompt_field(&mut engine, field, &stdin, &discover_runner)?;
        }
    }

    for line in engine.review() {
        println!("{}: {}", line.name, line.value);
    }

    let flux = engine.into_flux();
    write_flux_file(flux_path, &flux)?;
    println!("saved to {flux_path}");
    Ok(())
}

fn prompt_field(
    engine: &mut WizardEngine,
    field: &ailloy_manifest::FluxVar,
    stdin: &std::io::Stdin,
    discover_runner: &ShellDiscoverRunner,
) -> Result<(), AilloyError> {
    if field.var_type == ailloy_manifest::FluxType::Select && field.discover.is_some() {
        match engine.options_for(&field.name, discover_runner) {
            Ok(options) if !options.is_empty() => {
                println!("{} — choose one:", field.name);
                for (i, opt) in options.iter().enumerate() {
                    println!("  {}) {}", i + 1, opt.label);
                }
                let choice = read_line(stdin)?;
                if let Ok(index) = choice.trim().parse::<usize>() {
                    if let Some(opt) = index.checked_sub(1).and_then(|i| options.get(i)) {
                        engine.apply_selection(&field.name, opt);
                        return Ok(());
                    }
                }
                engine.set_value(&field.name, FluxTree::Str(choice.trim().to_string()));
                return Ok(());
            }
            _ => {}
        }
    }

    let label = field.description.clone().unwrap_or_else(|| field.name.clone());
    let default = field.default.clone().unwrap_or_default();
    print!("{label} [{default}]: ");
    std::io::stdout().flush().ok();
    let line = read_line(stdin)?;
    let raw = if line.trim().is_empty() { default } else { line.trim().to_string() };
    let value = match field.var_type {
        ailloy_manifest::FluxType::Bool => FluxTree::Bool(matches!(raw.as_str(), "true" | "yes" | "y")),
        ailloy_manifest::FluxType::Int => FluxTree::Int(raw.parse().unwrap_or_default()),
        ailloy_manifest::FluxType::List => FluxTree::List(raw.split(',').map(|s| FluxTree::Str(s.trim().to_string())).collect()),
        _ => FluxTree::Str(raw),
    };
    engine.set_value(&field.name, value);
    Ok(())
}

fn read_line(stdin: &std::io::Stdin) -> Result<String, AilloyError> {
    let mut line = String::new();
    stdin
        .read_line(&mut line)
        .map_err(|e| AilloyError::io(Utf8PathBuf::from("<stdin>"), e))?;
    Ok(line)
}

// --- cast / forge ------------------------------------------------------

pub fn cast(reference: Option<&str>, values: &[Utf8PathBuf], set: &[String], with_workflows: bool, global: bool) -> Result<(), AilloyError> {
    let project_root = current_dir()?;
    let write_root = if global { home_dir()? } else { project_root.clone() };
    let cache_root = cache_root()?;
    let lockfile_path = ailloy_cache::default_lockfile_path(&project_root);
    let mut lockfile = LockFile::read(&lockfile_path)?;

    let overrides = FluxOverrides { overlay_yaml: read_overlays(values)?, inline_overrides: set.to_vec() };
    let git = git_runner();
    let cloner = git_cloner();

    let report: CastReport = ailloy_core::cast(
        reference,
        &project_root,
        &write_root,
        &cache_root,
        &mut lockfile,
        &git,
        &cloner,
        &overrides,
        with_workflows,
        &ingot_search_dirs(&project_root),
        &timestamp(),
    )?;

    for path in &report.files_written {
        println!("wrote {path}");
    }
    if let Some(entry) = &report.lock_entry {
        println!("pinned {} @ {}", entry.name, entry.commit);
    }
    Ok(())
}

pub fn forge(reference: Option<&str>, output: Option<&Utf8Path>, values: &[Utf8PathBuf], set: &[String]) -> Result<(), AilloyError> {
    let project_root = current_dir()?;
    let cache_root = cache_root()?;
    let lockfile = LockFile::read(&ailloy_cache::default_lockfile_path(&project_root))?;
    let overrides = FluxOverrides { overlay_yaml: read_overlays(values)?, inline_overrides: set.to_vec() };
    let git = git_runner();
    let cloner = git_cloner();

    let rendered = ailloy_core::forge(reference, &project_root, &cache_root, &lockfile, &git, &cloner, &overrides, &ingot_search_dirs(&project_root))?;

    match output {
        Some(dir) => {
            for file in &rendered {
                let dest = dir.join(&file.dest);
                if let Some(parent) = dest.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| AilloyError::io(parent.to_path_buf(), e))?;
                }
                std::fs::write(&dest, &file.contents).map_err(|e| AilloyError::io(dest.clone(), e))?;
                println!("wrote {dest}");
            }
        }
        None => {
            for file in &rendered {
                println!("--- {} ---", file.dest);
                println!("{}", String::from_utf8_lossy(&file.contents));
            }
        }
    }
    Ok(())
}

fn ingot_search_dirs(project_root: &Utf8Path) -> IngotSearchDirs {
    let project_dir = project_root.join(".ailloy/ingots");
    let global_dir = home_dir().ok().map(|h| h.join("ingots"));
    IngotSearchDirs {
        project_ailloy_dir: project_dir.exists().then_some(project_dir),
        global_ailloy_dir: global_dir.filter(|d| d.exists()),
    }
}

// --- temper --------------------------------------------------------------

pub fn temper(path: Option<&Utf8Path>) -> Result<(), AilloyError> {
    let root = match path {
        Some(p) => p.to_path_buf(),
        None => current_dir()?,
    };
    let fs = DirBundleFs::new(root);
    let result = ailloy_core::temper(&fs, "mold.yaml");

    for diagnostic in &result.errors {
        println!("error: {} ({})", diagnostic.message, diagnostic.file);
    }
    for diagnostic in &result.warnings {
        println!("warning: {} ({})", diagnostic.message, diagnostic.file);
    }
    if result.has_errors() {
        return Err(AilloyError::ValidationFailed(format!("{} error(s)", result.errors.len())));
    }
    println!("ok");
    Ok(())
}

// --- new / smelt / quench / recast ---------------------------------------

pub fn new_bundle(name: &str, output: Option<&Utf8Path>, no_agents: bool) -> Result<(), AilloyError> {
    let output_dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => current_dir()?,
    };
    let written = ailloy_core::new_bundle(&output_dir, name, !no_agents)?;
    for path in &written {
        println!("wrote {path}");
    }
    Ok(())
}

pub fn smelt() -> Result<(), AilloyError> {
    let root = current_dir()?;
    let fs = DirBundleFs::new(root.clone());
    let manifest = load_mold(&fs, "mold.yaml")?;
    let dest = root.join(format!("{}-{}.tar.gz", manifest.name, manifest.version));
    let path = ailloy_core::smelt(&fs, &dest)?;
    println!("wrote {path}");
    Ok(())
}

pub fn quench() -> Result<(), AilloyError> {
    let root = current_dir()?;
    ailloy_core::quench(&root)?;
    println!("lockfile is fully pinned");
    Ok(())
}

pub fn recast(name: Option<&str>, dry_run: bool) -> Result<(), AilloyError> {
    let project_root = current_dir()?;
    let cache_root = cache_root()?;
    let git = git_runner();
    let cloner = git_cloner();
    let changes = ailloy_core::recast(&project_root, &cache_root, name, &git, &cloner, dry_run, &timestamp())?;
    if changes.is_empty() {
        println!("nothing to update");
    }
    for change in &changes {
        println!("{}: {} -> {}", change.name, change.old_commit, change.new_commit);
    }
    Ok(())
}

// --- foundry ---------------------------------------------------------------

pub async fn foundry(command: &FoundryCommands) -> Result<(), AilloyError> {
    match command {
        FoundryCommands::Add { url } => foundry_add(url).await,
        FoundryCommands::List => foundry_list(),
        FoundryCommands::Remove { name_or_url } => foundry_remove(name_or_url),
        FoundryCommands::Update => foundry_update().await,
        FoundryCommands::Search { query, index_only, github_only } => foundry_search(query, *index_only, *github_only).await,
    }
}

fn derive_foundry_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/').trim_end_matches(".git");
    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    last.trim_end_matches(".yaml").trim_end_matches(".yml").to_string()
}

async fn foundry_add(url: &str) -> Result<(), AilloyError> {
    let (mut config, config_path) = GlobalConfig::discover()?;
    let name = derive_foundry_name(url);
    let cache_dir = foundry_cache_dir()?;
    let http = ReqwestGetter::default();
    let runner = NativeRunner::default();
    let index = ailloy_core::foundry_add(&mut config, &config_path, &name, url, &cache_dir, &http, &runner, &timestamp()).await?;
    println!("added foundry `{name}` ({} molds)", index.molds.len());
    Ok(())
}

fn foundry_list() -> Result<(), AilloyError> {
    let (config, _) = GlobalConfig::discover()?;
    for entry in ailloy_core::foundry_list(&config) {
        println!("{}\t{}\t{}", entry.name, entry.url, entry.status);
    }
    Ok(())
}

fn foundry_remove(name_or_url: &str) -> Result<(), AilloyError> {
    let (mut config, config_path) = GlobalConfig::discover()?;
    if ailloy_core::foundry_remove(&mut config, &config_path, name_or_url)? {
        println!("removed {name_or_url}");
    } else {
        println!("no foundry matched {name_or_url}");
    }
    Ok(())
}

async fn foundry_update() -> Result<(), AilloyError> {
    let (config, _) = GlobalConfig::discover()?;
    let cache_dir = foundry_cache_dir()?;
    let http = ReqwestGetter::default();
    let runner = NativeRunner::default();
    let indexes = ailloy_core::foundry_update(&config, &cache_dir, &http, &runner).await?;
    for index in &indexes {
        println!("updated {} ({} molds)", index.name, index.molds.len());
    }
    Ok(())
}

async fn foundry_search(query: &str, index_only: bool, github_only: bool) -> Result<(), AilloyError> {
    let (config, _) = GlobalConfig::discover()?;
    let cache_dir = foundry_cache_dir()?;
    let http = ReqwestGetter::default();
    let runner = NativeRunner::default();

    let mut indexes = Vec::with_capacity(config.foundries.len());
    for entry in &config.foundries {
        indexes.push(ailloy_foundry::fetch_index(&entry.url, &entry.name, &cache_dir, &http, &runner).await?);
    }

    let options = SearchOptions { index_only, github_only };
    let github_runner = github_only.then(|| GhSearchRunner::new(NativeRunner::default()));
    let github_search: Option<&dyn SearchRunner> = github_runner.as_ref().map(|r| r as &dyn SearchRunner);

    let results = ailloy_core::foundry_search(&indexes, query, &options, github_search).await?;
    for entry in &results {
        println!("{}\t{}\t{}", entry.name, entry.source, entry.description);
    }
    Ok(())
}
