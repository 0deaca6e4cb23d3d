//! Glues `BundleFs` + manifest loading + the template engine together to
//! satisfy the `ingot "name"` callable.

use std::fmt;
use std::sync::{Arc, Weak};

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;

use ailloy_manifest::{load_ingot, BundleFs, DirBundleFs};
use ailloy_template::{IngotResolver, TemplateEngine, TemplateError};

#[derive(Debug)]
struct IngotNotFoundCause {
    name: String,
    searched: Vec<Utf8PathBuf>,
}

impl fmt::Display for IngotNotFoundCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ingot `{}` not found; searched {:?}", self.name, self.searched)
    }
}

impl std::error::Error for IngotNotFoundCause {}

/// Searches, in order, the bundle's own filesystem view, the project-level
/// `.ailloy/` directory, and the user-level global `.ailloy/` directory
///. An ingot named `X` is `<path>/ingots/X/ingot.yaml`; its
/// entry file (`entry` field, or its first listed file) is read and
/// expanded through the same template engine and flux scope.
pub struct FsIngotResolver {
    search_paths: Vec<Arc<dyn BundleFs + Send + Sync>>,
    engine: TemplateEngine,
    self_ref: Weak<FsIngotResolver>,
}

impl FsIngotResolver {
    /// `bundle_fs` is searched first; `project_ailloy_dir` and
    /// `global_ailloy_dir` are the project- and user-level `.ailloy/`
    /// directories, when present on disk.
    pub fn new(
        bundle_fs: Arc<dyn BundleFs + Send + Sync>,
        project_ailloy_dir: Option<Utf8PathBuf>,
        global_ailloy_dir: Option<Utf8PathBuf>,
    ) -> Arc<Self> {
        let mut search_paths: Vec<Arc<dyn BundleFs + Send + Sync>> = vec![bundle_fs];
        for dir in [project_ailloy_dir, global_ailloy_dir].into_iter().flatten() {
            search_paths.push(Arc::new(DirBundleFs::new(dir)));
        }
        Arc::new_cyclic(|weak| FsIngotResolver {
            search_paths,
            engine: TemplateEngine::new(),
            self_ref: weak.clone(),
        })
    }

    fn self_as_resolver(&self) -> Option<Arc<dyn IngotResolver>> {
        self.self_ref.upgrade().map(|arc| arc as Arc<dyn IngotResolver>)
    }
}

impl IngotResolver for FsIngotResolver {
    fn resolve_ingot(&self, name: &str, flux_json: &Value) -> Result<String, TemplateError> {
        let ingot_root = Utf8Path::new("ingots").join(name);
        let manifest_rel = ingot_root.join("ingot.yaml");
        let mut searched = Vec::new();

        for fs in &self.search_paths {
            searched.push(fs.root().join(&manifest_rel));
            if !fs.exists(&manifest_rel) {
                continue;
            }

            let manifest = load_ingot(fs.as_ref(), manifest_rel.as_str()).map_err(|e| TemplateError::Callable {
                file: manifest_rel.to_string(),
                offset: 0,
                message: "failed to load ingot manifest".to_string(),
                cause: Box::new(e),
            })?;

            let entry_name = manifest
                .entry
                .clone()
                .or_else(|| manifest.files.first().cloned())
                .ok_or_else(|| TemplateError::Callable {
                    file: manifest_rel.to_string(),
                    offset: 0,
                    message: "ingot manifest lists no files".to_string(),
                    cause: Box::new(IngotNotFoundCause { name: name.to_string(), searched: searched.clone() }),
                })?;

            let entry_rel = ingot_root.join(&entry_name);
            let source = fs.read_to_string(&entry_rel).map_err(|e| TemplateError::Callable {
                file: entry_rel.to_string(),
                offset: 0,
                message: "failed to read ingot entry file".to_string(),
                cause: Box::new(e),
            })?;

            return self.engine.render_with_resolver(entry_rel.as_str(), &source, flux_json.clone(), self.self_as_resolver());
        }

        Err(TemplateError::Callable {
            file: format!("ingot:{name}"),
            offset: 0,
            message: "ingot not found".to_string(),
            cause: Box::new(IngotNotFoundCause { name: name.to_string(), searched }),
        })
    }
}
