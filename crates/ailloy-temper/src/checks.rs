use std::collections::{BTreeSet, HashMap};

use camino::Utf8Path;
use once_cell::sync::Lazy;
use regex::Regex;

use ailloy_manifest::{load_mold, BundleFs, MoldManifest};
use ailloy_reference::parse_reference;
use ailloy_template::TemplateEngine;

use crate::diagnostic::{Collect, Diagnostic, ValidationResult};

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{(.*?)\}\}").unwrap());
static DOTTED_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)").unwrap());

/// Run every static check over `manifest_path` in `fs`, given
/// the declared flux schema names and the names with a default in
/// `flux.yaml`. No network or process I/O is performed.
pub fn validate_bundle(
    fs: &dyn BundleFs,
    manifest_path: &str,
    schema_names: &BTreeSet<String>,
    default_names: &BTreeSet<String>,
) -> ValidationResult {
    let mut result = ValidationResult::default();

    let manifest = match load_mold(fs, manifest_path) {
        Ok(manifest) => manifest,
        Err(e) => {
            result.record(Diagnostic::error(manifest_path, e.to_string()));
            return result;
        }
    };

    check_reference_integrity(fs, &manifest, &mut result);
    check_output_conflicts(&manifest, &mut result);
    check_templates(fs, &manifest, schema_names, default_names, &mut result);
    check_ingot_references(&manifest, &mut result);

    result
}

/// No two `ResolvedFile` entries may share a dest-path, statically
/// detectable from the manifest alone — mirrors
/// `ailloy_core::output::resolve_output`'s own conflict tracking,
/// duplicated here rather than shared because that function needs a real
/// `BundleFs` to expand directory sources and temper must stay a pure
/// manifest-shape check.
fn check_output_conflicts(manifest: &MoldManifest, result: &mut ValidationResult) {
    let Some(output) = &manifest.output else { return };
    let mut dest_owner: HashMap<String, String> = HashMap::new();
    for (category, entries) in output {
        for spec in entries.specs(category) {
            if let Some(first) = dest_owner.get(&spec.dst) {
                result.record(Diagnostic::error(
                    "mold.yaml",
                    format!("output.{category}: dest `{}` already claimed by output.{first}", spec.dst),
                ));
                continue;
            }
            dest_owner.insert(spec.dst.clone(), category.clone());
        }
    }
}

fn check_reference_integrity(fs: &dyn BundleFs, manifest: &MoldManifest, result: &mut ValidationResult) {
    let Some(output) = &manifest.output else { return };
    for (category, entries) in output {
        for spec in entries.specs(category) {
            if !fs.exists(Utf8Path::new(&spec.src)) {
                result.record(Diagnostic::error(
                    "mold.yaml",
                    format!("output.{category}: referenced source `{}` does not exist", spec.src),
                ));
            }
        }
    }
}

fn check_templates(
    fs: &dyn BundleFs,
    manifest: &MoldManifest,
    schema_names: &BTreeSet<String>,
    default_names: &BTreeSet<String>,
    result: &mut ValidationResult,
) {
    let Some(output) = &manifest.output else { return };
    let engine = TemplateEngine::new();
    for (category, entries) in output {
        for spec in entries.specs(category) {
            if spec.process != Some(true) {
                continue;
            }
            let rel = Utf8Path::new(&spec.src);
            let Ok(source) = fs.read_to_string(rel) else { continue };

            // Undefined paths render as empty string, so a
            // render error here is always a genuine syntax problem.
            if let Err(e) = engine.render(&spec.src, &source, serde_json::Value::Object(Default::default())) {
                result.record(Diagnostic::error(&spec.src, format!("{category}: template does not parse: {e}")));
                continue;
            }

            for path in referenced_paths(&source) {
                if !schema_names.contains(&path) && !default_names.contains(&path) {
                    result.record(Diagnostic::warning(
                        &spec.src,
                        format!("`.{path}` is not declared in the flux schema and has no default in flux.yaml"),
                    ));
                }
            }
        }
    }
}

fn check_ingot_references(manifest: &MoldManifest, result: &mut ValidationResult) {
    for ingot_ref in &manifest.ingots {
        if let Err(e) = parse_reference(ingot_ref) {
            result.record(Diagnostic::error("mold.yaml", format!("ingots: `{ingot_ref}` {e}")));
        }
    }
}

/// Scan a template source for `{{.x.y}}`-style dotted paths, checking
/// each against the declared flux schema. Paths reached only through
/// `range`/ingot bodies are still textually present, so this stays a
/// plain regex scan rather than a full parse.
pub(crate) fn referenced_paths(source: &str) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    for capture in TAG.captures_iter(source) {
        let content = capture.get(1).unwrap().as_str();
        for m in DOTTED_PATH.find_iter(content) {
            paths.insert(m.as_str().trim_start_matches('.').to_string());
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referenced_paths_collects_dotted_names() {
        let source = "{{.project.name}} and {{range .items}}{{.sku}}{{end}} {{default \"x\" .ore.status}}";
        let paths = referenced_paths(source);
        assert!(paths.contains("project.name"));
        assert!(paths.contains("items"));
        assert!(paths.contains("sku"));
        assert!(paths.contains("ore.status"));
    }
}
