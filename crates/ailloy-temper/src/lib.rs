//! Static validation pass over a bundle's filesystem view.
//! Never touches the network or spawns a process: ingot references are
//! checked for well-formedness only, not resolved.

mod checks;
mod diagnostic;

use std::collections::BTreeSet;

use ailloy_manifest::{load_flux_defaults, load_flux_schema, BundleFs};

pub use diagnostic::{Diagnostic, Severity, ValidationResult};

/// Run every static validation check over the mold manifest at
/// `manifest_path` within `fs`.
pub fn temper(fs: &dyn BundleFs, manifest_path: &str) -> ValidationResult {
    let schema_names: BTreeSet<String> = load_flux_schema(fs)
        .ok()
        .flatten()
        .unwrap_or_default()
        .into_iter()
        .map(|v| v.name)
        .collect();

    let default_names: BTreeSet<String> = load_flux_defaults(fs)
        .map(|tree| collect_leaf_paths(&tree, String::new()))
        .unwrap_or_default();

    checks::validate_bundle(fs, manifest_path, &schema_names, &default_names)
}

fn collect_leaf_paths(tree: &ailloy_flux::FluxTree, prefix: String) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    if let Some(map) = tree.as_map() {
        for (key, value) in map {
            let path = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
            if value.as_map().is_some() {
                out.extend(collect_leaf_paths(value, path));
            } else {
                out.insert(path);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailloy_manifest::DirBundleFs;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn fs_view(dir: &TempDir) -> DirBundleFs {
        DirBundleFs::new(camino::Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap())
    }

    #[test]
    fn clean_bundle_has_no_errors_or_warnings() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "mold.yaml",
            r#"
apiVersion: v1
kind: mold
name: demo
version: 1.0.0
author:
  name: Ops
flux-schema:
  - name: project.name
    type: string
    required: true
output:
  commands:
    - src: README.md
      dst: README.md
      process: true
"#,
        );
        write(&dir, "README.md", "# {{.project.name}}");
        write(&dir, "flux.yaml", "project:\n  name: demo\n");

        let bundle = fs_view(&dir);
        let result = temper(&bundle, "mold.yaml");
        assert!(!result.has_errors(), "unexpected errors: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn missing_output_source_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "mold.yaml",
            r#"
apiVersion: v1
kind: mold
name: demo
version: 1.0.0
author:
  name: Ops
output:
  commands:
    - src: missing.md
      dst: missing.md
"#,
        );

        let bundle = fs_view(&dir);
        let result = temper(&bundle, "mold.yaml");
        assert!(result.has_errors());
    }

    #[test]
    fn conflicting_output_dest_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.md", "a");
        write(&dir, "b.md", "b");
        write(
            &dir,
            "mold.yaml",
            r#"
apiVersion: v1
kind: mold
name: demo
version: 1.0.0
author:
  name: Ops
output:
  commands:
    - src: a.md
      dst: shared.md
  docs:
    - src: b.md
      dst: shared.md
"#,
        );

        let bundle = fs_view(&dir);
        let result = temper(&bundle, "mold.yaml");
        assert!(result.has_errors());
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn undeclared_template_path_is_a_warning_not_an_error() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "mold.yaml",
            r#"
apiVersion: v1
kind: mold
name: demo
version: 1.0.0
author:
  name: Ops
output:
  commands:
    - src: README.md
      dst: README.md
      process: true
"#,
        );
        write(&dir, "README.md", "{{.undeclared.thing}}");

        let bundle = fs_view(&dir);
        let result = temper(&bundle, "mold.yaml");
        assert!(!result.has_errors());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn malformed_ingot_reference_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "mold.yaml",
            r#"
apiVersion: v1
kind: mold
name: demo
version: 1.0.0
author:
  name: Ops
ingots:
  - "not a valid reference!!"
"#,
        );

        let bundle = fs_view(&dir);
        let result = temper(&bundle, "mold.yaml");
        assert!(result.has_errors());
    }

    #[test]
    fn unparseable_manifest_is_a_single_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "mold.yaml", "not: [valid");

        let bundle = fs_view(&dir);
        let result = temper(&bundle, "mold.yaml");
        assert_eq!(result.errors.len(), 1);
    }
}
