//! Output Resolver: turns a mold's `output` map into a flat,
//! conflict-free list of `ResolvedFile`s the caster writes to disk.

use std::collections::HashMap;

use camino::Utf8Path;

use ailloy_manifest::{BundleFs, FileSpec, OutputSpec, ResolvedFile};

use crate::error::AilloyError;

const YAML_EXT: &str = "yml";

/// Resolve every category's `FileSpec` list against `fs` into the files
/// that will actually be written, in category-declaration order with each
/// category's own entries in lexicographic order (the order
/// `DirBundleFs::walk_files` already returns).
pub fn resolve_output(fs: &dyn BundleFs, output: &OutputSpec) -> Result<Vec<ResolvedFile>, AilloyError> {
    let mut resolved = Vec::new();
    let mut dest_owner: HashMap<String, String> = HashMap::new();

    for (category, entries) in output {
        for spec in entries.specs(category) {
            for file in resolve_spec(fs, &spec)? {
                if let Some(first) = dest_owner.get(&file.dest) {
                    return Err(AilloyError::OutputConflict {
                        dest: file.dest,
                        first: first.clone(),
                        second: category.clone(),
                    });
                }
                dest_owner.insert(file.dest.clone(), category.clone());
                resolved.push(file);
            }
        }
    }

    Ok(resolved)
}

/// A single `FileSpec` resolves to either a directory's worth of files (one
/// `ResolvedFile` per entry, `dest` built by joining `dst` with the path
/// suffix below `src`) or exactly one file, depending on whether `src`
/// names a directory in `fs`.
fn resolve_spec(fs: &dyn BundleFs, spec: &FileSpec) -> Result<Vec<ResolvedFile>, AilloyError> {
    let src = Utf8Path::new(&spec.src);
    let dst = Utf8Path::new(&spec.dst);

    match fs.walk_files(src) {
        Ok(files) if !files.is_empty() => Ok(files
            .into_iter()
            .map(|abs_rel| {
                let suffix = abs_rel.strip_prefix(src).unwrap_or(&abs_rel);
                let dest = dst.join(suffix);
                let process = spec.process.unwrap_or_else(|| default_process(&abs_rel));
                ResolvedFile { src: abs_rel.to_string(), dest: dest.to_string(), process }
            })
            .collect()),
        _ => {
            if !fs.exists(src) {
                return Err(AilloyError::Io {
                    path: src.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "output source does not exist in bundle"),
                });
            }
            let process = spec.process.unwrap_or_else(|| default_process(src));
            Ok(vec![ResolvedFile { src: spec.src.clone(), dest: spec.dst.clone(), process }])
        }
    }
}

/// Files render through the template engine by default; `.yml`/`.yaml`
/// assets (e.g. a lockfile fragment, CI config meant to be copied as-is)
/// default to verbatim copy unless the author overrides `process`.
fn default_process(path: &Utf8Path) -> bool {
    !matches!(path.extension(), Some(ext) if ext.eq_ignore_ascii_case(YAML_EXT) || ext.eq_ignore_ascii_case("yaml"))
}
