use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

pub fn ailloy() -> Command {
    Command::cargo_bin("ailloy").expect("ailloy binary should build")
}

/// Writes a minimal bundle to `dir`: a `mold.yaml` with the given
/// `flux_schema` and `output` YAML fragments, plus whatever files the
/// caller passes in `files` (path relative to `dir`, contents).
pub fn write_bundle(dir: &Path, flux_schema: &str, output: &str, files: &[(&str, &str)]) {
    let schema_section = if flux_schema.is_empty() { String::new() } else { format!("flux-schema:\n{flux_schema}\n") };
    let manifest = format!(
        "apiVersion: v1\n\
kind: Mold\n\
name: greeting\n\
version: 1.0.0\n\
author:\n  name: test\n\
{schema_section}\
output:\n{output}\n"
    );
    fs::write(dir.join("mold.yaml"), manifest).unwrap();
    for (path, contents) in files {
        let full = dir.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, contents).unwrap();
    }
}

pub fn temp_project() -> TempDir {
    TempDir::new().expect("tempdir")
}
