//! `new <name>`: scaffold a fresh bundle directory. Writes a
//! minimal but valid `mold.yaml`, one example command, and — unless the
//! caller asked to skip it — an `AGENTS.md` stub.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::AilloyError;

const DEFAULT_MOLD_TEMPLATE: &str = "apiVersion: v1\nkind: mold\nname: {name}\nversion: 0.1.0\nauthor:\n  name: unknown\noutput:\n  commands: .claude/commands\n";

/// Scaffold a new bundle named `name` under `output_dir` (the bundle lives
/// at `output_dir/name`). Returns every file written, in the order
/// written.
pub fn new_bundle(output_dir: &Utf8Path, name: &str, include_agents: bool) -> Result<Vec<Utf8PathBuf>, AilloyError> {
    let root = output_dir.join(name);
    let mut written = Vec::new();

    let mold_yaml = DEFAULT_MOLD_TEMPLATE.replace("{name}", name);
    written.push(write_scaffold_file(&root, "mold.yaml", &mold_yaml)?);

    let example_command = format!("# {name} example command\n\nHello, {{{{.name}}}}!\n");
    written.push(write_scaffold_file(&root, "commands/example.md", &example_command)?);

    if include_agents {
        let agents = format!("# {name}\n\nScaffolded by `ailloy new`. Describe this bundle's agent instructions here.\n");
        written.push(write_scaffold_file(&root, "AGENTS.md", &agents)?);
    }

    Ok(written)
}

fn write_scaffold_file(root: &Utf8Path, rel: &str, content: &str) -> Result<Utf8PathBuf, AilloyError> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AilloyError::io(parent.to_path_buf(), e))?;
    }
    std::fs::write(&path, content).map_err(|e| AilloyError::io(path.clone(), e))?;
    Ok(path)
}
