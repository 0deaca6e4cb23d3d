//! `forge` never writes into the project; it only previews, either to
//! stdout or into an explicit `-o` directory.

use std::fs;

use crate::common::{ailloy, temp_project, write_bundle};

#[test]
fn forge_without_output_prints_to_stdout_and_writes_nothing() {
    let project = temp_project();
    write_bundle(
        project.path(),
        "  - name: who\n    type: string\n    default: \"world\"\n",
        "  commands:\n    - src: hello.md\n      dst: .claude/commands/hello.md\n",
        &[("hello.md", "# Hello {{.who}}")],
    );

    ailloy()
        .current_dir(project.path())
        .args(["forge", "--set", "who=dry-run"])
        .assert()
        .success()
        .stdout(predicates::str::contains("# Hello dry-run"));

    assert!(!project.path().join(".claude").exists());
}

#[test]
fn forge_with_output_writes_into_target_dir() {
    let project = temp_project();
    write_bundle(
        project.path(),
        "  - name: who\n    type: string\n    default: \"world\"\n",
        "  commands:\n    - src: hello.md\n      dst: .claude/commands/hello.md\n",
        &[("hello.md", "# Hello {{.who}}")],
    );
    let out_dir = project.path().join("preview");

    ailloy()
        .current_dir(project.path())
        .args(["forge", "-o", out_dir.to_str().unwrap()])
        .assert()
        .success();

    let rendered = fs::read_to_string(out_dir.join(".claude/commands/hello.md")).unwrap();
    assert_eq!(rendered, "# Hello world");
    assert!(!project.path().join(".claude").exists());
}
