//! Temper catches output-path conflicts.

use crate::common::{ailloy, temp_project, write_bundle};

#[test]
fn conflicting_dest_paths_fail_temper_with_exit_code_1() {
    let project = temp_project();
    write_bundle(
        project.path(),
        "",
        "  commands:\n    - src: a.md\n      dst: shared.md\n  docs:\n    - src: b.md\n      dst: shared.md\n",
        &[("a.md", "a"), ("b.md", "b")],
    );

    ailloy()
        .current_dir(project.path())
        .args(["temper"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn clean_bundle_temper_succeeds() {
    let project = temp_project();
    write_bundle(
        project.path(),
        "  - name: who\n    type: string\n    default: \"world\"\n",
        "  commands:\n    - src: hello.md\n      dst: .claude/commands/hello.md\n",
        &[("hello.md", "# Hello {{.who}}")],
    );

    ailloy().current_dir(project.path()).args(["temper"]).assert().success();
}
