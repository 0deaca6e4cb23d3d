//! Cast with inline overrides.

use std::fs;

use crate::common::{ailloy, temp_project, write_bundle};

#[test]
fn cast_inline_override_renders_greeting() {
    let project = temp_project();
    write_bundle(
        project.path(),
        "  - name: who\n    type: string\n    default: \"world\"\n",
        "  commands:\n    - src: hello.md\n      dst: .claude/commands/hello.md\n",
        &[("hello.md", "# Hello {{.who}}")],
    );

    ailloy()
        .current_dir(project.path())
        .env("AILLOY_HOME", project.path().join(".ailloy-home"))
        .args(["cast", "--set", "who=universe"])
        .assert()
        .success();

    let rendered = fs::read_to_string(project.path().join(".claude/commands/hello.md")).unwrap();
    assert_eq!(rendered, "# Hello universe");
}
