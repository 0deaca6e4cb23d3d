//! Layering precedence: overlay A < overlay B < inline `--set`.

use std::fs;

use crate::common::{ailloy, temp_project, write_bundle};

#[test]
fn inline_set_wins_over_overlay_files() {
    let project = temp_project();
    write_bundle(
        project.path(),
        "  - name: org\n    type: string\n    default: \"fallback\"\n",
        "  commands:\n    - src: org.md\n      dst: .claude/commands/org.md\n",
        &[("org.md", "{{.org}}")],
    );

    fs::write(project.path().join("a.yaml"), "org: a\n").unwrap();
    fs::write(project.path().join("b.yaml"), "org: b\n").unwrap();

    ailloy()
        .current_dir(project.path())
        .env("AILLOY_HOME", project.path().join(".ailloy-home"))
        .args(["cast", "-f", "a.yaml", "-f", "b.yaml", "--set", "org=c"])
        .assert()
        .success();

    let rendered = fs::read_to_string(project.path().join(".claude/commands/org.md")).unwrap();
    assert_eq!(rendered, "c");
}
