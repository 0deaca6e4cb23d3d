use std::fs;

use crate::common::{ailloy, temp_project};

#[test]
fn new_scaffolds_a_bundle_and_quench_passes_on_a_fresh_one() {
    let project = temp_project();

    ailloy()
        .current_dir(project.path())
        .args(["new", "my-mold", "-o", "."])
        .assert()
        .success();

    let bundle_dir = project.path().join("my-mold");
    assert!(bundle_dir.join("mold.yaml").exists());

    // No lockfile yet, and `new` pins no remote dependency: vacuously pinned.
    ailloy().current_dir(&bundle_dir).args(["quench"]).assert().success();
}

#[test]
fn new_without_no_agents_includes_agents_scaffold() {
    let project = temp_project();

    ailloy()
        .current_dir(project.path())
        .args(["new", "my-mold", "-o", "."])
        .assert()
        .success();

    assert!(project.path().join("my-mold/AGENTS.md").exists());
}

#[test]
fn new_with_no_agents_omits_agents_scaffold() {
    let project = temp_project();

    ailloy()
        .current_dir(project.path())
        .args(["new", "my-mold", "-o", ".", "--no-agents"])
        .assert()
        .success();

    assert!(!project.path().join("my-mold/AGENTS.md").exists());
}

#[test]
fn smelt_packages_the_bundle_as_a_tarball() {
    let project = temp_project();
    ailloy()
        .current_dir(project.path())
        .args(["new", "my-mold", "-o", "."])
        .assert()
        .success();

    let bundle_dir = project.path().join("my-mold");
    ailloy().current_dir(&bundle_dir).args(["smelt"]).assert().success();

    let has_tarball = fs::read_dir(&bundle_dir)
        .unwrap()
        .filter_map(Result::ok)
        .any(|entry| entry.file_name().to_string_lossy().ends_with(".tar.gz"));
    assert!(has_tarball, "expected a .tar.gz written to the bundle root");
}
