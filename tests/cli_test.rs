//! Tests for the `git-deps` binary: exit codes, output and manifest effects.

mod common;

use common::{Fixture, create_project, read_manifest};
use std::path::Path;
use std::process::{Command, Output};

fn run_git_deps(project_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_git-deps"))
        .args(args)
        .current_dir(project_dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run git-deps")
}

fn output_text(output: &Output) -> String {
    format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn list_without_manifest_reports_and_exits_zero() {
    let temp = tempfile::tempdir().unwrap();

    let output = run_git_deps(temp.path(), &["list"]);
    let text = output_text(&output);

    assert!(output.status.success(), "list should not fail.\n{}", text);
    assert!(
        text.contains("Failed to list dependencies"),
        "Expected a failure report.\n{}",
        text
    );
}

#[test]
fn install_without_manifest_exits_one() {
    let temp = tempfile::tempdir().unwrap();

    let output = run_git_deps(temp.path(), &["install"]);
    let text = output_text(&output);

    assert_eq!(output.status.code(), Some(1), "{}", text);
    assert!(text.contains("Installation failed"), "{}", text);
    assert!(text.contains("package.json not found"), "{}", text);
}

#[test]
fn install_creates_missing_section() {
    let project = create_project(r#"{"name":"app","version":"1.0.0"}"#);

    let output = run_git_deps(project.path(), &["install"]);
    let text = output_text(&output);

    assert!(output.status.success(), "{}", text);
    let manifest = read_manifest(project.path());
    assert_eq!(manifest["gitDependencies"], serde_json::json!({}));
    assert_eq!(manifest["name"], "app");
}

#[test]
fn install_unknown_name_is_not_an_error() {
    let project = create_project(r#"{"gitDependencies":{}}"#);

    let output = run_git_deps(project.path(), &["install", "missing-pkg"]);
    let text = output_text(&output);

    assert!(output.status.success(), "{}", text);
    assert!(text.contains("missing-pkg"), "{}", text);
}

#[test]
fn install_local_repository_then_list_detail() {
    let source = Fixture::new("greeter");
    source.write(
        "package.json",
        r#"{"name":"greeter","version":"0.4.0","description":"Says hello"}"#,
    );
    source.write("index.js", "console.log('hello');\n");
    source.commit("greeter");

    let project = create_project(r#"{"name":"app"}"#);
    let url = source.url();

    let output = run_git_deps(project.path(), &["install", &url]);
    let text = output_text(&output);
    assert!(output.status.success(), "install failed.\n{}", text);
    assert!(project.path().join("node_modules/greeter/index.js").exists());
    assert_eq!(
        read_manifest(project.path())["gitDependencies"]["greeter"],
        url.as_str()
    );

    let output = run_git_deps(project.path(), &["list", "--detail"]);
    let text = output_text(&output);
    assert!(output.status.success(), "{}", text);
    assert!(text.contains("greeter:"), "{}", text);
    assert!(text.contains("Reference: HEAD"), "{}", text);
    assert!(text.contains("Status: Installed"), "{}", text);
    assert!(text.contains("Version: 0.4.0"), "{}", text);
    assert!(text.contains("Description: Says hello"), "{}", text);
}

#[test]
fn list_empty_section_warns() {
    let project = create_project(r#"{"gitDependencies":{}}"#);

    let output = run_git_deps(project.path(), &["list"]);
    let text = output_text(&output);

    assert!(output.status.success(), "{}", text);
    assert!(text.contains("No git dependencies found"), "{}", text);
}

#[test]
fn completion_prints_script() {
    let temp = tempfile::tempdir().unwrap();

    let output = run_git_deps(temp.path(), &["completion", "bash"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("git-deps"));
}
