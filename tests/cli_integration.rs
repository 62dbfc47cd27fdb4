// CLI integration tests for the moddeps and pywhich binaries.
use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::Value;

fn moddeps() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_moddeps"));
    cmd.env_remove("MODSCOPE_PATH");
    cmd
}

fn pywhich() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pywhich"));
    cmd.env_remove("MODSCOPE_PATH");
    cmd
}

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn stdout_text(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn moddeps_without_arguments_prints_base_listing_and_exits_2() {
    let temp = tempfile::tempdir().unwrap();

    let output = moddeps()
        .args(["--path", temp.path().to_str().unwrap()])
        .output()
        .expect("moddeps");
    assert_eq!(output.status.code().unwrap(), 2);

    let text = stdout_text(&output);
    assert!(!text.is_empty());
    assert!(text.lines().any(|line| line.ends_with("sys -> (built-in)")));
}

#[test]
fn moddeps_unknown_module_prints_no_such_module_and_exits_1() {
    let temp = tempfile::tempdir().unwrap();

    let output = moddeps()
        .args(["--path", temp.path().to_str().unwrap(), "doesnotexist_xyz"])
        .output()
        .expect("moddeps");
    assert_eq!(output.status.code().unwrap(), 1);
    assert_eq!(stdout_text(&output), "No such module.\n");
}

#[test]
fn moddeps_reports_newly_registered_modules() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "app.py", "import helper\nimport sys\n");
    write(temp.path(), "helper.py", "");

    let output = moddeps()
        .args(["--path", temp.path().to_str().unwrap(), "app"])
        .output()
        .expect("moddeps");
    assert_eq!(output.status.code().unwrap(), 0);

    let text = stdout_text(&output);
    // enumeration order is not part of the contract; compare as a set
    let mut names: Vec<&str> = text
        .lines()
        .map(|line| line.split(" -> ").next().unwrap().trim_start())
        .collect();
    names.sort_unstable();
    assert_eq!(names, ["app", "helper"]);

    // app's own line ends in app's origin
    assert!(text
        .lines()
        .any(|line| line.ends_with(&format!("{} (source)", temp.path().join("app.py").display()))));
    // names are right-aligned into a 35-character column
    let app_line = text
        .lines()
        .find(|line| line.contains("app.py"))
        .unwrap();
    let name_column = &app_line[..35];
    assert_eq!(name_column.trim_start(), "app");
}

#[test]
fn moddeps_already_registered_module_diffs_empty() {
    let temp = tempfile::tempdir().unwrap();

    let output = moddeps()
        .args(["--path", temp.path().to_str().unwrap(), "sys"])
        .output()
        .expect("moddeps");
    assert_eq!(output.status.code().unwrap(), 0);
    assert_eq!(stdout_text(&output), "");
}

#[test]
fn moddeps_json_output() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "app.py", "import helper\n");
    write(temp.path(), "helper.py", "");

    let output = moddeps()
        .args(["--path", temp.path().to_str().unwrap(), "--json", "app"])
        .output()
        .expect("moddeps");
    assert_eq!(output.status.code().unwrap(), 0);

    let value: Value = serde_json::from_str(stdout_text(&output).trim()).expect("valid json");
    let modules = value.get("modules").and_then(Value::as_array).unwrap();
    assert_eq!(modules.len(), 2);
    assert_eq!(modules[0]["name"], "app");
    assert_eq!(modules[0]["kind"], "source");
    assert_eq!(modules[1]["name"], "helper");
}

#[test]
fn moddeps_uses_env_search_path_when_no_flags_given() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "envmod.py", "");

    let output = moddeps()
        .env("MODSCOPE_PATH", temp.path())
        .arg("envmod")
        .output()
        .expect("moddeps");
    assert_eq!(output.status.code().unwrap(), 0);
    assert!(stdout_text(&output).contains("envmod"));
}

#[test]
fn moddeps_searches_env_entries_after_path_flags() {
    let flag_dir = tempfile::tempdir().unwrap();
    let env_dir = tempfile::tempdir().unwrap();
    write(env_dir.path(), "envonly.py", "");

    let output = moddeps()
        .env("MODSCOPE_PATH", env_dir.path())
        .args(["--path", flag_dir.path().to_str().unwrap(), "envonly"])
        .output()
        .expect("moddeps");
    assert_eq!(output.status.code().unwrap(), 0);
    assert!(stdout_text(&output).contains("envonly"));
}

#[test]
fn pywhich_builtin_prints_built_in_and_exits_0() {
    let temp = tempfile::tempdir().unwrap();

    let output = pywhich()
        .args(["--path", temp.path().to_str().unwrap(), "sys"])
        .output()
        .expect("pywhich");
    assert_eq!(output.status.code().unwrap(), 0);
    assert_eq!(stdout_text(&output), "sys => (built-in).\n");
}

#[test]
fn pywhich_unknown_module_prints_failure_and_exits_2() {
    let temp = tempfile::tempdir().unwrap();

    let output = pywhich()
        .args(["--path", temp.path().to_str().unwrap(), "doesnotexist_xyz"])
        .output()
        .expect("pywhich");
    assert_eq!(output.status.code().unwrap(), 2);

    let text = stdout_text(&output);
    assert!(text.starts_with("doesnotexist_xyz => NotFound: "));
    assert!(text.trim_end().ends_with('!'));
}

#[test]
fn pywhich_classifies_source_package_and_submodule() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "alpha.py", "");
    write(temp.path(), "pkg/__init__.py", "");
    write(temp.path(), "pkg/mod.py", "");

    let output = pywhich()
        .args([
            "--path",
            temp.path().to_str().unwrap(),
            "alpha",
            "pkg",
            "pkg.mod",
        ])
        .output()
        .expect("pywhich");
    assert_eq!(output.status.code().unwrap(), 0);

    let text = stdout_text(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        format!("alpha => {} (source).", temp.path().join("alpha.py").display())
    );
    assert_eq!(
        lines[1],
        format!("pkg => {} (package).", temp.path().join("pkg").display())
    );
    assert_eq!(
        lines[2],
        format!(
            "pkg.mod => {} (source).",
            temp.path().join("pkg").join("mod.py").display()
        )
    );
}

#[test]
fn pywhich_reports_every_name_and_any_failure_exits_2() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "alpha.py", "");

    let output = pywhich()
        .args([
            "--path",
            temp.path().to_str().unwrap(),
            "missing_one",
            "alpha",
            "sys",
        ])
        .output()
        .expect("pywhich");
    assert_eq!(output.status.code().unwrap(), 2);

    let text = stdout_text(&output);
    assert_eq!(text.lines().count(), 3);
    assert!(text.lines().next().unwrap().contains("missing_one => "));
    assert!(text.contains("alpha => "));
    assert!(text.contains("sys => (built-in)."));
}

#[test]
fn pywhich_without_arguments_prints_usage_and_exits_2() {
    let output = pywhich().output().expect("pywhich");
    assert_eq!(output.status.code().unwrap(), 2);
    assert!(stdout_text(&output).contains("Usage"));
}

#[test]
fn pywhich_json_output() {
    let temp = tempfile::tempdir().unwrap();
    write(temp.path(), "alpha.py", "");

    let output = pywhich()
        .args([
            "--path",
            temp.path().to_str().unwrap(),
            "--json",
            "alpha",
            "missing_one",
        ])
        .output()
        .expect("pywhich");
    assert_eq!(output.status.code().unwrap(), 2);

    let value: Value = serde_json::from_str(stdout_text(&output).trim()).expect("valid json");
    let modules = value.get("modules").and_then(Value::as_array).unwrap();
    assert_eq!(modules.len(), 2);
    assert_eq!(modules[0]["resolved"]["kind"], "source");
    assert_eq!(modules[1]["error"]["kind"], "NotFound");
}
