//! End-to-end runs of the `jsl` binary against a shell-script parser.
#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Answers every fragment with an empty statement list, or a syntax error
/// when the fragment contains `@@`.
const PARSER_SCRIPT: &str = r#"src=$(cat)
case "$src" in
  *@@*) echo '{"error":{"offset":0,"message_key":"syntax_error"}}' ;;
  *) echo '{"tree":{"kind":"lc","start":0,"end":0}}' ;;
esac
"#;

struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    fn new() -> Self {
        let project = Project {
            dir: tempfile::tempdir().unwrap(),
        };
        project.write("parse.sh", PARSER_SCRIPT);
        project
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn jsl(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_jsl"))
            .current_dir(self.path())
            .env_remove("JSL_LOG")
            .env_remove("RUST_LOG")
            .args(["--color", "never"])
            .args(args)
            .output()
            .unwrap()
    }

    fn jsl_with_parser(&self, args: &[&str]) -> Output {
        let mut all = vec!["--parser", "sh", "--parser-arg", "parse.sh"];
        all.extend_from_slice(args);
        self.jsl(&all)
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn clean_file_exits_zero() {
    let project = Project::new();
    project.write("ok.js", "var a;\n");
    let output = project.jsl_with_parser(&["ok.js"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("0 errors, 0 warnings in 1 file"));
}

#[test]
fn warnings_exit_one() {
    let project = Project::new();
    project.write("ws.js", "var a;   \n");
    let output = project.jsl_with_parser(&["ws.js"]);
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("ws.js(1,7): warning trailing_whitespace: trailing whitespace"), "{out}");
}

#[test]
fn disable_flag_silences_warning() {
    let project = Project::new();
    project.write("ws.js", "var a;   \n");
    let output = project.jsl_with_parser(&["--disable", "trailing_whitespace", "ws.js"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn syntax_error_exits_two() {
    let project = Project::new();
    project.write("bad.js", "var @@;\n");
    let output = project.jsl_with_parser(&["bad.js"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("error syntax_error"));
}

#[test]
fn json_format() {
    let project = Project::new();
    project.write("src/ws.js", "x; \n");
    project.write("src/notes.txt", "ignored  \n");
    let output = project.jsl_with_parser(&["--format", "json", "src"]);
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["warnings"], 1);
    assert_eq!(value["errors"], 0);
    assert_eq!(value["diagnostics"][0]["name"], "trailing_whitespace");
    assert_eq!(value["diagnostics"][0]["col"], 2);
}

#[test]
fn config_file_supplies_parser_files_and_warnings() {
    let project = Project::new();
    project.write(
        "jsl.json",
        r#"{
            "parser": {"program": "sh", "args": ["parse.sh"]},
            "files": ["lib"],
            "exclude": ["*.min.js"],
            "warnings": {"trailing_whitespace": "off"}
        }"#,
    );
    project.write("lib/a.js", "a; \n");
    project.write("lib/a.min.js", "var @@;\n");
    let output = project.jsl(&[]);
    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout(&output));
    assert!(stderr(&output).contains("in 1 file"));
}

#[test]
fn list_warnings() {
    let project = Project::new();
    let output = project.jsl(&["--list-warnings", "--disable", "with_statement"]);
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    let line = out
        .lines()
        .find(|l| l.starts_with("with_statement "))
        .unwrap();
    assert!(line.contains(" off "));
}

#[test]
fn missing_parser_is_reported() {
    let project = Project::new();
    project.write("a.js", "a;\n");
    let output = project.jsl(&["a.js"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("no parser configured"));
}

#[test]
fn unknown_warning_name_is_rejected() {
    let project = Project::new();
    let output = project.jsl_with_parser(&["--disable", "bogus_warning", "a.js"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("unknown warning: bogus_warning"));
}
