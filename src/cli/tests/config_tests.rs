use super::args::CliArgs;
use super::config::{
    CONFIG_FILE_NAME, LoadedConfig, exclude_patterns, find_and_load, input_paths, parse_config,
    resolve_lint_config, resolve_parser,
};
use jsl_common::JsVersion;
use jsl_lint::Encoding;
use std::path::{Path, PathBuf};

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create test directory");
    }
    std::fs::write(&path, contents).expect("failed to write test file");
    path
}

fn loaded(source: &str, base_dir: &str) -> LoadedConfig {
    LoadedConfig {
        path: None,
        base_dir: PathBuf::from(base_dir),
        config: parse_config(source).unwrap(),
    }
}

#[test]
fn parses_camel_case_keys() {
    let config = parse_config(
        r#"{
            "defaultVersion": "1.6",
            "encoding": "latin-1",
            "includeDirs": ["lib"],
            "declarations": ["jQuery", "$"],
            "files": ["src"],
            "exclude": ["*.min.js"],
            "parser": {"program": "./parse", "args": ["--strict"]}
        }"#,
    )
    .unwrap();
    assert_eq!(config.default_version.as_deref(), Some("1.6"));
    assert_eq!(config.encoding.as_deref(), Some("latin-1"));
    assert_eq!(config.include_dirs, vec!["lib"]);
    assert_eq!(config.declarations, vec!["jQuery", "$"]);
    assert_eq!(config.files, vec!["src"]);
    assert_eq!(config.exclude, vec!["*.min.js"]);
    let parser = config.parser.unwrap();
    assert_eq!(parser.program, "./parse");
    assert_eq!(parser.args, vec!["--strict"]);
}

#[test]
fn warnings_accept_bool_or_string() {
    let config = parse_config(
        r#"{"warnings": {"with_statement": false, "empty_statement": "off", "missing_default_case": "yes"}, "color": "no"}"#,
    )
    .unwrap();
    assert_eq!(config.warnings.get("with_statement"), Some(&false));
    assert_eq!(config.warnings.get("empty_statement"), Some(&false));
    assert_eq!(config.warnings.get("missing_default_case"), Some(&true));
    assert_eq!(config.color, Some(false));
}

#[test]
fn rejects_invalid_boolean_string() {
    let err = parse_config(r#"{"warnings": {"with_statement": "sometimes"}}"#).unwrap_err();
    assert!(format!("{err:#}").contains("invalid boolean value"));
}

#[test]
fn empty_object_is_default() {
    let config = parse_config("{}").unwrap();
    assert!(config.warnings.is_empty());
    assert!(config.parser.is_none());
    assert!(config.color.is_none());
}

#[test]
fn cli_arguments_override_file() {
    let loaded = loaded(
        r#"{"defaultVersion": "1.5", "encoding": "utf-8", "warnings": {"with_statement": false}}"#,
        "/project",
    );
    let args = CliArgs {
        default_version: Some("1.7".into()),
        encoding: Some("latin1".into()),
        enable: vec!["with_statement".into()],
        disable: vec!["trailing_whitespace".into()],
        ..CliArgs::default()
    };
    let config = resolve_lint_config(&loaded, &args, Path::new("/work")).unwrap();
    assert_eq!(config.default_version, JsVersion::new("1.7", false));
    assert_eq!(config.encoding, Encoding::Latin1);
    assert!(config.is_enabled("with_statement"));
    assert!(!config.is_enabled("trailing_whitespace"));
}

#[test]
fn include_dirs_resolve_against_their_origin() {
    let loaded = loaded(r#"{"includeDirs": ["lib"], "declarations": ["fromConfig"]}"#, "/project");
    let args = CliArgs {
        include_dirs: vec![PathBuf::from("vendor")],
        declare: vec!["fromArgs".into()],
        ..CliArgs::default()
    };
    let config = resolve_lint_config(&loaded, &args, Path::new("/work")).unwrap();
    assert_eq!(
        config.include_dirs,
        vec![PathBuf::from("/project/lib"), PathBuf::from("/work/vendor")]
    );
    assert!(config.is_declared("fromConfig"));
    assert!(config.is_declared("fromArgs"));
}

#[test]
fn unknown_warning_and_version_are_errors() {
    let bad_warning = loaded(r#"{"warnings": {"no_such_warning": false}}"#, "/p");
    let err = resolve_lint_config(&bad_warning, &CliArgs::default(), Path::new("/p")).unwrap_err();
    assert!(format!("{err:#}").contains("no_such_warning"));

    let args = CliArgs {
        default_version: Some("2.0".into()),
        ..CliArgs::default()
    };
    let err = resolve_lint_config(&loaded("{}", "/p"), &args, Path::new("/p")).unwrap_err();
    assert!(format!("{err:#}").contains("2.0"));
}

#[test]
fn errors_cannot_be_disabled() {
    let args = CliArgs {
        disable: vec!["syntax_error".into()],
        ..CliArgs::default()
    };
    assert!(resolve_lint_config(&loaded("{}", "/p"), &args, Path::new("/p")).is_err());
}

#[test]
fn parser_from_args_wins_over_file() {
    let loaded = loaded(r#"{"parser": {"program": "tools/parse", "args": ["-q"]}}"#, "/project");
    let from_file = resolve_parser(&loaded, &CliArgs::default(), Path::new("/work")).unwrap();
    assert_eq!(from_file.program(), Path::new("/project/tools/parse"));

    let args = CliArgs {
        parser: Some(PathBuf::from("node")),
        ..CliArgs::default()
    };
    let from_args = resolve_parser(&loaded, &args, Path::new("/work")).unwrap();
    assert_eq!(from_args.program(), Path::new("node"));

    assert!(resolve_parser(&LoadedConfig::default(), &CliArgs::default(), Path::new("/w")).is_none());
}

#[test]
fn inputs_fall_back_to_configured_files() {
    let loaded = loaded(r#"{"files": ["src"], "exclude": ["*.min.js"]}"#, "/project");
    assert_eq!(
        input_paths(&loaded, &CliArgs::default(), Path::new("/work")),
        vec![PathBuf::from("/project/src")]
    );

    let args = CliArgs {
        paths: vec![PathBuf::from("a.js")],
        exclude: vec!["vendor/**".into()],
        ..CliArgs::default()
    };
    assert_eq!(
        input_paths(&loaded, &args, Path::new("/work")),
        vec![PathBuf::from("/work/a.js")]
    );
    assert_eq!(exclude_patterns(&loaded, &args), vec!["*.min.js", "vendor/**"]);
}

#[test]
fn finds_config_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), CONFIG_FILE_NAME, r#"{"declarations": ["found"]}"#);
    let loaded = find_and_load(None, dir.path()).unwrap();
    assert_eq!(loaded.path, Some(dir.path().join(CONFIG_FILE_NAME)));
    assert_eq!(loaded.config.declarations, vec!["found"]);
    assert_eq!(loaded.base_dir, dir.path());
}

#[test]
fn explicit_config_is_relative_to_cwd() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "conf/lint.json", r#"{"includeDirs": ["inc"]}"#);
    let loaded = find_and_load(Some(Path::new("conf/lint.json")), dir.path()).unwrap();
    assert_eq!(loaded.base_dir, dir.path().join("conf"));

    let missing = find_and_load(Some(Path::new("nope.json")), dir.path());
    assert!(missing.is_err());
}

#[test]
fn missing_default_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = find_and_load(None, dir.path()).unwrap();
    assert!(loaded.path.is_none());
    assert!(loaded.config.files.is_empty());
}
