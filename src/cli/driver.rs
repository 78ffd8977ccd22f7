use anyhow::{Result, bail};
use jsl_common::Diagnostic;
use jsl_lint::{LintConfig, Linter};
use jsl_parser::ScriptParser;
use std::path::{Path, PathBuf};
use tracing::info;

use super::args::CliArgs;
use super::config::{
    LoadedConfig, exclude_patterns, find_and_load, input_paths, resolve_lint_config,
    resolve_parser,
};
use super::fs::{build_exclude_set, discover_files};

/// Exit status codes of the jsl binary.
pub const EXIT_CLEAN: i32 = 0;
pub const EXIT_WARNINGS: i32 = 1;
pub const EXIT_ERRORS: i32 = 2;

#[derive(Debug, Clone, Default)]
pub struct LintResult {
    pub diagnostics: Vec<Diagnostic>,
    /// Files linted because they were named or discovered, not counting
    /// imports
    pub files: Vec<PathBuf>,
}

impl LintResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn exit_code(&self) -> i32 {
        if self.has_errors() {
            EXIT_ERRORS
        } else if self.diagnostics.is_empty() {
            EXIT_CLEAN
        } else {
            EXIT_WARNINGS
        }
    }
}

/// Configuration file and command line merged into what a run needs.
pub struct Session {
    pub loaded: LoadedConfig,
    pub config: LintConfig,
}

impl Session {
    pub fn new(args: &CliArgs, cwd: &Path) -> Result<Self> {
        let loaded = find_and_load(args.conf.as_deref(), cwd)?;
        let config = resolve_lint_config(&loaded, args, cwd)?;
        Ok(Session { loaded, config })
    }

    /// Color preference from the configuration file, if any.
    pub fn color(&self) -> Option<bool> {
        self.loaded.config.color
    }
}

/// Run the lint described by `args` from `cwd`.
pub fn run(args: &CliArgs, cwd: &Path) -> Result<LintResult> {
    let session = Session::new(args, cwd)?;
    run_session(session, args, cwd)
}

pub fn run_session(session: Session, args: &CliArgs, cwd: &Path) -> Result<LintResult> {
    let Some(parser) = resolve_parser(&session.loaded, args, cwd) else {
        bail!("no parser configured; pass --parser or set \"parser\" in jsl.json");
    };

    let inputs = input_paths(&session.loaded, args, cwd);
    if inputs.is_empty() {
        bail!("no input files; pass paths or set \"files\" in jsl.json");
    }
    let excludes = build_exclude_set(&exclude_patterns(&session.loaded, args))?;
    let files = discover_files(&inputs, &excludes)?;

    Ok(lint_files(parser, session.config, files))
}

/// Lint `files` in order with one shared script registry, so a file imported
/// by an earlier one is not linted twice.
pub fn lint_files<P: ScriptParser>(parser: P, config: LintConfig, files: Vec<PathBuf>) -> LintResult {
    let mut linter = Linter::new(parser, config);
    for file in &files {
        linter.lint_file(file);
    }
    let diagnostics = linter.take_diagnostics();
    info!(
        files = files.len(),
        scripts = linter.registry().len(),
        diagnostics = diagnostics.len(),
        "lint finished"
    );
    LintResult { diagnostics, files }
}
