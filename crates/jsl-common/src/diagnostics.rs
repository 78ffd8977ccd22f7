//! Diagnostic Infrastructure
//!
//! This module provides the closed catalogue of diagnostic names, their
//! message templates, and the values produced for the diagnostic sink.
//!
//! # Components
//!
//! - `DIAGNOSTIC_MESSAGES` - Every known diagnostic name with its severity and template
//! - `Diagnostic` - A single finding with path, position, severity, name and message
//! - `DiagnosticBag` - A collection of diagnostics for a lint run
//!
//! Templates use named placeholders (`{name}`, `{version}`, ...) that are
//! filled by `format_message`.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Severity
// =============================================================================

/// The severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Catalogue
// =============================================================================

/// A catalogue entry: stable name, severity and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub name: &'static str,
    pub severity: Severity,
    pub message: &'static str,
}

const fn warning(name: &'static str, message: &'static str) -> DiagnosticMessage {
    DiagnosticMessage {
        name,
        severity: Severity::Warning,
        message,
    }
}

const fn error(name: &'static str, message: &'static str) -> DiagnosticMessage {
    DiagnosticMessage {
        name,
        severity: Severity::Error,
        message,
    }
}

/// Every diagnostic the engine can report.
pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    // Scope analysis
    warning("unreferenced_argument", "argument declared but never referenced: {name}"),
    warning("unreferenced_function", "function is declared but never referenced: {name}"),
    warning("unreferenced_variable", "variable is declared but never referenced: {name}"),
    warning("undeclared_identifier", "undeclared identifier: {name}"),
    warning("redeclared_var", "redeclaration of {name}"),
    warning("var_hides_arg", "variable {name} hides argument"),
    warning(
        "identifier_hides_another",
        "identifier {name} hides an identifier in a parent scope",
    ),
    warning("duplicate_formal", "duplicate formal argument {name}"),
    // Statement checks
    warning("missing_break", "missing break statement"),
    warning(
        "missing_break_for_last_case",
        "missing break statement for last case in switch",
    ),
    warning("empty_statement", "empty statement or extra semicolon"),
    warning("missing_default_case", "missing default case in switch statement"),
    warning(
        "default_not_at_end",
        "the default case is not at the end of the switch statement",
    ),
    warning(
        "with_statement",
        "with statement hides undeclared variables; use temporary variable instead",
    ),
    // Control comments
    warning("invalid_fallthru", "unexpected \"fallthru\" control comment"),
    warning("invalid_pass", "unexpected \"pass\" control comment"),
    warning(
        "mismatch_ctrl_comments",
        "mismatched control comment; \"ignore\" and \"end\" control comments must have a one-to-one correspondence",
    ),
    warning(
        "jsl_cc_not_understood",
        "couldn't understand control comment using /*jsl:keyword*/ syntax",
    ),
    warning(
        "legacy_cc_not_understood",
        "couldn't understand control comment using /*@keyword@*/ syntax",
    ),
    // Source text
    warning("nested_comment", "nested comment"),
    warning("trailing_whitespace", "trailing whitespace"),
    warning("e4x_deprecated", "e4x is deprecated"),
    warning(
        "incorrect_version",
        "Expected /*jsl:content-type*/ control comment. The script was parsed with the wrong version.",
    ),
    // Grammar findings reported by the parser without aborting
    warning("missing_semicolon", "missing semicolon"),
    warning(
        "missing_semicolon_for_lambda",
        "missing semicolon for lambda assignment",
    ),
    warning("missing_option_explicit", "the \"option explicit\" control comment is missing"),
    // Fatal conditions
    error("unsupported_version", "JavaScript {version} is not supported"),
    error("io_error", "{error}"),
    error("syntax_error", "syntax error"),
    error("unexpected_eof", "unexpected end of file"),
    error("unterminated_comment", "unterminated comment"),
    error("expected_tok", "expected token: {token}"),
    error("tokenizer_poisoned", "tokenizer used after a syntax error"),
];

/// Look up a catalogue entry by name.
#[must_use]
pub fn get_diagnostic_message(name: &str) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.name == name)
}

/// Whether `name` is part of the closed catalogue.
#[must_use]
pub fn is_known(name: &str) -> bool {
    get_diagnostic_message(name).is_some()
}

/// Format a diagnostic message by replacing `{key}` placeholders.
#[must_use]
pub fn format_message(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in args {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// Resolve severity and message text for a diagnostic name.
///
/// Names outside the catalogue come from the external parser; they are
/// reported as errors with the key itself as message.
#[must_use]
pub fn describe(name: &str, args: &[(&str, &str)]) -> (Severity, String) {
    match get_diagnostic_message(name) {
        Some(entry) => (entry.severity, format_message(entry.message, args)),
        None => (Severity::Error, name.replace('_', " ")),
    }
}

// =============================================================================
// Report
// =============================================================================

/// A located finding that has not been rendered yet.
///
/// Analysis passes produce reports; the linter turns them into
/// `Diagnostic`s once the file path and line map are known and the
/// suppression rules have been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub offset: u32,
    pub name: String,
    pub args: Vec<(String, String)>,
}

impl Report {
    pub fn new(offset: u32, name: impl Into<String>) -> Self {
        Report {
            offset,
            name: name.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.push((key.into(), value.into()));
        self
    }

    /// Resolve severity and message text from the catalogue.
    pub fn describe(&self) -> (Severity, String) {
        let args: Vec<(&str, &str)> = self
            .args
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        describe(&self.name, &args)
    }
}

impl From<crate::SyntaxError> for Report {
    fn from(err: crate::SyntaxError) -> Self {
        Report {
            offset: err.offset,
            name: err.message_key,
            args: err.message_args.into_iter().collect(),
        }
    }
}

// =============================================================================
// Diagnostic
// =============================================================================

/// A finding handed to the diagnostic sink.
///
/// `line` and `col` are 0-based; display code adds one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub path: String,
    pub offset: u32,
    pub line: u32,
    pub col: u32,
    pub severity: Severity,
    pub name: String,
    pub message: String,
}

impl Diagnostic {
    /// Format like `file.js(3,5): warning unreferenced_variable: ...`.
    pub fn format_simple(&self) -> String {
        format!(
            "{}({},{}): {} {}: {}",
            self.path,
            self.line + 1,
            self.col + 1,
            self.severity,
            self.name,
            self.message
        )
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_simple())
    }
}

// =============================================================================
// DiagnosticBag
// =============================================================================

/// A collection of diagnostics with error/warning counts.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Filter diagnostics by catalogue name.
    pub fn by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.name == name)
    }

    /// Filter diagnostics by file.
    pub fn for_file<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.path == path)
    }

    /// Sort diagnostics by file, then by offset. The sort is stable.
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by(|a, b| a.path.cmp(&b.path).then(a.offset.cmp(&b.offset)));
    }

    /// Take all diagnostics, leaving the bag empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        self.error_count = 0;
        self.warning_count = 0;
        std::mem::take(&mut self.diagnostics)
    }

    /// Catalogue names in order (for testing).
    pub fn names(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.name.as_str()).collect()
    }
}

impl IntoIterator for DiagnosticBag {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosticBag {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

impl Extend<Diagnostic> for DiagnosticBag {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        for diag in iter {
            self.add(diag);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
