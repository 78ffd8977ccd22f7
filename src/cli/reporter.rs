use anyhow::{Context, Result};
use colored::Colorize;
use jsl_common::diagnostics::DIAGNOSTIC_MESSAGES;
use jsl_common::{Diagnostic, Severity};
use jsl_lint::LintConfig;
use serde::Serialize;

use super::args::OutputFormat;

pub struct Reporter {
    color: bool,
    format: OutputFormat,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    diagnostics: &'a [Diagnostic],
    errors: usize,
    warnings: usize,
}

impl Reporter {
    pub fn new(color: bool, format: OutputFormat) -> Self {
        Reporter { color, format }
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(self.render_text(diagnostics)),
            OutputFormat::Json => {
                let errors = diagnostics.iter().filter(|d| d.is_error()).count();
                let report = JsonReport {
                    diagnostics,
                    errors,
                    warnings: diagnostics.len() - errors,
                };
                serde_json::to_string_pretty(&report).context("failed to serialize diagnostics")
            }
        }
    }

    fn render_text(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    /// `path(line,col): severity name: message`, 1-based.
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        if !self.color {
            return diagnostic.format_simple();
        }
        let location = format!(
            "{}({},{})",
            diagnostic.path,
            diagnostic.line + 1,
            diagnostic.col + 1
        );
        format!(
            "{}: {} {}: {}",
            location.cyan(),
            self.format_severity(diagnostic.severity),
            diagnostic.name.bright_black(),
            diagnostic.message
        )
    }

    fn format_severity(&self, severity: Severity) -> String {
        match severity {
            Severity::Error => severity.name().red().bold().to_string(),
            Severity::Warning => severity.name().yellow().bold().to_string(),
        }
    }

    /// One-line totals, e.g. `2 errors, 1 warning`.
    pub fn summary(&self, diagnostics: &[Diagnostic], files: usize) -> String {
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        let warnings = diagnostics.len() - errors;
        let text = format!(
            "{} {}, {} {} in {} {}",
            errors,
            plural(errors, "error"),
            warnings,
            plural(warnings, "warning"),
            files,
            plural(files, "file")
        );
        if self.color && errors > 0 {
            text.red().to_string()
        } else if self.color && warnings > 0 {
            text.yellow().to_string()
        } else {
            text
        }
    }

    /// Every warning name with whether it is enabled under `config`.
    pub fn render_warning_list(&self, config: &LintConfig) -> String {
        let mut lines = Vec::new();
        for message in DIAGNOSTIC_MESSAGES {
            if message.severity != Severity::Warning {
                continue;
            }
            let state = if config.is_enabled(message.name) {
                "on"
            } else {
                "off"
            };
            let state = match (self.color, state) {
                (true, "on") => state.green().to_string(),
                (true, _) => state.bright_black().to_string(),
                (false, _) => state.to_string(),
            };
            lines.push(format!("{:<30} {:<3} {}", message.name, state, message.message));
        }
        lines.join("\n")
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
