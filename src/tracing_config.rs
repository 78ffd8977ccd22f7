//! Tracing setup for the `jsl` binary.
//!
//! `JSL_LOG` (falling back to `RUST_LOG`) holds an `EnvFilter` directive such
//! as `debug` or `jsl_lint=debug,jsl_parser=trace`. `JSL_LOG_FORMAT` picks the
//! output: `text` (default), `tree` for one indented span per linted file with
//! its imports nested inside, or `json`.
//!
//! ```bash
//! JSL_LOG=jsl_lint=debug JSL_LOG_FORMAT=tree jsl page.html
//! ```
//!
//! Nothing is installed unless one of the two variables is set. Output goes to
//! stderr so it never mixes with the lint report.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Where the filter directive comes from.
#[derive(Debug, PartialEq, Eq)]
enum FilterSource {
    Jsl(String),
    RustLog,
}

/// `None` when neither variable is set.
fn filter_source(jsl_log: Option<String>, rust_log_set: bool) -> Option<FilterSource> {
    match jsl_log {
        Some(directive) => Some(FilterSource::Jsl(directive)),
        None if rust_log_set => Some(FilterSource::RustLog),
        None => None,
    }
}

/// Install the global subscriber described by `JSL_LOG` / `JSL_LOG_FORMAT`.
pub fn init_tracing() {
    let source = filter_source(
        std::env::var("JSL_LOG").ok(),
        std::env::var_os("RUST_LOG").is_some(),
    );
    let Some(source) = source else {
        return;
    };
    let filter = match source {
        FilterSource::Jsl(directive) => EnvFilter::builder().parse_lossy(directive),
        FilterSource::RustLog => EnvFilter::from_default_env(),
    };

    match LogFormat::parse(&std::env::var("JSL_LOG_FORMAT").unwrap_or_default()) {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::new(2).with_indent_lines(true);
            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
