//! JavaScript Lint.
//!
//! The engine lives in the workspace crates and is re-exported here:
//! - `common` - Spans, diagnostics, positions, versions and comment scanning
//! - `scanner` - The JavaScript tokenizer
//! - `parser` - The parse-tree contract and the external parser adapter
//! - `binder` - Scopes, declarations and the import graph
//! - `lint` - Control comments, checks, HTML extraction and the `Linter`
//!
//! This crate adds the `jsl` command line (`cli`) and its tracing setup.

pub use jsl_binder as binder;
pub use jsl_common as common;
pub use jsl_lint as lint;
pub use jsl_parser as parser;
pub use jsl_scanner as scanner;

pub use jsl_common::{Diagnostic, Severity};
pub use jsl_lint::{LintConfig, Linter};

pub mod cli;
pub mod tracing_config;
