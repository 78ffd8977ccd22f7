//! Lint analysis for the jsl JavaScript lint engine.
//!
//! This crate ties the scanner, the parser contract and the scope graph
//! together:
//! - `directives` - Control comment (`/*jsl:...*/`, `/*@...@*/`) parsing
//! - `comments` - Separating real comments from comment-like literal text
//! - `checks` / `exit_points` - Statement and source-text checks
//! - `html` - Script extraction from HTML documents
//! - `linter` - The per-file driver producing diagnostics

pub mod checks;
pub use checks::LintChecks;

pub mod comments;
pub use comments::filter_comments;

pub mod config;
pub use config::{ConfigError, Encoding, LintConfig};

pub mod directives;
pub use directives::{ControlDirective, DirectiveKeyword, DirectiveParse, DirectiveSyntax};

pub mod exit_points;
pub use exit_points::ExitPoints;

pub mod globals;

pub mod html;
pub use html::{Fragment, find_html_scripts};

pub mod linter;
pub use linter::Linter;
