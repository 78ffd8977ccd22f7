//! Common types and utilities for the jsl JavaScript lint engine.
//!
//! This crate provides foundational types used across all jsl crates:
//! - Source spans (`Span`) over absolute byte offsets
//! - The lexical/syntax error value shared by the scanner and parser contract
//! - The diagnostic catalogue, message formatting and `Diagnostic` values
//! - Offset <-> line/column conversion (`PositionMapper`)
//! - JavaScript version tags (`JsVersion`)
//! - Raw comment scanning used for control-comment recovery

// Span - Source location tracking (byte offsets, inclusive end)
pub mod span;
pub use span::Span;

// Syntax errors raised by the tokenizer and the external parser
pub mod error;
pub use error::SyntaxError;

// Diagnostic catalogue and values
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticBag, Report, Severity};

// Position/offset conversion for embedded and standalone scripts
pub mod position;
pub use position::{Position, PositionMapper};

// JavaScript version tags
pub mod version;
pub use version::JsVersion;

// Comment scanning utilities
pub mod comments;
pub use comments::{CommentSpan, CommentStyle};
