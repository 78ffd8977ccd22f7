//! Shared fixtures for the linter tests.
//!
//! The grammar is external, so tests hand the linter a parser that returns
//! prepared trees for known source text.

#![allow(dead_code)]

use jsl_common::{Diagnostic, JsVersion, SyntaxError};
use jsl_lint::{LintConfig, Linter};
use jsl_parser::{NodeKind, NodeSpec, ParseError, ParseTree, ScriptParser};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Default)]
pub struct FixtureParser {
    trees: HashMap<String, NodeSpec>,
    errors: HashMap<String, SyntaxError>,
    /// `(text, version, start_offset)` of every parse call
    pub calls: RefCell<Vec<(String, JsVersion, u32)>>,
}

impl FixtureParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(mut self, text: &str, spec: NodeSpec) -> Self {
        self.trees.insert(text.to_string(), spec);
        self
    }

    pub fn error(mut self, text: &str, err: SyntaxError) -> Self {
        self.errors.insert(text.to_string(), err);
        self
    }
}

impl ScriptParser for FixtureParser {
    fn parse(
        &self,
        text: &str,
        version: &JsVersion,
        start_offset: u32,
    ) -> Result<ParseTree, ParseError> {
        self.calls
            .borrow_mut()
            .push((text.to_string(), version.clone(), start_offset));
        if let Some(err) = self.errors.get(text) {
            return Err(err.clone().into());
        }
        match self.trees.get(text) {
            Some(spec) => Ok(ParseTree::from_spec(spec)?),
            None => Err(ParseError::Backend(format!("no fixture for {text:?}"))),
        }
    }
}

/// Offset of the `n`th occurrence of `needle` in `src`.
pub fn nth(src: &str, needle: &str, n: usize) -> u32 {
    src.match_indices(needle)
        .nth(n)
        .map(|(i, _)| i as u32)
        .unwrap_or_else(|| panic!("occurrence {n} of {needle:?} not found in {src:?}"))
}

/// Offset of the first occurrence of `needle`.
pub fn at(src: &str, needle: &str) -> u32 {
    nth(src, needle, 0)
}

/// A node covering the first occurrence of `text`.
pub fn node(kind: NodeKind, src: &str, text: &str) -> NodeSpec {
    node_nth(kind, src, text, 0)
}

pub fn node_nth(kind: NodeKind, src: &str, text: &str, n: usize) -> NodeSpec {
    let start = nth(src, text, n);
    NodeSpec::new(kind, start, start + text.len() as u32 - 1)
}

/// A node covering the whole source.
pub fn root(src: &str) -> NodeSpec {
    NodeSpec::new(NodeKind::Lc, 0, src.len() as u32 - 1)
}

/// The `n`th occurrence of identifier `ident` that is a whole word.
pub fn name(src: &str, ident: &str, n: usize) -> NodeSpec {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$';
    let start = src
        .match_indices(ident)
        .map(|(i, _)| i)
        .filter(|&i| {
            let before = src[..i].chars().next_back();
            let after = src[i + ident.len()..].chars().next();
            !before.is_some_and(is_word) && !after.is_some_and(is_word)
        })
        .nth(n)
        .unwrap_or_else(|| panic!("identifier {ident:?} #{n} not found in {src:?}"));
    NodeSpec::new(NodeKind::Name, start as u32, (start + ident.len() - 1) as u32).atom(ident)
}

pub fn lint(parser: FixtureParser, path: &str, src: &str) -> Vec<Diagnostic> {
    lint_with(LintConfig::new(), parser, path, src)
}

pub fn lint_with(config: LintConfig, parser: FixtureParser, path: &str, src: &str) -> Vec<Diagnostic> {
    let mut linter = Linter::new(parser, config);
    linter.lint_source(path, src);
    linter.take_diagnostics()
}

pub fn names(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.name.as_str()).collect()
}
