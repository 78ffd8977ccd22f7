//! The parser contract.

use crate::tree::{ParseTree, TreeError};
use jsl_common::{JsVersion, SyntaxError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    /// The source is not valid for the requested version.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The backend produced a tree that violates the tree invariants.
    #[error("malformed parse tree: {0}")]
    Tree(#[from] TreeError),
    /// The backend itself failed.
    #[error("parser backend failed: {0}")]
    Backend(String),
}

/// A JavaScript grammar.
///
/// `parse` receives one script fragment and the absolute offset of its first
/// character; every offset in the returned tree is absolute. Versions are
/// validated by the caller before `parse` is invoked.
pub trait ScriptParser {
    fn parse(
        &self,
        text: &str,
        version: &JsVersion,
        start_offset: u32,
    ) -> Result<ParseTree, ParseError>;

    /// Whether `text` is a complete unit of source for `version`.
    fn is_compilable_unit(&self, text: &str, _version: &JsVersion) -> bool {
        jsl_scanner::is_compilable_unit(text)
    }
}

impl<P: ScriptParser + ?Sized> ScriptParser for &P {
    fn parse(
        &self,
        text: &str,
        version: &JsVersion,
        start_offset: u32,
    ) -> Result<ParseTree, ParseError> {
        (**self).parse(text, version, start_offset)
    }

    fn is_compilable_unit(&self, text: &str, version: &JsVersion) -> bool {
        (**self).is_compilable_unit(text, version)
    }
}

impl<P: ScriptParser + ?Sized> ScriptParser for Box<P> {
    fn parse(
        &self,
        text: &str,
        version: &JsVersion,
        start_offset: u32,
    ) -> Result<ParseTree, ParseError> {
        (**self).parse(text, version, start_offset)
    }

    fn is_compilable_unit(&self, text: &str, version: &JsVersion) -> bool {
        (**self).is_compilable_unit(text, version)
    }
}
