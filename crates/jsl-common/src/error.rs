//! Syntax errors shared by the tokenizer and the parser contract.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A lexical or syntax error at a specific offset.
///
/// `message_key` names an entry of the diagnostic catalogue (for example
/// `syntax_error` or `unterminated_comment`); `message_args` fills the
/// placeholders of that entry's template.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message_key} at offset {offset}")]
pub struct SyntaxError {
    pub offset: u32,
    pub message_key: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub message_args: BTreeMap<String, String>,
}

impl SyntaxError {
    pub fn new(offset: u32, message_key: impl Into<String>) -> Self {
        SyntaxError {
            offset,
            message_key: message_key.into(),
            message_args: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.message_args.insert(name.into(), value.into());
        self
    }

    /// Arguments as borrowed pairs, ready for `format_message`.
    pub fn args(&self) -> Vec<(&str, &str)> {
        self.message_args
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}
