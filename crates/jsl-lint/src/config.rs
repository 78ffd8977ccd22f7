//! Lint configuration.

use jsl_common::JsVersion;
use jsl_common::diagnostics::{Severity, get_diagnostic_message};
use jsl_common::version::UnknownVersion;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown warning: {0}")]
    UnknownWarning(String),
    #[error("{0} is an error and cannot be disabled")]
    NotAWarning(String),
    #[error(transparent)]
    Version(#[from] UnknownVersion),
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
}

/// Source file encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "latin-1", alias = "latin1", alias = "iso-8859-1")]
    Latin1,
}

impl Encoding {
    /// Decode file contents. A UTF-8 byte order mark is dropped.
    pub fn decode(self, bytes: &[u8]) -> Result<String, std::str::Utf8Error> {
        match self {
            Encoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(bytes).map(str::to_string)
            }
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl FromStr for Encoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
            _ => Err(ConfigError::UnknownEncoding(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LintConfig {
    /// Warnings switched on or off; anything not listed is on
    pub warnings: FxHashMap<String, bool>,
    pub default_version: JsVersion,
    /// Searched for `jsl:import` targets after the importing file's directory
    pub include_dirs: Vec<PathBuf>,
    /// Names treated as declared in every script
    pub declarations: FxHashSet<String>,
    pub encoding: Encoding,
}

impl LintConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self, name: &str) -> Result<(), ConfigError> {
        self.set_warning(name, true)
    }

    pub fn disable(&mut self, name: &str) -> Result<(), ConfigError> {
        self.set_warning(name, false)
    }

    fn set_warning(&mut self, name: &str, enabled: bool) -> Result<(), ConfigError> {
        match get_diagnostic_message(name) {
            None => Err(ConfigError::UnknownWarning(name.to_string())),
            Some(msg) if msg.severity == Severity::Error => {
                Err(ConfigError::NotAWarning(name.to_string()))
            }
            Some(_) => {
                self.warnings.insert(name.to_string(), enabled);
                Ok(())
            }
        }
    }

    /// Whether diagnostics named `name` are emitted. Errors always are.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.warnings.get(name).copied().unwrap_or(true)
    }

    pub fn declare(&mut self, name: impl Into<String>) {
        self.declarations.insert(name.into());
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declarations.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_default_on() {
        let mut config = LintConfig::new();
        assert!(config.is_enabled("with_statement"));
        config.disable("with_statement").unwrap();
        assert!(!config.is_enabled("with_statement"));
        config.enable("with_statement").unwrap();
        assert!(config.is_enabled("with_statement"));
    }

    #[test]
    fn test_unknown_and_error_names_are_rejected() {
        let mut config = LintConfig::new();
        assert!(matches!(
            config.disable("no_such_warning"),
            Err(ConfigError::UnknownWarning(_))
        ));
        assert!(matches!(
            config.disable("syntax_error"),
            Err(ConfigError::NotAWarning(_))
        ));
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        assert_eq!(Encoding::Utf8.decode(b"\xEF\xBB\xBFvar a;").unwrap(), "var a;");
        assert!(Encoding::Utf8.decode(b"\xFF").is_err());
    }

    #[test]
    fn test_latin1_maps_every_byte() {
        assert_eq!(Encoding::Latin1.decode(b"caf\xE9").unwrap(), "caf\u{e9}");
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!("UTF-8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("latin1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert!("ebcdic".parse::<Encoding>().is_err());
    }
}
