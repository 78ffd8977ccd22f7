//! JavaScript version tags.
//!
//! A version is the pair the parser needs to pick its grammar: a version
//! string (`"default"`, `"1.5"`, ...) and whether E4X is enabled. Versions are
//! derived from MIME types (`type="text/javascript;version=1.6"`), from the
//! legacy `language` attribute, or from configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Versions the analyzer accepts.
pub const SUPPORTED_VERSIONS: &[&str] = &[
    "default", "1.0", "1.1", "1.2", "1.3", "1.4", "1.5", "1.6", "1.7", "1.8",
];

/// MIME types that denote JavaScript.
const JAVASCRIPT_MIME_TYPES: &[&str] = &[
    "text/javascript",
    "application/javascript",
    "application/x-javascript",
];

/// Legacy `language` attribute values that select the default version.
const DEFAULT_LANGUAGES: &[&str] = &["javascript", "livescript", "mocha"];

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JsVersion {
    pub version: String,
    #[serde(default)]
    pub e4x: bool,
}

impl Default for JsVersion {
    fn default() -> Self {
        JsVersion {
            version: "default".to_string(),
            e4x: false,
        }
    }
}

impl JsVersion {
    pub fn new(version: impl Into<String>, e4x: bool) -> Self {
        JsVersion {
            version: version.into(),
            e4x,
        }
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_VERSIONS.contains(&self.version.as_str())
    }

    /// Derive a version from a MIME type such as
    /// `text/javascript; version=1.6; e4x=1`.
    ///
    /// Returns `None` when the MIME type is not JavaScript. Unknown version
    /// numbers are kept so the caller can report them as unsupported.
    pub fn from_type(content_type: &str) -> Option<JsVersion> {
        let mut parts = content_type.split(';');
        let mime = parts.next()?.trim().to_ascii_lowercase();
        if !JAVASCRIPT_MIME_TYPES.contains(&mime.as_str()) {
            return None;
        }

        let mut version = JsVersion::default();
        for param in parts {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            match key.trim().to_ascii_lowercase().as_str() {
                "version" => version.version = value.trim().to_string(),
                "e4x" => version.e4x = value.trim() == "1",
                _ => {}
            }
        }
        Some(version)
    }

    /// Derive a version from a legacy `language` attribute.
    pub fn from_language(language: &str) -> Option<JsVersion> {
        let language = language.trim().to_ascii_lowercase();
        if DEFAULT_LANGUAGES.contains(&language.as_str()) {
            return Some(JsVersion::default());
        }
        let number = language.strip_prefix("javascript")?;
        let candidate = JsVersion::new(number, false);
        candidate.is_supported().then_some(candidate)
    }
}

impl fmt::Display for JsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.e4x {
            write!(f, "{}+e4x", self.version)
        } else {
            f.write_str(&self.version)
        }
    }
}

/// Error returned when a version string names no supported version.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported JavaScript version: {0}")]
pub struct UnknownVersion(pub String);

impl FromStr for JsVersion {
    type Err = UnknownVersion;

    /// Parse `"1.6"`, `"default"` or `"1.6+e4x"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (number, e4x) = match trimmed.strip_suffix("+e4x") {
            Some(number) => (number, true),
            None => (trimmed, false),
        };
        let version = JsVersion::new(number, e4x);
        if version.is_supported() {
            Ok(version)
        } else {
            Err(UnknownVersion(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_type_plain() {
        assert_eq!(
            JsVersion::from_type("text/javascript"),
            Some(JsVersion::default())
        );
        assert_eq!(
            JsVersion::from_type("Application/X-JavaScript"),
            Some(JsVersion::default())
        );
    }

    #[test]
    fn test_from_type_with_parameters() {
        let version = JsVersion::from_type("text/javascript; version=1.6; e4x=1").unwrap();
        assert_eq!(version.version, "1.6");
        assert!(version.e4x);
        assert!(version.is_supported());
    }

    #[test]
    fn test_from_type_rejects_other_languages() {
        assert_eq!(JsVersion::from_type("text/vbscript"), None);
        assert_eq!(JsVersion::from_type(""), None);
    }

    #[test]
    fn test_from_type_keeps_unknown_version() {
        let version = JsVersion::from_type("text/javascript;version=2.9").unwrap();
        assert!(!version.is_supported());
    }

    #[test]
    fn test_from_language() {
        assert_eq!(JsVersion::from_language("JavaScript"), Some(JsVersion::default()));
        assert_eq!(JsVersion::from_language("mocha"), Some(JsVersion::default()));
        assert_eq!(
            JsVersion::from_language("javascript1.5"),
            Some(JsVersion::new("1.5", false))
        );
        assert_eq!(JsVersion::from_language("javascript9.9"), None);
        assert_eq!(JsVersion::from_language("vbscript"), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("1.7".parse(), Ok(JsVersion::new("1.7", false)));
        assert_eq!("1.6+e4x".parse(), Ok(JsVersion::new("1.6", true)));
        assert!("3.0".parse::<JsVersion>().is_err());
        assert_eq!(JsVersion::new("1.6", true).to_string(), "1.6+e4x");
    }
}
