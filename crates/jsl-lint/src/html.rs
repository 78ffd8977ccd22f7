//! Script extraction from HTML documents.
//!
//! Only `<script>` start and `</script>` end tags are recognized; the rest of
//! the document is opaque. A script body may legitimately contain the text
//! `</script>` (inside a string, for example), so an end tag only closes the
//! fragment when the text before it is a complete unit of source.

use jsl_common::{JsVersion, Position, PositionMapper};
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;

static SCRIPT_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<script\b([^>]*)>|</script\s*>").expect("script tag pattern is valid")
});

static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("attribute pattern is valid")
});

/// A script found in an HTML document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    /// Script text between a start tag and its end tag.
    Inline {
        text: String,
        /// Absolute offset of `text[0]` in the document
        start_offset: u32,
        /// Line and column of `start_offset`
        anchor: Position,
        version: JsVersion,
    },
    /// `<script src="...">`
    External {
        src: String,
        /// Offset of the start tag
        offset: u32,
        version: JsVersion,
    },
}

struct OpenTag {
    content_start: usize,
    /// `None` when the script is not JavaScript
    version: Option<JsVersion>,
}

/// Find the scripts of `contents`, in document order.
///
/// `is_compilable` decides whether the text before an end tag is complete;
/// normally this is the parser's compilable-unit probe.
pub fn find_html_scripts(
    contents: &str,
    default_version: &JsVersion,
    is_compilable: impl Fn(&str, &JsVersion) -> bool,
) -> Vec<Fragment> {
    let mapper = PositionMapper::new(contents);
    let mut fragments = Vec::new();
    let mut open: Option<OpenTag> = None;

    for caps in SCRIPT_TAG_RE.captures_iter(contents) {
        let Some(tag) = caps.get(0) else {
            continue;
        };

        if let Some(attrs) = caps.get(1) {
            // Start tags inside an open script are script text.
            if open.is_some() {
                continue;
            }
            let attrs = parse_attributes(attrs.as_str());
            let version = script_version(&attrs, default_version);
            if let (Some(src), Some(version)) = (attrs.get("src"), &version) {
                fragments.push(Fragment::External {
                    src: src.clone(),
                    offset: tag.start() as u32,
                    version: version.clone(),
                });
            }
            if version.is_none() {
                tracing::debug!(offset = tag.start(), "skipping non-JavaScript script tag");
            }
            open = Some(OpenTag {
                content_start: tag.end(),
                version,
            });
            continue;
        }

        let Some(start) = &open else {
            continue;
        };
        let text = &contents[start.content_start..tag.start()];
        let Some(version) = &start.version else {
            open = None;
            continue;
        };
        // An unsupported version is handed on so the analyzer can report it.
        if version.is_supported() && !is_compilable(text, version) {
            tracing::debug!(offset = tag.start(), "end tag inside script text");
            continue;
        }
        if !text.trim().is_empty() {
            let start_offset = start.content_start as u32;
            fragments.push(Fragment::Inline {
                text: text.to_string(),
                start_offset,
                anchor: mapper.from_offset(start_offset),
                version: version.clone(),
            });
        }
        open = None;
    }

    fragments
}

/// Attributes of a start tag, keyed by lowercase name.
fn parse_attributes(text: &str) -> FxHashMap<String, String> {
    let mut attrs = FxHashMap::default();
    for caps in ATTRIBUTE_RE.captures_iter(text) {
        let Some(name) = caps.get(1) else {
            continue;
        };
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str());
        attrs
            .entry(name.as_str().to_ascii_lowercase())
            .or_insert_with(|| value.to_string());
    }
    attrs
}

fn script_version(attrs: &FxHashMap<String, String>, default_version: &JsVersion) -> Option<JsVersion> {
    if let Some(content_type) = attrs.get("type") {
        return JsVersion::from_type(content_type);
    }
    if let Some(language) = attrs.get("language") {
        return JsVersion::from_language(language);
    }
    Some(default_version.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripts(contents: &str) -> Vec<Fragment> {
        find_html_scripts(contents, &JsVersion::default(), |text, _| {
            jsl_scanner::is_compilable_unit(text)
        })
    }

    fn inline(fragment: &Fragment) -> (&str, u32, &JsVersion) {
        match fragment {
            Fragment::Inline {
                text,
                start_offset,
                version,
                ..
            } => (text.as_str(), *start_offset, version),
            other => panic!("expected an inline fragment, got {other:?}"),
        }
    }

    #[test]
    fn test_non_javascript_is_skipped() {
        let html = r#"<script type="text/vbscript">x</script><script language="javascript1.6">var a;</script>"#;
        let found = scripts(html);
        assert_eq!(found.len(), 1);
        let (text, start, version) = inline(&found[0]);
        assert_eq!(text, "var a;");
        assert_eq!(&html[start as usize..start as usize + 6], "var a;");
        assert_eq!(version.version, "1.6");
    }

    #[test]
    fn test_type_attribute_wins_over_language() {
        let html = "<SCRIPT language=vbscript type='text/javascript; version=1.7; e4x=1'>f();</SCRIPT>";
        let found = scripts(html);
        let (_, _, version) = inline(&found[0]);
        assert_eq!(version, &JsVersion::new("1.7", true));
    }

    #[test]
    fn test_external_script() {
        let html = r#"<p>hi</p><script src="lib/app.js"></script>"#;
        assert_eq!(
            scripts(html),
            vec![Fragment::External {
                src: "lib/app.js".to_string(),
                offset: 9,
                version: JsVersion::default(),
            }]
        );
    }

    #[test]
    fn test_end_tag_inside_string() {
        let html = "<script>document.write(\"</script>\");</script>";
        let found = scripts(html);
        assert_eq!(found.len(), 1);
        assert_eq!(inline(&found[0]).0, "document.write(\"</script>\");");
    }

    #[test]
    fn test_incomplete_script_is_withheld() {
        assert!(scripts("<script>if (a) {</script>").is_empty());
    }

    #[test]
    fn test_whitespace_only_scripts_are_dropped() {
        assert!(scripts("<script>\n  \n</script>").is_empty());
    }

    #[test]
    fn test_unsupported_version_is_passed_on() {
        let found = scripts("<script type=\"text/javascript;version=2.0\">if (</script>");
        let (text, _, version) = inline(&found[0]);
        assert_eq!(text, "if (");
        assert_eq!(version.version, "2.0");
    }

    #[test]
    fn test_anchor_points_at_script_start() {
        let html = "<html>\n<body>\n  <script>\nvar a;\n</script>";
        let found = scripts(html);
        match &found[0] {
            Fragment::Inline { anchor, .. } => assert_eq!(*anchor, Position { line: 2, col: 10 }),
            other => panic!("{other:?}"),
        }
    }
}
