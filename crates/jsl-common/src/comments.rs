//! Raw Comment Scanning
//!
//! Control comments are not part of the AST, so they are recovered from the
//! source text separately. The scan here is deliberately naive: it finds
//! everything that *looks* like a comment, including text inside string and
//! regular-expression literals and candidates overlapping other candidates.
//! The lint layer filters the candidates against the literal ranges of the
//! parsed tree.

use crate::span::Span;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)//[^\r\n]*|/\*.*?\*/").expect("comment pattern is valid"));

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStyle {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
}

/// A comment candidate found in source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSpan {
    /// Absolute offset of the first `/`
    pub start: u32,
    /// Absolute offset of the last character (inclusive)
    pub end: u32,
    /// Comment text without its delimiters
    pub atom: String,
    pub style: CommentStyle,
}

impl CommentSpan {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn is_block(&self) -> bool {
        self.style == CommentStyle::Block
    }
}

/// Find every comment-like substring of `text`, in source order.
///
/// `origin` is the absolute offset of `text[0]`. After each match the search
/// resumes one character after the match start, so candidates nested in or
/// overlapping an earlier match are produced as well.
pub fn find_possible_comments(text: &str, origin: u32) -> Vec<CommentSpan> {
    let mut comments = Vec::new();
    let mut pos = 0;

    while let Some(m) = COMMENT_RE.find_at(text, pos) {
        let matched = m.as_str();
        let (style, atom) = if let Some(body) = matched.strip_prefix("//") {
            (CommentStyle::Line, body)
        } else {
            let body = &matched[2..matched.len() - 2];
            (CommentStyle::Block, body)
        };

        // An empty `//` match still has a last character: the second slash.
        let last = m.end().saturating_sub(1);
        comments.push(CommentSpan {
            start: origin + m.start() as u32,
            end: origin + last as u32,
            atom: atom.to_string(),
            style,
        });

        // Both delimiters begin with an ASCII '/', so start + 1 is a boundary.
        pos = m.start() + 1;
    }

    comments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_block_comments() {
        let comments = find_possible_comments("a; // one\n/* two */ b;", 0);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].style, CommentStyle::Line);
        assert_eq!(comments[0].atom, " one");
        assert_eq!((comments[0].start, comments[0].end), (3, 8));
        assert_eq!(comments[1].style, CommentStyle::Block);
        assert_eq!(comments[1].atom, " two ");
        assert_eq!((comments[1].start, comments[1].end), (10, 18));
    }

    #[test]
    fn test_origin_is_added() {
        let comments = find_possible_comments("/*x*/", 100);
        assert_eq!(comments[0].span(), Span::new(100, 104));
    }

    #[test]
    fn test_overlapping_candidates_are_all_reported() {
        // "///x" yields candidates at 0 and 1.
        let comments = find_possible_comments("///x", 0);
        let starts: Vec<u32> = comments.iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![0, 1]);
    }

    #[test]
    fn test_candidates_inside_literals_are_kept() {
        let comments = find_possible_comments("s = '/*a*/';", 0);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].atom, "a");
    }

    #[test]
    fn test_block_spans_lines() {
        let comments = find_possible_comments("/* a\n b */", 0);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].atom, " a\n b ");
    }

    #[test]
    fn test_unterminated_block_is_not_a_candidate() {
        assert!(find_possible_comments("a /* b", 0).is_empty());
    }
}
