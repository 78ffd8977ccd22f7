//! Comment filtering.
//!
//! The raw scan in `jsl_common::comments` also finds `//` and `/*` inside
//! string and regular-expression literals, and comment markers inside other
//! comments. Candidates are accepted in source order unless they start inside
//! a literal or an already accepted comment.

use jsl_common::{CommentSpan, Span};
use jsl_parser::{NodeKind, ParseTree};

/// A set of inclusive offset ranges.
#[derive(Clone, Debug, Default)]
pub struct OffsetRanges {
    ranges: Vec<Span>,
}

impl OffsetRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, span: Span) {
        self.ranges.push(span);
    }

    pub fn contains(&self, offset: u32) -> bool {
        self.ranges.iter().any(|r| r.contains(offset))
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Keep the candidates that are real comments of `tree`'s source.
pub fn filter_comments(candidates: Vec<CommentSpan>, tree: &ParseTree) -> Vec<CommentSpan> {
    let mut claimed = OffsetRanges::new();
    for (_, node) in tree.iter() {
        if matches!(node.kind, NodeKind::String | NodeKind::Regexp) {
            claimed.insert(node.span());
        }
    }

    let mut comments = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if claimed.contains(candidate.start) {
            continue;
        }
        claimed.insert(candidate.span());
        comments.push(candidate);
    }
    comments
}
