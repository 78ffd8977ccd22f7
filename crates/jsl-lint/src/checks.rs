//! Lint checks.
//!
//! `LintChecks` runs in the same walk as the scope builder and reports
//! statement-level problems. `jsl:fallthru` and `jsl:pass` markers are
//! handed in before the walk; a marker lying strictly inside the region a
//! warning is about is consumed and the warning dropped. Markers nobody
//! consumed are reported by `finish`.
//!
//! The text checks at the bottom look at the source and comments directly.

use crate::exit_points::exit_points;
use jsl_common::{CommentSpan, Report, Span};
use jsl_parser::{NodeIndex, NodeKind, ParseTree, Visitor};
use jsl_scanner::char_codes::is_whitespace;

/// One-shot suppression markers.
#[derive(Clone, Debug, Default)]
struct MarkerPool {
    markers: Vec<Span>,
}

impl MarkerPool {
    /// Remove and report the first marker strictly between the offsets.
    fn redeem(&mut self, after: u32, before: u32) -> bool {
        match self
            .markers
            .iter()
            .position(|m| m.strictly_between(after, before))
        {
            Some(i) => {
                self.markers.remove(i);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct LintChecks {
    fallthrus: MarkerPool,
    passes: MarkerPool,
    reports: Vec<Report>,
}

impl LintChecks {
    pub fn new(fallthrus: Vec<Span>, passes: Vec<Span>) -> Self {
        LintChecks {
            fallthrus: MarkerPool { markers: fallthrus },
            passes: MarkerPool { markers: passes },
            reports: Vec::new(),
        }
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Finish the walk, reporting markers that suppressed nothing.
    pub fn finish(mut self) -> Vec<Report> {
        for marker in self.fallthrus.markers.drain(..) {
            self.reports.push(Report::new(marker.start, "invalid_fallthru"));
        }
        for marker in self.passes.markers.drain(..) {
            self.reports.push(Report::new(marker.start, "invalid_pass"));
        }
        self.reports
    }

    fn report(&mut self, offset: u32, name: &str) {
        self.reports.push(Report::new(offset, name));
    }

    fn check_case(&mut self, tree: &ParseTree, index: NodeIndex) {
        let node = tree.node(index);
        let (Some(list), Some(position)) = (node.parent, node.node_index) else {
            return;
        };
        let list_node = tree.node(list);
        let is_last = position + 1 >= list_node.kids.len();

        if node.kind == NodeKind::Default && !is_last {
            self.report(node.start_offset, "default_not_at_end");
        }

        let Some(body) = node.kid(1) else {
            return;
        };
        // Empty cases share the next case's code.
        if tree.kids(body).next().is_none() || !exit_points(tree, body).falls_through() {
            return;
        }

        if is_last {
            if !self.fallthrus.redeem(node.end_offset, list_node.end_offset) {
                self.report(node.start_offset, "missing_break_for_last_case");
            }
        } else if let Some(next) = list_node.kid(position + 1) {
            let next = tree.node(next);
            if !self.fallthrus.redeem(node.end_offset, next.start_offset) {
                self.report(next.start_offset, "missing_break");
            }
        }
    }

    fn check_block(&mut self, tree: &ParseTree, index: NodeIndex) {
        let node = tree.node(index);
        if tree.kids(index).next().is_some() {
            return;
        }
        // The script body itself may be empty.
        let Some(parent) = node.parent else {
            return;
        };
        if matches!(
            tree.node(parent).kind,
            NodeKind::Catch | NodeKind::Case | NodeKind::Default | NodeKind::Switch | NodeKind::Function
        ) {
            return;
        }
        if !self.passes.redeem(node.start_offset, node.end_offset) {
            self.report(node.start_offset, "empty_statement");
        }
    }

    fn check_switch(&mut self, tree: &ParseTree, index: NodeIndex) {
        let node = tree.node(index);
        let has_default = node
            .kid(1)
            .is_some_and(|cases| tree.kids(cases).any(|c| tree.node(c).kind == NodeKind::Default));
        if !has_default {
            self.report(node.start_offset, "missing_default_case");
        }
    }
}

impl Visitor for LintChecks {
    fn enter(&mut self, tree: &ParseTree, index: NodeIndex) {
        let node = tree.node(index);
        match node.kind {
            NodeKind::Case | NodeKind::Default => self.check_case(tree, index),
            NodeKind::Semi if node.kid(0).is_none() => {
                self.report(node.start_offset, "empty_statement");
            }
            NodeKind::Lc => self.check_block(tree, index),
            NodeKind::Switch => self.check_switch(tree, index),
            NodeKind::With => self.report(node.start_offset, "with_statement"),
            _ => {}
        }
    }
}

/// `/*` inside a block comment, or a block comment ending in `/`.
pub fn check_nested_comment(comment: &CommentSpan) -> Option<Report> {
    if !comment.is_block() {
        return None;
    }
    let nested = comment.atom.find("/*").or_else(|| {
        comment
            .atom
            .ends_with('/')
            .then(|| comment.atom.len() - 1)
    })?;
    // Two characters for the opening `/*`.
    Some(Report::new(comment.start + 2 + nested as u32, "nested_comment"))
}

/// Blanks at the end of a line, reported at the first one.
///
/// The last line is only checked when it has content, so the indentation
/// before a closing `</script>` tag is not reported.
pub fn check_trailing_whitespace(text: &str, origin: u32) -> Vec<Report> {
    let mut reports = Vec::new();
    let mut line_start = 0usize;
    let mut lines = text.split('\n').peekable();

    while let Some(line) = lines.next() {
        let is_last = lines.peek().is_none();
        let content = line.strip_suffix('\r').unwrap_or(line);
        let trimmed = content.trim_end_matches(is_whitespace);
        if trimmed.len() < content.len() && !(is_last && trimmed.is_empty()) {
            let offset = origin + (line_start + trimmed.len()) as u32;
            reports.push(Report::new(offset, "trailing_whitespace"));
        }
        line_start += line.len() + 1;
    }
    reports
}
