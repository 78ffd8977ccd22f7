//! Exit-point analysis.
//!
//! Computes how control can leave a statement. `FALLTHROUGH` means control
//! may reach the end of the statement and continue with the next one.

use bitflags::bitflags;
use jsl_parser::{NodeIndex, NodeKind, ParseTree};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ExitPoints: u8 {
        const FALLTHROUGH = 1 << 0;
        const BREAK = 1 << 1;
        const CONTINUE = 1 << 2;
        const RETURN = 1 << 3;
        const THROW = 1 << 4;
    }
}

impl ExitPoints {
    #[inline]
    pub fn falls_through(self) -> bool {
        self.contains(ExitPoints::FALLTHROUGH)
    }
}

/// The ways control can leave `node`.
pub fn exit_points(tree: &ParseTree, node: NodeIndex) -> ExitPoints {
    let n = tree.node(node);
    match n.kind {
        NodeKind::Lc => {
            let mut points = ExitPoints::FALLTHROUGH;
            for kid in tree.kids(node) {
                let kid_points = exit_points(tree, kid);
                points |= kid_points;
                // The rest of the block is unreachable.
                if !kid_points.falls_through() {
                    points.remove(ExitPoints::FALLTHROUGH);
                    break;
                }
            }
            points
        }
        NodeKind::If => {
            let mut points = n
                .kid(1)
                .map_or(ExitPoints::FALLTHROUGH, |then| exit_points(tree, then));
            match n.kid(2) {
                Some(otherwise) => points |= exit_points(tree, otherwise),
                None => points |= ExitPoints::FALLTHROUGH,
            }
            points
        }
        NodeKind::Switch => switch_exit_points(tree, node),
        NodeKind::Break => ExitPoints::BREAK,
        NodeKind::Continue => ExitPoints::CONTINUE,
        NodeKind::Return => ExitPoints::RETURN,
        NodeKind::Throw => ExitPoints::THROW,
        NodeKind::With => n
            .kids
            .last()
            .copied()
            .flatten()
            .map_or(ExitPoints::FALLTHROUGH, |body| exit_points(tree, body)),
        NodeKind::Try => try_exit_points(tree, node),
        _ => ExitPoints::FALLTHROUGH,
    }
}

fn switch_exit_points(tree: &ParseTree, node: NodeIndex) -> ExitPoints {
    let mut points = ExitPoints::empty();
    let mut has_default = false;
    let mut final_fallthrough = true;

    if let Some(cases) = tree.node(node).kid(1) {
        for case in tree.kids(cases) {
            let case_node = tree.node(case);
            has_default |= case_node.kind == NodeKind::Default;
            let case_points = case_node
                .kid(1)
                .map_or(ExitPoints::FALLTHROUGH, |body| exit_points(tree, body));
            final_fallthrough = case_points.falls_through();
            points |= case_points;
        }
    }

    // Falling out of one case only leads into the next one.
    points.remove(ExitPoints::FALLTHROUGH);
    // A break leaves the switch and continues after it.
    if points.contains(ExitPoints::BREAK) {
        points.remove(ExitPoints::BREAK);
        points |= ExitPoints::FALLTHROUGH;
    }
    if !has_default || final_fallthrough {
        points |= ExitPoints::FALLTHROUGH;
    }
    points
}

fn try_exit_points(tree: &ParseTree, node: NodeIndex) -> ExitPoints {
    let n = tree.node(node);
    let mut points = n
        .kid(0)
        .map_or(ExitPoints::FALLTHROUGH, |body| exit_points(tree, body));

    if let Some(catches) = n.kid(1) {
        for body in catch_bodies(tree, catches) {
            points |= exit_points(tree, body);
        }
    }

    if let Some(finally) = n.kid(2) {
        let mut finally_points = exit_points(tree, finally);
        if finally_points.falls_through() {
            finally_points.remove(ExitPoints::FALLTHROUGH);
        } else {
            // A finally block that always exits overrides the other paths.
            points.remove(ExitPoints::FALLTHROUGH);
        }
        points |= finally_points;
    }
    points
}

/// Bodies of the catch clauses under a `CatchList`.
fn catch_bodies(tree: &ParseTree, catches: NodeIndex) -> Vec<NodeIndex> {
    let mut bodies = Vec::new();
    for clause in tree.kids(catches) {
        let mut catch = clause;
        if tree.node(catch).kind == NodeKind::LexicalScope {
            match tree.node(catch).kid(0) {
                Some(inner) => catch = inner,
                None => continue,
            }
        }
        let catch_node = tree.node(catch);
        if catch_node.kind == NodeKind::Catch
            && let Some(body) = catch_node.kid(2)
        {
            bodies.push(body);
        }
    }
    bodies
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsl_parser::NodeSpec;

    fn stmt(kind: NodeKind) -> NodeSpec {
        NodeSpec::new(kind, 0, 0)
    }

    fn block(kids: Vec<NodeSpec>) -> NodeSpec {
        NodeSpec::new(NodeKind::Lc, 0, 0).kids(kids)
    }

    fn points(spec: NodeSpec) -> ExitPoints {
        let tree = ParseTree::from_spec(&spec).unwrap();
        exit_points(&tree, tree.root())
    }

    fn case(kind: NodeKind, body: Vec<NodeSpec>) -> NodeSpec {
        let head = NodeSpec::new(kind, 0, 0);
        let head = if kind == NodeKind::Case {
            head.kids([stmt(NodeKind::Number)])
        } else {
            head.empty_kid()
        };
        head.kids([block(body)])
    }

    fn switch(cases: Vec<NodeSpec>) -> NodeSpec {
        NodeSpec::new(NodeKind::Switch, 0, 0).kids([stmt(NodeKind::Name), block(cases)])
    }

    #[test]
    fn test_block_stops_at_first_exit() {
        assert_eq!(points(block(vec![])), ExitPoints::FALLTHROUGH);
        assert_eq!(
            points(block(vec![stmt(NodeKind::Semi), stmt(NodeKind::Return), stmt(NodeKind::Throw)])),
            ExitPoints::RETURN
        );
    }

    #[test]
    fn test_if_without_else_falls_through() {
        let if_only = NodeSpec::new(NodeKind::If, 0, 0)
            .kids([stmt(NodeKind::Name), stmt(NodeKind::Return)]);
        assert_eq!(points(if_only), ExitPoints::RETURN | ExitPoints::FALLTHROUGH);

        let both = NodeSpec::new(NodeKind::If, 0, 0).kids([
            stmt(NodeKind::Name),
            stmt(NodeKind::Return),
            stmt(NodeKind::Throw),
        ]);
        assert_eq!(points(both), ExitPoints::RETURN | ExitPoints::THROW);
    }

    #[test]
    fn test_switch_break_becomes_fallthrough() {
        let s = switch(vec![
            case(NodeKind::Case, vec![stmt(NodeKind::Break)]),
            case(NodeKind::Default, vec![stmt(NodeKind::Return)]),
        ]);
        assert_eq!(points(s), ExitPoints::FALLTHROUGH | ExitPoints::RETURN);
    }

    #[test]
    fn test_switch_with_default_that_always_returns() {
        let s = switch(vec![
            case(NodeKind::Case, vec![stmt(NodeKind::Return)]),
            case(NodeKind::Default, vec![stmt(NodeKind::Throw)]),
        ]);
        assert_eq!(points(s), ExitPoints::RETURN | ExitPoints::THROW);

        let no_default = switch(vec![case(NodeKind::Case, vec![stmt(NodeKind::Return)])]);
        assert!(points(no_default).falls_through());
    }

    #[test]
    fn test_try_catch_finally() {
        let catch = NodeSpec::new(NodeKind::CatchList, 0, 0).kids([NodeSpec::new(
            NodeKind::LexicalScope,
            0,
            0,
        )
        .kids([NodeSpec::new(NodeKind::Catch, 0, 0)
            .kids([stmt(NodeKind::Name)])
            .empty_kid()
            .kids([block(vec![stmt(NodeKind::Semi)])])])]);

        let try_catch = NodeSpec::new(NodeKind::Try, 0, 0)
            .kids([block(vec![stmt(NodeKind::Return)]), catch.clone()]);
        assert_eq!(points(try_catch), ExitPoints::RETURN | ExitPoints::FALLTHROUGH);

        let finally_returns = NodeSpec::new(NodeKind::Try, 0, 0).kids([
            block(vec![stmt(NodeKind::Semi)]),
            catch,
            block(vec![stmt(NodeKind::Return)]),
        ]);
        assert_eq!(points(finally_returns), ExitPoints::RETURN);
    }

    #[test]
    fn test_with_uses_its_body() {
        let with = NodeSpec::new(NodeKind::With, 0, 0)
            .kids([stmt(NodeKind::Name), block(vec![stmt(NodeKind::Throw)])]);
        assert_eq!(points(with), ExitPoints::THROW);
    }
}
