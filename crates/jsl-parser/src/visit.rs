//! Depth-first traversal with enter/leave hooks.
//!
//! Several visitors can share one walk; for every node each visitor's
//! `enter` runs (in slice order) before the node's kids are visited, and each
//! visitor's `leave` runs after them. Function parameters are not kids and
//! are not visited.

use crate::node::NodeIndex;
use crate::tree::ParseTree;

pub trait Visitor {
    fn enter(&mut self, _tree: &ParseTree, _node: NodeIndex) {}
    fn leave(&mut self, _tree: &ParseTree, _node: NodeIndex) {}
}

enum Step {
    Enter(NodeIndex),
    Leave(NodeIndex),
}

/// Walk `tree` from the root.
pub fn walk(tree: &ParseTree, visitors: &mut [&mut dyn Visitor]) {
    if tree.is_empty() {
        return;
    }

    let mut stack = vec![Step::Enter(tree.root())];
    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(node) => {
                for visitor in visitors.iter_mut() {
                    visitor.enter(tree, node);
                }
                stack.push(Step::Leave(node));
                let kids: Vec<NodeIndex> = tree.kids(node).collect();
                stack.extend(kids.into_iter().rev().map(Step::Enter));
            }
            Step::Leave(node) => {
                for visitor in visitors.iter_mut() {
                    visitor.leave(tree, node);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::tree::NodeSpec;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Visitor for Recorder {
        fn enter(&mut self, tree: &ParseTree, node: NodeIndex) {
            self.events.push(format!("+{}", tree.node(node).atom()));
        }
        fn leave(&mut self, tree: &ParseTree, node: NodeIndex) {
            self.events.push(format!("-{}", tree.node(node).atom()));
        }
    }

    #[test]
    fn test_walk_order() {
        let spec = NodeSpec::new(NodeKind::Lc, 0, 9).atom("r").kids([
            NodeSpec::new(NodeKind::Name, 0, 0).atom("a"),
            NodeSpec::new(NodeKind::Semi, 2, 4)
                .atom("b")
                .kids([NodeSpec::new(NodeKind::Name, 2, 2).atom("c")]),
        ]);
        let tree = ParseTree::from_spec(&spec).unwrap();

        let mut first = Recorder::default();
        let mut second = Recorder::default();
        walk(&tree, &mut [&mut first, &mut second]);

        let expected = vec!["+r", "+a", "-a", "+b", "+c", "-c", "-b", "-r"];
        assert_eq!(first.events, expected);
        assert_eq!(second.events, expected);
    }

    #[test]
    fn test_walk_skips_parameters() {
        let spec = NodeSpec::new(NodeKind::Function, 0, 9)
            .atom("f")
            .function(None, [NodeSpec::new(NodeKind::Name, 5, 5).atom("p")]);
        let tree = ParseTree::from_spec(&spec).unwrap();
        let mut recorder = Recorder::default();
        walk(&tree, &mut [&mut recorder]);
        assert_eq!(recorder.events, vec!["+f", "-f"]);
    }
}
