//! Parse-tree arena.
//!
//! Parser backends hand over trees in the nested `NodeSpec` form (it is what
//! the external-command adapter deserializes). `ParseTree::from_spec`
//! flattens a spec into an arena, links every kid to its parent and records
//! the kid's position, rejecting malformed input instead of trusting it.

use crate::node::{NodeIndex, NodeKind, Opcode, ParseNode};
use jsl_common::SyntaxError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nested description of a parse tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub kind: NodeKind,
    #[serde(default)]
    pub opcode: Opcode,
    #[serde(alias = "start")]
    pub start_offset: u32,
    #[serde(alias = "end")]
    pub end_offset: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atom: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kids: Vec<Option<NodeSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fn_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fn_args: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(kind: NodeKind, start_offset: u32, end_offset: u32) -> Self {
        NodeSpec {
            kind,
            opcode: Opcode::Nop,
            start_offset,
            end_offset,
            atom: None,
            kids: Vec::new(),
            fn_name: None,
            fn_args: Vec::new(),
        }
    }

    #[must_use]
    pub fn opcode(mut self, opcode: Opcode) -> Self {
        self.opcode = opcode;
        self
    }

    #[must_use]
    pub fn atom(mut self, atom: impl Into<String>) -> Self {
        self.atom = Some(atom.into());
        self
    }

    /// Append present kids.
    #[must_use]
    pub fn kids(mut self, kids: impl IntoIterator<Item = NodeSpec>) -> Self {
        self.kids.extend(kids.into_iter().map(Some));
        self
    }

    /// Append an absent kid slot.
    #[must_use]
    pub fn empty_kid(mut self) -> Self {
        self.kids.push(None);
        self
    }

    #[must_use]
    pub fn function(mut self, name: Option<&str>, args: impl IntoIterator<Item = NodeSpec>) -> Self {
        self.fn_name = name.map(str::to_string);
        self.fn_args = args.into_iter().collect();
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("{kind:?} node ends before it starts ({start}..{end})")]
    InvertedSpan { kind: NodeKind, start: u32, end: u32 },
    #[error("function parameter must be a name node, found {0:?}")]
    ParameterNotName(NodeKind),
    #[error("parse tree exceeds {} nodes", u32::MAX)]
    TooLarge,
}

/// Arena-based parse tree. The root is always `NodeIndex(0)`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ParseTree {
    nodes: Vec<ParseNode>,
    /// Non-fatal grammar findings (`missing_semicolon`, ...)
    warnings: Vec<SyntaxError>,
}

impl ParseTree {
    pub fn from_spec(spec: &NodeSpec) -> Result<ParseTree, TreeError> {
        let mut tree = ParseTree::default();
        tree.add(spec, None, None)?;
        Ok(tree)
    }

    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<SyntaxError>) -> Self {
        self.warnings = warnings;
        self
    }

    fn add(
        &mut self,
        spec: &NodeSpec,
        parent: Option<NodeIndex>,
        node_index: Option<usize>,
    ) -> Result<NodeIndex, TreeError> {
        if spec.start_offset > spec.end_offset {
            return Err(TreeError::InvertedSpan {
                kind: spec.kind,
                start: spec.start_offset,
                end: spec.end_offset,
            });
        }
        let index = NodeIndex(u32::try_from(self.nodes.len()).map_err(|_| TreeError::TooLarge)?);
        self.nodes.push(ParseNode {
            kind: spec.kind,
            opcode: spec.opcode,
            start_offset: spec.start_offset,
            end_offset: spec.end_offset,
            atom: spec.atom.clone(),
            kids: Vec::with_capacity(spec.kids.len()),
            parent,
            node_index,
            fn_name: spec.fn_name.clone(),
            fn_args: Vec::with_capacity(spec.fn_args.len()),
        });

        for arg in &spec.fn_args {
            if arg.kind != NodeKind::Name {
                return Err(TreeError::ParameterNotName(arg.kind));
            }
            let arg_index = self.add(arg, Some(index), None)?;
            self.nodes[index.index()].fn_args.push(arg_index);
        }

        for (i, kid) in spec.kids.iter().enumerate() {
            let kid_index = match kid {
                Some(kid) => Some(self.add(kid, Some(index), Some(i))?),
                None => None,
            };
            self.nodes[index.index()].kids.push(kid_index);
        }

        Ok(index)
    }

    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: NodeIndex) -> Option<&ParseNode> {
        self.nodes.get(index.index())
    }

    /// The node at `index`. Indices handed out by this tree are always valid.
    pub fn node(&self, index: NodeIndex) -> &ParseNode {
        &self.nodes[index.index()]
    }

    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.get(index).and_then(|n| n.parent)
    }

    /// Present kids of `index`, in order.
    pub fn kids(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes[index.index()].kids.iter().filter_map(|k| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &ParseNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeIndex(i as u32), n))
    }

    pub fn warnings(&self) -> &[SyntaxError] {
        &self.warnings
    }
}
