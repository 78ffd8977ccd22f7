//! Parse nodes.

use jsl_common::Span;
use serde::{Deserialize, Serialize};

/// Index of a node in its `ParseTree`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node kinds produced by the grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Statement list or block (`{ ... }`)
    Lc,
    /// Expression statement; an empty statement has no kid
    Semi,
    /// `var` / `const` declaration list
    Var,
    Name,
    Function,
    /// Block scope introduced by `let` and friends
    LexicalScope,
    With,
    /// kids: try block, catch list, finally block
    Try,
    CatchList,
    /// kids: catch variable, guard, body
    Catch,
    /// kids: discriminant, `Lc` of cases
    Switch,
    /// kids: test, body
    Case,
    /// kids: none, body
    Default,
    Break,
    Continue,
    Return,
    Throw,
    /// kids: test, then, else
    If,
    /// Conditional expression
    Hook,
    While,
    Do,
    For,
    In,
    /// kids: target, value; opcode `Nop` for plain `=`
    Assign,
    Inc,
    Dec,
    /// Property in an object literal; kids: key, value
    Colon,
    /// `{ ... }` in expression position
    #[serde(alias = "rc")]
    ObjectLiteral,
    ArrayLiteral,
    Dot,
    /// Element access (`a[b]`)
    #[serde(alias = "lb")]
    Index,
    Call,
    New,
    String,
    Number,
    Regexp,
    /// `this`, `true`, `false`, `null`
    Primary,
    Unary,
    Binary,
    Or,
    And,
    Comma,
    Label,
    Debugger,
}

/// Node opcodes used by the analyzer. Others collapse into `Other`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opcode {
    #[default]
    Nop,
    ArgName,
    DefVar,
    DefConst,
    DefLet,
    /// Function statement or nested function declaration
    Closure,
    /// Named function expression
    NamedFunObj,
    /// Anonymous function expression
    AnonFunObj,
    This,
    True,
    False,
    Null,
    #[serde(other)]
    Other,
}

/// A node of the parse tree.
///
/// `end_offset` is inclusive. `node_index` is the position of this node in
/// its parent's `kids`; it is `None` for the root and for function
/// parameters, which live in the function's `fn_args` instead of `kids`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseNode {
    pub kind: NodeKind,
    pub opcode: Opcode,
    pub start_offset: u32,
    pub end_offset: u32,
    pub atom: Option<String>,
    pub kids: Vec<Option<NodeIndex>>,
    pub parent: Option<NodeIndex>,
    pub node_index: Option<usize>,
    pub fn_name: Option<String>,
    pub fn_args: Vec<NodeIndex>,
}

impl ParseNode {
    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.start_offset, self.end_offset)
    }

    pub fn atom(&self) -> &str {
        self.atom.as_deref().unwrap_or("")
    }

    /// The kid at position `i`, if present.
    pub fn kid(&self, i: usize) -> Option<NodeIndex> {
        self.kids.get(i).copied().flatten()
    }

    /// Whether this node is the first kid of its parent.
    pub fn is_first_kid(&self) -> bool {
        self.node_index == Some(0)
    }
}
