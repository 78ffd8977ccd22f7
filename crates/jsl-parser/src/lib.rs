//! Parse-tree contract for the jsl lint engine.
//!
//! The grammar itself is an external component. This crate defines what the
//! analyzer consumes from it:
//! - `ParseNode` / `ParseTree` - Read-only AST arena with parent links
//! - `NodeSpec` - Nested serde form of a tree, as produced by a parser backend
//! - `ScriptParser` - The parser contract
//! - `CommandParser` - Adapter running an external parser program
//! - `Visitor` / `walk` - Depth-first traversal with enter/leave hooks

pub mod node;
pub use node::{NodeIndex, NodeKind, Opcode, ParseNode};

pub mod tree;
pub use tree::{NodeSpec, ParseTree, TreeError};

pub mod contract;
pub use contract::{ParseError, ScriptParser};

pub mod command;
pub use command::CommandParser;

pub mod visit;
pub use visit::{Visitor, walk};
