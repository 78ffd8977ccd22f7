//! Scope analysis for the jsl lint engine.
//!
//! - `ScopeGraph` - Arena of lexical scopes with declarations and references
//! - `ScopeBuilder` - Visitor that populates a scope graph from a parse tree
//! - `ScriptRegistry` - Per-file scope graphs linked by `jsl:import`

pub mod scope;
pub use scope::{
    Declaration, DeclarationKind, DeclareOutcome, IdentifierWarnings, Reference, Scope,
    ScopeGraph, ScopeId, ScopeKind, ScopedDeclaration,
};

pub mod state;
pub use state::ScopeBuilder;

pub mod script;
pub use script::{Script, ScriptId, ScriptRegistry};
