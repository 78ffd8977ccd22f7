//! Scope construction.
//!
//! `ScopeBuilder` walks a parse tree and records declarations and references
//! into the script's `ScopeGraph`. Functions, lexical blocks and `with`
//! statements each open a scope on enter and close it on leave. Problems
//! found while declaring (`duplicate_formal`, `var_hides_arg`,
//! `redeclared_var`) are collected as reports for the linter.

use crate::scope::{DeclarationKind, DeclareOutcome, ScopeGraph, ScopeId, ScopeKind};
use jsl_common::{Report, Span};
use jsl_parser::{NodeIndex, NodeKind, Opcode, ParseTree, Visitor};

pub struct ScopeBuilder<'g> {
    graph: &'g mut ScopeGraph,
    stack: Vec<ScopeId>,
    reports: Vec<Report>,
}

impl<'g> ScopeBuilder<'g> {
    /// Start building in the global scope of `graph`.
    pub fn new(graph: &'g mut ScopeGraph) -> Self {
        let root = graph.root();
        ScopeBuilder {
            graph,
            stack: vec![root],
            reports: Vec::new(),
        }
    }

    pub fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId::ROOT)
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn into_reports(self) -> Vec<Report> {
        self.reports
    }

    fn push_scope(&mut self, kind: ScopeKind, tree: &ParseTree, node: NodeIndex) {
        let parent = self.current();
        let id = self.graph.add_scope(parent, kind, tree.node(node).span());
        self.stack.push(id);
    }

    fn pop_scope(&mut self) {
        // The global scope is never popped.
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    fn warn_or_declare(&mut self, name: &str, kind: DeclarationKind, span: Span) {
        let scope = self.current();
        let key = match self.graph.warn_or_declare(scope, name, kind, span) {
            DeclareOutcome::Declared => return,
            DeclareOutcome::HidesArg => "var_hides_arg",
            DeclareOutcome::Redeclared => "redeclared_var",
        };
        self.reports.push(Report::new(span.start, key).arg("name", name));
    }

    fn enter_function(&mut self, tree: &ParseTree, index: NodeIndex) {
        let node = tree.node(index);
        let name = node.fn_name.as_deref().filter(|n| !n.is_empty());

        if let Some(name) = name
            && matches!(node.opcode, Opcode::Nop | Opcode::Closure)
        {
            self.warn_or_declare(name, DeclarationKind::Function, node.span());
        }

        self.push_scope(ScopeKind::Function, tree, index);
        let scope = self.current();

        if let Some(name) = name
            && node.opcode == Opcode::NamedFunObj
        {
            self.graph.declare(scope, name, DeclarationKind::Function, node.span());
        }

        for &arg in &node.fn_args {
            let arg = tree.node(arg);
            let arg_name = arg.atom();
            if self.graph.scope(scope).get_identifier(arg_name).is_some() {
                self.reports.push(
                    Report::new(arg.start_offset, "duplicate_formal").arg("name", arg_name),
                );
            }
            self.graph.declare(scope, arg_name, DeclarationKind::Arg, arg.span());
        }
    }

    fn enter_name(&mut self, tree: &ParseTree, index: NodeIndex) {
        let node = tree.node(index);
        let Some(parent) = node.parent.map(|p| tree.node(p)) else {
            return;
        };

        // Key of an object literal property
        if node.is_first_kid()
            && parent.kind == NodeKind::Colon
            && parent
                .parent
                .is_some_and(|g| tree.node(g).kind == NodeKind::ObjectLiteral)
        {
            return;
        }

        if parent.kind == NodeKind::Var {
            self.warn_or_declare(node.atom(), DeclarationKind::Var, node.span());
            return;
        }

        let scope = self.current();
        if parent.kind == NodeKind::Catch {
            self.graph
                .declare(scope, node.atom(), DeclarationKind::Var, node.span());
        }
        let write_only = is_write_only(tree, index);
        self.graph
            .add_reference(scope, node.atom(), node.span(), write_only);
    }
}

/// Whether a name is the target of `x = ...;`, `x++;` or `x--;` used as a
/// statement, so that the value is never read.
fn is_write_only(tree: &ParseTree, index: NodeIndex) -> bool {
    let node = tree.node(index);
    if !node.is_first_kid() {
        return false;
    }
    let Some(parent) = node.parent.map(|p| tree.node(p)) else {
        return false;
    };
    let assigns = match parent.kind {
        NodeKind::Assign => parent.opcode == Opcode::Nop,
        NodeKind::Inc | NodeKind::Dec => true,
        _ => false,
    };
    assigns
        && parent
            .parent
            .is_some_and(|g| tree.node(g).kind == NodeKind::Semi)
}

impl Visitor for ScopeBuilder<'_> {
    fn enter(&mut self, tree: &ParseTree, node: NodeIndex) {
        match tree.node(node).kind {
            NodeKind::Name => self.enter_name(tree, node),
            NodeKind::Function => self.enter_function(tree, node),
            NodeKind::LexicalScope => self.push_scope(ScopeKind::Lexical, tree, node),
            NodeKind::With => self.push_scope(ScopeKind::With, tree, node),
            _ => {}
        }
    }

    fn leave(&mut self, tree: &ParseTree, node: NodeIndex) {
        if matches!(
            tree.node(node).kind,
            NodeKind::Function | NodeKind::LexicalScope | NodeKind::With
        ) {
            self.pop_scope();
        }
    }
}
