//! Scope graph.
//!
//! Scopes are stored in an arena owned by the script; `ScopeId(0)` is the
//! global scope. Each scope records the identifiers declared in it, the
//! names referenced from it, and names marked unused by `jsl:unused`.
//! Nothing is resolved while the graph is built; `identifier_warnings`
//! resolves every reference once all parts of a script have been walked.

use indexmap::IndexMap;
use jsl_common::Span;
use rustc_hash::{FxBuildHasher, FxHashSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    Function,
    Lexical,
    With,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Arg,
    Function,
    Var,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub span: Span,
    /// The reference only assigns (`x = 1;`, `x++;`) and does not read.
    pub write_only: bool,
}

#[derive(Clone, Debug)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    /// `None` for the global scope
    pub span: Option<Span>,
    pub children: Vec<ScopeId>,
    pub identifiers: IndexMap<String, Declaration, FxBuildHasher>,
    pub references: Vec<Reference>,
    pub unused: Vec<(String, Span)>,
}

impl Scope {
    fn new(parent: Option<ScopeId>, kind: ScopeKind, span: Option<Span>) -> Self {
        Scope {
            parent,
            kind,
            span,
            children: Vec::new(),
            identifiers: IndexMap::default(),
            references: Vec::new(),
            unused: Vec::new(),
        }
    }

    pub fn get_identifier(&self, name: &str) -> Option<&Declaration> {
        self.identifiers.get(name)
    }
}

/// Result of `ScopeGraph::warn_or_declare`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclareOutcome {
    Declared,
    /// The name is already an argument of this scope.
    HidesArg,
    /// The name is already declared in this scope.
    Redeclared,
}

/// A declaration together with its scope and name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopedDeclaration {
    pub scope: ScopeId,
    pub name: String,
    pub declaration: Declaration,
}

/// An unresolved name, with the scope it was referenced from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndeclaredName {
    pub scope: ScopeId,
    pub name: String,
    pub span: Span,
}

#[derive(Clone, Debug, Default)]
pub struct IdentifierWarnings {
    /// Declarations never read, in declaration order
    pub unreferenced: Vec<ScopedDeclaration>,
    /// References (and `unused` markers) that resolve nowhere
    pub undeclared: Vec<UndeclaredName>,
    /// Declarations that hide a declaration of an enclosing scope
    pub obstructive: Vec<ScopedDeclaration>,
}

#[derive(Clone, Debug)]
pub struct ScopeGraph {
    scopes: Vec<Scope>,
}

impl Default for ScopeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeGraph {
    pub fn new() -> Self {
        ScopeGraph {
            scopes: vec![Scope::new(None, ScopeKind::Global, None)],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    pub fn add_scope(&mut self, parent: ScopeId, kind: ScopeKind, span: Span) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(Some(parent), kind, Some(span)));
        self.scope_mut(parent).children.push(id);
        id
    }

    /// Declare `name`, replacing any previous declaration in this scope.
    pub fn declare(&mut self, scope: ScopeId, name: &str, kind: DeclarationKind, span: Span) {
        self.scope_mut(scope)
            .identifiers
            .insert(name.to_string(), Declaration { kind, span });
    }

    /// Declare `name` unless this scope already declares it. Declarations
    /// in enclosing scopes do not count; those are shadowing, which is
    /// reported separately.
    pub fn warn_or_declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        kind: DeclarationKind,
        span: Span,
    ) -> DeclareOutcome {
        match self.scope(scope).get_identifier(name) {
            Some(existing) if existing.kind == DeclarationKind::Arg => DeclareOutcome::HidesArg,
            Some(_) => DeclareOutcome::Redeclared,
            None => {
                self.declare(scope, name, kind, span);
                DeclareOutcome::Declared
            }
        }
    }

    pub fn add_reference(&mut self, scope: ScopeId, name: &str, span: Span, write_only: bool) {
        self.scope_mut(scope).references.push(Reference {
            name: name.to_string(),
            span,
            write_only,
        });
    }

    pub fn set_unused(&mut self, scope: ScopeId, name: &str, span: Span) {
        self.scope_mut(scope).unused.push((name.to_string(), span));
    }

    /// Resolve `name` from `scope` outwards. The innermost declaration wins.
    pub fn resolve_identifier(&self, scope: ScopeId, name: &str) -> Option<(ScopeId, &Declaration)> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(declaration) = scope.get_identifier(name) {
                return Some((id, declaration));
            }
            current = scope.parent;
        }
        None
    }

    /// The innermost scope whose span encloses `span`; the global scope if
    /// none does.
    pub fn find_scope(&self, span: Span) -> ScopeId {
        self.find_scope_in(ScopeId::ROOT, span).unwrap_or(ScopeId::ROOT)
    }

    fn find_scope_in(&self, id: ScopeId, span: Span) -> Option<ScopeId> {
        let scope = self.scope(id);
        for &child in &scope.children {
            if let Some(found) = self.find_scope_in(child, span) {
                return Some(found);
            }
        }
        match scope.span {
            None => Some(id),
            Some(own) if own.encloses(span) => Some(id),
            Some(_) => None,
        }
    }

    /// Compute unreferenced, undeclared and obstructive identifiers.
    pub fn identifier_warnings(&self) -> IdentifierWarnings {
        let mut unreferenced: IndexMap<(ScopeId, String), Declaration, FxBuildHasher> =
            IndexMap::default();
        let mut warnings = IdentifierWarnings::default();
        self.find_warnings(ScopeId::ROOT, false, &mut unreferenced, &mut warnings);

        warnings.unreferenced = unreferenced
            .into_iter()
            .map(|((scope, name), declaration)| ScopedDeclaration {
                scope,
                name,
                declaration,
            })
            .collect();
        warnings
            .unreferenced
            .sort_by_key(|d| (d.declaration.span.start, d.scope));
        warnings
    }

    fn find_warnings(
        &self,
        id: ScopeId,
        in_with: bool,
        unreferenced: &mut IndexMap<(ScopeId, String), Declaration, FxBuildHasher>,
        warnings: &mut IdentifierWarnings,
    ) {
        let scope = self.scope(id);
        let in_with = in_with || scope.kind == ScopeKind::With;

        // Children remove entries when they reference them.
        for (name, declaration) in &scope.identifiers {
            unreferenced.insert((id, name.clone()), *declaration);
        }

        if let Some(parent) = scope.parent {
            for (name, declaration) in &scope.identifiers {
                if self.resolve_identifier(parent, name).is_some() {
                    warnings.obstructive.push(ScopedDeclaration {
                        scope: id,
                        name: name.clone(),
                        declaration: *declaration,
                    });
                }
            }
        }

        for reference in &scope.references {
            match self.resolve_identifier(id, &reference.name) {
                Some(_) if reference.write_only => {}
                Some((owner, _)) => {
                    unreferenced.shift_remove(&(owner, reference.name.clone()));
                }
                None if in_with => {}
                None => warnings.undeclared.push(UndeclaredName {
                    scope: id,
                    name: reference.name.clone(),
                    span: reference.span,
                }),
            }
        }

        for (name, span) in &scope.unused {
            match self.resolve_identifier(id, name) {
                Some((owner, _)) => {
                    unreferenced.shift_remove(&(owner, name.clone()));
                }
                None => warnings.undeclared.push(UndeclaredName {
                    scope: id,
                    name: name.clone(),
                    span: *span,
                }),
            }
        }

        for &child in &scope.children {
            self.find_warnings(child, in_with, unreferenced, warnings);
        }
    }

    /// Names declared in the global scope.
    pub fn global_names(&self) -> FxHashSet<&str> {
        self.scope(ScopeId::ROOT)
            .identifiers
            .keys()
            .map(String::as_str)
            .collect()
    }
}
