//! Script registry and import graph.
//!
//! Every linted file gets a `Script` holding its scope graph, the scripts it
//! imports and its ignore ranges. Imports may form cycles. A script is
//! registered before it is analyzed, so a file importing itself
//! (directly or through others) finds the placeholder instead of recursing.

use crate::scope::ScopeGraph;
use jsl_common::Span;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScriptId(pub u32);

#[derive(Clone, Debug)]
pub struct Script {
    pub path: String,
    pub scopes: ScopeGraph,
    pub imports: Vec<ScriptId>,
    /// `jsl:ignore` ... `jsl:end` ranges (inclusive)
    pub ignores: Vec<Span>,
}

impl Script {
    fn new(path: &str) -> Self {
        Script {
            path: path.to_string(),
            scopes: ScopeGraph::new(),
            imports: Vec::new(),
            ignores: Vec::new(),
        }
    }

    pub fn is_ignored(&self, offset: u32) -> bool {
        self.ignores.iter().any(|range| range.contains(offset))
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScriptRegistry {
    scripts: Vec<Script>,
    by_path: FxHashMap<String, ScriptId>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Look up a script by its normalized path.
    pub fn get(&self, path: &str) -> Option<ScriptId> {
        self.by_path.get(path).copied()
    }

    /// Look up `path`, registering an empty script if it is new. The flag is
    /// `true` when the script was inserted by this call.
    pub fn get_or_insert(&mut self, path: &str) -> (ScriptId, bool) {
        if let Some(id) = self.get(path) {
            return (id, false);
        }
        let id = ScriptId(self.scripts.len() as u32);
        self.scripts.push(Script::new(path));
        self.by_path.insert(path.to_string(), id);
        (id, true)
    }

    pub fn script(&self, id: ScriptId) -> &Script {
        &self.scripts[id.0 as usize]
    }

    pub fn script_mut(&mut self, id: ScriptId) -> &mut Script {
        &mut self.scripts[id.0 as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScriptId, &Script)> {
        self.scripts
            .iter()
            .enumerate()
            .map(|(i, s)| (ScriptId(i as u32), s))
    }

    /// Record that `from` imports `to`. Duplicate links are ignored.
    pub fn import(&mut self, from: ScriptId, to: ScriptId) {
        let imports = &mut self.script_mut(from).imports;
        if !imports.contains(&to) {
            tracing::debug!(from = from.0, to = to.0, "linking import");
            imports.push(to);
        }
    }

    /// Whether a script imported by `id`, directly or transitively, declares
    /// `name` in its global scope. The importing script itself is not
    /// consulted. Cycles are cut with a searched set.
    pub fn has_symbol(&self, id: ScriptId, name: &str) -> bool {
        let mut searched = FxHashSet::default();
        searched.insert(id);
        let mut pending = vec![id];

        while let Some(current) = pending.pop() {
            for &imported in &self.script(current).imports {
                if !searched.insert(imported) {
                    continue;
                }
                let scopes = &self.script(imported).scopes;
                if scopes.scope(scopes.root()).get_identifier(name).is_some() {
                    return true;
                }
                pending.push(imported);
            }
        }
        false
    }
}
