//! Scope trees and nested-scope slot assignment.
//!
//! Each file gets one tree with the module scope at the root. Scopes hold
//! declared members, compiler-generated refs, and the flags the renamers
//! need. Iteration over members is always done through sorted key vectors
//! so nothing depends on hash order.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::symbol::{Ref, SlotNamespace, SymbolMap};

/// Index of a scope within its file's [`ScopeTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

/// What introduced a scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScopeKind {
    /// The root scope of a module
    Module,
    /// A function body (including arrow functions)
    #[default]
    Function,
    /// A block, catch clause, or class body
    Block,
    /// A labeled statement
    Label,
}

/// One scope.
#[derive(Debug, Default)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: SmallVec<[ScopeId; 4]>,

    /// Declared names in this scope
    pub members: FxHashMap<String, Ref>,

    /// Compiler-introduced refs scoped here (helpers, temps)
    pub generated: Vec<Ref>,

    /// The label symbol, for label scopes
    pub label_ref: Option<Ref>,

    /// A direct `eval` can observe any name in scope, so everything
    /// enclosing it becomes unrenamable. The parser sets this on the scope
    /// containing the eval and every ancestor.
    pub contains_direct_eval: bool,
}

impl Scope {
    /// Member refs ordered by name, for deterministic iteration.
    pub fn sorted_members(&self) -> Vec<(&str, Ref)> {
        let mut members: Vec<(&str, Ref)> =
            self.members.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        members.sort_by(|a, b| a.0.cmp(b.0));
        members
    }
}

/// The scope tree for one file. Index 0 is the module scope.
#[derive(Debug, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    pub fn new() -> ScopeTree {
        let mut tree = ScopeTree { scopes: Vec::new() };
        tree.scopes.push(Scope {
            kind: ScopeKind::Module,
            ..Scope::default()
        });
        tree
    }

    #[inline]
    pub fn module_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn push_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent: Some(parent),
            ..Scope::default()
        });
        self.scopes[parent.0 as usize].children.push(id);
        id
    }

    #[inline]
    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

/// Slots used per namespace; the component-wise maximum over sibling
/// subtrees gives each namespace's pool size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlotCounts(pub [u32; SlotNamespace::COUNT]);

impl SlotCounts {
    /// Keep the maximum of each component. Sibling scopes reuse the same
    /// slot indices, so the pool only needs the deepest count.
    pub fn union_max(&mut self, other: SlotCounts) {
        for (mine, theirs) in self.0.iter_mut().zip(other.0) {
            if theirs > *mine {
                *mine = theirs;
            }
        }
    }

    #[inline]
    pub fn get(&self, ns: SlotNamespace) -> u32 {
        self.0[ns as usize]
    }
}

/// Assign dense per-namespace slots to every symbol declared in a nested
/// scope.
///
/// Module-scope symbols never get nested slots: they are temporarily
/// marked so nested declarations of the same ref (hoisted vars reachable
/// from the module scope) are skipped, and the marks are removed before
/// returning.
pub fn assign_nested_scope_slots(
    tree: &ScopeTree,
    symbols: &mut SymbolMap,
) -> SlotCounts {
    let module = tree.get(tree.module_scope());

    // Temporarily give module-scope symbols a slot so the walk below skips
    // them
    let mut marked: Vec<Ref> = Vec::new();
    for (_, r) in module.sorted_members() {
        let symbol = symbols.get_mut(r);
        if symbol.nested_scope_slot.is_none() {
            symbol.nested_scope_slot = Some(0);
            marked.push(r);
        }
    }
    for &r in &module.generated {
        let symbol = symbols.get_mut(r);
        if symbol.nested_scope_slot.is_none() {
            symbol.nested_scope_slot = Some(0);
            marked.push(r);
        }
    }

    let mut counts = SlotCounts::default();
    for &child in module.children.iter() {
        let child_counts = assign_slots_in_subtree(tree, child, symbols, SlotCounts::default());
        counts.union_max(child_counts);
    }

    // Remove the temporary marks; module-scope symbols must come out of
    // this pass with no nested slot
    for r in marked {
        symbols.get_mut(r).nested_scope_slot = None;
    }
    counts
}

fn assign_slots_in_subtree(
    tree: &ScopeTree,
    id: ScopeId,
    symbols: &mut SymbolMap,
    mut slot: SlotCounts,
) -> SlotCounts {
    let scope = tree.get(id);

    if let Some(label) = scope.label_ref {
        let symbol = symbols.get_mut(label);
        if symbol.slot_namespace() == SlotNamespace::Label {
            symbol.nested_scope_slot = Some(slot.0[SlotNamespace::Label as usize]);
            slot.0[SlotNamespace::Label as usize] += 1;
        }
    }

    for (_, r) in scope.sorted_members() {
        let symbol = symbols.get_mut(r);
        let ns = symbol.slot_namespace();
        if ns != SlotNamespace::MustNotBeRenamed && symbol.nested_scope_slot.is_none() {
            symbol.nested_scope_slot = Some(slot.0[ns as usize]);
            slot.0[ns as usize] += 1;
        }
    }
    for &r in &scope.generated {
        let symbol = symbols.get_mut(r);
        let ns = symbol.slot_namespace();
        if ns != SlotNamespace::MustNotBeRenamed && symbol.nested_scope_slot.is_none() {
            symbol.nested_scope_slot = Some(slot.0[ns as usize]);
            slot.0[ns as usize] += 1;
        }
    }

    let mut counts = slot;
    for &child in scope.children.iter() {
        let child_counts = assign_slots_in_subtree(tree, child, symbols, slot);
        counts.union_max(child_counts);
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{Symbol, SymbolKind};

    fn declare(
        symbols: &mut SymbolMap,
        tree: &mut ScopeTree,
        scope: ScopeId,
        name: &str,
        kind: SymbolKind,
    ) -> Ref {
        let r = symbols.declare(0, Symbol::new(name, kind));
        tree.get_mut(scope).members.insert(name.to_string(), r);
        r
    }

    #[test]
    fn sibling_scopes_reuse_slots() {
        let mut symbols = SymbolMap::new(1);
        let mut tree = ScopeTree::new();
        let module = tree.module_scope();

        let f = tree.push_scope(module, ScopeKind::Function);
        let g = tree.push_scope(module, ScopeKind::Function);
        let a = declare(&mut symbols, &mut tree, f, "a", SymbolKind::Constant);
        let b = declare(&mut symbols, &mut tree, g, "b", SymbolKind::Constant);

        let counts = assign_nested_scope_slots(&tree, &mut symbols);

        // Both siblings use slot 0; the pool size is 1, not 2
        assert_eq!(symbols.get(a).nested_scope_slot, Some(0));
        assert_eq!(symbols.get(b).nested_scope_slot, Some(0));
        assert_eq!(counts.get(SlotNamespace::Default), 1);
    }

    #[test]
    fn nested_scopes_extend_parent_slots() {
        let mut symbols = SymbolMap::new(1);
        let mut tree = ScopeTree::new();
        let module = tree.module_scope();

        let outer = tree.push_scope(module, ScopeKind::Function);
        let inner = tree.push_scope(outer, ScopeKind::Block);
        let a = declare(&mut symbols, &mut tree, outer, "a", SymbolKind::Constant);
        let b = declare(&mut symbols, &mut tree, inner, "b", SymbolKind::Constant);

        let counts = assign_nested_scope_slots(&tree, &mut symbols);
        assert_eq!(symbols.get(a).nested_scope_slot, Some(0));
        assert_eq!(symbols.get(b).nested_scope_slot, Some(1));
        assert_eq!(counts.get(SlotNamespace::Default), 2);
    }

    #[test]
    fn module_scope_symbols_get_no_nested_slot() {
        let mut symbols = SymbolMap::new(1);
        let mut tree = ScopeTree::new();
        let module = tree.module_scope();

        let top = declare(&mut symbols, &mut tree, module, "top", SymbolKind::Hoisted);
        let f = tree.push_scope(module, ScopeKind::Function);
        let local = declare(&mut symbols, &mut tree, f, "local", SymbolKind::Constant);

        assign_nested_scope_slots(&tree, &mut symbols);
        assert_eq!(symbols.get(top).nested_scope_slot, None);
        assert_eq!(symbols.get(local).nested_scope_slot, Some(0));
    }

    #[test]
    fn namespaces_are_independent_pools() {
        let mut symbols = SymbolMap::new(1);
        let mut tree = ScopeTree::new();
        let module = tree.module_scope();
        let f = tree.push_scope(module, ScopeKind::Function);

        let x = declare(&mut symbols, &mut tree, f, "x", SymbolKind::Constant);
        let p = declare(&mut symbols, &mut tree, f, "#p", SymbolKind::PrivateField);

        let label_scope = tree.push_scope(f, ScopeKind::Label);
        let label = symbols.declare(0, Symbol::new("loop", SymbolKind::Label));
        tree.get_mut(label_scope).label_ref = Some(label);

        let counts = assign_nested_scope_slots(&tree, &mut symbols);
        assert_eq!(symbols.get(x).nested_scope_slot, Some(0));
        assert_eq!(symbols.get(p).nested_scope_slot, Some(0));
        assert_eq!(symbols.get(label).nested_scope_slot, Some(0));
        assert_eq!(counts.get(SlotNamespace::Default), 1);
        assert_eq!(counts.get(SlotNamespace::PrivateName), 1);
        assert_eq!(counts.get(SlotNamespace::Label), 1);
    }

    #[test]
    fn unrenamable_symbols_are_skipped() {
        let mut symbols = SymbolMap::new(1);
        let mut tree = ScopeTree::new();
        let module = tree.module_scope();
        let f = tree.push_scope(module, ScopeKind::Function);

        let global = declare(&mut symbols, &mut tree, f, "window", SymbolKind::Unbound);
        assign_nested_scope_slots(&tree, &mut symbols);
        assert_eq!(symbols.get(global).nested_scope_slot, None);
    }
}
