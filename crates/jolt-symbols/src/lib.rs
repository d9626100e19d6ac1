//! Symbol table and scope model for the jolt bundler.
//!
//! This crate provides:
//! - `Ref` - A `(source index, inner index)` handle to one symbol
//! - `Symbol` / `SymbolMap` - Symbol storage with union-find aliasing
//! - `Scope` / `ScopeTree` - Per-file scope trees
//! - Slot namespaces and nested-scope slot assignment for the minifier
//!
//! The symbol table is written during parse and link; printing and
//! renaming treat it as immutable (the union-find path compression in
//! [`SymbolMap::follow`] is the one sanctioned exception).

pub mod symbol;
pub use symbol::{Ref, SlotNamespace, Symbol, SymbolFlags, SymbolKind, SymbolMap};

pub mod scope;
pub use scope::{
    Scope, ScopeId, ScopeKind, ScopeTree, SlotCounts, assign_nested_scope_slots,
};
