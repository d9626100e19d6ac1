//! The readable numbering renamer.
//!
//! Symbols keep their original names where possible. Each scope tracks the
//! names used in it; a name colliding within the same scope gets a numeric
//! suffix, starting from a cached per-prefix counter so pathological
//! inputs (thousands of identically-named locals) stay linear. Shadowing
//! a name from an ancestor scope is allowed; reserved names are never
//! produced.
//!
//! Module scopes are renamed serially because imports alias across files;
//! nested scopes are renamed per file in parallel afterwards.

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use jolt_common::utf::force_valid_identifier;
use jolt_symbols::{Ref, ScopeId, ScopeTree, SlotNamespace, SymbolFlags, SymbolMap};

use crate::Renamer;

/// A chain of per-scope used-name maps, innermost last. The value doubles
/// as the cached collision counter when a name has been used as a
/// numbering prefix.
struct NameCountChain {
    stack: Vec<FxHashMap<String, u32>>,
}

impl NameCountChain {
    fn used_in_same_scope(&self, name: &str) -> bool {
        self.stack.last().is_some_and(|top| top.contains_key(name))
    }

    /// Pick a name derived from `preferred` that is safe in the current
    /// scope, and record it as used.
    ///
    /// Only same-scope collisions and reserved names force a suffix; a
    /// name used in an ancestor scope is simply shadowed.
    fn find_unused_name(&mut self, preferred: &str, reserved: &FxHashMap<String, u32>) -> String {
        let mut name = force_valid_identifier(preferred);

        if reserved.contains_key(&name) || self.used_in_same_scope(&name) {
            let prefix = name.clone();
            // Resume from the cached counter so N same-named symbols cost
            // O(N), not O(N^2)
            let mut tries = self
                .stack
                .last()
                .and_then(|top| top.get(&prefix).copied())
                .unwrap_or(1);
            loop {
                name = format!("{prefix}{tries}");
                tries += 1;
                if !reserved.contains_key(&name) && !self.used_in_same_scope(&name) {
                    break;
                }
            }
            if let Some(top) = self.stack.last_mut() {
                top.insert(prefix, tries);
            }
        }

        if let Some(top) = self.stack.last_mut() {
            top.entry(name.clone()).or_insert(1);
        }
        name
    }
}

/// Readable renamer with per-scope collision numbering.
pub struct NumberRenamer<'a> {
    symbols: &'a SymbolMap,
    reserved_names: FxHashMap<String, u32>,
    /// `names[source_index][inner_index]`, `None` = keep the original
    names: Vec<Vec<Option<String>>>,
}

impl<'a> NumberRenamer<'a> {
    pub fn new(symbols: &'a SymbolMap, reserved_names: FxHashMap<String, u32>) -> NumberRenamer<'a> {
        let names = symbols
            .symbols_for_source
            .iter()
            .map(|file| vec![None; file.len()])
            .collect();
        NumberRenamer {
            symbols,
            reserved_names,
            names,
        }
    }

    /// Rename everything: module scopes serially, then each file's nested
    /// scopes in parallel. Nested renaming is safe to parallelize because
    /// cross-file references always target module-scope symbols, which the
    /// serial pass has already named.
    pub fn assign_names(&mut self, trees: &[ScopeTree]) {
        let mut chain = NameCountChain {
            stack: vec![FxHashMap::default()],
        };
        for tree in trees {
            let module = tree.get(tree.module_scope());
            for (_, r) in module.sorted_members() {
                self.assign_top_level_name(&mut chain, r);
            }
            for &r in &module.generated {
                self.assign_top_level_name(&mut chain, r);
            }
        }
        let top_level_counts = chain.stack.pop().unwrap_or_default();

        let reserved = &self.reserved_names;
        let symbols = self.symbols;
        self.names
            .par_iter_mut()
            .enumerate()
            .for_each(|(source_index, names_for_file)| {
                let Some(tree) = trees.get(source_index) else {
                    return;
                };
                let module = tree.get(tree.module_scope());
                let mut chain = NameCountChain {
                    stack: vec![top_level_counts.clone()],
                };
                for &child in module.children.iter() {
                    assign_names_recursive(
                        symbols,
                        tree,
                        child,
                        source_index as u32,
                        reserved,
                        &mut chain,
                        names_for_file,
                    );
                }
            });
    }

    fn assign_top_level_name(&mut self, chain: &mut NameCountChain, r: Ref) {
        let r = self.symbols.follow_readonly(r);
        let symbol = self.symbols.get(r);
        if symbol.slot_namespace() == SlotNamespace::MustNotBeRenamed {
            return;
        }
        if self.names[r.source_index as usize][r.inner_index as usize].is_some() {
            return;
        }

        let mut preferred = symbol.original_name.clone();
        if symbol
            .flags
            .contains(SymbolFlags::MUST_START_WITH_CAPITAL_LETTER_FOR_JSX)
        {
            preferred = capitalize(&preferred);
        }
        let name = chain.find_unused_name(&preferred, &self.reserved_names);
        self.names[r.source_index as usize][r.inner_index as usize] = Some(name);
    }
}

fn assign_names_recursive(
    symbols: &SymbolMap,
    tree: &ScopeTree,
    id: ScopeId,
    source_index: u32,
    reserved: &FxHashMap<String, u32>,
    chain: &mut NameCountChain,
    names_for_file: &mut [Option<String>],
) {
    chain.stack.push(FxHashMap::default());
    let scope = tree.get(id);

    let mut assign = |chain: &mut NameCountChain, names_for_file: &mut [Option<String>], r: Ref| {
        let r = symbols.follow_readonly(r);
        // Cross-file refs were named by the serial module pass
        if r.source_index != source_index {
            return;
        }
        let symbol = symbols.get(r);
        if symbol.slot_namespace() == SlotNamespace::MustNotBeRenamed {
            return;
        }
        let slot = &mut names_for_file[r.inner_index as usize];
        if slot.is_some() {
            return;
        }
        let mut preferred = symbol.original_name.clone();
        if symbol
            .flags
            .contains(SymbolFlags::MUST_START_WITH_CAPITAL_LETTER_FOR_JSX)
        {
            preferred = capitalize(&preferred);
        }
        *slot = Some(chain.find_unused_name(&preferred, reserved));
    };

    if let Some(label) = scope.label_ref {
        assign(chain, names_for_file, label);
    }
    for (_, r) in scope.sorted_members() {
        assign(chain, names_for_file, r);
    }
    for &r in &scope.generated {
        assign(chain, names_for_file, r);
    }

    for &child in scope.children.iter() {
        assign_names_recursive(
            symbols,
            tree,
            child,
            source_index,
            reserved,
            chain,
            names_for_file,
        );
    }
    chain.stack.pop();
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name.to_string(),
    }
}

impl Renamer for NumberRenamer<'_> {
    fn name_for_symbol(&self, r: Ref) -> String {
        let r = self.symbols.follow_readonly(r);
        match &self.names[r.source_index as usize][r.inner_index as usize] {
            Some(name) => name.clone(),
            None => self.symbols.get(r).original_name.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/numbering_tests.rs"]
mod tests;
