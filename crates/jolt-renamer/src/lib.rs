//! Symbol renamers for the jolt bundler.
//!
//! Two implementations share the [`Renamer`] interface:
//! - [`MinifyRenamer`] - shortest possible names, ranked by use frequency
//! - [`NumberRenamer`] - readable names with collision numbering
//!
//! Both respect the reserved-name set computed by
//! [`compute_reserved_names`].

use rustc_hash::FxHashMap;

use jolt_symbols::{Ref, ScopeTree, SymbolFlags, SymbolKind, SymbolMap};

pub mod name_sequence;
pub use name_sequence::number_to_minified_name;

pub mod minify;
pub use minify::{MinifyRenamer, StableSymbolCount};

pub mod numbering;
pub use numbering::NumberRenamer;

/// Maps a symbol to its final output name.
pub trait Renamer: Sync {
    fn name_for_symbol(&self, r: Ref) -> String;
}

/// Compute the global "do not use" name set.
///
/// Includes every JavaScript keyword and strict-mode reserved word, every
/// unbound or unrenamable symbol in any module scope, and the members of
/// every scope that contains a direct `eval` (the parser flags those
/// scopes and all their ancestors).
pub fn compute_reserved_names(
    trees: &[ScopeTree],
    symbols: &SymbolMap,
) -> FxHashMap<String, u32> {
    let mut names = FxHashMap::default();
    for &keyword in jolt_lexer::tokens::KEYWORDS {
        names.insert(keyword.to_string(), 1);
    }
    for &word in jolt_lexer::tokens::STRICT_MODE_RESERVED_WORDS {
        names.insert(word.to_string(), 1);
    }

    for tree in trees {
        let module = tree.get(tree.module_scope());
        for (_, r) in module.sorted_members() {
            let symbol = symbols.get(symbols.follow_readonly(r));
            if symbol.kind == SymbolKind::Unbound
                || symbol.flags.contains(SymbolFlags::MUST_NOT_BE_RENAMED)
            {
                names.insert(symbol.original_name.clone(), 1);
            }
        }
        for &r in &module.generated {
            let symbol = symbols.get(symbols.follow_readonly(r));
            if symbol.kind == SymbolKind::Unbound
                || symbol.flags.contains(SymbolFlags::MUST_NOT_BE_RENAMED)
            {
                names.insert(symbol.original_name.clone(), 1);
            }
        }

        // Everything visible to a direct eval keeps its name
        for id in (0..tree.len()).map(|i| jolt_symbols::ScopeId(i as u32)) {
            let scope = tree.get(id);
            if scope.contains_direct_eval {
                for (name, _) in scope.sorted_members() {
                    names.insert(name.to_string(), 1);
                }
            }
        }
    }
    names
}
