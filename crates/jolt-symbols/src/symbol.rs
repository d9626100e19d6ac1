//! Symbol records and the symbol map.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// A handle to one symbol: the stable index of the file that declared it
/// plus the symbol's index within that file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ref {
    pub source_index: u32,
    pub inner_index: u32,
}

impl Ref {
    pub const INVALID: Ref = Ref {
        source_index: u32::MAX,
        inner_index: u32::MAX,
    };

    #[inline]
    pub const fn new(source_index: u32, inner_index: u32) -> Ref {
        Ref {
            source_index,
            inner_index,
        }
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.source_index != u32::MAX
    }
}

/// What kind of declaration produced a symbol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Referenced but never declared; must keep its original name
    Unbound,

    /// A `var` or top-level function-scoped declaration
    Hoisted,

    /// A hoisted function declaration
    HoistedFunction,

    /// `const` and `let` bindings
    #[default]
    Constant,

    /// A class binding
    Class,

    /// A name bound by an import clause
    Import,

    /// A statement label
    Label,

    /// A private class field (`#foo`)
    PrivateField,

    /// A private class method
    PrivateMethod,

    /// Anything else the parser introduces
    Other,
}

impl SymbolKind {
    #[inline]
    #[must_use]
    pub const fn is_private(self) -> bool {
        matches!(self, SymbolKind::PrivateField | SymbolKind::PrivateMethod)
    }

    #[inline]
    #[must_use]
    pub const fn is_hoisted(self) -> bool {
        matches!(self, SymbolKind::Hoisted | SymbolKind::HoistedFunction)
    }
}

bitflags! {
    /// Per-symbol behavior flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SymbolFlags: u32 {
        /// Renaming would break this symbol (e.g. a global, or a name
        /// observed by direct `eval`)
        const MUST_NOT_BE_RENAMED = 1 << 0;

        /// JSX lowers `<Foo/>` by capitalization: a lowercase name would
        /// change meaning, so the renamer must pick a capitalized one
        const MUST_START_WITH_CAPITAL_LETTER_FOR_JSX = 1 << 1;
    }
}

/// The disjoint slot pools used by the minifying renamer. Slot indices
/// are dense within each namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SlotNamespace {
    Default = 0,
    Label = 1,
    PrivateName = 2,
    MustNotBeRenamed = 3,
}

impl SlotNamespace {
    pub const COUNT: usize = 4;
}

/// One symbol.
#[derive(Clone, Debug)]
pub struct Symbol {
    /// The name from the source text
    pub original_name: String,

    pub kind: SymbolKind,
    pub flags: SymbolFlags,

    /// Union-find parent: when the linker proves two refs alias (import
    /// and re-export of the same binding), the loser points here
    pub link: Ref,

    /// An estimate of how many times the symbol is used, accumulated
    /// during parsing. Drives the minifying renamer's frequency ranking.
    pub use_count_estimate: u32,

    /// Dense slot within the namespace, for symbols in nested scopes.
    /// Never set for module-scope symbols.
    pub nested_scope_slot: Option<u32>,
}

impl Symbol {
    pub fn new(original_name: impl Into<String>, kind: SymbolKind) -> Symbol {
        Symbol {
            original_name: original_name.into(),
            kind,
            flags: SymbolFlags::empty(),
            link: Ref::INVALID,
            use_count_estimate: 0,
            nested_scope_slot: None,
        }
    }

    /// Which slot pool this symbol draws its minified name from.
    #[must_use]
    pub fn slot_namespace(&self) -> SlotNamespace {
        if self.kind == SymbolKind::Unbound || self.flags.contains(SymbolFlags::MUST_NOT_BE_RENAMED)
        {
            SlotNamespace::MustNotBeRenamed
        } else if self.kind.is_private() {
            SlotNamespace::PrivateName
        } else if self.kind == SymbolKind::Label {
            SlotNamespace::Label
        } else {
            SlotNamespace::Default
        }
    }
}

/// All symbols of a build, addressed by [`Ref`].
///
/// `symbols_for_source[source_index][inner_index]` is the symbol declared
/// by that file. Written during parse and link only.
#[derive(Clone, Debug, Default)]
pub struct SymbolMap {
    pub symbols_for_source: Vec<Vec<Symbol>>,
}

impl SymbolMap {
    pub fn new(source_count: usize) -> SymbolMap {
        SymbolMap {
            symbols_for_source: vec![Vec::new(); source_count],
        }
    }

    #[inline]
    pub fn get(&self, r: Ref) -> &Symbol {
        &self.symbols_for_source[r.source_index as usize][r.inner_index as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, r: Ref) -> &mut Symbol {
        &mut self.symbols_for_source[r.source_index as usize][r.inner_index as usize]
    }

    /// Declare a new symbol in a file, returning its ref.
    pub fn declare(&mut self, source_index: u32, symbol: Symbol) -> Ref {
        let inner = &mut self.symbols_for_source[source_index as usize];
        let r = Ref::new(source_index, inner.len() as u32);
        inner.push(symbol);
        r
    }

    /// Follow the union-find links to the representative ref, halving the
    /// chain as it goes so later lookups are cheap.
    pub fn follow(&mut self, mut r: Ref) -> Ref {
        loop {
            let link = self.get(r).link;
            if !link.is_valid() {
                return r;
            }
            let grand = self.get(link).link;
            if grand.is_valid() {
                // Path halving: point at the grandparent
                self.get_mut(r).link = grand;
                r = grand;
            } else {
                return link;
            }
        }
    }

    /// Follow links without mutating (for read-only phases).
    pub fn follow_readonly(&self, mut r: Ref) -> Ref {
        loop {
            let link = self.get(r).link;
            if !link.is_valid() {
                return r;
            }
            r = link;
        }
    }

    /// Merge `old` into `new`: `old`'s uses flow to `new`, and lookups
    /// through `old` resolve to `new`. JSX capitalization requirements
    /// travel with the merge so the flag survives re-export chains.
    pub fn merge(&mut self, old: Ref, new: Ref) -> Ref {
        if old == new {
            return new;
        }
        let old = self.follow(old);
        let new = self.follow(new);
        if old == new {
            return new;
        }

        let old_symbol = self.get(old).clone();
        {
            let new_symbol = self.get_mut(new);
            new_symbol.use_count_estimate += old_symbol.use_count_estimate;
            if old_symbol
                .flags
                .contains(SymbolFlags::MUST_START_WITH_CAPITAL_LETTER_FOR_JSX)
            {
                new_symbol.flags |= SymbolFlags::MUST_START_WITH_CAPITAL_LETTER_FOR_JSX;
            }
        }
        self.get_mut(old).link = new;
        new
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with(symbols: Vec<Symbol>) -> SymbolMap {
        SymbolMap {
            symbols_for_source: vec![symbols],
        }
    }

    #[test]
    fn follow_resolves_chains_with_halving() {
        // 0 -> 1 -> 2 -> (end)
        let mut a = Symbol::new("a", SymbolKind::Import);
        a.link = Ref::new(0, 1);
        let mut b = Symbol::new("b", SymbolKind::Import);
        b.link = Ref::new(0, 2);
        let c = Symbol::new("c", SymbolKind::Constant);
        let mut map = map_with(vec![a, b, c]);

        assert_eq!(map.follow(Ref::new(0, 0)), Ref::new(0, 2));
        // The chain was halved: 0 now points past 1
        assert_eq!(map.get(Ref::new(0, 0)).link, Ref::new(0, 2));
        assert_eq!(map.follow_readonly(Ref::new(0, 1)), Ref::new(0, 2));
    }

    #[test]
    fn merge_accumulates_use_counts() {
        let mut a = Symbol::new("a", SymbolKind::Import);
        a.use_count_estimate = 3;
        let mut b = Symbol::new("b", SymbolKind::Constant);
        b.use_count_estimate = 5;
        let mut map = map_with(vec![a, b]);

        let winner = map.merge(Ref::new(0, 0), Ref::new(0, 1));
        assert_eq!(winner, Ref::new(0, 1));
        assert_eq!(map.get(winner).use_count_estimate, 8);
        assert_eq!(map.follow(Ref::new(0, 0)), winner);
    }

    #[test]
    fn merge_propagates_jsx_capitalization() {
        let mut a = Symbol::new("comp", SymbolKind::Import);
        a.flags |= SymbolFlags::MUST_START_WITH_CAPITAL_LETTER_FOR_JSX;
        let b = Symbol::new("Component", SymbolKind::Class);
        let mut map = map_with(vec![a, b]);

        let winner = map.merge(Ref::new(0, 0), Ref::new(0, 1));
        assert!(
            map.get(winner)
                .flags
                .contains(SymbolFlags::MUST_START_WITH_CAPITAL_LETTER_FOR_JSX)
        );
    }

    #[test]
    fn slot_namespaces_partition_symbols() {
        let unbound = Symbol::new("window", SymbolKind::Unbound);
        assert_eq!(unbound.slot_namespace(), SlotNamespace::MustNotBeRenamed);

        let mut pinned = Symbol::new("kept", SymbolKind::Constant);
        pinned.flags |= SymbolFlags::MUST_NOT_BE_RENAMED;
        assert_eq!(pinned.slot_namespace(), SlotNamespace::MustNotBeRenamed);

        let private = Symbol::new("#x", SymbolKind::PrivateField);
        assert_eq!(private.slot_namespace(), SlotNamespace::PrivateName);

        let label = Symbol::new("outer", SymbolKind::Label);
        assert_eq!(label.slot_namespace(), SlotNamespace::Label);

        let plain = Symbol::new("x", SymbolKind::Constant);
        assert_eq!(plain.slot_namespace(), SlotNamespace::Default);
    }
}
