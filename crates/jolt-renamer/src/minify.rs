//! The frequency-ranked minifying renamer.
//!
//! Two phases. Phase A runs per file in parallel: every symbol use either
//! bumps its nested-scope slot's atomic counter, or (for top-level
//! symbols) is appended to a per-worker vector tagged with the file's
//! stable source index. Phase B runs on one thread: the vectors are
//! merged, sorted by `(count desc, stable source asc, inner index asc)`,
//! and top-level slots are allocated in that order. Sorting by stable
//! source index rather than discovery order is what makes the output
//! byte-identical across runs.

use std::sync::atomic::{AtomicU32, Ordering};

use rustc_hash::FxHashMap;

use jolt_symbols::{Ref, SlotCounts, SlotNamespace, SymbolFlags, SymbolMap};

use crate::Renamer;
use crate::name_sequence::number_to_minified_name;

/// One top-level symbol use, tagged for deterministic ordering.
#[derive(Clone, Copy, Debug)]
pub struct StableSymbolCount {
    pub stable_source_index: u32,
    pub r: Ref,
    pub count: u32,
}

struct SymbolSlot {
    count: AtomicU32,
    needs_capital_for_jsx: AtomicU32,
    name: String,
}

impl SymbolSlot {
    fn new() -> SymbolSlot {
        SymbolSlot {
            count: AtomicU32::new(0),
            needs_capital_for_jsx: AtomicU32::new(0),
            name: String::new(),
        }
    }
}

/// Shortest-output renamer. See the module docs for the two-phase shape.
pub struct MinifyRenamer<'a> {
    symbols: &'a SymbolMap,
    reserved_names: FxHashMap<String, u32>,
    slots: [Vec<SymbolSlot>; SlotNamespace::COUNT],
    top_level_symbol_to_slot: FxHashMap<Ref, u32>,
}

impl<'a> MinifyRenamer<'a> {
    /// `nested_slot_counts` is the union of every file's
    /// `assign_nested_scope_slots` result. All union-find links must be
    /// fully compressed before construction: the parallel phase follows
    /// them read-only.
    pub fn new(symbols: &'a SymbolMap, nested_slot_counts: SlotCounts) -> MinifyRenamer<'a> {
        let make = |ns: SlotNamespace| -> Vec<SymbolSlot> {
            (0..nested_slot_counts.get(ns)).map(|_| SymbolSlot::new()).collect()
        };
        MinifyRenamer {
            symbols,
            reserved_names: FxHashMap::default(),
            slots: [
                make(SlotNamespace::Default),
                make(SlotNamespace::Label),
                make(SlotNamespace::PrivateName),
                Vec::new(),
            ],
            top_level_symbol_to_slot: FxHashMap::default(),
        }
    }

    pub fn with_reserved_names(mut self, reserved_names: FxHashMap<String, u32>) -> Self {
        self.reserved_names = reserved_names;
        self
    }

    /// Phase A, called from parallel per-file workers.
    ///
    /// Nested-scope uses land in atomic slot counters; top-level uses are
    /// appended to the caller's thread-local vector for the serial merge.
    pub fn accumulate_symbol_use_counts(
        &self,
        top_level_symbols: &mut Vec<StableSymbolCount>,
        symbol_uses: &[(Ref, u32)],
        stable_source_indices: &[u32],
    ) {
        for &(r, count) in symbol_uses {
            self.accumulate_symbol_count(top_level_symbols, r, count, stable_source_indices);
        }
    }

    fn accumulate_symbol_count(
        &self,
        top_level_symbols: &mut Vec<StableSymbolCount>,
        r: Ref,
        count: u32,
        stable_source_indices: &[u32],
    ) {
        // Links are compressed, so this read-only walk is short
        let r = self.symbols.follow_readonly(r);
        let symbol = self.symbols.get(r);
        let ns = symbol.slot_namespace();
        if ns == SlotNamespace::MustNotBeRenamed {
            return;
        }

        if let Some(slot_index) = symbol.nested_scope_slot {
            let slot = &self.slots[ns as usize][slot_index as usize];
            slot.count.fetch_add(count, Ordering::Relaxed);
            if symbol
                .flags
                .contains(SymbolFlags::MUST_START_WITH_CAPITAL_LETTER_FOR_JSX)
            {
                slot.needs_capital_for_jsx.store(1, Ordering::Relaxed);
            }
        } else {
            top_level_symbols.push(StableSymbolCount {
                stable_source_index: stable_source_indices[r.source_index as usize],
                r,
                count,
            });
        }
    }

    /// Phase B: merge the per-worker vectors and allocate top-level slots.
    ///
    /// The first time a ref is seen it gets the next slot in its
    /// namespace; later duplicates only accumulate counts.
    pub fn allocate_top_level_symbol_slots(&mut self, mut top_level_symbols: Vec<StableSymbolCount>) {
        top_level_symbols.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(a.stable_source_index.cmp(&b.stable_source_index))
                .then(a.r.inner_index.cmp(&b.r.inner_index))
        });

        for use_count in top_level_symbols {
            let symbol = self.symbols.get(use_count.r);
            let ns = symbol.slot_namespace();
            let slots = &mut self.slots[ns as usize];

            if let Some(&slot_index) = self.top_level_symbol_to_slot.get(&use_count.r) {
                slots[slot_index as usize]
                    .count
                    .fetch_add(use_count.count, Ordering::Relaxed);
                continue;
            }

            let slot_index = slots.len() as u32;
            let slot = SymbolSlot::new();
            slot.count.store(use_count.count, Ordering::Relaxed);
            if symbol
                .flags
                .contains(SymbolFlags::MUST_START_WITH_CAPITAL_LETTER_FOR_JSX)
            {
                slot.needs_capital_for_jsx.store(1, Ordering::Relaxed);
            }
            slots.push(slot);
            self.top_level_symbol_to_slot.insert(use_count.r, slot_index);
        }
    }

    /// Final serial pass: rank each namespace's slots by count and hand
    /// out names from the minified sequence, skipping anything reserved.
    pub fn assign_names_by_frequency(&mut self) {
        for ns_index in 0..SlotNamespace::COUNT {
            let ns = match ns_index {
                0 => SlotNamespace::Default,
                1 => SlotNamespace::Label,
                2 => SlotNamespace::PrivateName,
                _ => continue, // MustNotBeRenamed keeps original names
            };

            // Rank by count descending; ties keep slot order for stability
            let mut order: Vec<usize> = (0..self.slots[ns_index].len()).collect();
            order.sort_by(|&a, &b| {
                let ca = self.slots[ns_index][a].count.load(Ordering::Relaxed);
                let cb = self.slots[ns_index][b].count.load(Ordering::Relaxed);
                cb.cmp(&ca).then(a.cmp(&b))
            });

            let mut next_name = 0usize;
            for slot_index in order {
                let needs_capital = self.slots[ns_index][slot_index]
                    .needs_capital_for_jsx
                    .load(Ordering::Relaxed)
                    != 0;

                let mut name;
                loop {
                    name = number_to_minified_name(next_name);
                    next_name += 1;

                    match ns {
                        // Never emit a reserved name
                        SlotNamespace::Default => {
                            if self.reserved_names.contains_key(&name) {
                                continue;
                            }
                        }
                        // Labels live in their own syntactic position;
                        // only keywords are off limits
                        SlotNamespace::Label => {
                            if jolt_lexer::tokens::is_keyword(&name) {
                                continue;
                            }
                        }
                        SlotNamespace::PrivateName => {}
                        SlotNamespace::MustNotBeRenamed => unreachable!(),
                    }

                    if needs_capital
                        && name
                            .chars()
                            .next()
                            .is_some_and(|c| c.is_ascii_lowercase())
                    {
                        continue;
                    }
                    break;
                }

                if ns == SlotNamespace::PrivateName {
                    name = format!("#{name}");
                }
                self.slots[ns_index][slot_index].name = name;
            }
        }
    }
}

impl Renamer for MinifyRenamer<'_> {
    fn name_for_symbol(&self, r: Ref) -> String {
        let r = self.symbols.follow_readonly(r);
        let symbol = self.symbols.get(r);
        let ns = symbol.slot_namespace();
        if ns == SlotNamespace::MustNotBeRenamed {
            return symbol.original_name.clone();
        }

        let slot_index = match symbol.nested_scope_slot {
            Some(i) => i,
            None => match self.top_level_symbol_to_slot.get(&r) {
                Some(&i) => i,
                None => return symbol.original_name.clone(),
            },
        };
        self.slots[ns as usize][slot_index as usize].name.clone()
    }
}

#[cfg(test)]
#[path = "tests/minify_tests.rs"]
mod tests;
