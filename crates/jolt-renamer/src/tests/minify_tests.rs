use super::*;
use jolt_symbols::{ScopeKind, ScopeTree, Symbol, SymbolKind, assign_nested_scope_slots};
use rustc_hash::FxHashMap;

fn reserved(names: &[&str]) -> FxHashMap<String, u32> {
    names.iter().map(|n| (n.to_string(), 1)).collect()
}

#[test]
fn top_level_names_rank_by_frequency_with_jsx_capitals() {
    let mut symbols = SymbolMap::new(1);
    let r0 = symbols.declare(0, Symbol::new("third", SymbolKind::Constant));
    let r1 = symbols.declare(0, Symbol::new("first", SymbolKind::Constant));
    let r2 = symbols.declare(0, Symbol::new("Second", SymbolKind::Class));
    symbols.get_mut(r2).flags |= SymbolFlags::MUST_START_WITH_CAPITAL_LETTER_FOR_JSX;

    let mut renamer =
        MinifyRenamer::new(&symbols, SlotCounts::default()).with_reserved_names(reserved(&["in", "do"]));

    let mut top_level = Vec::new();
    renamer.accumulate_symbol_use_counts(
        &mut top_level,
        &[(r1, 10), (r2, 5), (r0, 5)],
        &[0],
    );
    renamer.allocate_top_level_symbol_slots(top_level);
    renamer.assign_names_by_frequency();

    // Highest count wins "a"; the JSX-flagged slot skips lowercase names
    // and takes "A"; the remaining slot gets "b"
    assert_eq!(renamer.name_for_symbol(r1), "a");
    assert_eq!(renamer.name_for_symbol(r2), "A");
    assert_eq!(renamer.name_for_symbol(r0), "b");
}

#[test]
fn equal_counts_order_by_stable_source_then_inner_index() {
    let mut symbols = SymbolMap::new(2);
    let a = symbols.declare(0, Symbol::new("a0", SymbolKind::Constant));
    let b = symbols.declare(1, Symbol::new("b0", SymbolKind::Constant));

    // File 1 was discovered first (stable index 0) even though its
    // source index is 1
    let stable = [1u32, 0u32];
    let mut renamer = MinifyRenamer::new(&symbols, SlotCounts::default());

    let mut top_level = Vec::new();
    renamer.accumulate_symbol_use_counts(&mut top_level, &[(a, 4), (b, 4)], &stable);
    renamer.allocate_top_level_symbol_slots(top_level);
    renamer.assign_names_by_frequency();

    assert_eq!(renamer.name_for_symbol(b), "a");
    assert_eq!(renamer.name_for_symbol(a), "b");
}

#[test]
fn reserved_names_are_skipped() {
    let mut symbols = SymbolMap::new(1);
    let r = symbols.declare(0, Symbol::new("x", SymbolKind::Constant));

    let mut renamer =
        MinifyRenamer::new(&symbols, SlotCounts::default()).with_reserved_names(reserved(&["a", "b"]));
    let mut top_level = Vec::new();
    renamer.accumulate_symbol_use_counts(&mut top_level, &[(r, 1)], &[0]);
    renamer.allocate_top_level_symbol_slots(top_level);
    renamer.assign_names_by_frequency();

    assert_eq!(renamer.name_for_symbol(r), "c");
}

#[test]
fn unrenamable_symbols_keep_their_names() {
    let mut symbols = SymbolMap::new(1);
    let r = symbols.declare(0, Symbol::new("window", SymbolKind::Unbound));

    let mut renamer = MinifyRenamer::new(&symbols, SlotCounts::default());
    let mut top_level = Vec::new();
    renamer.accumulate_symbol_use_counts(&mut top_level, &[(r, 100)], &[0]);
    assert!(top_level.is_empty());
    renamer.allocate_top_level_symbol_slots(top_level);
    renamer.assign_names_by_frequency();

    assert_eq!(renamer.name_for_symbol(r), "window");
}

#[test]
fn nested_slots_use_atomic_counters_and_frequency_ranking() {
    let mut symbols = SymbolMap::new(1);
    let mut tree = ScopeTree::new();
    let module = tree.module_scope();
    let f = tree.push_scope(module, ScopeKind::Function);

    let rare = symbols.declare(0, Symbol::new("rare", SymbolKind::Constant));
    let hot = symbols.declare(0, Symbol::new("hot", SymbolKind::Constant));
    tree.get_mut(f).members.insert("hot".to_string(), hot);
    tree.get_mut(f).members.insert("rare".to_string(), rare);

    let counts = assign_nested_scope_slots(&tree, &mut symbols);
    let mut renamer = MinifyRenamer::new(&symbols, counts);

    let mut top_level = Vec::new();
    renamer.accumulate_symbol_use_counts(&mut top_level, &[(hot, 50), (rare, 1)], &[0]);
    renamer.allocate_top_level_symbol_slots(top_level);
    renamer.assign_names_by_frequency();

    assert_eq!(renamer.name_for_symbol(hot), "a");
    assert_eq!(renamer.name_for_symbol(rare), "b");
}

#[test]
fn aliased_symbols_share_one_slot() {
    let mut symbols = SymbolMap::new(1);
    let alias = symbols.declare(0, Symbol::new("alias", SymbolKind::Import));
    let target = symbols.declare(0, Symbol::new("target", SymbolKind::Constant));
    symbols.merge(alias, target);

    let mut renamer = MinifyRenamer::new(&symbols, SlotCounts::default());
    let mut top_level = Vec::new();
    renamer.accumulate_symbol_use_counts(&mut top_level, &[(alias, 2), (target, 3)], &[0]);
    renamer.allocate_top_level_symbol_slots(top_level);
    renamer.assign_names_by_frequency();

    assert_eq!(renamer.name_for_symbol(alias), renamer.name_for_symbol(target));
}

#[test]
fn private_name_slots_get_hash_prefixes() {
    let mut symbols = SymbolMap::new(1);
    let mut tree = ScopeTree::new();
    let module = tree.module_scope();
    let class_body = tree.push_scope(module, ScopeKind::Block);

    let field = symbols.declare(0, Symbol::new("#secret", SymbolKind::PrivateField));
    tree.get_mut(class_body)
        .members
        .insert("#secret".to_string(), field);

    let counts = assign_nested_scope_slots(&tree, &mut symbols);
    let mut renamer = MinifyRenamer::new(&symbols, counts);
    let mut top_level = Vec::new();
    renamer.accumulate_symbol_use_counts(&mut top_level, &[(field, 3)], &[0]);
    renamer.allocate_top_level_symbol_slots(top_level);
    renamer.assign_names_by_frequency();

    assert_eq!(renamer.name_for_symbol(field), "#a");
}
