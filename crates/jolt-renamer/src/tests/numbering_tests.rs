use super::*;
use jolt_symbols::{ScopeKind, Symbol, SymbolKind};

fn declare(
    symbols: &mut SymbolMap,
    tree: &mut ScopeTree,
    scope: ScopeId,
    source_index: u32,
    name: &str,
    kind: SymbolKind,
) -> Ref {
    let r = symbols.declare(source_index, Symbol::new(name, kind));
    tree.get_mut(scope).members.insert(name.to_string(), r);
    r
}

#[test]
fn original_names_are_kept_when_free() {
    let mut symbols = SymbolMap::new(1);
    let mut tree = ScopeTree::new();
    let module = tree.module_scope();
    let count = declare(&mut symbols, &mut tree, module, 0, "count", SymbolKind::Constant);

    let mut renamer = NumberRenamer::new(&symbols, FxHashMap::default());
    renamer.assign_names(std::slice::from_ref(&tree));
    assert_eq!(renamer.name_for_symbol(count), "count");
}

#[test]
fn same_scope_collisions_get_numeric_suffixes() {
    // Two files both export a top-level "util"; top level is one namespace
    let mut symbols = SymbolMap::new(2);
    let mut tree_a = ScopeTree::new();
    let mut tree_b = ScopeTree::new();
    let a = declare(&mut symbols, &mut tree_a, ScopeId(0), 0, "util", SymbolKind::Constant);
    let b = declare(&mut symbols, &mut tree_b, ScopeId(0), 1, "util", SymbolKind::Constant);

    let mut renamer = NumberRenamer::new(&symbols, FxHashMap::default());
    renamer.assign_names(&[tree_a, tree_b]);

    assert_eq!(renamer.name_for_symbol(a), "util");
    assert_eq!(renamer.name_for_symbol(b), "util1");
}

#[test]
fn sibling_members_never_collide() {
    let mut symbols = SymbolMap::new(1);
    let mut tree = ScopeTree::new();
    let module = tree.module_scope();
    let f = tree.push_scope(module, ScopeKind::Function);

    // Parser-generated temps with identical preferred names
    let temps: Vec<Ref> = (0..5)
        .map(|_| {
            let r = symbols.declare(0, Symbol::new("tmp", SymbolKind::Constant));
            tree.get_mut(f).generated.push(r);
            r
        })
        .collect();

    let mut renamer = NumberRenamer::new(&symbols, FxHashMap::default());
    renamer.assign_names(std::slice::from_ref(&tree));

    let names: Vec<String> = temps.iter().map(|&r| renamer.name_for_symbol(r)).collect();
    let unique: std::collections::HashSet<&String> = names.iter().collect();
    assert_eq!(unique.len(), names.len(), "duplicate names: {names:?}");
    assert_eq!(names[0], "tmp");
    assert_eq!(names[1], "tmp1");
    assert_eq!(names[4], "tmp4");
}

#[test]
fn shadowing_ancestors_is_allowed() {
    let mut symbols = SymbolMap::new(1);
    let mut tree = ScopeTree::new();
    let module = tree.module_scope();
    let outer = declare(&mut symbols, &mut tree, module, 0, "x", SymbolKind::Constant);
    let f = tree.push_scope(module, ScopeKind::Function);
    let inner = declare(&mut symbols, &mut tree, f, 0, "x", SymbolKind::Constant);

    let mut renamer = NumberRenamer::new(&symbols, FxHashMap::default());
    renamer.assign_names(std::slice::from_ref(&tree));

    assert_eq!(renamer.name_for_symbol(outer), "x");
    assert_eq!(renamer.name_for_symbol(inner), "x");
}

#[test]
fn reserved_names_force_renames() {
    let mut symbols = SymbolMap::new(1);
    let mut tree = ScopeTree::new();
    let module = tree.module_scope();
    let f = tree.push_scope(module, ScopeKind::Function);
    let shadow = declare(&mut symbols, &mut tree, f, 0, "window", SymbolKind::Constant);

    let mut reserved = FxHashMap::default();
    reserved.insert("window".to_string(), 1);

    let mut renamer = NumberRenamer::new(&symbols, reserved);
    renamer.assign_names(std::slice::from_ref(&tree));
    assert_eq!(renamer.name_for_symbol(shadow), "window1");
}

#[test]
fn invalid_identifiers_are_forced_valid() {
    let mut symbols = SymbolMap::new(1);
    let mut tree = ScopeTree::new();
    let module = tree.module_scope();
    let f = tree.push_scope(module, ScopeKind::Function);
    let from_path = declare(&mut symbols, &mut tree, f, 0, "my-module.js", SymbolKind::Other);

    let mut renamer = NumberRenamer::new(&symbols, FxHashMap::default());
    renamer.assign_names(std::slice::from_ref(&tree));
    assert_eq!(renamer.name_for_symbol(from_path), "my_module_js");
}

#[test]
fn jsx_flagged_symbols_are_capitalized() {
    let mut symbols = SymbolMap::new(1);
    let mut tree = ScopeTree::new();
    let module = tree.module_scope();
    let comp = declare(&mut symbols, &mut tree, module, 0, "widget", SymbolKind::Class);
    symbols.get_mut(comp).flags |= SymbolFlags::MUST_START_WITH_CAPITAL_LETTER_FOR_JSX;

    let mut renamer = NumberRenamer::new(&symbols, FxHashMap::default());
    renamer.assign_names(std::slice::from_ref(&tree));
    assert_eq!(renamer.name_for_symbol(comp), "Widget");
}

#[test]
fn unbound_symbols_keep_original_names() {
    let mut symbols = SymbolMap::new(1);
    let mut tree = ScopeTree::new();
    let module = tree.module_scope();
    let global = declare(&mut symbols, &mut tree, module, 0, "document", SymbolKind::Unbound);

    let mut renamer = NumberRenamer::new(&symbols, FxHashMap::default());
    renamer.assign_names(std::slice::from_ref(&tree));
    assert_eq!(renamer.name_for_symbol(global), "document");
}
