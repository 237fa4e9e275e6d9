//! Combining per-document trees the way an incremental build does

use crate::common::{child, class, declared, domain_with, function, member};
use cppsym::ast::IdentOrOp;
use cppsym::{CppDomain, Diagnostic, Location, LookupFlags, SymbolTree};

#[test]
fn test_merging_empty_tree_changes_nothing() {
    let mut project = domain_with("a", vec![class("N::A"), function("N::A::f", &["int"])]);
    let before = project.tree().dump(project.root(), 0);

    let diagnostics = project
        .merge_domain_data(CppDomain::default(), &["a", "b"])
        .unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(project.tree().dump(project.root(), 0), before);
}

#[test]
fn test_merging_structural_copy_reports_no_duplicates() {
    let decls = || vec![class("N::A"), function("N::A::f", &["int"]), member("N::v")];
    let mut project = domain_with("a", decls());
    let copy = domain_with("a", decls());
    let before = project.tree().all_symbols().count();

    let diagnostics = project.merge_domain_data(copy, &["a"]).unwrap();
    assert!(
        !diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::DuplicateDeclaration { .. }))
    );
    assert_eq!(project.tree().all_symbols().count(), before);
}

#[test]
fn test_same_entity_in_two_documents_warns_once() {
    let mut project = domain_with("a", vec![class("N::A")]);
    let other = domain_with("b", vec![class("N::A")]);

    let diagnostics = project.merge_domain_data(other, &["b"]).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].location(), &Location::new("b", 1));
    assert!(diagnostics[0].to_string().contains("also defined at a:1"));
    assert_eq!(declared(project.tree()), vec!["N::A@a"]);
}

#[test]
fn test_parallel_documents_fold_into_one_tree() {
    let mut project = CppDomain::default();
    let parts = vec![
        ("core", vec![class("lib::Widget"), function("lib::Widget::draw", &[])]),
        ("extra", vec![function("lib::Widget::resize", &["int", "int"])]),
        ("util", vec![function("lib::helper", &["const Widget&"])]),
    ];
    for (doc, decls) in parts {
        let built = domain_with(doc, decls);
        let diagnostics = project.merge_domain_data(built, &[doc]).unwrap();
        assert!(diagnostics.is_empty(), "unexpected diagnostics for {doc}");
    }

    let tree = project.tree();
    assert_eq!(tree.children(tree.root()).len(), 1);
    let widget = child(tree, &["lib", "Widget"]).unwrap();
    assert_eq!(tree.children(widget).len(), 2);
    assert_eq!(
        project.documents().into_iter().collect::<Vec<_>>(),
        vec!["core", "extra", "util"]
    );
    tree.assert_all_invariants().unwrap();

    let resize = project
        .resolve_xref(None, "lib::Widget::resize", cppsym::TargetType::Function)
        .first()
        .unwrap();
    assert_eq!(tree.symbol(resize).docname(), Some("extra"));
}

#[test]
fn test_rebuilt_document_replaces_its_declarations() {
    let mut project = domain_with("a", vec![class("N::A"), function("N::A::old", &[])]);

    project.clear_doc("a");
    let rebuilt = domain_with("a", vec![class("N::A"), function("N::A::new_name", &[])]);
    let diagnostics = project.merge_domain_data(rebuilt, &["a"]).unwrap();

    assert!(diagnostics.is_empty());
    assert_eq!(
        declared(project.tree()),
        vec!["N::A@a", "N::A::new_name()@a"]
    );
}

#[test]
fn test_redeclarations_survive_merge() {
    let mut built = SymbolTree::default();
    let root = built.root();
    built.add_declaration(root, class("A"), "b", 1).unwrap();
    let dup = built.add_declaration(root, class("A"), "b", 5).unwrap();
    assert!(dup.is_duplicate());

    let mut project = SymbolTree::default();
    project.merge_with(built, &["b"]).unwrap();
    let redeclarations = project
        .all_symbols()
        .filter(|&id| project.symbol(id).is_redeclaration())
        .count();
    assert_eq!(redeclarations, 1);
    assert_eq!(project.children(project.root()).len(), 2);
}

#[test]
fn test_same_function_in_two_documents_keeps_one_carrier() {
    let mut project = domain_with("b", vec![function("g", &[])]);
    let built = domain_with("a", vec![function("g", &[])]);

    let diagnostics = project.merge_domain_data(built, &["a"]).unwrap();
    assert_eq!(diagnostics.len(), 1);
    let Diagnostic::DuplicateDeclaration {
        existing, duplicate, ..
    } = &diagnostics[0]
    else {
        panic!("expected a duplicate declaration warning");
    };
    assert_eq!(existing, &Location::new("b", 1));
    assert_eq!(duplicate, &Location::new("a", 1));
    assert!(diagnostics[0].to_string().contains("also defined at b:1"));

    let tree = project.tree();
    let g: Vec<_> = tree
        .find_named_symbols(tree.root(), &IdentOrOp::ident("g"), None, None, LookupFlags::empty())
        .filter(|&id| tree.symbol(id).declaration().is_some())
        .collect();
    assert_eq!(g.len(), 1);
    assert_eq!(tree.symbol(g[0]).docname(), Some("b"));
    assert_eq!(declared(tree), vec!["g()@b"]);
}
