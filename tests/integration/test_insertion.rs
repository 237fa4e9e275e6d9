//! Building the tree from declarations

use crate::common::{child, class, declared, function, member, name, templated};
use cppsym::ast::ObjectType;
use cppsym::{AddOutcome, CppDomain, LookupFlags, SymbolError, SymbolTree};

#[test]
fn test_nested_declaration_end_to_end() {
    let mut domain = CppDomain::default();
    let root = domain.root();
    let f = domain
        .add_declaration(root, function("N::C::f", &["int"]), "api", 10)
        .unwrap();
    assert!(f.diagnostic.is_none());

    let tree = domain.tree();
    let n = child(tree, &["N"]).unwrap();
    let c = child(tree, &["N", "C"]).unwrap();
    assert!(tree.symbol(n).declaration().is_none());
    assert!(tree.symbol(c).declaration().is_none());
    assert_eq!(tree.symbol(f.symbol).parent(), Some(c));
    assert_eq!(tree.get_full_nested_name(f.symbol).to_string(), "::N::C::f");

    let key = tree.get_lookup_key(f.symbol);
    assert_eq!(tree.direct_lookup(&key), Some(f.symbol));
}

#[test]
fn test_duplicate_declaration_leaves_single_carrier() {
    let mut domain = CppDomain::default();
    let root = domain.root();
    let first = domain.add_declaration(root, member("N::x"), "a", 1).unwrap();
    let second = domain.add_declaration(root, member("N::x"), "a", 2).unwrap();

    assert_eq!(second.symbol, first.symbol);
    assert!(second.diagnostic.is_some());

    let tree = domain.tree();
    let n = child(tree, &["N"]).unwrap();
    let carriers: Vec<_> = tree
        .children(n)
        .iter()
        .filter(|&&s| {
            let node = tree.symbol(s);
            node.declaration().is_some() && !node.is_redeclaration()
        })
        .collect();
    assert_eq!(carriers.len(), 1);
    assert_eq!(
        tree.children(n)
            .iter()
            .filter(|&&s| tree.symbol(s).is_redeclaration())
            .count(),
        1
    );
}

#[test]
fn test_overloads_are_individually_resolvable() {
    let mut tree = SymbolTree::default();
    let root = tree.root();
    let int_f = tree
        .add_declaration(root, function("f", &["int"]), "a", 1)
        .unwrap()
        .symbol();
    let dbl_f = tree
        .add_declaration(root, function("f", &["double"]), "a", 2)
        .unwrap()
        .symbol();
    assert_ne!(int_f, dbl_f);

    let found: Vec<_> = tree
        .find_named_symbols(
            root,
            &name("f").names[0].ident_or_op,
            None,
            None,
            LookupFlags::empty(),
        )
        .collect();
    assert_eq!(found, vec![int_f, dbl_f]);

    for id in [int_f, dbl_f] {
        let key = tree.get_lookup_key(id);
        assert_eq!(tree.direct_lookup(&key), Some(id));
    }
}

#[test]
fn test_primary_template_and_specialization() {
    let mut tree = SymbolTree::default();
    let root = tree.root();
    let primary = tree
        .add_declaration(root, templated(class("A"), &[&["T"]]), "a", 1)
        .unwrap()
        .symbol();
    let member_of_primary = tree
        .add_declaration(root, templated(member("A<T>::value"), &[&["T"]]), "a", 2)
        .unwrap()
        .symbol();
    let specialization = tree
        .add_declaration(root, templated(class("A<int>"), &[&[]]), "a", 3)
        .unwrap()
        .symbol();

    assert_eq!(tree.symbol(member_of_primary).parent(), Some(primary));
    assert_ne!(specialization, primary);
    assert_eq!(
        tree.get_full_nested_name(specialization).to_string(),
        "::A<int>"
    );
    assert_eq!(tree.children(root).len(), 2);
}

#[test]
fn test_clear_doc_then_readd_fills_in_place() {
    let mut domain = CppDomain::default();
    let root = domain.root();
    let decls = || vec![class("N::C"), function("N::C::f", &["int"]), member("N::v")];
    for (i, d) in decls().into_iter().enumerate() {
        domain.add_declaration(root, d, "doc", i as u32 + 1).unwrap();
    }
    let nodes_before = domain.tree().all_symbols().count();
    let c_before = child(domain.tree(), &["N", "C"]).unwrap();

    domain.clear_doc("doc");
    assert!(declared(domain.tree()).is_empty());
    assert!(domain.documents().is_empty());

    for (i, d) in decls().into_iter().enumerate() {
        let added = domain.add_declaration(root, d, "doc", i as u32 + 1).unwrap();
        assert!(added.diagnostic.is_none());
    }
    assert_eq!(domain.tree().all_symbols().count(), nodes_before);
    assert_eq!(child(domain.tree(), &["N", "C"]), Some(c_before));
    assert_eq!(declared(domain.tree()).len(), 3);
    domain.tree().assert_all_invariants().unwrap();
}

#[test]
fn test_template_list_count_rule() {
    let mut tree = SymbolTree::default();
    let root = tree.root();

    // one list per templated component, optionally one more for the name itself
    tree.add_declaration(root, templated(function("A<T>::f", &[]), &[&["T"]]), "a", 1)
        .unwrap();
    tree.add_declaration(root, templated(function("A<T>::g", &[]), &[&["T"], &["U"]]), "a", 2)
        .unwrap();

    let err = tree
        .add_declaration(
            root,
            templated(function("A<T>::h", &[]), &[&["T"], &["U"], &["V"]]),
            "a",
            3,
        )
        .unwrap_err();
    assert!(matches!(err, SymbolError::TemplateListMismatch { templates: 1, lists: 3, .. }));
}

#[test]
fn test_add_name_then_declare_namespace_member() {
    let mut tree = SymbolTree::default();
    let root = tree.root();
    let ns = tree.add_name(root, &name("outer::inner"), None).unwrap();
    let x = tree
        .add_declaration(ns, member("x"), "a", 1)
        .unwrap();
    let AddOutcome::Inserted(x) = x else {
        panic!("expected insertion");
    };
    assert_eq!(tree.get_full_nested_name(x).to_string(), "::outer::inner::x");
    assert_eq!(
        tree.symbol(x).declaration().unwrap().object_type,
        ObjectType::Member
    );
}
