//! Resolving references against a populated tree

use crate::common::{child, class, domain_with, function, member, name, templated};
use cppsym::ast::IdentOrOp;
use cppsym::{FailureReason, LookupFlags, NameLookup, TargetType};

#[test]
fn test_anonymous_members_visible_from_enclosing_scope() {
    let domain = domain_with("a", vec![member("N::@anon::x")]);
    let tree = domain.tree();
    let n = child(tree, &["N"]).unwrap();
    let x = child(tree, &["N", "@anon", "x"]).unwrap();
    let ident = IdentOrOp::ident("x");

    assert_eq!(
        tree.find_first_named_symbol(n, &ident, None, None, LookupFlags::RECURSE_IN_ANON),
        Some(x)
    );
    assert_eq!(
        tree.find_first_named_symbol(n, &ident, None, None, LookupFlags::empty()),
        None
    );
    assert_eq!(domain.resolve_xref(None, "N::x", TargetType::Member).first(), Some(x));
}

#[test]
fn test_resolve_qualified_reference() {
    let domain = domain_with("a", vec![function("N::C::f", &[])]);
    let f = child(domain.tree(), &["N", "C", "f"]).unwrap();

    assert_eq!(
        domain.resolve_xref(None, "N::C::f", TargetType::Function),
        NameLookup::Found(vec![f])
    );
    assert_eq!(
        domain.resolve_xref(None, "::N::C::f", TargetType::Function),
        NameLookup::Found(vec![f])
    );
    assert_eq!(
        domain.resolve_xref(None, "N::D::f", TargetType::Function),
        NameLookup::NotFound
    );
}

#[test]
fn test_reference_from_nested_scope_climbs() {
    let domain = domain_with(
        "a",
        vec![function("N::helper", &[]), function("N::C::method", &[])],
    );
    let tree = domain.tree();
    let method = child(tree, &["N", "C", "method"]).unwrap();
    let helper = child(tree, &["N", "helper"]).unwrap();

    let found = tree.find_name(method, &name("helper"), &[], TargetType::Function, LookupFlags::REFERENCE);
    assert_eq!(found.first(), Some(helper));

    let scope_key = tree.get_lookup_key(method);
    assert_eq!(
        domain.resolve_xref(Some(&scope_key), "C::method", TargetType::Function).first(),
        Some(method)
    );
}

#[test]
fn test_template_param_qualifier_fails_distinctly() {
    let domain = domain_with("a", vec![templated(class("Box"), &[&["T"]])]);
    let tree = domain.tree();
    let boxed = child(tree, &["Box"]).unwrap();

    let found = tree.find_name(boxed, &name("T::value_type"), &[], TargetType::Type, LookupFlags::REFERENCE);
    assert_eq!(found.failure_reason(), Some(FailureReason::TemplateParamInQualified));
    assert!(found.symbols().is_empty());

    let deeper = tree.find_name(boxed, &name("T::a::b"), &[], TargetType::Type, LookupFlags::REFERENCE);
    assert_eq!(deeper, NameLookup::Failed(FailureReason::TemplateParamInQualified));
}

#[test]
fn test_reference_without_template_header() {
    let domain = domain_with("a", vec![templated(member("Box<T>::size"), &[&["T"]])]);
    let size = child(domain.tree(), &["Box", "size"]).unwrap();

    assert_eq!(
        domain.resolve_xref(None, "Box::size", TargetType::Member).first(),
        Some(size)
    );
}

#[test]
fn test_sibling_chain_is_searched_from_later_declaration() {
    let mut domain = cppsym::CppDomain::default();
    let root = domain.root();
    let declared = domain
        .add_directive(
            root,
            vec![function("first", &["int"]), function("second", &["int"])],
            "a",
            1,
        )
        .unwrap();
    let (first, second) = (declared[0].symbol, declared[1].symbol);
    let tree = domain.tree();
    let ident = IdentOrOp::ident("first");

    let flags = LookupFlags::MATCH_SELF | LookupFlags::SEARCH_IN_SIBLINGS;
    assert_eq!(tree.find_identifier(second, &ident, flags), Some(first));
    assert_eq!(tree.find_identifier(second, &ident, LookupFlags::MATCH_SELF), None);
}

#[test]
fn test_find_declaration_never_creates_nodes() {
    let domain = domain_with(
        "a",
        vec![function("N::f", &["int"]), function("N::f", &["double"])],
    );
    let tree = domain.tree();
    let before = tree.len();
    let wanted = function("N::f", &["double"]);

    let found = tree
        .find_declaration(tree.root(), &wanted, TargetType::Function, LookupFlags::REFERENCE)
        .unwrap();
    assert_eq!(tree.symbol(found).declaration(), Some(&wanted));
    assert!(tree
        .find_declaration(tree.root(), &function("X::f", &[]), TargetType::Function, LookupFlags::REFERENCE)
        .is_none());
    assert_eq!(tree.len(), before);
}

#[test]
fn test_non_ascii_targets_resolve_without_panicking() {
    let domain = domain_with("a", vec![member("Größe::wert")]);
    let wert = child(domain.tree(), &["Größe", "wert"]).unwrap();

    assert_eq!(
        domain.resolve_xref(None, "Größe::x", TargetType::Any),
        NameLookup::NotFound
    );
    assert_eq!(
        domain.resolve_xref(None, "Größe::wert", TargetType::Member).first(),
        Some(wert)
    );
    assert_eq!(
        domain.resolve_xref(None, "単位<Ä>::x", TargetType::Any),
        NameLookup::NotFound
    );
}

#[test]
fn test_members_named_like_operator_keyword() {
    let domain = domain_with(
        "a",
        vec![
            member("N::operators"),
            member("N::operator_count"),
            function("N::operator==", &["const N&"]),
        ],
    );
    let tree = domain.tree();
    let operators = child(tree, &["N", "operators"]).unwrap();
    let count = child(tree, &["N", "operator_count"]).unwrap();

    assert_eq!(
        domain.resolve_xref(None, "N::operators", TargetType::Member).first(),
        Some(operators)
    );
    assert_eq!(
        domain.resolve_xref(None, "N::operator_count", TargetType::Member).first(),
        Some(count)
    );
    let eq = domain.resolve_xref(None, "N::operator==", TargetType::Function);
    assert_eq!(eq.symbols().len(), 1);
    assert!(tree.symbol(eq.symbols()[0]).ident_or_op().unwrap().is_operator());
}
