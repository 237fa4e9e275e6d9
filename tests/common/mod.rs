//! Shared fixtures for the integration tests
#![allow(dead_code)]

use cppsym::ast::{
    Declaration, FunctionParam, NestedName, ObjectType, TemplateDeclarationPrefix, TemplateParam,
    TemplateParams,
};
use cppsym::{CppDomain, SymbolId, SymbolTree};

pub fn name(text: &str) -> NestedName {
    NestedName::parse(text).expect("valid nested name")
}

pub fn class(text: &str) -> Declaration {
    Declaration::new(ObjectType::Class, name(text))
}

pub fn member(text: &str) -> Declaration {
    Declaration::new(ObjectType::Member, name(text))
}

/// `text(types...)`, parameters unnamed
pub fn function(text: &str, param_types: &[&str]) -> Declaration {
    Declaration::new(ObjectType::Function, name(text)).with_function_params(
        param_types
            .iter()
            .map(|ty| FunctionParam::new(ty, None))
            .collect(),
    )
}

/// Wrap `decl` in one `template<typename P...>` header per entry of `lists`
pub fn templated(decl: Declaration, lists: &[&[&str]]) -> Declaration {
    let templates = lists
        .iter()
        .map(|params| {
            TemplateParams::new(params.iter().map(|p| TemplateParam::type_param(p)).collect())
        })
        .collect();
    decl.with_template_prefix(TemplateDeclarationPrefix::new(templates))
}

/// Build a domain from `(declaration, line)` pairs all written in `docname`
pub fn domain_with(docname: &str, decls: Vec<Declaration>) -> CppDomain {
    let mut domain = CppDomain::default();
    let root = domain.root();
    for (i, decl) in decls.into_iter().enumerate() {
        domain
            .add_declaration(root, decl, docname, i as u32 + 1)
            .expect("declaration accepted");
    }
    domain
}

/// Every declared node rendered as `declaration@docname`, in tree order
pub fn declared(tree: &SymbolTree) -> Vec<String> {
    tree.all_symbols()
        .filter_map(|id| {
            let node = tree.symbol(id);
            Some(format!("{}@{}", node.declaration()?, node.docname()?))
        })
        .collect()
}

/// Walk plain child names from the root, e.g. `child(tree, &["N", "C"])`
pub fn child(tree: &SymbolTree, path: &[&str]) -> Option<SymbolId> {
    let mut current = tree.root();
    for part in path {
        current = tree.children(current).iter().copied().find(|&c| {
            tree.symbol(c)
                .ident_or_op()
                .is_some_and(|i| i.to_string() == *part)
        })?;
    }
    Some(current)
}
