//! The C++ domain's view of the engine: one project-wide tree that documents
//! add declarations to, are cleared from, and are merged into.

use crate::ast::{Declaration, NestedName};
use crate::config::Settings;
use crate::diagnostics::Diagnostic;
use crate::error::SymbolResult;
use crate::lookup::{LookupFlags, LookupKey, NameLookup, TargetType};
use crate::symbol::{AddOutcome, SymbolTree, TraceConfig};
use crate::types::{Location, SymbolId};
use std::collections::BTreeSet;

/// A declaration's place in the tree after it was added.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredSymbol {
    /// The node to keep working with; for a duplicate, the earlier declaration.
    pub symbol: SymbolId,
    pub diagnostic: Option<Diagnostic>,
}

#[derive(Debug, Clone, Default)]
pub struct CppDomain {
    tree: SymbolTree,
}

impl CppDomain {
    pub fn new(trace: TraceConfig) -> Self {
        Self {
            tree: SymbolTree::new(trace),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.trace_config())
    }

    pub fn from_tree(tree: SymbolTree) -> Self {
        Self { tree }
    }

    pub fn root(&self) -> SymbolId {
        self.tree.root()
    }

    pub fn tree(&self) -> &SymbolTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SymbolTree {
        &mut self.tree
    }

    pub fn into_tree(self) -> SymbolTree {
        self.tree
    }

    /// Add one declaration; a duplicate becomes a warning, not an error.
    pub fn add_declaration(
        &mut self,
        parent: SymbolId,
        declaration: Declaration,
        docname: &str,
        line: u32,
    ) -> SymbolResult<DeclaredSymbol> {
        match self.tree.add_declaration(parent, declaration, docname, line)? {
            AddOutcome::Inserted(symbol) => Ok(DeclaredSymbol {
                symbol,
                diagnostic: None,
            }),
            AddOutcome::Duplicate {
                existing,
                declaration,
                ..
            } => {
                let existing_location = self
                    .tree
                    .symbol(existing)
                    .location()
                    .unwrap_or_else(|| Location::new("", 0));
                let diagnostic = Diagnostic::DuplicateDeclaration {
                    declaration: declaration.to_string(),
                    directive: declaration.directive_type,
                    existing: existing_location,
                    duplicate: Location::new(docname, line),
                };
                Ok(DeclaredSymbol {
                    symbol: existing,
                    diagnostic: Some(diagnostic.raise()),
                })
            }
        }
    }

    /// Add the declarations of one directive and chain them as siblings.
    ///
    /// A duplicate is not linked, but the next declaration is chained to
    /// the node it duplicates.
    pub fn add_directive(
        &mut self,
        parent: SymbolId,
        declarations: Vec<Declaration>,
        docname: &str,
        line: u32,
    ) -> SymbolResult<Vec<DeclaredSymbol>> {
        let mut declared = Vec::with_capacity(declarations.len());
        let mut last: Option<SymbolId> = None;
        for declaration in declarations {
            let result = self.add_declaration(parent, declaration, docname, line)?;
            if let (Some(above), None) = (last, &result.diagnostic) {
                self.tree.link_siblings(above, result.symbol)?;
            }
            last = Some(result.symbol);
            declared.push(result);
        }
        Ok(declared)
    }

    pub fn clear_doc(&mut self, docname: &str) {
        self.tree.clear_doc(docname);
    }

    /// Fold the tree built for `docnames` into this one.
    pub fn merge_domain_data(
        &mut self,
        other: CppDomain,
        docnames: &[&str],
    ) -> SymbolResult<Vec<Diagnostic>> {
        self.tree.merge_with(other.tree, docnames)
    }

    /// Resolve `target` as written inside the scope identified by `parent_key`.
    ///
    /// Without a key the reference is resolved from the global scope. A key
    /// that no longer resolves, or a target that is not a name, yields
    /// [`NameLookup::NotFound`].
    pub fn resolve_xref(
        &self,
        parent_key: Option<&LookupKey>,
        target: &str,
        typ: TargetType,
    ) -> NameLookup {
        let scope = match parent_key {
            Some(key) => match self.tree.direct_lookup(key) {
                Some(scope) => scope,
                None => {
                    tracing::debug!(target: "cppsym::lookup", "stale parent key {key} for '{target}'");
                    return NameLookup::NotFound;
                }
            },
            None => self.tree.root(),
        };
        let Some(name) = NestedName::parse(target) else {
            return NameLookup::NotFound;
        };
        self.tree
            .find_name(scope, &name, &[], typ, LookupFlags::REFERENCE)
    }

    /// Documents that currently contribute at least one declaration.
    pub fn documents(&self) -> BTreeSet<String> {
        self.tree
            .all_symbols()
            .filter_map(|id| self.tree.symbol(id).docname().map(str::to_string))
            .collect()
    }
}
