//! Insertion: scopes, declarations and their parameter nodes.

use super::{Symbol, SymbolTree};
use crate::ast::{
    Declaration, IdentOrOp, NestedName, ObjectType, TemplateArgs, TemplateDeclarationPrefix,
    TemplateParams,
};
use crate::debug_print;
use crate::error::{SymbolError, SymbolResult};
use crate::lookup::{LookupFlags, MissingScopePolicy, SymbolLookupResult, is_specialization, symbol_lookup};
use crate::types::{CompactString, SymbolId, compact_string};

/// Result of attaching a declaration to the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The declaration now lives on this node, either new or a filled placeholder.
    Inserted(SymbolId),
    /// The entity was already declared. `redeclaration` is the flagged node
    /// holding the new declaration; `existing` is the one to keep using.
    Duplicate {
        existing: SymbolId,
        redeclaration: SymbolId,
        declaration: Box<Declaration>,
    },
}

impl AddOutcome {
    /// The node that represents the declared entity from now on.
    pub fn symbol(&self) -> SymbolId {
        match self {
            Self::Inserted(id) => *id,
            Self::Duplicate { existing, .. } => *existing,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// A declaration together with where it was written.
#[derive(Debug, Clone)]
pub(crate) struct DeclarationSite {
    pub declaration: Declaration,
    pub docname: CompactString,
    pub line: u32,
}

impl DeclarationSite {
    pub fn new(declaration: Declaration, docname: &str, line: u32) -> Self {
        Self {
            declaration,
            docname: compact_string(docname),
            line,
        }
    }
}

/// Insertion policy: missing qualifiers become empty scope nodes.
struct ScopeCreator<'t> {
    tree: &'t mut SymbolTree,
}

impl MissingScopePolicy for ScopeCreator<'_> {
    type Error = SymbolError;

    fn tree(&self) -> &SymbolTree {
        self.tree
    }

    fn on_missing_qualified_symbol(
        &mut self,
        parent: SymbolId,
        ident_or_op: &IdentOrOp,
        template_params: Option<&TemplateParams>,
        template_args: Option<&TemplateArgs>,
    ) -> SymbolResult<Option<SymbolId>> {
        self.tree
            .create_symbol(
                parent,
                ident_or_op.clone(),
                template_params.cloned(),
                template_args.cloned(),
                None,
            )
            .map(Some)
    }
}

impl SymbolTree {
    /// Make sure the scope `nested_name` exists below `parent` and return it.
    ///
    /// Used for directives that only open a scope, such as a namespace.
    pub fn add_name(
        &mut self,
        parent: SymbolId,
        nested_name: &NestedName,
        template_prefix: Option<&TemplateDeclarationPrefix>,
    ) -> SymbolResult<SymbolId> {
        self.ensure_contains(parent)?;
        let template_decls = template_prefix
            .map(|prefix| prefix.templates.as_slice())
            .unwrap_or_default();
        self.add_symbols(parent, nested_name, template_decls, None)
            .map(|outcome| outcome.symbol())
    }

    /// Attach `declaration`, written at `docname:line`, below `parent`.
    ///
    /// A declaration of something already declared is not an error: it yields
    /// [`AddOutcome::Duplicate`] and the caller decides how to report it.
    pub fn add_declaration(
        &mut self,
        parent: SymbolId,
        declaration: Declaration,
        docname: &str,
        line: u32,
    ) -> SymbolResult<AddOutcome> {
        self.ensure_contains(parent)?;
        let nested_name = declaration.name.clone();
        let template_decls = declaration
            .template_prefix
            .as_ref()
            .map(|prefix| prefix.templates.clone())
            .unwrap_or_default();
        self.add_symbols(
            parent,
            &nested_name,
            &template_decls,
            Some(DeclarationSite::new(declaration, docname, line)),
        )
    }

    fn add_symbols(
        &mut self,
        parent: SymbolId,
        nested_name: &NestedName,
        template_decls: &[TemplateParams],
        site: Option<DeclarationSite>,
    ) -> SymbolResult<AddOutcome> {
        let templates = nested_name.num_templates();
        if template_decls.len() != templates && template_decls.len() != templates + 1 {
            return Err(SymbolError::TemplateListMismatch {
                name: nested_name.to_string(),
                templates,
                lists: template_decls.len(),
            });
        }

        debug_print!(
            self,
            "add_symbols({nested_name}) under {parent}, declaration: {}",
            site.as_ref()
                .map_or_else(|| "None".to_string(), |s| format!("{} at {}:{}", s.declaration, s.docname, s.line))
        );

        let mut creator = ScopeCreator { tree: self };
        let SymbolLookupResult {
            symbols,
            parent_symbol,
            ident_or_op,
            template_params,
            template_args,
        } = symbol_lookup(
            &mut creator,
            parent,
            nested_name,
            template_decls,
            None,
            LookupFlags::CORRECT_PRIMARY_TEMPLATE_ARGS,
        )?
        .ok_or_else(|| SymbolError::invariant(format!("could not create scopes for {nested_name}")))?;

        if symbols.is_empty() {
            debug_print!(self, "no match, creating {ident_or_op}");
            let id = self.create_symbol(parent_symbol, ident_or_op, template_params, template_args, site)?;
            return Ok(AddOutcome::Inserted(id));
        }

        let Some(site) = site else {
            debug_print!(self, "no declaration, returning first of {} match(es)", symbols.len());
            return Ok(AddOutcome::Inserted(symbols[0]));
        };

        let mut no_decl = Vec::new();
        let mut with_decl = Vec::new();
        let mut dup_decl = Vec::new();
        for &s in &symbols {
            let node = self.symbol(s);
            if node.declaration.is_none() {
                no_decl.push(s);
            } else if node.is_redeclaration {
                dup_decl.push(s);
            } else {
                with_decl.push(s);
            }
        }
        debug_print!(
            self,
            "matches: {} empty, {} declared, {} redeclarations",
            no_decl.len(),
            with_decl.len(),
            dup_decl.len()
        );

        if let Some(existing) = self.conflicting_declaration(&with_decl, &site.declaration) {
            debug_print!(self, "duplicate of {existing}");
            let declaration = Box::new(site.declaration.clone());
            let redeclaration = self.create_symbol(
                parent_symbol,
                ident_or_op,
                template_params,
                template_args,
                Some(site),
            )?;
            self.nodes[redeclaration.index()].is_redeclaration = true;
            return Ok(AddOutcome::Duplicate {
                existing,
                redeclaration,
                declaration,
            });
        }

        if let Some(&empty) = no_decl.first() {
            debug_print!(self, "filling placeholder {empty}");
            self.fill_empty(empty, site)?;
            return Ok(AddOutcome::Inserted(empty));
        }

        // distinct overload
        let id = self.create_symbol(parent_symbol, ident_or_op, template_params, template_args, Some(site))?;
        Ok(AddOutcome::Inserted(id))
    }

    /// The already declared node `declaration` would duplicate, if any.
    ///
    /// Only functions may share a name and template signature, and only
    /// while their stable ids differ.
    fn conflicting_declaration(&self, with_decl: &[SymbolId], declaration: &Declaration) -> Option<SymbolId> {
        if declaration.object_type != ObjectType::Function {
            return with_decl.first().copied();
        }
        let wanted = declaration.stable_id();
        with_decl.iter().copied().find(|&s| {
            self.symbol(s).declaration.as_ref().is_some_and(|existing| {
                existing.object_type != ObjectType::Function || existing.stable_id() == wanted
            })
        })
    }

    pub(crate) fn create_symbol(
        &mut self,
        parent: SymbolId,
        ident_or_op: IdentOrOp,
        template_params: Option<TemplateParams>,
        template_args: Option<TemplateArgs>,
        site: Option<DeclarationSite>,
    ) -> SymbolResult<SymbolId> {
        let template_args = match (&template_params, template_args) {
            (Some(params), Some(args)) if !is_specialization(params, &args) => None,
            (_, args) => args,
        };
        let (declaration, docname, line) = match site {
            Some(site) => (Some(site.declaration), Some(site.docname), Some(site.line)),
            None => (None, None, None),
        };

        let id = self.push(Symbol {
            parent: Some(parent),
            ident_or_op: Some(ident_or_op),
            template_params,
            template_args,
            declaration,
            docname,
            line,
            is_redeclaration: false,
            sibling_above: None,
            sibling_below: None,
            children: Vec::new(),
        });
        self.assert_invariants(id)?;
        self.add_template_and_function_params(id)?;
        Ok(id)
    }

    pub(crate) fn fill_empty(&mut self, id: SymbolId, site: DeclarationSite) -> SymbolResult<()> {
        let node = &mut self.nodes[id.index()];
        if node.declaration.is_some() {
            return Err(SymbolError::invariant(format!("{id} is not empty")));
        }
        node.declaration = Some(site.declaration);
        node.docname = Some(site.docname);
        node.line = Some(site.line);
        self.assert_invariants(id)?;
        self.add_template_and_function_params(id)
    }

    /// Give each named template and function parameter of `id` its own node.
    ///
    /// Parameter nodes only carry a declaration when `id` does.
    fn add_template_and_function_params(&mut self, id: SymbolId) -> SymbolResult<()> {
        let node = self.symbol(id);
        let docname = node.docname.clone();
        let line = node.line;
        let owner = node.declaration.clone();
        let template_params = node
            .template_params
            .as_ref()
            .map(|params| params.params.clone())
            .unwrap_or_default();

        let site = |declaration: Option<Declaration>| match (declaration, &docname, line) {
            (Some(declaration), Some(docname), Some(line)) => Some(DeclarationSite {
                declaration,
                docname: docname.clone(),
                line,
            }),
            _ => None,
        };

        for param in &template_params {
            let Some(ident) = param.identifier() else {
                continue;
            };
            let declaration = owner.as_ref().and_then(|_| Declaration::template_param(param));
            let name = NestedName::single(IdentOrOp::Identifier(ident.clone()));
            let outcome = self.add_symbols(id, &name, &[], site(declaration))?;
            if outcome.is_duplicate() {
                debug_print!(self, "template parameter {ident} of {id} declared twice");
            }
        }

        let function_params = owner
            .as_ref()
            .and_then(|d| d.function_params.clone())
            .unwrap_or_default();
        for param in &function_params {
            let Some(name) = &param.name else {
                continue;
            };
            if name.rooted || name.names.len() != 1 {
                debug_print!(self, "skipping qualified parameter name {name}");
                continue;
            }
            let outcome = self.add_symbols(id, name, &[], site(Declaration::function_param(param)))?;
            if outcome.is_duplicate() {
                debug_print!(self, "function parameter {name} of {id} declared twice");
            }
        }
        Ok(())
    }
}
