//! Qualified-name resolution.
//!
//! Insertion and reference resolution walk a nested name the same way and only
//! differ in what happens when an intermediate component is missing. That
//! decision is the [`MissingScopePolicy`] seam.

use crate::SymbolTree;
use crate::ast::{Declaration, IdentOrOp, NestedName, ObjectType, TemplateArgs, TemplateParams};
use crate::lookup::{FailureReason, LookupFlags, NameLookup, SymbolLookupResult, TargetType};
use crate::types::SymbolId;

/// What to do when an intermediate component of a qualified name has no match.
pub(crate) trait MissingScopePolicy {
    type Error;

    fn tree(&self) -> &SymbolTree;

    /// Supply a node for `ident_or_op` under `parent`, or `None` to make the
    /// whole lookup fail.
    fn on_missing_qualified_symbol(
        &mut self,
        parent: SymbolId,
        ident_or_op: &IdentOrOp,
        template_params: Option<&TemplateParams>,
        template_args: Option<&TemplateArgs>,
    ) -> Result<Option<SymbolId>, Self::Error>;
}

/// Read-only policy used when resolving references.
struct ReferencePolicy<'t> {
    tree: &'t SymbolTree,
    report_template_params: bool,
}

impl MissingScopePolicy for ReferencePolicy<'_> {
    type Error = FailureReason;

    fn tree(&self) -> &SymbolTree {
        self.tree
    }

    fn on_missing_qualified_symbol(
        &mut self,
        parent: SymbolId,
        _ident_or_op: &IdentOrOp,
        _template_params: Option<&TemplateParams>,
        _template_args: Option<&TemplateArgs>,
    ) -> Result<Option<SymbolId>, FailureReason> {
        if self.report_template_params && self.tree.is_template_param(parent) {
            return Err(FailureReason::TemplateParamInQualified);
        }
        Ok(None)
    }
}

/// Resolve `nested_name` starting at `start`.
///
/// Template parameter lists from `template_decls` are handed out in order to
/// the components carrying template arguments, and the next one (if any) to
/// the last component. With `ancestor_lookup` set, the lookup first climbs to
/// the innermost enclosing scope in which the first component is visible.
/// With [`LookupFlags::CORRECT_PRIMARY_TEMPLATE_ARGS`], arguments that restate
/// their parameters are ignored on every component, the last one included.
///
/// `Ok(None)` means an intermediate component could not be resolved.
pub(crate) fn symbol_lookup<P: MissingScopePolicy>(
    policy: &mut P,
    start: SymbolId,
    nested_name: &NestedName,
    template_decls: &[TemplateParams],
    ancestor_lookup: Option<TargetType>,
    flags: LookupFlags,
) -> Result<Option<SymbolLookupResult>, P::Error> {
    let tree = policy.tree();
    let Some((last, qualifiers)) = nested_name.names.split_last() else {
        return Ok(None);
    };
    if !tree.contains(start) {
        return Ok(None);
    }
    let trace = tree.trace().debug_lookup;
    let _span = trace.then(|| {
        tracing::debug_span!(target: "cppsym::lookup", "symbol_lookup", name = %nested_name, start = %start)
            .entered()
    });

    let mut parent = if nested_name.rooted {
        tree.root()
    } else {
        start
    };

    if let Some(target) = ancestor_lookup {
        let first = &nested_name.names[0];
        if !first.is_operator() {
            parent = tree.climb_to_visible_scope(parent, &first.ident_or_op, nested_name.names.len() == 1, target, flags);
            if trace {
                tracing::debug!(target: "cppsym::lookup", "starting point after ancestor walk: {parent}");
            }
        }
    }

    let scope_flags = flags
        & (LookupFlags::TEMPLATE_SHORTHAND
            | LookupFlags::MATCH_SELF
            | LookupFlags::RECURSE_IN_ANON
            | LookupFlags::CORRECT_PRIMARY_TEMPLATE_ARGS);
    let mut flags = flags;
    let mut next_decl = 0;

    for element in qualifiers {
        let template_params = match &element.template_args {
            Some(_) => {
                let params = template_decls.get(next_decl);
                if params.is_some() {
                    next_decl += 1;
                }
                params
            }
            None => None,
        };
        let step_flags = scope_flags & flags;

        let found = policy.tree().find_first_named_symbol(
            parent,
            &element.ident_or_op,
            template_params,
            element.template_args.as_ref(),
            step_flags,
        );
        let symbol = match found {
            Some(symbol) => symbol,
            None => match policy.on_missing_qualified_symbol(
                parent,
                &element.ident_or_op,
                template_params,
                element.template_args.as_ref(),
            )? {
                Some(symbol) => symbol,
                None => {
                    if trace {
                        tracing::debug!(target: "cppsym::lookup", "no scope {} under {parent}", element.ident_or_op);
                    }
                    return Ok(None);
                }
            },
        };
        parent = symbol;
        // only the first component may name the starting scope itself
        flags.remove(LookupFlags::MATCH_SELF);
    }

    let template_params = template_decls.get(next_decl).cloned();
    let template_args = last.template_args.clone();
    let tree = policy.tree();
    let symbols: Vec<SymbolId> = tree
        .find_named_symbols(
            parent,
            &last.ident_or_op,
            template_params.as_ref(),
            template_args.as_ref(),
            flags,
        )
        .collect();
    if trace {
        tracing::debug!(target: "cppsym::lookup", "{} match(es) for {} under {parent}", symbols.len(), last.ident_or_op);
    }

    Ok(Some(SymbolLookupResult {
        symbols,
        parent_symbol: parent,
        ident_or_op: last.ident_or_op.clone(),
        template_params,
        template_args,
    }))
}

impl SymbolTree {
    pub(crate) fn is_template_param(&self, id: SymbolId) -> bool {
        self.symbol(id)
            .declaration()
            .is_some_and(|d| d.object_type == ObjectType::TemplateParam)
    }

    /// First node named `ident_or_op` among the candidates of `start` alone.
    ///
    /// Looks at `start` itself with [`LookupFlags::MATCH_SELF`], its children
    /// (flattened through anonymous scopes with
    /// [`LookupFlags::RECURSE_IN_ANON`]) and, with
    /// [`LookupFlags::SEARCH_IN_SIBLINGS`], the same for each node up its
    /// sibling chain. Template signatures are ignored.
    pub fn find_identifier(
        &self,
        start: SymbolId,
        ident_or_op: &IdentOrOp,
        flags: LookupFlags,
    ) -> Option<SymbolId> {
        let flags = flags
            & (LookupFlags::MATCH_SELF
                | LookupFlags::RECURSE_IN_ANON
                | LookupFlags::SEARCH_IN_SIBLINGS);
        let found = super::Candidates::new(self, start, flags)
            .find(|&id| self.symbol(id).ident_or_op() == Some(ident_or_op));
        if self.trace().debug_lookup {
            tracing::debug!(target: "cppsym::lookup", "find_identifier({start}, {ident_or_op}) -> {found:?}");
        }
        found
    }

    /// Innermost scope, from `start` outwards, in which `ident_or_op` is visible.
    ///
    /// Returns the scope, not the matching node; `None` when even the root
    /// does not see it.
    pub fn find_enclosing_scope(
        &self,
        start: SymbolId,
        ident_or_op: &IdentOrOp,
        flags: LookupFlags,
    ) -> Option<SymbolId> {
        let mut current = Some(start);
        while let Some(scope) = current {
            if self.find_identifier(scope, ident_or_op, flags).is_some() {
                return Some(scope);
            }
            current = self.get(scope)?.parent();
        }
        None
    }

    /// Climb from `start` until `first` is visible or the root is reached.
    ///
    /// A lone class name found while standing inside that same class (a
    /// constructor referring to its class) keeps climbing so the class
    /// itself, not the constructor, is the match.
    fn climb_to_visible_scope(
        &self,
        start: SymbolId,
        first: &IdentOrOp,
        single_name: bool,
        target: TargetType,
        flags: LookupFlags,
    ) -> SymbolId {
        let mut scope = start;
        while let Some(grand) = self.symbol(scope).parent() {
            if self.find_identifier(scope, first, flags).is_some() {
                let constructor_self_reference = single_name
                    && target == TargetType::Class
                    && flags.contains(LookupFlags::MATCH_SELF)
                    && self.symbol(grand).ident_or_op() == Some(first);
                if !constructor_self_reference {
                    break;
                }
            }
            scope = grand;
        }
        scope
    }

    /// Resolve a cross-reference written inside `start`.
    ///
    /// A miss is retried once without template parameters and arguments, so
    /// `A::f` still finds a member of `template<typename T> class A`.
    pub fn find_name(
        &self,
        start: SymbolId,
        nested_name: &NestedName,
        template_decls: &[TemplateParams],
        target: TargetType,
        flags: LookupFlags,
    ) -> NameLookup {
        let mut policy = ReferencePolicy {
            tree: self,
            report_template_params: true,
        };
        let result = match symbol_lookup(&mut policy, start, nested_name, template_decls, Some(target), flags) {
            Ok(Some(result)) => result,
            Ok(None) => return NameLookup::NotFound,
            Err(reason) => return NameLookup::Failed(reason),
        };

        if !result.symbols.is_empty() {
            return NameLookup::Found(result.symbols);
        }
        if self.is_template_param(result.parent_symbol) {
            return NameLookup::Failed(FailureReason::TemplateParamInQualified);
        }

        let retry = self.find_first_named_symbol(
            result.parent_symbol,
            &result.ident_or_op,
            None,
            None,
            flags
                & (LookupFlags::TEMPLATE_SHORTHAND
                    | LookupFlags::MATCH_SELF
                    | LookupFlags::RECURSE_IN_ANON),
        );
        match retry {
            Some(symbol) => NameLookup::Found(vec![symbol]),
            None => NameLookup::NotFound,
        }
    }

    /// The node holding a declaration equal (by stable id) to `declaration`.
    ///
    /// Never creates nodes.
    pub fn find_declaration(
        &self,
        start: SymbolId,
        declaration: &Declaration,
        target: TargetType,
        flags: LookupFlags,
    ) -> Option<SymbolId> {
        let template_decls = declaration
            .template_prefix
            .as_ref()
            .map(|prefix| prefix.templates.as_slice())
            .unwrap_or_default();
        let mut policy = ReferencePolicy {
            tree: self,
            report_template_params: false,
        };
        let result = symbol_lookup(
            &mut policy,
            start,
            &declaration.name,
            template_decls,
            Some(target),
            flags,
        )
        .ok()??;

        let wanted = declaration.stable_id();
        result.symbols.into_iter().find(|&id| {
            self.symbol(id)
                .declaration()
                .is_some_and(|d| d.stable_id() == wanted)
        })
    }
}
