//! Named-symbol search: candidates of one scope filtered by name and template signature.

use crate::SymbolTree;
use crate::ast::{IdentOrOp, TemplateArgs, TemplateParams};
use crate::lookup::LookupFlags;
use crate::symbol::Symbol;
use crate::types::SymbolId;

/// Whether `args` actually specializes a template declared with `params`.
///
/// Arguments that restate the parameter names in order (`template<typename T,
/// typename... Ts> class A<T, Ts...>`) denote the primary template. Everything
/// else, including an empty argument list, is a specialization.
pub fn is_specialization(params: &TemplateParams, args: &TemplateArgs) -> bool {
    if params.params.len() != args.args.len() || params.params.is_empty() {
        return true;
    }
    params.params.iter().zip(&args.args).any(|(param, arg)| {
        let text = arg.as_str();
        let (name, is_expansion) = match text.strip_suffix("...") {
            Some(name) => (name.trim_end(), true),
            None => (text, false),
        };
        if param.is_pack != is_expansion {
            return true;
        }
        param
            .identifier()
            .is_none_or(|ident| ident.as_str() != name)
    })
}

/// Lazy walk over the nodes a named search may consider.
///
/// Yields the scope itself (with [`LookupFlags::MATCH_SELF`]), then its
/// children in order, descending into anonymous children right after
/// yielding them (with [`LookupFlags::RECURSE_IN_ANON`]). With
/// [`LookupFlags::SEARCH_IN_SIBLINGS`] it then moves to the scope's
/// `sibling_above` and starts over.
pub struct Candidates<'a> {
    tree: &'a SymbolTree,
    scope: Option<SymbolId>,
    entered: bool,
    stack: Vec<std::slice::Iter<'a, SymbolId>>,
    flags: LookupFlags,
}

impl<'a> Candidates<'a> {
    /// An id `tree` does not know yields nothing.
    pub fn new(tree: &'a SymbolTree, scope: SymbolId, flags: LookupFlags) -> Self {
        Self {
            tree,
            scope: tree.contains(scope).then_some(scope),
            entered: false,
            stack: Vec::new(),
            flags,
        }
    }
}

impl Iterator for Candidates<'_> {
    type Item = SymbolId;

    fn next(&mut self) -> Option<SymbolId> {
        loop {
            let scope = self.scope?;
            if !self.entered {
                self.entered = true;
                self.stack.push(self.tree.symbol(scope).children.iter());
                if self.flags.contains(LookupFlags::MATCH_SELF) {
                    return Some(scope);
                }
                continue;
            }

            let Some(top) = self.stack.last_mut() else {
                self.scope = if self.flags.contains(LookupFlags::SEARCH_IN_SIBLINGS) {
                    self.tree
                        .symbol(scope)
                        .sibling_above
                        .filter(|&above| self.tree.contains(above))
                } else {
                    None
                };
                self.entered = false;
                continue;
            };
            match top.next() {
                Some(&child) => {
                    let node = self.tree.symbol(child);
                    if self.flags.contains(LookupFlags::RECURSE_IN_ANON) && node.is_anon() {
                        self.stack.push(node.children.iter());
                    }
                    return Some(child);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// The name and template signature a candidate must carry.
#[derive(Debug, Clone, Copy)]
struct NameQuery<'q> {
    ident_or_op: &'q IdentOrOp,
    template_params: Option<&'q TemplateParams>,
    template_args: Option<&'q TemplateArgs>,
    template_shorthand: bool,
}

impl NameQuery<'_> {
    fn matches(&self, symbol: &Symbol) -> bool {
        if symbol.ident_or_op.as_ref() != Some(self.ident_or_op) {
            return false;
        }
        match (&symbol.template_params, self.template_params) {
            (Some(ours), Some(theirs)) => {
                if ours.to_string() != theirs.to_string() {
                    return false;
                }
            }
            (None, Some(_)) => return false,
            (Some(_), None) if !self.template_shorthand => return false,
            _ => {}
        }
        match (&symbol.template_args, self.template_args) {
            (Some(ours), Some(theirs)) => ours.to_string() == theirs.to_string(),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Iterator returned by [`SymbolTree::find_named_symbols`].
pub struct NamedSymbols<'a> {
    candidates: Candidates<'a>,
    query: NameQuery<'a>,
}

impl Iterator for NamedSymbols<'_> {
    type Item = SymbolId;

    fn next(&mut self) -> Option<SymbolId> {
        let tree = self.candidates.tree;
        let query = self.query;
        self.candidates
            .by_ref()
            .find(|&id| query.matches(tree.symbol(id)))
    }
}

impl SymbolTree {
    /// Every node reachable from `scope` under `flags` that carries this name
    /// and template signature, in tree order.
    pub fn find_named_symbols<'a>(
        &'a self,
        scope: SymbolId,
        ident_or_op: &'a IdentOrOp,
        template_params: Option<&'a TemplateParams>,
        template_args: Option<&'a TemplateArgs>,
        flags: LookupFlags,
    ) -> NamedSymbols<'a> {
        let template_args = match (template_params, template_args) {
            (Some(params), Some(args))
                if flags.contains(LookupFlags::CORRECT_PRIMARY_TEMPLATE_ARGS)
                    && !is_specialization(params, args) =>
            {
                None
            }
            (_, args) => args,
        };

        if self.trace().debug_lookup {
            tracing::debug!(
                target: "cppsym::lookup",
                "find_named_symbols(scope={scope}, {ident_or_op}, params={}, args={}, flags={flags:?})",
                template_params.map_or_else(|| "None".to_string(), ToString::to_string),
                template_args.map_or_else(|| "None".to_string(), ToString::to_string),
            );
        }

        NamedSymbols {
            candidates: Candidates::new(self, scope, flags),
            query: NameQuery {
                ident_or_op,
                template_params,
                template_args,
                template_shorthand: flags.contains(LookupFlags::TEMPLATE_SHORTHAND),
            },
        }
    }

    pub fn find_first_named_symbol(
        &self,
        scope: SymbolId,
        ident_or_op: &IdentOrOp,
        template_params: Option<&TemplateParams>,
        template_args: Option<&TemplateArgs>,
        flags: LookupFlags,
    ) -> Option<SymbolId> {
        self.find_named_symbols(scope, ident_or_op, template_params, template_args, flags)
            .next()
    }
}
