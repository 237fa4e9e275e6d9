//! The C++ symbol tree.
//!
//! Every declared entity, every implicitly created enclosing scope, and every
//! named template or function parameter is a [`Symbol`] in a single arena owned
//! by [`SymbolTree`]. Nodes refer to each other by [`SymbolId`]; a node that is
//! detached with [`SymbolTree::remove`] keeps its slot but is no longer reachable.

mod display;
mod insert;
mod merge;

pub use insert::AddOutcome;

use crate::ast::{Declaration, IdentOrOp, NestedName, NestedNameElement, TemplateArgs, TemplateParams};
use crate::error::{SymbolError, SymbolResult};
use crate::types::{CompactString, Location, SymbolId};
use serde::{Deserialize, Serialize};

/// Per-tree tracing switches, taken from [`Settings`](crate::Settings).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceConfig {
    /// Emit a debug event for every step of insertion, lookup and merge
    pub debug_lookup: bool,
    /// Emit the rendered tree after every merge
    pub debug_show_tree: bool,
}

/// One node of the symbol tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub(crate) parent: Option<SymbolId>,
    pub(crate) ident_or_op: Option<IdentOrOp>,
    pub(crate) template_params: Option<TemplateParams>,
    pub(crate) template_args: Option<TemplateArgs>,
    pub(crate) declaration: Option<Declaration>,
    pub(crate) docname: Option<CompactString>,
    pub(crate) line: Option<u32>,
    pub(crate) is_redeclaration: bool,
    pub(crate) sibling_above: Option<SymbolId>,
    pub(crate) sibling_below: Option<SymbolId>,
    pub(crate) children: Vec<SymbolId>,
}

impl Symbol {
    fn root() -> Self {
        Self {
            parent: None,
            ident_or_op: None,
            template_params: None,
            template_args: None,
            declaration: None,
            docname: None,
            line: None,
            is_redeclaration: false,
            sibling_above: None,
            sibling_below: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<SymbolId> {
        self.parent
    }

    /// `None` only for the root.
    pub fn ident_or_op(&self) -> Option<&IdentOrOp> {
        self.ident_or_op.as_ref()
    }

    pub fn template_params(&self) -> Option<&TemplateParams> {
        self.template_params.as_ref()
    }

    /// Present only when the node is a partial or explicit specialization.
    pub fn template_args(&self) -> Option<&TemplateArgs> {
        self.template_args.as_ref()
    }

    pub fn declaration(&self) -> Option<&Declaration> {
        self.declaration.as_ref()
    }

    pub fn docname(&self) -> Option<&str> {
        self.docname.as_deref()
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn location(&self) -> Option<Location> {
        Some(Location::new(self.docname.as_deref()?, self.line?))
    }

    /// Set on the extra node created for a duplicate declaration.
    pub fn is_redeclaration(&self) -> bool {
        self.is_redeclaration
    }

    pub fn sibling_above(&self) -> Option<SymbolId> {
        self.sibling_above
    }

    pub fn sibling_below(&self) -> Option<SymbolId> {
        self.sibling_below
    }

    pub fn children(&self) -> &[SymbolId] {
        &self.children
    }

    pub fn is_anon(&self) -> bool {
        self.ident_or_op.as_ref().is_some_and(IdentOrOp::is_anon)
    }

    /// The stable id of the attached declaration, if any.
    pub fn stable_id(&self) -> Option<String> {
        self.declaration.as_ref().map(Declaration::stable_id)
    }
}

/// Arena of [`Symbol`]s rooted at a single nameless node.
#[derive(Debug, Clone)]
pub struct SymbolTree {
    nodes: Vec<Symbol>,
    trace: TraceConfig,
}

impl Default for SymbolTree {
    fn default() -> Self {
        Self::new(TraceConfig::default())
    }
}

impl SymbolTree {
    pub fn new(trace: TraceConfig) -> Self {
        Self {
            nodes: vec![Symbol::root()],
            trace,
        }
    }

    /// Rebuild a tree from persisted nodes, checking every link.
    pub(crate) fn from_nodes(nodes: Vec<Symbol>, trace: TraceConfig) -> SymbolResult<Self> {
        let tree = Self { nodes, trace };
        tree.validate_links()?;
        tree.assert_all_invariants()?;
        Ok(tree)
    }

    pub(crate) fn nodes(&self) -> &[Symbol] {
        &self.nodes
    }

    pub fn root(&self) -> SymbolId {
        SymbolId::from_index(0)
    }

    pub fn trace(&self) -> TraceConfig {
        self.trace
    }

    pub fn set_trace(&mut self, trace: TraceConfig) {
        self.trace = trace;
    }

    /// Number of arena slots, detached nodes included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1 && self.nodes[0].children.is_empty()
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        id.to_u32()
            .checked_sub(1)
            .and_then(|index| self.nodes.get(index as usize))
    }

    /// Whether `id` names a slot of this tree, detached or not.
    pub fn contains(&self, id: SymbolId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn ensure_contains(&self, id: SymbolId) -> SymbolResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(SymbolError::UnknownSymbol { id })
        }
    }

    /// Like [`get`](Self::get) for ids this tree handed out.
    ///
    /// # Panics
    ///
    /// Panics when `id` was issued by a different tree.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.nodes[id.index()]
    }

    pub(crate) fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn push(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId::from_index(self.nodes.len());
        if let Some(parent) = symbol.parent {
            self.nodes[parent.index()].children.push(id);
        }
        self.nodes.push(symbol);
        id
    }

    pub fn children(&self, id: SymbolId) -> &[SymbolId] {
        &self.symbol(id).children
    }

    /// Children of `id`, descending into anonymous children as if their
    /// members belonged to `id` directly.
    pub fn children_recurse_anon(&self, id: SymbolId) -> AnonFlattened<'_> {
        AnonFlattened {
            tree: self,
            stack: vec![self.symbol(id).children.iter()],
        }
    }

    /// Every node reachable from the root, root first, in pre-order.
    pub fn all_symbols(&self) -> AllSymbols<'_> {
        AllSymbols {
            tree: self,
            stack: vec![self.root()],
        }
    }

    /// Detach `id` from its parent. The node and its subtree stay in the arena.
    pub fn remove(&mut self, id: SymbolId) {
        let Some(parent) = self.get(id).and_then(Symbol::parent) else {
            return;
        };
        self.nodes[parent.index()].children.retain(|&child| child != id);
        self.nodes[id.index()].parent = None;
    }

    /// Chain two declarations written in the same directive.
    ///
    /// Returns `Ok(false)` without touching either node when one of them is
    /// already linked on that side. Linking `below` above a node it already
    /// precedes would close the chain into a loop and is rejected.
    pub fn link_siblings(&mut self, above: SymbolId, below: SymbolId) -> SymbolResult<bool> {
        self.ensure_contains(above)?;
        self.ensure_contains(below)?;
        if above == below {
            return Err(SymbolError::SiblingCycle { above, below });
        }
        if self.symbol(above).sibling_below.is_some() || self.symbol(below).sibling_above.is_some() {
            return Ok(false);
        }
        if self.sibling_chain_above(above).any(|s| s == below) {
            return Err(SymbolError::SiblingCycle { above, below });
        }
        self.nodes[above.index()].sibling_below = Some(below);
        self.nodes[below.index()].sibling_above = Some(above);
        Ok(true)
    }

    /// `id`'s `sibling_above`, then its `sibling_above`, and so on.
    fn sibling_chain_above(&self, id: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
        // bounded so a corrupt chain cannot spin forever
        std::iter::successors(self.get(id).and_then(Symbol::sibling_above), |&s| {
            self.get(s).and_then(Symbol::sibling_above)
        })
        .take(self.nodes.len())
    }

    /// Forget every declaration that came from `docname`.
    ///
    /// The nodes stay in place as empty scopes, so a later re-read of the
    /// document fills them again instead of duplicating them.
    pub fn clear_doc(&mut self, docname: &str) {
        let root = self.root();
        let cleared = self.clear_doc_below(root, docname);
        if self.trace.debug_lookup {
            tracing::debug!(target: "cppsym::tree", "clear_doc({docname}): {cleared} declaration(s) removed");
        }
    }

    fn clear_doc_below(&mut self, id: SymbolId, docname: &str) -> usize {
        let mut cleared = 0;
        let children = self.nodes[id.index()].children.clone();
        for child in children {
            cleared += self.clear_doc_below(child, docname);

            let node = &self.nodes[child.index()];
            if node.declaration.is_none() || node.docname.as_deref() != Some(docname) {
                continue;
            }
            let (above, below) = (node.sibling_above, node.sibling_below);

            let node = &mut self.nodes[child.index()];
            node.declaration = None;
            node.docname = None;
            node.line = None;
            node.is_redeclaration = false;
            node.sibling_above = None;
            node.sibling_below = None;
            if let Some(above) = above {
                self.nodes[above.index()].sibling_below = below;
            }
            if let Some(below) = below {
                self.nodes[below.index()].sibling_above = above;
            }
            cleared += 1;
        }
        cleared
    }

    /// Ancestors of `id` up to (excluding) the root, outermost first.
    pub(crate) fn ancestors_outermost_first(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some((s, node)) = current.and_then(|s| Some((s, self.get(s)?))) {
            if node.parent.is_none() {
                break;
            }
            chain.push(s);
            current = node.parent;
        }
        chain.reverse();
        chain
    }

    /// The qualified name of `id` as it would be written from the global scope.
    pub fn get_full_nested_name(&self, id: SymbolId) -> NestedName {
        let names = self
            .ancestors_outermost_first(id)
            .into_iter()
            .filter_map(|s| {
                let node = self.symbol(s);
                let ident = node.ident_or_op.clone()?;
                Some(NestedNameElement::new(ident, node.template_args.clone()))
            })
            .collect();
        NestedName::new(names, true)
    }

    /// Check the structural invariants of a single node.
    pub fn assert_invariants(&self, id: SymbolId) -> SymbolResult<()> {
        let node = self
            .get(id)
            .ok_or(SymbolError::UnknownSymbol { id })?;

        if id == self.root() {
            if node.parent.is_some()
                || node.ident_or_op.is_some()
                || node.template_params.is_some()
                || node.template_args.is_some()
                || node.declaration.is_some()
                || node.docname.is_some()
                || node.line.is_some()
            {
                return Err(SymbolError::invariant("root carries a name or declaration"));
            }
            return Ok(());
        }

        if node.ident_or_op.is_none() {
            return Err(SymbolError::invariant(format!("{id} has no name")));
        }
        let has_decl = node.declaration.is_some();
        if has_decl != node.docname.is_some() || has_decl != node.line.is_some() {
            return Err(SymbolError::invariant(format!(
                "{id}: declaration, docname and line must be set together"
            )));
        }
        Ok(())
    }

    /// [`assert_invariants`](Self::assert_invariants) for every reachable node.
    pub fn assert_all_invariants(&self) -> SymbolResult<()> {
        self.all_symbols().try_for_each(|id| self.assert_invariants(id))
    }

    fn validate_links(&self) -> SymbolResult<()> {
        let root = self.nodes.first().ok_or_else(|| SymbolError::invariant("tree has no root"))?;
        if root.parent.is_some() {
            return Err(SymbolError::invariant("root has a parent"));
        }
        let in_range = |id: SymbolId| id.to_u32() >= 1 && id.index() < self.nodes.len();
        for (index, node) in self.nodes.iter().enumerate() {
            let id = SymbolId::from_index(index);
            let links = node
                .parent
                .iter()
                .chain(node.sibling_above.iter())
                .chain(node.sibling_below.iter())
                .chain(node.children.iter());
            for &link in links {
                if !in_range(link) {
                    return Err(SymbolError::UnknownSymbol { id: link });
                }
            }
            if let Some(parent) = node.parent {
                if !self.nodes[parent.index()].children.contains(&id) {
                    return Err(SymbolError::invariant(format!(
                        "{id} is not among the children of its parent {parent}"
                    )));
                }
            }
            for &child in &node.children {
                if self.nodes[child.index()].parent != Some(id) {
                    return Err(SymbolError::invariant(format!(
                        "{child} is listed under {id} but has another parent"
                    )));
                }
            }
            if let Some(below) = node.sibling_below {
                if self.nodes[below.index()].sibling_above != Some(id) {
                    return Err(SymbolError::invariant(format!(
                        "{id} links {below} as its sibling below, but not the other way round"
                    )));
                }
            }
            if self.sibling_chain_above(id).any(|s| s == id) {
                return Err(SymbolError::invariant(format!("{id} is part of a sibling loop")));
            }
        }
        Ok(())
    }
}

/// Iterator returned by [`SymbolTree::children_recurse_anon`].
pub struct AnonFlattened<'a> {
    tree: &'a SymbolTree,
    stack: Vec<std::slice::Iter<'a, SymbolId>>,
}

impl Iterator for AnonFlattened<'_> {
    type Item = SymbolId;

    fn next(&mut self) -> Option<SymbolId> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(&child) => {
                    let node = self.tree.symbol(child);
                    if node.is_anon() {
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

/// Iterator returned by [`SymbolTree::all_symbols`].
pub struct AllSymbols<'a> {
    tree: &'a SymbolTree,
    stack: Vec<SymbolId>,
}

impl Iterator for AllSymbols<'_> {
    type Item = SymbolId;

    fn next(&mut self) -> Option<SymbolId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.symbol(id).children.iter().rev().copied());
        Some(id)
    }
}
