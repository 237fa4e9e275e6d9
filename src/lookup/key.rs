use crate::SymbolTree;
use crate::ast::{NestedNameElement, TemplateParams};
use crate::lookup::LookupFlags;
use crate::types::SymbolId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a [`LookupKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookupKeyEntry {
    pub element: NestedNameElement,
    pub template_params: Option<TemplateParams>,
    /// Present when the node on this step carries a declaration
    pub stable_id: Option<String>,
}

/// Path from the root to a node that survives serialization and tree rebuilds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LookupKey {
    pub data: Vec<LookupKeyEntry>,
}

impl LookupKey {
    pub fn new(data: Vec<LookupKeyEntry>) -> Self {
        Self { data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, entry) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match &entry.stable_id {
                Some(id) => write!(f, "({}, {id})", entry.element)?,
                None => write!(f, "({}, None)", entry.element)?,
            }
        }
        f.write_str("]")
    }
}

impl SymbolTree {
    /// Durable reference to `id`, see [`direct_lookup`](Self::direct_lookup).
    pub fn get_lookup_key(&self, id: SymbolId) -> LookupKey {
        let data = self
            .ancestors_outermost_first(id)
            .into_iter()
            .filter_map(|s| {
                let node = self.symbol(s);
                Some(LookupKeyEntry {
                    element: NestedNameElement::new(
                        node.ident_or_op.clone()?,
                        node.template_args.clone(),
                    ),
                    template_params: node.template_params.clone(),
                    stable_id: node.stable_id(),
                })
            })
            .collect();
        LookupKey::new(data)
    }

    /// Follow `key` from the root. Never creates nodes.
    pub fn direct_lookup(&self, key: &LookupKey) -> Option<SymbolId> {
        let mut current = self.root();
        for entry in &key.data {
            current = match &entry.stable_id {
                Some(stable_id) => self.children(current).iter().copied().find(|&child| {
                    self.symbol(child)
                        .declaration()
                        .is_some_and(|d| d.stable_id() == *stable_id)
                })?,
                None => self.find_first_named_symbol(
                    current,
                    &entry.element.ident_or_op,
                    entry.template_params.as_ref(),
                    entry.element.template_args.as_ref(),
                    LookupFlags::empty(),
                )?,
            };
        }
        if self.trace().debug_lookup {
            tracing::debug!(target: "cppsym::lookup", "direct_lookup({key}) -> {current}");
        }
        Some(current)
    }
}
