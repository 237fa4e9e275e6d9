use crate::ast::{IdentOrOp, TemplateArgs, TemplateParams};
use crate::types::SymbolId;
use std::fmt;

/// What qualified lookup reached: the scope of the last name component and
/// every node in it matching that component.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolLookupResult {
    pub symbols: Vec<SymbolId>,
    pub parent_symbol: SymbolId,
    pub ident_or_op: IdentOrOp,
    pub template_params: Option<TemplateParams>,
    pub template_args: Option<TemplateArgs>,
}

/// Why reference resolution gave up on a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// A qualifier names a template parameter, whose members are unknowable.
    TemplateParamInQualified,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TemplateParamInQualified => f.write_str("templateParamInQualified"),
        }
    }
}

/// Outcome of [`SymbolTree::find_name`](crate::SymbolTree::find_name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameLookup {
    /// One or more candidates; the caller disambiguates overloads.
    Found(Vec<SymbolId>),
    NotFound,
    /// The name goes through a template parameter scope and must not resolve.
    Failed(FailureReason),
}

impl NameLookup {
    pub fn symbols(&self) -> &[SymbolId] {
        match self {
            Self::Found(symbols) => symbols,
            _ => &[],
        }
    }

    pub fn first(&self) -> Option<SymbolId> {
        self.symbols().first().copied()
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::Failed(reason) => Some(*reason),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}
