//! Lookup engine over a [`SymbolTree`](crate::SymbolTree)
//!
//! - [`named`]: candidates of one scope filtered by name and template signature
//! - [`resolve`]: qualified names, cross-references and declaration lookup
//! - [`key`]: durable paths to nodes for persisted references

pub mod flags;
pub mod key;
pub mod named;
pub mod resolve;
pub mod result;

pub use flags::{LookupFlags, TargetType};
pub use key::{LookupKey, LookupKeyEntry};
pub use named::{Candidates, NamedSymbols, is_specialization};
pub use result::{FailureReason, NameLookup, SymbolLookupResult};

pub(crate) use resolve::{MissingScopePolicy, symbol_lookup};
