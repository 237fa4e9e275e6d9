//! Symbol tree, lookup and merge engine for a documentation generator's C++ domain
// Debug macro for lookup tracing, gated on the tree's own trace switch
#[macro_export]
macro_rules! debug_print {
    ($tree:expr, $($arg:tt)*) => {
        if $tree.trace().debug_lookup {
            ::tracing::debug!(target: "cppsym::lookup", $($arg)*);
        }
    };
}

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod storage;
pub mod symbol;
pub mod types;

// Explicit exports for better API clarity
pub use config::Settings;
pub use diagnostics::Diagnostic;
pub use domain::{CppDomain, DeclaredSymbol};
pub use error::{SymbolError, SymbolResult};
pub use lookup::{FailureReason, LookupFlags, LookupKey, NameLookup, TargetType};
pub use storage::{SnapshotPersistence, SymbolSnapshot};
pub use symbol::{AddOutcome, Symbol, SymbolTree, TraceConfig};
pub use types::{CompactString, Location, SymbolId, compact_string};
