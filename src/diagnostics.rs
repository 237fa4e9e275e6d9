//! Non-fatal findings produced while inserting and merging declarations.
//!
//! These never abort a build. They are returned to the caller and also
//! emitted as `warn` events when raised.

use crate::ast::DirectiveType;
use crate::types::Location;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The same entity was declared twice.
    DuplicateDeclaration {
        /// Rendering of the declaration that was kept
        declaration: String,
        directive: DirectiveType,
        /// Where the kept declaration lives
        existing: Location,
        /// Where the rejected one was written; warnings are attributed here
        duplicate: Location,
    },
    /// Both trees held a declaration for the same node from the same document.
    MergeInconsistency {
        ours: String,
        theirs: String,
        location: Location,
    },
}

impl Diagnostic {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateDeclaration { .. } => "duplicate_declaration",
            Self::MergeInconsistency { .. } => "merge_inconsistency",
        }
    }

    /// Where the diagnostic should be reported.
    pub fn location(&self) -> &Location {
        match self {
            Self::DuplicateDeclaration { duplicate, .. } => duplicate,
            Self::MergeInconsistency { location, .. } => location,
        }
    }

    pub(crate) fn emit(&self) {
        let location = self.location();
        tracing::warn!(
            target: "cppsym::diagnostics",
            kind = self.kind(),
            docname = %location.docname,
            line = location.line,
            "{self}"
        );
    }

    pub(crate) fn raise(self) -> Self {
        self.emit();
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateDeclaration {
                declaration,
                directive,
                existing,
                ..
            } => write!(
                f,
                "Duplicate C++ declaration, also defined at {existing}.\nDeclaration is '.. cpp:{directive}:: {declaration}'."
            ),
            Self::MergeInconsistency { ours, theirs, .. } => write!(
                f,
                "Internal C++ domain error during symbol merging.\nours: {ours}\ntheirs: {theirs}"
            ),
        }
    }
}
