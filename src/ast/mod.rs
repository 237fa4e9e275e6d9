//! Value types for parsed C++ declarations
//!
//! These are the shapes the declaration parser hands to the symbol tree.
//! They are immutable once built and compare structurally; anything that
//! needs a stable textual form (template lists, persisted keys) goes through
//! their `Display` implementations, which are deterministic.

mod declaration;
mod name;
mod template;

pub use declaration::{Declaration, DirectiveType, FunctionParam, ObjectType};
pub use name::{IdentOrOp, Identifier, NestedName, NestedNameElement, Operator};
pub use template::{
    TemplateArg, TemplateArgs, TemplateDeclarationPrefix, TemplateParam, TemplateParams,
};
