use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Strictness switches for named-symbol and qualified lookup
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LookupFlags: u8 {
        /// Accept a templated candidate when the query has no template parameters
        const TEMPLATE_SHORTHAND = 0b0000_0001;
        /// The scope the search starts from is itself a candidate
        const MATCH_SELF = 0b0000_0010;
        /// Members of anonymous children count as members of the scope
        const RECURSE_IN_ANON = 0b0000_0100;
        /// Continue through the sibling chain of the starting scope
        const SEARCH_IN_SIBLINGS = 0b0000_1000;
        /// Drop template arguments that merely restate the parameter list
        const CORRECT_PRIMARY_TEMPLATE_ARGS = 0b0001_0000;
    }
}

impl LookupFlags {
    /// Flags used when resolving cross-references while rendering.
    pub const REFERENCE: Self = Self::TEMPLATE_SHORTHAND
        .union(Self::MATCH_SELF)
        .union(Self::RECURSE_IN_ANON)
        .union(Self::SEARCH_IN_SIBLINGS);
}

/// Role a reference expects its target to play.
///
/// Only [`TargetType::Class`] changes how qualified lookup walks scopes; the
/// rest are carried for the caller's own filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetType {
    #[default]
    Any,
    Class,
    Union,
    Function,
    Member,
    Type,
    Concept,
    Enum,
    Enumerator,
    Identifier,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Class => "class",
            Self::Union => "union",
            Self::Function => "function",
            Self::Member => "member",
            Self::Type => "type",
            Self::Concept => "concept",
            Self::Enum => "enum",
            Self::Enumerator => "enumerator",
            Self::Identifier => "identifier",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Self::Any),
            "class" | "struct" => Ok(Self::Class),
            "union" => Ok(Self::Union),
            "func" | "function" => Ok(Self::Function),
            "member" | "var" => Ok(Self::Member),
            "type" => Ok(Self::Type),
            "concept" => Ok(Self::Concept),
            "enum" => Ok(Self::Enum),
            "enumerator" => Ok(Self::Enumerator),
            "identifier" => Ok(Self::Identifier),
            _ => Err("Unknown reference target type"),
        }
    }
}
