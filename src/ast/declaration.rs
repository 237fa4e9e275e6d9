use super::name::{IdentOrOp, NestedName};
use super::template::{TemplateDeclarationPrefix, TemplateParam};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// What kind of entity a declaration introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Class,
    Union,
    Function,
    Member,
    Type,
    Concept,
    Enum,
    Enumerator,
    TemplateParam,
    FunctionParam,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Union => "union",
            Self::Function => "function",
            Self::Member => "member",
            Self::Type => "type",
            Self::Concept => "concept",
            Self::Enum => "enum",
            Self::Enumerator => "enumerator",
            Self::TemplateParam => "templateParam",
            Self::FunctionParam => "functionParam",
        }
    }

    /// Template and function parameters are registered by the tree itself.
    pub fn is_parameter(&self) -> bool {
        matches!(self, Self::TemplateParam | Self::FunctionParam)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(Self::Class),
            "union" => Ok(Self::Union),
            "function" => Ok(Self::Function),
            "member" => Ok(Self::Member),
            "type" => Ok(Self::Type),
            "concept" => Ok(Self::Concept),
            "enum" => Ok(Self::Enum),
            "enumerator" => Ok(Self::Enumerator),
            "templateParam" => Ok(Self::TemplateParam),
            "functionParam" => Ok(Self::FunctionParam),
            _ => Err("Unknown object type"),
        }
    }
}

/// The directive a declaration was written with; used in diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectiveType {
    Class,
    Struct,
    Union,
    Function,
    Member,
    Var,
    Type,
    Concept,
    Enum,
    EnumStruct,
    EnumClass,
    Enumerator,
    TemplateParam,
    FunctionParam,
}

impl DirectiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Function => "function",
            Self::Member => "member",
            Self::Var => "var",
            Self::Type => "type",
            Self::Concept => "concept",
            Self::Enum => "enum",
            Self::EnumStruct => "enum-struct",
            Self::EnumClass => "enum-class",
            Self::Enumerator => "enumerator",
            Self::TemplateParam => "templateParam",
            Self::FunctionParam => "functionParam",
        }
    }
}

impl From<ObjectType> for DirectiveType {
    fn from(object_type: ObjectType) -> Self {
        match object_type {
            ObjectType::Class => Self::Class,
            ObjectType::Union => Self::Union,
            ObjectType::Function => Self::Function,
            ObjectType::Member => Self::Member,
            ObjectType::Type => Self::Type,
            ObjectType::Concept => Self::Concept,
            ObjectType::Enum => Self::Enum,
            ObjectType::Enumerator => Self::Enumerator,
            ObjectType::TemplateParam => Self::TemplateParam,
            ObjectType::FunctionParam => Self::FunctionParam,
        }
    }
}

impl fmt::Display for DirectiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function parameter. Only named parameters become symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionParam {
    pub name: Option<NestedName>,
    /// The parameter's type as written, e.g. `const std::string&`.
    pub type_text: Box<str>,
}

impl FunctionParam {
    pub fn new(type_text: &str, name: Option<&str>) -> Self {
        Self {
            name: name.map(|n| NestedName::single(IdentOrOp::ident(n))),
            type_text: type_text.trim().into(),
        }
    }
}

impl fmt::Display for FunctionParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_text)?;
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        Ok(())
    }
}

/// A parsed declaration as produced by the declaration parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Declaration {
    pub object_type: ObjectType,
    pub directive_type: DirectiveType,
    pub name: NestedName,
    pub template_prefix: Option<TemplateDeclarationPrefix>,
    pub function_params: Option<Vec<FunctionParam>>,
    /// Anything that distinguishes the signature after the parameter list
    /// (cv/ref qualifiers, `noexcept`, return type for conversion functions).
    /// For parameter declarations this holds the parameter text.
    pub trailing: Box<str>,
}

impl Declaration {
    pub fn new(object_type: ObjectType, name: NestedName) -> Self {
        Self {
            object_type,
            directive_type: object_type.into(),
            name,
            template_prefix: None,
            function_params: if object_type == ObjectType::Function {
                Some(Vec::new())
            } else {
                None
            },
            trailing: "".into(),
        }
    }

    pub fn with_directive(mut self, directive_type: DirectiveType) -> Self {
        self.directive_type = directive_type;
        self
    }

    pub fn with_template_prefix(mut self, prefix: TemplateDeclarationPrefix) -> Self {
        self.template_prefix = Some(prefix);
        self
    }

    pub fn with_function_params(mut self, params: Vec<FunctionParam>) -> Self {
        self.function_params = Some(params);
        self
    }

    pub fn with_trailing(mut self, trailing: &str) -> Self {
        self.trailing = trailing.trim().into();
        self
    }

    /// Synthetic declaration for a named template parameter.
    pub fn template_param(param: &TemplateParam) -> Option<Self> {
        let ident = param.identifier()?;
        let mut decl = Self::new(
            ObjectType::TemplateParam,
            NestedName::single(IdentOrOp::Identifier(ident.clone())),
        );
        decl.trailing = param.to_string().into();
        Some(decl)
    }

    /// Synthetic declaration for a named function parameter.
    pub fn function_param(param: &FunctionParam) -> Option<Self> {
        let name = param.name.clone()?;
        let mut decl = Self::new(ObjectType::FunctionParam, name);
        decl.trailing = param.to_string().into();
        Some(decl)
    }

    /// Deterministic signature used to tell overloads apart and to persist references.
    ///
    /// Only the last name component takes part: ids are compared between
    /// children of one scope, so the qualification the declaration was written
    /// with must not matter. Parameter names do not take part either.
    pub fn stable_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.object_type.as_str().as_bytes());
        hasher.update(b"\0");
        if let Some(prefix) = &self.template_prefix {
            hasher.update(prefix.to_string().as_bytes());
        }
        hasher.update(b"\0");
        if let Some(last) = self.name.last() {
            hasher.update(last.to_string().as_bytes());
        }
        hasher.update(b"\0");
        if let Some(params) = &self.function_params {
            for p in params {
                hasher.update(p.type_text.as_bytes());
                hasher.update(b",");
            }
        }
        hasher.update(b"\0");
        hasher.update(self.trailing.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.object_type.is_parameter() {
            return f.write_str(&self.trailing);
        }
        if let Some(prefix) = &self.template_prefix {
            write!(f, "{prefix} ")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(params) = &self.function_params {
            f.write_str("(")?;
            for (i, p) in params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{p}")?;
            }
            f.write_str(")")?;
        }
        if !self.trailing.is_empty() {
            write!(f, " {}", self.trailing)?;
        }
        Ok(())
    }
}
