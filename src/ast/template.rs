use super::name::Identifier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a `template<...>` parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateParam {
    /// `typename`, `class`, or the type of a non-type parameter (`int`, `std::size_t`, ...)
    pub kind: Box<str>,
    pub name: Option<Identifier>,
    pub is_pack: bool,
}

impl TemplateParam {
    /// `typename T`
    pub fn type_param(name: &str) -> Self {
        Self {
            kind: "typename".into(),
            name: Some(Identifier::new(name)),
            is_pack: false,
        }
    }

    /// `typename... Ts`
    pub fn type_pack(name: &str) -> Self {
        Self {
            kind: "typename".into(),
            name: Some(Identifier::new(name)),
            is_pack: true,
        }
    }

    /// `int N`
    pub fn non_type(ty: &str, name: &str) -> Self {
        Self {
            kind: ty.into(),
            name: Some(Identifier::new(name)),
            is_pack: false,
        }
    }

    /// An unnamed parameter such as `typename`.
    pub fn unnamed(kind: &str) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            is_pack: false,
        }
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        self.name.as_ref()
    }
}

impl fmt::Display for TemplateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind)?;
        if self.is_pack {
            f.write_str("...")?;
        }
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateParams {
    pub params: Vec<TemplateParam>,
}

impl TemplateParams {
    pub fn new(params: Vec<TemplateParam>) -> Self {
        Self { params }
    }
}

impl fmt::Display for TemplateParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("template<")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p}")?;
        }
        f.write_str(">")
    }
}

/// A single template argument, kept in its source spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateArg(pub Box<str>);

impl TemplateArg {
    pub fn new(text: &str) -> Self {
        Self(text.trim().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateArgs {
    pub args: Vec<TemplateArg>,
}

impl TemplateArgs {
    pub fn new(args: Vec<TemplateArg>) -> Self {
        Self { args }
    }

    /// Convenience for tests and callers holding plain strings.
    pub fn from_strs(args: &[&str]) -> Self {
        Self::new(args.iter().map(|a| TemplateArg::new(a)).collect())
    }
}

impl fmt::Display for TemplateArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<")?;
        for (i, a) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{a}")?;
        }
        f.write_str(">")
    }
}

/// The `template<...>` headers preceding a declaration, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TemplateDeclarationPrefix {
    pub templates: Vec<TemplateParams>,
}

impl TemplateDeclarationPrefix {
    pub fn new(templates: Vec<TemplateParams>) -> Self {
        Self { templates }
    }
}

impl fmt::Display for TemplateDeclarationPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t) in self.templates.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{t}")?;
        }
        Ok(())
    }
}
