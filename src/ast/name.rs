use super::template::{TemplateArg, TemplateArgs};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A plain identifier. Anonymous entities are spelled with a leading `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier(pub Box<str>);

impl Identifier {
    pub fn new(name: &str) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_anon(&self) -> bool {
        self.0.starts_with('@')
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An operator name such as `operator==` or `operator()`; stores the part after `operator`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operator(pub Box<str>);

impl Operator {
    pub fn new(op: &str) -> Self {
        Self(op.trim().into())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = &*self.0;
        // conversion operators and keyword operators need a space
        if op.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
            write!(f, "operator {op}")
        } else {
            write!(f, "operator{op}")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentOrOp {
    Identifier(Identifier),
    Operator(Operator),
}

impl IdentOrOp {
    pub fn ident(name: &str) -> Self {
        Self::Identifier(Identifier::new(name))
    }

    pub fn operator(op: &str) -> Self {
        Self::Operator(Operator::new(op))
    }

    pub fn is_anon(&self) -> bool {
        matches!(self, Self::Identifier(id) if id.is_anon())
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, Self::Operator(_))
    }
}

impl fmt::Display for IdentOrOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(id) => id.fmt(f),
            Self::Operator(op) => op.fmt(f),
        }
    }
}

/// One `::`-separated component of a nested name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NestedNameElement {
    pub ident_or_op: IdentOrOp,
    pub template_args: Option<TemplateArgs>,
}

impl NestedNameElement {
    pub fn new(ident_or_op: IdentOrOp, template_args: Option<TemplateArgs>) -> Self {
        Self {
            ident_or_op,
            template_args,
        }
    }

    pub fn is_operator(&self) -> bool {
        self.ident_or_op.is_operator()
    }
}

impl fmt::Display for NestedNameElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ident_or_op)?;
        if let Some(args) = &self.template_args {
            write!(f, "{args}")?;
        }
        Ok(())
    }
}

/// A possibly qualified, possibly templated name such as `::N::A<T>::f`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NestedName {
    pub names: Vec<NestedNameElement>,
    /// Whether each element was written with the `template` disambiguator.
    pub templates: Vec<bool>,
    pub rooted: bool,
}

impl NestedName {
    pub fn new(names: Vec<NestedNameElement>, rooted: bool) -> Self {
        let templates = vec![false; names.len()];
        Self {
            names,
            templates,
            rooted,
        }
    }

    /// A single unqualified identifier.
    pub fn single(ident_or_op: IdentOrOp) -> Self {
        Self::new(vec![NestedNameElement::new(ident_or_op, None)], false)
    }

    /// Number of non-operator elements carrying template arguments.
    pub fn num_templates(&self) -> usize {
        self.names
            .iter()
            .filter(|n| !n.is_operator() && n.template_args.is_some())
            .count()
    }

    pub fn last(&self) -> Option<&NestedNameElement> {
        self.names.last()
    }

    /// Parse a reference target such as `N::A<int, T...>::f` or `::operator==`.
    ///
    /// This is the small subset of name syntax that cross-reference targets use;
    /// it returns `None` for empty components or unbalanced angle brackets.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (rooted, rest) = match text.strip_prefix("::") {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let mut names = Vec::new();
        for part in split_top_level(rest, "::")? {
            names.push(parse_element(part.trim())?);
        }
        if names.is_empty() {
            return None;
        }
        Some(Self::new(names, rooted))
    }
}

impl fmt::Display for NestedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rooted {
            f.write_str("::")?;
        }
        for (i, name) in self.names.iter().enumerate() {
            if i > 0 {
                f.write_str("::")?;
            }
            if self.templates.get(i).copied().unwrap_or(false) {
                f.write_str("template ")?;
            }
            write!(f, "{name}")?;
        }
        Ok(())
    }
}

fn parse_element(part: &str) -> Option<NestedNameElement> {
    if part.is_empty() {
        return None;
    }
    if starts_with_operator_keyword(part.as_bytes()) {
        let op = part["operator".len()..].trim();
        if op.is_empty() {
            return None;
        }
        return Some(NestedNameElement::new(IdentOrOp::operator(op), None));
    }

    match part.find('<') {
        None => Some(NestedNameElement::new(IdentOrOp::ident(part), None)),
        Some(open) => {
            let inner = part[open + 1..].strip_suffix('>')?;
            let ident = part[..open].trim();
            if ident.is_empty() {
                return None;
            }
            let args = split_top_level(inner, ",")?
                .into_iter()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(TemplateArg::new)
                .collect();
            Some(NestedNameElement::new(
                IdentOrOp::ident(ident),
                Some(TemplateArgs::new(args)),
            ))
        }
    }
}

/// `operator` as a keyword, not as the start of an identifier like `operators`.
fn starts_with_operator_keyword(bytes: &[u8]) -> bool {
    let Some(rest) = bytes.strip_prefix(b"operator") else {
        return false;
    };
    // any non-ASCII byte belongs to an identifier character
    rest.first()
        .is_none_or(|&b| !(b.is_ascii_alphanumeric() || b == b'_' || !b.is_ascii()))
}

/// Split on `sep` where it occurs outside any `<...>` / `(...)` nesting.
///
/// `sep` must be ASCII; the scan is bytewise, so every split point falls on a
/// char boundary.
fn split_top_level<'a>(text: &'a str, sep: &str) -> Option<Vec<&'a str>> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    let bytes = text.as_bytes();
    let sep = sep.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        // operator names may contain unbalanced brackets (`operator<`, `operator->`)
        if depth == 0
            && (i == 0 || bytes[i - 1] == b':')
            && starts_with_operator_keyword(&bytes[i..])
        {
            match bytes[i..].windows(sep.len()).position(|w| w == sep) {
                Some(offset) => i += offset,
                None => break,
            }
            continue;
        }
        match bytes[i] {
            b'<' | b'(' => depth += 1,
            b'>' | b')' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            _ if depth == 0 && bytes[i..].starts_with(sep) => {
                parts.push(&text[start..i]);
                i += sep.len();
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    if depth != 0 {
        return None;
    }
    parts.push(&text[start..]);
    Some(parts)
}
