use crate::span::TextSpan;
use crate::syntax::expressions::Expr;
use crate::syntax::identifier::Identifier;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AttributeArgument {
    /// `Name = value` named-argument form.
    pub name: Option<String>,
    pub expr: Expr,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub name: Identifier,
    pub arguments: Vec<AttributeArgument>,
    pub span: TextSpan,
}

impl Attribute {
    pub fn positional(&self) -> impl Iterator<Item = &AttributeArgument> {
        self.arguments.iter().filter(|a| a.name.is_none())
    }

    pub fn named(&self, name: &str) -> Option<&AttributeArgument> {
        self.arguments
            .iter()
            .find(|a| a.name.as_deref() == Some(name))
    }
}

/// One bracketed group: `[A, B(1)]`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AttributeList {
    pub attributes: Vec<Attribute>,
}
