use crate::span::TextSpan;
use crate::syntax::declarations::{AttributeList, Modifier};
use crate::syntax::expressions::Expr;
use crate::syntax::statements::Statement;
use crate::syntax::types::{Parameter, Type};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub attributes: Vec<AttributeList>,
    pub modifiers: Vec<Modifier>,
    pub return_type: Type,
    pub name: String,
    /// Span of the method name token, used for locations.
    pub name_span: TextSpan,
    pub type_parameters: Vec<String>,
    pub parameters: Vec<Parameter>,
    /// `None` for bodiless declarations (`partial`, interface members).
    pub body: Option<Statement>,
    /// `=> expr` bodies.
    pub expression_body: Option<Expr>,
}

impl MethodDeclaration {
    pub fn has_modifier(&self, m: Modifier) -> bool {
        self.modifiers.contains(&m)
    }

    pub fn is_partial(&self) -> bool {
        self.has_modifier(Modifier::Partial)
    }

    pub fn is_static(&self) -> bool {
        self.has_modifier(Modifier::Static)
    }
}
