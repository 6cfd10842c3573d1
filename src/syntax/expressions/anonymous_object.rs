use crate::syntax::expressions::Expr;
use serde::{Deserialize, Serialize};

/// `new { UserId = 5, TraceId = id, request.Path }`
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AnonymousObjectCreationExpression {
    pub initializers: Vec<AnonymousObjectMember>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AnonymousObjectMember {
    /// `None` for projection initializers (`request.Path`), where the
    /// property name is the final member name.
    pub name: Option<String>,
    pub value: Expr,
}

impl AnonymousObjectMember {
    /// Declared or projected property name, when one can be determined.
    pub fn effective_name(&self) -> Option<&str> {
        if let Some(n) = &self.name {
            return Some(n);
        }
        match &self.value.kind {
            crate::syntax::expressions::ExprKind::MemberAccess(ma) => Some(&ma.member),
            crate::syntax::expressions::ExprKind::Variable(id) => Some(id.simple_name()),
            _ => None,
        }
    }
}
