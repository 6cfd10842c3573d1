use crate::syntax::expressions::Expr;
use crate::syntax::types::Type;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MemberAccessExpression {
    pub object: Expr,
    pub member: String,
    /// `Define<int, string>` carries explicit type arguments.
    pub type_args: Vec<Type>,
    /// `logger?.LogInformation(...)` style access.
    pub null_conditional: bool,
}
