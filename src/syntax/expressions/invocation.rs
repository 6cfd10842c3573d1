use crate::syntax::expressions::Expr;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum ArgumentModifier {
    Ref,
    Out,
    In,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Argument {
    /// `name:` prefix for named arguments.
    pub name: Option<String>,
    pub modifier: Option<ArgumentModifier>,
    pub expr: Expr,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct InvocationExpression {
    /// The expression being called (variable, member access, generic name).
    pub callee: Expr,
    pub arguments: Vec<Argument>,
}
