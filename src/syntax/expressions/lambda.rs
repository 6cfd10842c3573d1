use crate::syntax::expressions::Expr;
use crate::syntax::statements::Statement;
use crate::syntax::types::Type;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LambdaParameter {
    pub parameter_type: Option<Type>,
    pub name: String,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum LambdaBody {
    Expression(Box<Expr>),
    Block(Box<Statement>),
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LambdaExpression {
    pub parameters: Vec<LambdaParameter>,
    pub body: LambdaBody,
}
