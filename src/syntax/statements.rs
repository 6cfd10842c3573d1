use crate::syntax::expressions::Expr;
use crate::syntax::types::Type;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct VariableDeclarator {
    pub name: String,
    pub initializer: Option<Expr>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LocalDeclaration {
    pub is_const: bool,
    /// `using var x = ...;` declaration form.
    pub is_using: bool,
    pub declared_type: Type,
    pub declarators: Vec<VariableDeclarator>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum UsingResource {
    Declaration(LocalDeclaration),
    Expression(Expr),
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CatchClause {
    pub exception_type: Option<Type>,
    pub name: Option<String>,
    pub body: Statement,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Statement {
    Block(Vec<Statement>),
    LocalDeclaration(LocalDeclaration),
    Expression(Expr),
    If {
        condition: Expr,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    While {
        condition: Expr,
        body: Box<Statement>,
    },
    Do {
        body: Box<Statement>,
        condition: Expr,
    },
    For {
        initializer: Option<Box<Statement>>,
        condition: Option<Expr>,
        iterators: Vec<Expr>,
        body: Box<Statement>,
    },
    Foreach {
        element_type: Type,
        name: String,
        collection: Expr,
        body: Box<Statement>,
    },
    Using {
        resource: UsingResource,
        body: Box<Statement>,
    },
    Try {
        body: Box<Statement>,
        catches: Vec<CatchClause>,
        finally_block: Option<Box<Statement>>,
    },
    Return(Option<Expr>),
    Throw(Option<Expr>),
    Break,
    Continue,
    Empty,
}
