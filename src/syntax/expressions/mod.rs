pub mod anonymous_object;
pub mod invocation;
pub mod lambda;
pub mod member_access;
pub mod new_expression;

pub use anonymous_object::{AnonymousObjectCreationExpression, AnonymousObjectMember};
pub use invocation::{Argument, ArgumentModifier, InvocationExpression};
pub use lambda::{LambdaBody, LambdaExpression, LambdaParameter};
pub use member_access::MemberAccessExpression;
pub use new_expression::{ArrayCreationExpression, NewExpression, ObjectInitializerEntry};

use crate::span::TextSpan;
use crate::syntax::identifier::Identifier;
use crate::syntax::literal::Literal;
use crate::syntax::types::Type;
use serde::{Deserialize, Serialize};

/// An expression together with its byte span in the source text.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: TextSpan,
}

impl Expr {
    pub fn new(kind: ExprKind, span: TextSpan) -> Self {
        Self { kind, span }
    }

    /// Source text of this expression.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum ExprKind {
    Literal(Literal),
    /// `$"..."`, kept opaque; never a compile-time constant.
    InterpolatedString(String),
    Variable(Identifier),
    /// `Name<T1, T2>` when followed by an argument list.
    GenericName {
        name: Identifier,
        type_args: Vec<Type>,
    },
    MemberAccess(Box<MemberAccessExpression>),
    Invocation(Box<InvocationExpression>),
    New(Box<NewExpression>),
    ArrayCreation(Box<ArrayCreationExpression>),
    AnonymousObject(AnonymousObjectCreationExpression),
    Lambda(Box<LambdaExpression>),
    Cast {
        target_type: Type,
        expr: Box<Expr>,
    },
    /// `default` or `default(T)`.
    Default(Option<Type>),
    Typeof(Type),
    Nameof(Box<Expr>),
    Conditional {
        condition: Box<Expr>,
        when_true: Box<Expr>,
        when_false: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOperator,
        expr: Box<Expr>,
    },
    Assignment {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Parenthesized(Box<Expr>),
    NullForgiving(Box<Expr>),
    Await(Box<Expr>),
    Indexing {
        target: Box<Expr>,
        indices: Vec<Expr>,
    },
    This,
    Base,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Coalesce,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Negate,
    Plus,
}
