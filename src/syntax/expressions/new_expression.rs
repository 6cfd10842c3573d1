use crate::syntax::expressions::{Argument, Expr};
use crate::syntax::types::Type;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum ObjectInitializerEntry {
    /// `Prop = value`
    Property { name: String, value: Expr },
    /// `["key"] = value` (dictionary initializer)
    Indexer { indices: Vec<Expr>, value: Expr },
    /// A bare expression element inside a collection initializer.
    Expression(Expr),
    /// A braced element initializer: `{ "key", value }`.
    Element(Vec<Expr>),
}

/// `new T(args) { inits }`, including target-typed `new(args)`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct NewExpression {
    /// `None` for target-typed `new(...)`.
    pub target_type: Option<Type>,
    pub arguments: Vec<Argument>,
    pub initializer: Option<Vec<ObjectInitializerEntry>>,
}

/// `new T[] { ... }`, `new[] { ... }` or `new T[len]`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ArrayCreationExpression {
    /// `None` for implicitly typed `new[] { ... }`.
    pub element_type: Option<Type>,
    pub length: Option<Expr>,
    pub initializer: Option<Vec<Expr>>,
}
