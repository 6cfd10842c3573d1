use crate::span::TextSpan;
use crate::syntax::declarations::{AttributeList, MethodDeclaration, Modifier, TypeDeclaration};
use crate::syntax::expressions::Expr;
use crate::syntax::statements::Statement;
use crate::syntax::types::{Parameter, Type};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub attributes: Vec<AttributeList>,
    pub modifiers: Vec<Modifier>,
    pub field_type: Type,
    pub name: String,
    pub initializer: Option<Expr>,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum PropertyAccessor {
    Get,
    Set,
    Init,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    pub attributes: Vec<AttributeList>,
    pub modifiers: Vec<Modifier>,
    pub property_type: Type,
    pub name: String,
    pub accessors: Vec<PropertyAccessor>,
    pub initializer: Option<Expr>,
}

impl PropertyDeclaration {
    pub fn has_getter(&self) -> bool {
        self.accessors.contains(&PropertyAccessor::Get)
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ConstructorDeclaration {
    pub attributes: Vec<AttributeList>,
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub body: Option<Statement>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: Option<Expr>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct EnumDeclaration {
    pub attributes: Vec<AttributeList>,
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Member {
    Method(MethodDeclaration),
    Constructor(ConstructorDeclaration),
    Field(FieldDeclaration),
    Property(PropertyDeclaration),
    NestedType(TypeDeclaration),
}

impl Member {
    pub fn name_span(&self) -> Option<TextSpan> {
        match self {
            Member::Method(m) => Some(m.name_span),
            _ => None,
        }
    }
}
