use crate::syntax::declarations::{AttributeList, EnumDeclaration, Member, Modifier};
use crate::syntax::types::Type;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum TypeKeyword {
    Class,
    Struct,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ClassDeclaration {
    pub attributes: Vec<AttributeList>,
    pub modifiers: Vec<Modifier>,
    pub keyword: TypeKeyword,
    pub name: String,
    pub type_parameters: Vec<String>,
    pub base_types: Vec<Type>,
    pub members: Vec<Member>,
}

impl ClassDeclaration {
    pub fn has_modifier(&self, m: Modifier) -> bool {
        self.modifiers.contains(&m)
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct InterfaceDeclaration {
    pub attributes: Vec<AttributeList>,
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub type_parameters: Vec<String>,
    pub base_types: Vec<Type>,
    pub members: Vec<Member>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum TypeDeclaration {
    Class(ClassDeclaration),
    Interface(InterfaceDeclaration),
    Enum(EnumDeclaration),
}

impl TypeDeclaration {
    pub fn name(&self) -> &str {
        match self {
            TypeDeclaration::Class(c) => &c.name,
            TypeDeclaration::Interface(i) => &i.name,
            TypeDeclaration::Enum(e) => &e.name,
        }
    }
}
