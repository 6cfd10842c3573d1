use crate::syntax::declarations::TypeDeclaration;
use crate::syntax::identifier::Identifier;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct UsingDirective {
    pub namespace: Identifier,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct NamespaceDeclaration {
    pub name: Identifier,
    pub usings: Vec<UsingDirective>,
    pub types: Vec<TypeDeclaration>,
    /// `namespace N;` file-scoped form.
    pub file_scoped: bool,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum TopLevelMember {
    Namespace(NamespaceDeclaration),
    Type(TypeDeclaration),
}

/// Root node of one parsed source file.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct CompilationUnit {
    pub usings: Vec<UsingDirective>,
    pub members: Vec<TopLevelMember>,
}
