pub mod attribute;
pub mod class_declaration;
pub mod member_declarations;
pub mod method_declaration;

pub use attribute::{Attribute, AttributeArgument, AttributeList};
pub use class_declaration::{ClassDeclaration, InterfaceDeclaration, TypeDeclaration, TypeKeyword};
pub use member_declarations::{
    ConstructorDeclaration, EnumDeclaration, EnumMember, FieldDeclaration, Member,
    PropertyAccessor, PropertyDeclaration,
};
pub use method_declaration::MethodDeclaration;

use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Internal,
    Static,
    Partial,
    Readonly,
    Const,
    Abstract,
    Sealed,
    Virtual,
    Override,
    Async,
    New,
}
