//! Symbols, compilation and the semantic model.
//!
//! A [`Compilation`](compilation::Compilation) owns the parsed syntax trees
//! plus an interned symbol store seeded with the core library types the
//! analyzed code references. Symbol identity is the [`SymbolId`] handle;
//! comparisons are by id, never by display name, so user code can shadow
//! well-known names without confusing the analysis.

pub mod binder;
pub mod compilation;
pub mod corlib;
pub mod declare;
pub mod symbols;

pub use binder::{BoundRef, ResolvedCall, SemanticModel};
pub use compilation::{Compilation, CompilationOptions, SyntaxTree};
pub use symbols::{
    BoundAttribute, BoundAttributeArg, ConstValue, FieldId, FieldSymbol, MethodId, MethodSymbol,
    ParamSymbol, PropertyId, PropertySymbol, SymbolId, TypeKind, TypeRef, TypeSymbol,
};
