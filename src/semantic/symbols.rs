use crate::span::TextSpan;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Canonical identity of a type within one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

/// A resolved type reference. `Named` args instantiate the symbol's type
/// parameters; `TypeParam` refers to an enclosing generic parameter by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    Named { symbol: SymbolId, args: Vec<TypeRef> },
    Array(Box<TypeRef>),
    Nullable(Box<TypeRef>),
    TypeParam(String),
    Error,
}

impl TypeRef {
    pub fn named(symbol: SymbolId) -> Self {
        TypeRef::Named {
            symbol,
            args: Vec::new(),
        }
    }

    pub fn generic(symbol: SymbolId, args: Vec<TypeRef>) -> Self {
        TypeRef::Named { symbol, args }
    }

    /// Nullable annotations stripped.
    pub fn strip_nullable(&self) -> &TypeRef {
        match self {
            TypeRef::Nullable(inner) => inner.strip_nullable(),
            other => other,
        }
    }

    /// Underlying symbol for named types, through nullable annotations.
    pub fn symbol(&self) -> Option<SymbolId> {
        match self.strip_nullable() {
            TypeRef::Named { symbol, .. } => Some(*symbol),
            _ => None,
        }
    }

    pub fn is_symbol(&self, id: SymbolId) -> bool {
        self.symbol() == Some(id)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TypeRef::Error)
    }

    /// Substitute type parameters by name.
    pub fn substitute(&self, map: &HashMap<String, TypeRef>) -> TypeRef {
        match self {
            TypeRef::Named { symbol, args } => TypeRef::Named {
                symbol: *symbol,
                args: args.iter().map(|a| a.substitute(map)).collect(),
            },
            TypeRef::Array(e) => TypeRef::Array(Box::new(e.substitute(map))),
            TypeRef::Nullable(e) => TypeRef::Nullable(Box::new(e.substitute(map))),
            TypeRef::TypeParam(name) => map.get(name).cloned().unwrap_or_else(|| self.clone()),
            TypeRef::Error => TypeRef::Error,
        }
    }
}

/// A compile-time constant value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstValue {
    Int(i64),
    Double(f64),
    Bool(bool),
    Str(String),
    Char(char),
    Null,
    Enum {
        ty: SymbolId,
        member: String,
        value: i64,
    },
}

impl ConstValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConstValue::Int(v) => Some(*v),
            ConstValue::Enum { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Int(v) => write!(f, "{v}"),
            ConstValue::Double(v) => write!(f, "{v}"),
            ConstValue::Bool(v) => write!(f, "{v}"),
            ConstValue::Str(s) => write!(f, "{s}"),
            ConstValue::Char(c) => write!(f, "{c}"),
            ConstValue::Null => f.write_str("null"),
            ConstValue::Enum { member, .. } => write!(f, "{member}"),
        }
    }
}

/// An attribute application, bound to its attribute class with arguments
/// reduced to constants where possible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundAttribute {
    pub class: Option<SymbolId>,
    /// Attribute name as written in source (no `Attribute` suffix added).
    pub name: String,
    pub args: Vec<BoundAttributeArg>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundAttributeArg {
    pub name: Option<String>,
    pub value: Option<ConstValue>,
    /// `typeof(T)` arguments resolve here.
    pub type_ref: Option<TypeRef>,
    pub text: String,
}

impl BoundAttribute {
    pub fn positional(&self) -> impl Iterator<Item = &BoundAttributeArg> {
        self.args.iter().filter(|a| a.name.is_none())
    }

    pub fn named(&self, name: &str) -> Option<&BoundAttributeArg> {
        self.args.iter().find(|a| a.name.as_deref() == Some(name))
    }
}

/// Where a user symbol was declared.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeclSite {
    pub tree: usize,
    pub name_span: TextSpan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSymbol {
    pub id: SymbolId,
    pub namespace: String,
    pub name: String,
    pub kind: TypeKind,
    pub type_params: Vec<String>,
    pub base_types: Vec<TypeRef>,
    pub is_static: bool,
    pub methods: Vec<MethodId>,
    pub properties: Vec<PropertyId>,
    pub fields: Vec<FieldId>,
    /// Display keyword for primitives (`int`, `string`, ...).
    #[serde(skip)]
    pub keyword: Option<&'static str>,
    pub attributes: Vec<BoundAttribute>,
}

impl TypeSymbol {
    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    /// `Ns.Name` without arity marker.
    pub fn fqn(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Lookup key: `Ns.Name` for non-generic, `` Ns.Name`N `` for generic.
    pub fn metadata_name(&self) -> String {
        let fqn = self.fqn();
        if self.type_params.is_empty() {
            fqn
        } else {
            format!("{}`{}", fqn, self.type_params.len())
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSymbol {
    pub name: String,
    pub ty: TypeRef,
    pub is_params: bool,
    pub is_this: bool,
    pub has_default: bool,
    pub attributes: Vec<BoundAttribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSymbol {
    pub id: MethodId,
    pub name: String,
    pub containing: SymbolId,
    pub type_params: Vec<String>,
    pub params: Vec<ParamSymbol>,
    pub return_type: TypeRef,
    pub is_static: bool,
    pub is_extension: bool,
    pub is_partial: bool,
    pub is_public: bool,
    pub attributes: Vec<BoundAttribute>,
    pub decl: Option<DeclSite>,
}

impl MethodSymbol {
    pub fn find_attribute(&self, class: SymbolId) -> Option<&BoundAttribute> {
        self.attributes.iter().find(|a| a.class == Some(class))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySymbol {
    pub id: PropertyId,
    pub name: String,
    pub containing: SymbolId,
    pub ty: TypeRef,
    pub is_static: bool,
    pub is_public: bool,
    pub has_getter: bool,
    pub attributes: Vec<BoundAttribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSymbol {
    pub id: FieldId,
    pub name: String,
    pub containing: SymbolId,
    pub ty: TypeRef,
    pub is_static: bool,
    pub is_const: bool,
    pub is_enum_member: bool,
    pub const_value: Option<ConstValue>,
}

/// Interned symbol arenas plus the metadata-name index.
#[derive(Debug, Default)]
pub struct SymbolStore {
    pub types: Vec<TypeSymbol>,
    pub methods: Vec<MethodSymbol>,
    pub properties: Vec<PropertySymbol>,
    pub fields: Vec<FieldSymbol>,
    pub by_metadata_name: HashMap<String, SymbolId>,
    /// Every namespace that contains at least one type, plus its prefixes.
    pub namespaces: HashSet<String>,
    /// Static classes that declare extension methods.
    pub extension_classes: Vec<SymbolId>,
}

impl SymbolStore {
    pub fn add_type(
        &mut self,
        namespace: &str,
        name: &str,
        kind: TypeKind,
        type_params: Vec<String>,
    ) -> SymbolId {
        let id = SymbolId(self.types.len() as u32);
        let symbol = TypeSymbol {
            id,
            namespace: namespace.to_string(),
            name: name.to_string(),
            kind,
            type_params,
            base_types: Vec::new(),
            is_static: false,
            methods: Vec::new(),
            properties: Vec::new(),
            fields: Vec::new(),
            keyword: None,
            attributes: Vec::new(),
        };
        let key = symbol.metadata_name();
        let mut ns = symbol.namespace.as_str();
        while !ns.is_empty() {
            self.namespaces.insert(ns.to_string());
            ns = ns.rfind('.').map(|i| &ns[..i]).unwrap_or("");
        }
        self.types.push(symbol);
        // First declaration wins; duplicates are ignored for lookup.
        self.by_metadata_name.entry(key).or_insert(id);
        id
    }

    pub fn add_method(&mut self, mut method: MethodSymbol) -> MethodId {
        let id = MethodId(self.methods.len() as u32);
        method.id = id;
        let containing = method.containing;
        self.methods.push(method);
        self.types[containing.0 as usize].methods.push(id);
        id
    }

    pub fn add_property(&mut self, mut property: PropertySymbol) -> PropertyId {
        let id = PropertyId(self.properties.len() as u32);
        property.id = id;
        let containing = property.containing;
        self.properties.push(property);
        self.types[containing.0 as usize].properties.push(id);
        id
    }

    pub fn add_field(&mut self, mut field: FieldSymbol) -> FieldId {
        let id = FieldId(self.fields.len() as u32);
        field.id = id;
        let containing = field.containing;
        self.fields.push(field);
        self.types[containing.0 as usize].fields.push(id);
        id
    }

    pub fn type_symbol(&self, id: SymbolId) -> &TypeSymbol {
        &self.types[id.0 as usize]
    }

    pub fn type_symbol_mut(&mut self, id: SymbolId) -> &mut TypeSymbol {
        &mut self.types[id.0 as usize]
    }

    pub fn method(&self, id: MethodId) -> &MethodSymbol {
        &self.methods[id.0 as usize]
    }

    pub fn property(&self, id: PropertyId) -> &PropertySymbol {
        &self.properties[id.0 as usize]
    }

    pub fn field(&self, id: FieldId) -> &FieldSymbol {
        &self.fields[id.0 as usize]
    }

    pub fn lookup(&self, metadata_name: &str) -> Option<SymbolId> {
        self.by_metadata_name.get(metadata_name).copied()
    }
}
