//! Declaration pass: registers user namespaces, types and members into the
//! symbol store, resolves signatures, and binds attributes to constants.

use crate::semantic::compilation::SyntaxTree;
use crate::semantic::corlib::Corlib;
use crate::semantic::symbols::{
    BoundAttribute, BoundAttributeArg, ConstValue, DeclSite, FieldId, FieldSymbol, MethodId,
    MethodSymbol, ParamSymbol, PropertyId, PropertySymbol, SymbolId, SymbolStore, TypeKind,
    TypeRef,
};
use crate::span::TextSpan;
use crate::syntax::declarations::{
    Attribute, AttributeList, EnumDeclaration, Member, Modifier, TypeDeclaration,
};
use crate::syntax::expressions::{BinaryOperator, Expr, ExprKind, UnaryOperator};
use crate::syntax::identifier::Identifier;
use crate::syntax::literal::Literal;
use crate::syntax::types::{Parameter, ParameterModifier, PrimitiveType, Type};
use crate::syntax::unit::TopLevelMember;
use std::collections::HashMap;

/// Resolves syntactic types against the symbol store, honoring the
/// namespace chain, using directives and in-scope type parameters.
pub(crate) struct TypeResolver<'a> {
    pub store: &'a SymbolStore,
    pub corlib: &'a Corlib,
    pub namespace: String,
    pub usings: Vec<String>,
    pub type_params: Vec<String>,
}

impl<'a> TypeResolver<'a> {
    pub fn primitive(&self, p: PrimitiveType) -> SymbolId {
        let c = self.corlib;
        match p {
            PrimitiveType::Object => c.object,
            PrimitiveType::String => c.string_,
            PrimitiveType::Bool => c.bool_,
            PrimitiveType::Char => c.char_,
            PrimitiveType::Byte => c.byte,
            PrimitiveType::SByte => c.sbyte,
            PrimitiveType::Short => c.int16,
            PrimitiveType::UShort => c.uint16,
            PrimitiveType::Int => c.int32,
            PrimitiveType::UInt => c.uint32,
            PrimitiveType::Long => c.int64,
            PrimitiveType::ULong => c.uint64,
            PrimitiveType::Float => c.float,
            PrimitiveType::Double => c.double,
            PrimitiveType::Decimal => c.decimal,
        }
    }

    /// Innermost-first namespace scopes, ending with the global namespace.
    fn namespace_chain(&self) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = self.namespace.as_str();
        loop {
            chain.push(current.to_string());
            match current.rfind('.') {
                Some(idx) => current = &current[..idx],
                None => break,
            }
        }
        if !self.namespace.is_empty() {
            chain.push(String::new());
        }
        chain
    }

    /// Resolve a possibly-qualified name with the given generic arity.
    /// Scoped declarations shadow using-directive imports.
    pub fn resolve_named(&self, name: &str, arity: usize) -> Option<SymbolId> {
        let key = |scope: &str| {
            let qualified = if scope.is_empty() {
                name.to_string()
            } else {
                format!("{scope}.{name}")
            };
            if arity == 0 {
                qualified
            } else {
                format!("{qualified}`{arity}")
            }
        };
        for scope in self.namespace_chain() {
            if let Some(id) = self.store.lookup(&key(&scope)) {
                return Some(id);
            }
        }
        for using in &self.usings {
            if let Some(id) = self.store.lookup(&key(using)) {
                return Some(id);
            }
        }
        None
    }

    pub fn resolve(&self, ty: &Type) -> TypeRef {
        match ty {
            Type::Primitive(p) => TypeRef::named(self.primitive(*p)),
            Type::Void => TypeRef::named(self.corlib.void_),
            Type::Var | Type::ImplicitArray => TypeRef::Error,
            Type::Nullable(inner) => TypeRef::Nullable(Box::new(self.resolve(inner))),
            Type::Array { element_type, .. } => {
                TypeRef::Array(Box::new(self.resolve(element_type)))
            }
            Type::Reference(id) => {
                if let Identifier::Simple(name) = id {
                    if self.type_params.iter().any(|p| p == name) {
                        return TypeRef::TypeParam(name.clone());
                    }
                }
                match self.resolve_named(&id.to_string(), 0) {
                    Some(symbol) => TypeRef::named(symbol),
                    None => TypeRef::Error,
                }
            }
            Type::Generic { base, args } => {
                let resolved_args: Vec<TypeRef> = args.iter().map(|a| self.resolve(a)).collect();
                match self.resolve_named(&base.to_string(), args.len()) {
                    Some(symbol) => TypeRef::generic(symbol, resolved_args),
                    None => TypeRef::Error,
                }
            }
        }
    }
}

struct PendingType {
    id: SymbolId,
    tree: usize,
    namespace: String,
    usings: Vec<String>,
    decl: TypeDeclaration,
}

/// Register all user declarations from the parsed trees.
/// Returns the `(tree, method name span) -> method` index used by the
/// semantic model to map declarations back to symbols.
pub(crate) fn declare_units(
    store: &mut SymbolStore,
    corlib: &Corlib,
    trees: &[SyntaxTree],
) -> HashMap<(usize, TextSpan), MethodId> {
    let mut pending: Vec<PendingType> = Vec::new();

    for (tree_idx, tree) in trees.iter().enumerate() {
        let file_usings: Vec<String> = tree
            .root
            .usings
            .iter()
            .map(|u| u.namespace.to_string())
            .collect();
        for member in &tree.root.members {
            match member {
                TopLevelMember::Namespace(ns) => {
                    let mut usings = file_usings.clone();
                    usings.extend(ns.usings.iter().map(|u| u.namespace.to_string()));
                    for ty in &ns.types {
                        collect_type(store, &mut pending, tree_idx, &ns.name.to_string(), &usings, ty);
                    }
                }
                TopLevelMember::Type(ty) => {
                    collect_type(store, &mut pending, tree_idx, "", &file_usings, ty);
                }
            }
        }
    }

    // Enum constants first: attribute arguments and const fields use them.
    for p in &pending {
        if let TypeDeclaration::Enum(e) = &p.decl {
            declare_enum_members(store, p.id, e);
        }
    }

    // Field signatures next, so const fields are visible to attribute
    // binding and to each other.
    let mut const_inits: Vec<(FieldId, usize, Expr)> = Vec::new();
    for (p_idx, p) in pending.iter().enumerate() {
        let members = match &p.decl {
            TypeDeclaration::Class(c) => &c.members,
            TypeDeclaration::Interface(i) => &i.members,
            TypeDeclaration::Enum(_) => continue,
        };
        let resolver = resolver_for(store, corlib, p, &[]);
        let mut new_fields = Vec::new();
        for member in members {
            if let Member::Field(f) = member {
                let ty = resolver.resolve(&f.field_type);
                let is_const = f.modifiers.contains(&Modifier::Const);
                new_fields.push((
                    FieldSymbol {
                        id: FieldId(0),
                        name: f.name.clone(),
                        containing: p.id,
                        ty,
                        is_static: f.modifiers.contains(&Modifier::Static) || is_const,
                        is_const,
                        is_enum_member: false,
                        const_value: None,
                    },
                    f.initializer.clone(),
                ));
            }
        }
        for (field, init) in new_fields {
            let is_const = field.is_const;
            let id = store.add_field(field);
            if is_const {
                if let Some(init) = init {
                    const_inits.push((id, p_idx, init));
                }
            }
        }
    }

    // Two rounds so const fields may reference each other across files.
    for _ in 0..2 {
        let mut resolved: Vec<(FieldId, ConstValue)> = Vec::new();
        for (field_id, p_idx, init) in &const_inits {
            if store.field(*field_id).const_value.is_some() {
                continue;
            }
            let p = &pending[*p_idx];
            let resolver = resolver_for(store, corlib, p, &[]);
            if let Some(value) = eval_const_expr(store, &resolver, init) {
                resolved.push((*field_id, value));
            }
        }
        if resolved.is_empty() {
            break;
        }
        for (field_id, value) in resolved {
            store.fields[field_id.0 as usize].const_value = Some(value);
        }
    }

    // Base types first, so attribute-class checks can walk inheritance
    // even when the attribute class is declared later in the pass.
    for p in &pending {
        let (type_params, modifiers) = match &p.decl {
            TypeDeclaration::Class(c) => (c.type_parameters.clone(), c.modifiers.clone()),
            TypeDeclaration::Interface(i) => (i.type_parameters.clone(), i.modifiers.clone()),
            TypeDeclaration::Enum(_) => continue,
        };
        let resolver = resolver_for(store, corlib, p, &type_params);
        let bases = match &p.decl {
            TypeDeclaration::Class(c) => c.base_types.iter().map(|b| resolver.resolve(b)).collect(),
            TypeDeclaration::Interface(i) => {
                i.base_types.iter().map(|b| resolver.resolve(b)).collect()
            }
            TypeDeclaration::Enum(_) => Vec::new(),
        };
        let is_static = modifiers.contains(&Modifier::Static);
        let sym = store.type_symbol_mut(p.id);
        sym.base_types = bases;
        sym.is_static = is_static;
    }

    // Methods, properties and attributes.
    let mut method_index: HashMap<(usize, TextSpan), MethodId> = HashMap::new();
    for p in &pending {
        let (members, type_params, attribute_lists, is_interface) = match &p.decl {
            TypeDeclaration::Class(c) => (
                &c.members,
                c.type_parameters.clone(),
                c.attributes.clone(),
                false,
            ),
            TypeDeclaration::Interface(i) => (
                &i.members,
                i.type_parameters.clone(),
                i.attributes.clone(),
                true,
            ),
            TypeDeclaration::Enum(_) => continue,
        };
        let tree = &trees[p.tree];

        {
            let resolver = resolver_for(store, corlib, p, &type_params);
            let type_attrs = bind_attribute_lists(store, &resolver, tree, &attribute_lists);
            store.type_symbol_mut(p.id).attributes = type_attrs;
        }

        let mut new_methods: Vec<(MethodSymbol, TextSpan)> = Vec::new();
        let mut new_properties: Vec<PropertySymbol> = Vec::new();
        for member in members {
            match member {
                Member::Method(m) => {
                    let mut all_params = type_params.clone();
                    all_params.extend(m.type_parameters.clone());
                    let resolver = resolver_for(store, corlib, p, &all_params);
                    let params: Vec<ParamSymbol> = m
                        .parameters
                        .iter()
                        .map(|param| bind_parameter(store, &resolver, tree, param))
                        .collect();
                    let is_static = m.modifiers.contains(&Modifier::Static);
                    let is_extension = is_static
                        && params.first().map(|pr| pr.is_this).unwrap_or(false);
                    new_methods.push((
                        MethodSymbol {
                            id: MethodId(0),
                            name: m.name.clone(),
                            containing: p.id,
                            type_params: m.type_parameters.clone(),
                            params,
                            return_type: resolver.resolve(&m.return_type),
                            is_static,
                            is_extension,
                            is_partial: m.modifiers.contains(&Modifier::Partial),
                            is_public: m.modifiers.contains(&Modifier::Public) || is_interface,
                            attributes: bind_attribute_lists(store, &resolver, tree, &m.attributes),
                            decl: Some(DeclSite {
                                tree: p.tree,
                                name_span: m.name_span,
                            }),
                        },
                        m.name_span,
                    ));
                }
                Member::Property(prop) => {
                    let resolver = resolver_for(store, corlib, p, &type_params);
                    new_properties.push(PropertySymbol {
                        id: PropertyId(0),
                        name: prop.name.clone(),
                        containing: p.id,
                        ty: resolver.resolve(&prop.property_type),
                        is_static: prop.modifiers.contains(&Modifier::Static),
                        is_public: prop.modifiers.contains(&Modifier::Public) || is_interface,
                        has_getter: prop.has_getter() || prop.accessors.is_empty(),
                        attributes: bind_attribute_lists(store, &resolver, tree, &prop.attributes),
                    });
                }
                _ => {}
            }
        }
        for (method, name_span) in new_methods {
            let is_extension = method.is_extension;
            let containing = method.containing;
            let id = store.add_method(method);
            method_index.insert((p.tree, name_span), id);
            if is_extension && !store.extension_classes.contains(&containing) {
                store.extension_classes.push(containing);
            }
        }
        for property in new_properties {
            store.add_property(property);
        }
    }

    method_index
}

fn resolver_for<'a>(
    store: &'a SymbolStore,
    corlib: &'a Corlib,
    p: &PendingType,
    type_params: &[String],
) -> TypeResolver<'a> {
    TypeResolver {
        store,
        corlib,
        namespace: p.namespace.clone(),
        usings: p.usings.clone(),
        type_params: type_params.to_vec(),
    }
}

fn collect_type(
    store: &mut SymbolStore,
    pending: &mut Vec<PendingType>,
    tree: usize,
    namespace: &str,
    usings: &[String],
    decl: &TypeDeclaration,
) {
    let kind = match decl {
        TypeDeclaration::Class(c) => match c.keyword {
            crate::syntax::declarations::TypeKeyword::Class => TypeKind::Class,
            crate::syntax::declarations::TypeKeyword::Struct => TypeKind::Struct,
        },
        TypeDeclaration::Interface(_) => TypeKind::Interface,
        TypeDeclaration::Enum(_) => TypeKind::Enum,
    };
    let type_params = match decl {
        TypeDeclaration::Class(c) => c.type_parameters.clone(),
        TypeDeclaration::Interface(i) => i.type_parameters.clone(),
        TypeDeclaration::Enum(_) => Vec::new(),
    };
    let id = store.add_type(namespace, decl.name(), kind, type_params);
    pending.push(PendingType {
        id,
        tree,
        namespace: namespace.to_string(),
        usings: usings.to_vec(),
        decl: decl.clone(),
    });

    // Nested types live under `Ns.Outer`.
    if let TypeDeclaration::Class(c) = decl {
        let nested_ns = if namespace.is_empty() {
            c.name.clone()
        } else {
            format!("{namespace}.{}", c.name)
        };
        for member in &c.members {
            if let Member::NestedType(nested) = member {
                collect_type(store, pending, tree, &nested_ns, usings, nested);
            }
        }
    }
}

fn declare_enum_members(store: &mut SymbolStore, enum_id: SymbolId, decl: &EnumDeclaration) {
    let mut next_value: i64 = 0;
    let mut values: HashMap<String, i64> = HashMap::new();
    for member in &decl.members {
        let value = member
            .value
            .as_ref()
            .and_then(|e| eval_enum_value(e, &values))
            .unwrap_or(next_value);
        next_value = value + 1;
        values.insert(member.name.clone(), value);
        store.add_field(FieldSymbol {
            id: FieldId(0),
            name: member.name.clone(),
            containing: enum_id,
            ty: TypeRef::named(enum_id),
            is_static: true,
            is_const: true,
            is_enum_member: true,
            const_value: Some(ConstValue::Enum {
                ty: enum_id,
                member: member.name.clone(),
                value,
            }),
        });
    }
}

fn eval_enum_value(expr: &Expr, prior: &HashMap<String, i64>) -> Option<i64> {
    match &expr.kind {
        ExprKind::Literal(Literal::Integer(v)) => Some(*v),
        ExprKind::Unary {
            op: UnaryOperator::Negate,
            expr,
        } => eval_enum_value(expr, prior).map(|v| -v),
        ExprKind::Variable(Identifier::Simple(name)) => prior.get(name).copied(),
        ExprKind::Parenthesized(inner) => eval_enum_value(inner, prior),
        _ => None,
    }
}

fn bind_parameter(
    store: &SymbolStore,
    resolver: &TypeResolver<'_>,
    tree: &SyntaxTree,
    param: &Parameter,
) -> ParamSymbol {
    ParamSymbol {
        name: param.name.clone(),
        ty: resolver.resolve(&param.parameter_type),
        is_params: param.modifier == Some(ParameterModifier::Params),
        is_this: param.modifier == Some(ParameterModifier::This),
        has_default: param.default_value.is_some(),
        attributes: bind_attribute_lists(store, resolver, tree, &param.attributes),
    }
}

pub(crate) fn bind_attribute_lists(
    store: &SymbolStore,
    resolver: &TypeResolver<'_>,
    tree: &SyntaxTree,
    lists: &[AttributeList],
) -> Vec<BoundAttribute> {
    lists
        .iter()
        .flat_map(|l| l.attributes.iter())
        .map(|a| bind_attribute(store, resolver, tree, a))
        .collect()
}

/// Whether a type derives from `System.Attribute`.
fn is_attribute_class(store: &SymbolStore, corlib: &Corlib, id: SymbolId) -> bool {
    let mut current = Some(id);
    let mut hops = 0;
    while let Some(sym_id) = current {
        if sym_id == corlib.attribute {
            return true;
        }
        if hops > 32 {
            break;
        }
        hops += 1;
        current = store
            .type_symbol(sym_id)
            .base_types
            .iter()
            .find_map(|b| b.symbol());
    }
    false
}

fn bind_attribute(
    store: &SymbolStore,
    resolver: &TypeResolver<'_>,
    tree: &SyntaxTree,
    attr: &Attribute,
) -> BoundAttribute {
    // `[LoggerMessage]` may resolve with or without the `Attribute`
    // suffix; a same-named non-attribute class (like the `LoggerMessage`
    // factory host) must not shadow the attribute.
    let name = attr.name.to_string();
    let exact = resolver.resolve_named(&name, 0);
    let suffixed = resolver.resolve_named(&format!("{name}Attribute"), 0);
    let class = exact
        .filter(|id| is_attribute_class(store, resolver.corlib, *id))
        .or_else(|| suffixed.filter(|id| is_attribute_class(store, resolver.corlib, *id)))
        .or(exact)
        .or(suffixed);
    let args = attr
        .arguments
        .iter()
        .map(|arg| {
            let type_ref = match &arg.expr.kind {
                ExprKind::Typeof(ty) => Some(resolver.resolve(ty)),
                _ => None,
            };
            BoundAttributeArg {
                name: arg.name.clone(),
                value: eval_const_expr(store, resolver, &arg.expr),
                type_ref,
                text: tree.text(arg.expr.span).to_string(),
            }
        })
        .collect();
    BoundAttribute { class, name, args }
}

/// Qualified path of a `Variable` / `MemberAccess` chain, if it is one.
fn qualified_path(expr: &Expr) -> Option<Vec<String>> {
    match &expr.kind {
        ExprKind::Variable(id) => Some(id.segments().iter().map(|s| s.to_string()).collect()),
        ExprKind::MemberAccess(ma) => {
            let mut path = qualified_path(&ma.object)?;
            path.push(ma.member.clone());
            Some(path)
        }
        _ => None,
    }
}

/// Evaluate a context-free constant expression: literals, enum members,
/// const fields reached by qualified name, `nameof`, and simple folding.
pub(crate) fn eval_const_expr(
    store: &SymbolStore,
    resolver: &TypeResolver<'_>,
    expr: &Expr,
) -> Option<ConstValue> {
    match &expr.kind {
        ExprKind::Literal(lit) => Some(literal_const(lit)),
        ExprKind::Parenthesized(inner) | ExprKind::NullForgiving(inner) => {
            eval_const_expr(store, resolver, inner)
        }
        ExprKind::Cast { expr: inner, .. } => eval_const_expr(store, resolver, inner),
        ExprKind::Unary { op, expr: inner } => {
            let value = eval_const_expr(store, resolver, inner)?;
            match (op, value) {
                (UnaryOperator::Negate, ConstValue::Int(v)) => Some(ConstValue::Int(-v)),
                (UnaryOperator::Negate, ConstValue::Double(v)) => Some(ConstValue::Double(-v)),
                (UnaryOperator::Not, ConstValue::Bool(v)) => Some(ConstValue::Bool(!v)),
                (UnaryOperator::Plus, v) => Some(v),
                _ => None,
            }
        }
        ExprKind::Binary {
            left,
            op: BinaryOperator::Add,
            right,
        } => {
            let l = eval_const_expr(store, resolver, left)?;
            let r = eval_const_expr(store, resolver, right)?;
            match (l, r) {
                (ConstValue::Int(a), ConstValue::Int(b)) => Some(ConstValue::Int(a + b)),
                (ConstValue::Str(a), ConstValue::Str(b)) => Some(ConstValue::Str(format!("{a}{b}"))),
                _ => None,
            }
        }
        ExprKind::Nameof(inner) => {
            let name = match &inner.kind {
                ExprKind::Variable(id) => id.simple_name().to_string(),
                ExprKind::MemberAccess(ma) => ma.member.clone(),
                _ => return None,
            };
            Some(ConstValue::Str(name))
        }
        ExprKind::MemberAccess(_) | ExprKind::Variable(_) => {
            let path = qualified_path(expr)?;
            let (member, type_path) = path.split_last()?;
            if type_path.is_empty() {
                return None;
            }
            let ty = resolver.resolve_named(&type_path.join("."), 0)?;
            let sym = store.type_symbol(ty);
            let field = sym
                .fields
                .iter()
                .find(|f| &store.field(**f).name == member)?;
            store.field(*field).const_value.clone()
        }
        _ => None,
    }
}

pub(crate) fn literal_const(lit: &Literal) -> ConstValue {
    match lit {
        Literal::Integer(v) => ConstValue::Int(*v),
        Literal::Float(v) => ConstValue::Double(*v),
        Literal::Boolean(v) => ConstValue::Bool(*v),
        Literal::String(s) => ConstValue::Str(s.clone()),
        Literal::Char(c) => ConstValue::Char(*c),
        Literal::Null => ConstValue::Null,
    }
}
