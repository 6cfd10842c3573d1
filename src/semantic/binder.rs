//! Per-tree semantic model: binds expressions to types, symbols, constants
//! and resolved invocation targets.
//!
//! Binding tables are keyed by expression span, which is unique per node
//! within one tree. The binder never fails: unresolved expressions get
//! [`TypeRef::Error`] and analysis degrades gracefully.

use crate::semantic::compilation::{Compilation, Conversion, MemberRef};
use crate::semantic::declare::{literal_const, TypeResolver};
use crate::semantic::symbols::{
    ConstValue, FieldId, MethodId, PropertyId, SymbolId, TypeKind, TypeRef,
};
use crate::span::TextSpan;
use crate::syntax::declarations::{Member, MethodDeclaration, TypeDeclaration};
use crate::syntax::expressions::{
    Argument, BinaryOperator, Expr, ExprKind, InvocationExpression, LambdaBody,
    ObjectInitializerEntry, UnaryOperator,
};
use crate::syntax::literal::Literal;
use crate::syntax::identifier::Identifier;
use crate::syntax::statements::{LocalDeclaration, Statement, UsingResource};
use crate::syntax::types::Type;
use crate::syntax::unit::TopLevelMember;
use std::collections::HashMap;

/// A resolved invocation target.
#[derive(Debug, Clone)]
pub struct ResolvedCall {
    pub method: MethodId,
    pub type_args: Vec<TypeRef>,
    pub is_extension: bool,
}

/// What an identifier or member expression refers to.
#[derive(Debug, Clone)]
pub enum BoundRef {
    Local,
    Parameter,
    Field(FieldId),
    EnumMember(FieldId),
    Property(PropertyId),
    Type(SymbolId),
    Namespace(String),
}

#[derive(Debug, Default)]
pub struct SemanticModel {
    tree: usize,
    types: HashMap<TextSpan, TypeRef>,
    consts: HashMap<TextSpan, ConstValue>,
    calls: HashMap<TextSpan, ResolvedCall>,
    refs: HashMap<TextSpan, BoundRef>,
}

impl SemanticModel {
    pub fn tree_index(&self) -> usize {
        self.tree
    }

    pub fn type_of(&self, expr: &Expr) -> Option<&TypeRef> {
        self.types.get(&expr.span)
    }

    pub fn constant_of(&self, expr: &Expr) -> Option<&ConstValue> {
        self.consts.get(&expr.span)
    }

    /// The target of an invocation expression.
    pub fn resolved_call(&self, expr: &Expr) -> Option<&ResolvedCall> {
        self.calls.get(&expr.span)
    }

    pub fn bound_ref(&self, expr: &Expr) -> Option<&BoundRef> {
        self.refs.get(&expr.span)
    }
}

/// Result of binding one expression.
enum BoundExpr {
    Value(TypeRef),
    Type(SymbolId),
    Namespace(String),
    None,
}

impl BoundExpr {
    fn value_type(&self) -> TypeRef {
        match self {
            BoundExpr::Value(t) => t.clone(),
            _ => TypeRef::Error,
        }
    }
}

struct LocalInfo {
    ty: TypeRef,
    konst: Option<ConstValue>,
    is_param: bool,
}

struct Binder<'c> {
    comp: &'c Compilation,
    tree: usize,
    namespace: String,
    usings: Vec<String>,
    type_params: Vec<String>,
    containing: Option<SymbolId>,
    scopes: Vec<HashMap<String, LocalInfo>>,
    model: SemanticModel,
}

pub(crate) fn bind(comp: &Compilation, tree: usize) -> SemanticModel {
    let mut binder = Binder {
        comp,
        tree,
        namespace: String::new(),
        usings: Vec::new(),
        type_params: Vec::new(),
        containing: None,
        scopes: Vec::new(),
        model: SemanticModel {
            tree,
            ..Default::default()
        },
    };
    binder.bind_unit();
    binder.model
}

impl<'c> Binder<'c> {
    fn bind_unit(&mut self) {
        let root = &self.comp.tree(self.tree).root;
        let file_usings: Vec<String> = root
            .usings
            .iter()
            .map(|u| u.namespace.to_string())
            .collect();
        for member in &root.members {
            match member {
                TopLevelMember::Namespace(ns) => {
                    self.namespace = ns.name.to_string();
                    self.usings = file_usings.clone();
                    self.usings
                        .extend(ns.usings.iter().map(|u| u.namespace.to_string()));
                    for ty in &ns.types {
                        self.bind_type(ty);
                    }
                }
                TopLevelMember::Type(ty) => {
                    self.namespace = String::new();
                    self.usings = file_usings.clone();
                    self.bind_type(ty);
                }
            }
        }
    }

    fn resolver(&self) -> TypeResolver<'c> {
        TypeResolver {
            store: &self.comp.store,
            corlib: &self.comp.corlib,
            namespace: self.namespace.clone(),
            usings: self.usings.clone(),
            type_params: self.type_params.clone(),
        }
    }

    fn resolve_type(&self, ty: &Type) -> TypeRef {
        self.resolver().resolve(ty)
    }

    fn bind_type(&mut self, decl: &TypeDeclaration) {
        let (members, type_params) = match decl {
            TypeDeclaration::Class(c) => (&c.members, c.type_parameters.clone()),
            TypeDeclaration::Interface(i) => (&i.members, i.type_parameters.clone()),
            TypeDeclaration::Enum(_) => return,
        };
        let symbol = self
            .resolver()
            .resolve_named(decl.name(), type_params.len());
        let outer_containing = self.containing;
        let outer_params = std::mem::replace(&mut self.type_params, type_params);
        self.containing = symbol;

        for member in members {
            match member {
                Member::Method(m) => self.bind_method(m),
                Member::Constructor(c) => {
                    self.scopes.push(HashMap::new());
                    for param in &c.parameters {
                        let ty = self.resolve_type(&param.parameter_type);
                        self.insert_local(param.name.clone(), ty, None, true);
                    }
                    if let Some(body) = &c.body {
                        self.bind_statement(body);
                    }
                    self.scopes.pop();
                }
                Member::Field(f) => {
                    if let Some(init) = &f.initializer {
                        self.bind_value(init);
                    }
                }
                Member::Property(p) => {
                    if let Some(init) = &p.initializer {
                        self.bind_value(init);
                    }
                }
                Member::NestedType(nested) => {
                    let outer_ns = self.namespace.clone();
                    self.namespace = if outer_ns.is_empty() {
                        decl.name().to_string()
                    } else {
                        format!("{outer_ns}.{}", decl.name())
                    };
                    self.bind_type(nested);
                    self.namespace = outer_ns;
                }
            }
        }

        self.containing = outer_containing;
        self.type_params = outer_params;
    }

    fn bind_method(&mut self, m: &MethodDeclaration) {
        let outer_params = self.type_params.clone();
        self.type_params.extend(m.type_parameters.clone());
        self.scopes.push(HashMap::new());
        for param in &m.parameters {
            let ty = self.resolve_type(&param.parameter_type);
            self.insert_local(param.name.clone(), ty, None, true);
        }
        if let Some(body) = &m.body {
            self.bind_statement(body);
        }
        if let Some(expr) = &m.expression_body {
            self.bind_value(expr);
        }
        self.scopes.pop();
        self.type_params = outer_params;
    }

    fn insert_local(&mut self, name: String, ty: TypeRef, konst: Option<ConstValue>, is_param: bool) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(
                name,
                LocalInfo {
                    ty,
                    konst,
                    is_param,
                },
            );
        }
    }

    fn lookup_local(&self, name: &str) -> Option<&LocalInfo> {
        self.scopes.iter().rev().find_map(|s| s.get(name))
    }

    // ---- statements ----

    fn bind_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Block(stmts) => {
                self.scopes.push(HashMap::new());
                for s in stmts {
                    self.bind_statement(s);
                }
                self.scopes.pop();
            }
            Statement::LocalDeclaration(decl) => self.bind_local_declaration(decl),
            Statement::Expression(e) => {
                self.bind_value(e);
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.bind_value(condition);
                self.bind_statement(then_branch);
                if let Some(e) = else_branch {
                    self.bind_statement(e);
                }
            }
            Statement::While { condition, body } => {
                self.bind_value(condition);
                self.bind_statement(body);
            }
            Statement::Do { body, condition } => {
                self.bind_statement(body);
                self.bind_value(condition);
            }
            Statement::For {
                initializer,
                condition,
                iterators,
                body,
            } => {
                self.scopes.push(HashMap::new());
                if let Some(init) = initializer {
                    self.bind_statement(init);
                }
                if let Some(c) = condition {
                    self.bind_value(c);
                }
                for it in iterators {
                    self.bind_value(it);
                }
                self.bind_statement(body);
                self.scopes.pop();
            }
            Statement::Foreach {
                element_type,
                name,
                collection,
                body,
            } => {
                self.scopes.push(HashMap::new());
                let collection_ty = self.bind_value(collection);
                let declared = self.resolve_type(element_type);
                let ty = if declared.is_error() {
                    self.element_type_of(&collection_ty)
                } else {
                    declared
                };
                self.insert_local(name.clone(), ty, None, false);
                self.bind_statement(body);
                self.scopes.pop();
            }
            Statement::Using { resource, body } => {
                self.scopes.push(HashMap::new());
                match resource {
                    UsingResource::Declaration(decl) => self.bind_local_declaration(decl),
                    UsingResource::Expression(e) => {
                        self.bind_value(e);
                    }
                }
                self.bind_statement(body);
                self.scopes.pop();
            }
            Statement::Try {
                body,
                catches,
                finally_block,
            } => {
                self.bind_statement(body);
                for c in catches {
                    self.scopes.push(HashMap::new());
                    if let (Some(ty), Some(name)) = (&c.exception_type, &c.name) {
                        let resolved = self.resolve_type(ty);
                        self.insert_local(name.clone(), resolved, None, false);
                    }
                    self.bind_statement(&c.body);
                    self.scopes.pop();
                }
                if let Some(fin) = finally_block {
                    self.bind_statement(fin);
                }
            }
            Statement::Return(e) | Statement::Throw(e) => {
                if let Some(e) = e {
                    self.bind_value(e);
                }
            }
            Statement::Break | Statement::Continue | Statement::Empty => {}
        }
    }

    fn bind_local_declaration(&mut self, decl: &LocalDeclaration) {
        let declared = self.resolve_type(&decl.declared_type);
        let use_inferred = decl.declared_type == Type::Var || declared.is_error();
        for d in &decl.declarators {
            let init_ty = d.initializer.as_ref().map(|e| self.bind_value(e));
            let ty = if use_inferred {
                init_ty.unwrap_or(TypeRef::Error)
            } else {
                declared.clone()
            };
            let konst = if decl.is_const {
                d.initializer
                    .as_ref()
                    .and_then(|e| self.model.consts.get(&e.span).cloned())
            } else {
                None
            };
            self.insert_local(d.name.clone(), ty, konst, false);
        }
    }

    fn element_type_of(&self, ty: &TypeRef) -> TypeRef {
        match ty.strip_nullable() {
            TypeRef::Array(elem) => (**elem).clone(),
            _ => {
                let mut worklist = vec![ty.strip_nullable().clone()];
                let mut seen = Vec::new();
                while let Some(current) = worklist.pop() {
                    if let TypeRef::Named { symbol, args } = &current {
                        if *symbol == self.comp.corlib.ienumerable_1 {
                            return args.first().cloned().unwrap_or(TypeRef::Error);
                        }
                    }
                    if seen.contains(&current) {
                        continue;
                    }
                    worklist.extend(self.comp.instantiated_bases(&current));
                    seen.push(current);
                }
                TypeRef::Error
            }
        }
    }

    // ---- expressions ----

    /// Bind an expression in value position and return its type.
    fn bind_value(&mut self, expr: &Expr) -> TypeRef {
        let bound = self.bind_expr(expr);
        bound.value_type()
    }

    fn record_value(&mut self, span: TextSpan, ty: TypeRef, konst: Option<ConstValue>) -> BoundExpr {
        self.model.types.insert(span, ty.clone());
        if let Some(k) = konst {
            self.model.consts.insert(span, k);
        }
        BoundExpr::Value(ty)
    }

    fn bind_expr(&mut self, expr: &Expr) -> BoundExpr {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Literal(lit) => {
                let c = self.comp;
                let ty = match lit {
                    Literal::Integer(_) => TypeRef::named(c.corlib.int32),
                    Literal::Float(_) => TypeRef::named(c.corlib.double),
                    Literal::Boolean(_) => TypeRef::named(c.corlib.bool_),
                    Literal::String(_) => TypeRef::named(c.corlib.string_),
                    Literal::Char(_) => TypeRef::named(c.corlib.char_),
                    Literal::Null => TypeRef::Nullable(Box::new(TypeRef::named(c.corlib.object))),
                };
                self.record_value(span, ty, Some(literal_const(lit)))
            }
            ExprKind::InterpolatedString(_) => {
                let ty = TypeRef::named(self.comp.corlib.string_);
                self.record_value(span, ty, None)
            }
            ExprKind::Variable(id) => self.bind_variable(id, span),
            ExprKind::GenericName { .. } => BoundExpr::None,
            ExprKind::MemberAccess(ma) => {
                let bound = self.bind_member_access(&ma.object, &ma.member, span);
                if let BoundExpr::Type(sym) = &bound {
                    self.model.refs.insert(span, BoundRef::Type(*sym));
                }
                bound
            }
            ExprKind::Invocation(inv) => self.bind_invocation(inv, span),
            ExprKind::New(new) => {
                for arg in &new.arguments {
                    self.bind_value(&arg.expr);
                }
                if let Some(entries) = &new.initializer {
                    for entry in entries {
                        match entry {
                            ObjectInitializerEntry::Property { value, .. } => {
                                self.bind_value(value);
                            }
                            ObjectInitializerEntry::Indexer { indices, value } => {
                                for i in indices {
                                    self.bind_value(i);
                                }
                                self.bind_value(value);
                            }
                            ObjectInitializerEntry::Expression(e) => {
                                self.bind_value(e);
                            }
                            ObjectInitializerEntry::Element(es) => {
                                for e in es {
                                    self.bind_value(e);
                                }
                            }
                        }
                    }
                }
                let ty = new
                    .target_type
                    .as_ref()
                    .map(|t| self.resolve_type(t))
                    .unwrap_or(TypeRef::Error);
                self.record_value(span, ty, None)
            }
            ExprKind::ArrayCreation(arr) => {
                if let Some(len) = &arr.length {
                    self.bind_value(len);
                }
                let mut elem_types = Vec::new();
                if let Some(elems) = &arr.initializer {
                    for e in elems {
                        elem_types.push(self.bind_value(e));
                    }
                }
                let elem = match &arr.element_type {
                    Some(t) => self.resolve_type(t),
                    None => elem_types
                        .first()
                        .cloned()
                        .unwrap_or(TypeRef::named(self.comp.corlib.object)),
                };
                self.record_value(span, TypeRef::Array(Box::new(elem)), None)
            }
            ExprKind::AnonymousObject(obj) => {
                for member in &obj.initializers {
                    self.bind_value(&member.value);
                }
                self.record_value(span, TypeRef::Error, None)
            }
            ExprKind::Lambda(lambda) => {
                self.scopes.push(HashMap::new());
                for p in &lambda.parameters {
                    let ty = p
                        .parameter_type
                        .as_ref()
                        .map(|t| self.resolve_type(t))
                        .unwrap_or(TypeRef::Error);
                    self.insert_local(p.name.clone(), ty, None, true);
                }
                match &lambda.body {
                    LambdaBody::Expression(e) => {
                        self.bind_value(e);
                    }
                    LambdaBody::Block(b) => self.bind_statement(b),
                }
                self.scopes.pop();
                self.record_value(span, TypeRef::Error, None)
            }
            ExprKind::Cast { target_type, expr: inner } => {
                self.bind_value(inner);
                let konst = self.model.consts.get(&inner.span).cloned();
                let ty = self.resolve_type(target_type);
                self.record_value(span, ty, konst)
            }
            ExprKind::Default(ty) => {
                let resolved = ty
                    .as_ref()
                    .map(|t| self.resolve_type(t))
                    .unwrap_or(TypeRef::Error);
                self.record_value(span, resolved, None)
            }
            ExprKind::Typeof(_) => {
                let ty = TypeRef::named(self.comp.corlib.type_);
                self.record_value(span, ty, None)
            }
            ExprKind::Nameof(inner) => {
                let name = match &inner.kind {
                    ExprKind::Variable(id) => Some(id.simple_name().to_string()),
                    ExprKind::MemberAccess(ma) => Some(ma.member.clone()),
                    _ => None,
                };
                let ty = TypeRef::named(self.comp.corlib.string_);
                self.record_value(span, ty, name.map(ConstValue::Str))
            }
            ExprKind::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                self.bind_value(condition);
                let t = self.bind_value(when_true);
                let f = self.bind_value(when_false);
                let ty = if t.is_error() { f } else { t };
                self.record_value(span, ty, None)
            }
            ExprKind::Binary { left, op, right } => self.bind_binary(left, *op, right, span),
            ExprKind::Unary { op, expr: inner } => {
                let inner_ty = self.bind_value(inner);
                let konst = self.model.consts.get(&inner.span).and_then(|v| match (op, v) {
                    (UnaryOperator::Negate, ConstValue::Int(i)) => Some(ConstValue::Int(-i)),
                    (UnaryOperator::Negate, ConstValue::Double(d)) => Some(ConstValue::Double(-d)),
                    (UnaryOperator::Not, ConstValue::Bool(b)) => Some(ConstValue::Bool(!b)),
                    (UnaryOperator::Plus, v) => Some(v.clone()),
                    _ => None,
                });
                self.record_value(span, inner_ty, konst)
            }
            ExprKind::Assignment { target, value } => {
                self.bind_value(target);
                let ty = self.bind_value(value);
                self.record_value(span, ty, None)
            }
            ExprKind::Parenthesized(inner) | ExprKind::NullForgiving(inner) => {
                let bound = self.bind_expr(inner);
                if let BoundExpr::Value(ty) = &bound {
                    let konst = self.model.consts.get(&inner.span).cloned();
                    return self.record_value(span, ty.clone(), konst);
                }
                bound
            }
            ExprKind::Await(inner) => {
                let inner_ty = self.bind_value(inner);
                let ty = match inner_ty.strip_nullable() {
                    TypeRef::Named { symbol, args } if *symbol == self.comp.corlib.task_1 => {
                        args.first().cloned().unwrap_or(TypeRef::Error)
                    }
                    TypeRef::Named { symbol, .. } if *symbol == self.comp.corlib.task => {
                        TypeRef::named(self.comp.corlib.void_)
                    }
                    _ => TypeRef::Error,
                };
                self.record_value(span, ty, None)
            }
            ExprKind::Indexing { target, indices } => {
                let target_ty = self.bind_value(target);
                for i in indices {
                    self.bind_value(i);
                }
                let ty = self.index_result_type(&target_ty);
                self.record_value(span, ty, None)
            }
            ExprKind::This => {
                let ty = self
                    .containing
                    .map(TypeRef::named)
                    .unwrap_or(TypeRef::Error);
                self.record_value(span, ty, None)
            }
            ExprKind::Base => {
                let ty = self
                    .containing
                    .and_then(|c| {
                        self.comp
                            .type_symbol(c)
                            .base_types
                            .first()
                            .cloned()
                    })
                    .unwrap_or(TypeRef::named(self.comp.corlib.object));
                self.record_value(span, ty, None)
            }
        }
    }

    fn index_result_type(&self, target: &TypeRef) -> TypeRef {
        match target.strip_nullable() {
            TypeRef::Array(elem) => (**elem).clone(),
            TypeRef::Named { symbol, args } if *symbol == self.comp.corlib.list_1 => {
                args.first().cloned().unwrap_or(TypeRef::Error)
            }
            TypeRef::Named { symbol, args } if *symbol == self.comp.corlib.dictionary_2 => {
                args.get(1).cloned().unwrap_or(TypeRef::Error)
            }
            t if t.is_symbol(self.comp.corlib.string_) => TypeRef::named(self.comp.corlib.char_),
            _ => TypeRef::Error,
        }
    }

    fn bind_binary(
        &mut self,
        left: &Expr,
        op: BinaryOperator,
        right: &Expr,
        span: TextSpan,
    ) -> BoundExpr {
        let lt = self.bind_value(left);
        let rt = self.bind_value(right);
        let c = &self.comp.corlib;
        let string_ty = TypeRef::named(c.string_);
        let ty = match op {
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::Less
            | BinaryOperator::LessEqual
            | BinaryOperator::Greater
            | BinaryOperator::GreaterEqual
            | BinaryOperator::And
            | BinaryOperator::Or => TypeRef::named(c.bool_),
            BinaryOperator::Coalesce => {
                if lt.is_error() {
                    rt.clone()
                } else {
                    lt.strip_nullable().clone()
                }
            }
            BinaryOperator::Add
                if lt.strip_nullable() == &string_ty || rt.strip_nullable() == &string_ty =>
            {
                string_ty.clone()
            }
            _ => {
                if lt.is_symbol(c.double) || rt.is_symbol(c.double) {
                    TypeRef::named(c.double)
                } else if lt.is_error() {
                    rt.clone()
                } else {
                    lt.clone()
                }
            }
        };
        let konst = {
            let lk = self.model.consts.get(&left.span);
            let rk = self.model.consts.get(&right.span);
            match (op, lk, rk) {
                (BinaryOperator::Add, Some(ConstValue::Int(a)), Some(ConstValue::Int(b))) => {
                    Some(ConstValue::Int(a + b))
                }
                (BinaryOperator::Add, Some(ConstValue::Str(a)), Some(ConstValue::Str(b))) => {
                    Some(ConstValue::Str(format!("{a}{b}")))
                }
                (BinaryOperator::Subtract, Some(ConstValue::Int(a)), Some(ConstValue::Int(b))) => {
                    Some(ConstValue::Int(a - b))
                }
                (BinaryOperator::Multiply, Some(ConstValue::Int(a)), Some(ConstValue::Int(b))) => {
                    Some(ConstValue::Int(a * b))
                }
                _ => None,
            }
        };
        self.record_value(span, ty, konst)
    }

    fn bind_variable(&mut self, id: &Identifier, span: TextSpan) -> BoundExpr {
        let name = match id {
            Identifier::Simple(s) => s.as_str(),
            Identifier::Qualified(_) => {
                // Qualified identifiers only appear in type positions.
                let resolver = self.resolver();
                if let Some(sym) = resolver.resolve_named(&id.to_string(), 0) {
                    self.model.refs.insert(span, BoundRef::Type(sym));
                    return BoundExpr::Type(sym);
                }
                return BoundExpr::None;
            }
        };

        if let Some(local) = self.lookup_local(name) {
            let ty = local.ty.clone();
            let konst = local.konst.clone();
            let bound_ref = if local.is_param {
                BoundRef::Parameter
            } else {
                BoundRef::Local
            };
            self.model.refs.insert(span, bound_ref);
            return self.record_value(span, ty, konst);
        }

        if let Some(containing) = self.containing {
            if let Some(member) = self.comp.member_named(containing, name) {
                return self.record_member(span, member);
            }
        }

        let resolver = self.resolver();
        if let Some(sym) = resolver.resolve_named(name, 0) {
            self.model.refs.insert(span, BoundRef::Type(sym));
            return BoundExpr::Type(sym);
        }

        // Namespace root, absolute or relative to the current namespace.
        let mut chain = vec![String::new()];
        let mut current = self.namespace.as_str();
        while !current.is_empty() {
            chain.push(current.to_string());
            current = current.rfind('.').map(|i| &current[..i]).unwrap_or("");
        }
        for scope in chain {
            let qualified = if scope.is_empty() {
                name.to_string()
            } else {
                format!("{scope}.{name}")
            };
            if self.comp.store.namespaces.contains(&qualified) {
                self.model
                    .refs
                    .insert(span, BoundRef::Namespace(qualified.clone()));
                return BoundExpr::Namespace(qualified);
            }
        }
        BoundExpr::None
    }

    fn record_member(&mut self, span: TextSpan, member: MemberRef) -> BoundExpr {
        match member {
            MemberRef::Property(p) => {
                let ty = self.comp.property(p).ty.clone();
                self.model.refs.insert(span, BoundRef::Property(p));
                self.record_value(span, ty, None)
            }
            MemberRef::Field(f) => {
                let field = self.comp.field(f);
                let ty = field.ty.clone();
                let konst = field.const_value.clone();
                let bound_ref = if field.is_enum_member {
                    BoundRef::EnumMember(f)
                } else {
                    BoundRef::Field(f)
                };
                self.model.refs.insert(span, bound_ref);
                self.record_value(span, ty, konst)
            }
        }
    }

    fn bind_member_access(&mut self, object: &Expr, member: &str, span: TextSpan) -> BoundExpr {
        let bound = self.bind_expr(object);
        match bound {
            BoundExpr::Namespace(path) => {
                let qualified = format!("{path}.{member}");
                if let Some(sym) = self.comp.store.lookup(&qualified) {
                    return BoundExpr::Type(sym);
                }
                if self.comp.store.namespaces.contains(&qualified) {
                    return BoundExpr::Namespace(qualified);
                }
                BoundExpr::None
            }
            BoundExpr::Type(sym) => {
                if let Some(found) = self.comp.member_named(sym, member) {
                    return self.record_member(span, found);
                }
                BoundExpr::None
            }
            BoundExpr::Value(ty) => {
                if let TypeRef::Array(_) = ty.strip_nullable() {
                    if member == "Length" {
                        let int_ty = TypeRef::named(self.comp.corlib.int32);
                        return self.record_value(span, int_ty, None);
                    }
                }
                if let Some(sym) = ty.symbol() {
                    if let Some(found) = self.comp.member_named(sym, member) {
                        // Instantiate generic members against the receiver.
                        let bound = self.record_member(span, found);
                        if let (BoundExpr::Value(member_ty), TypeRef::Named { args, .. }) =
                            (&bound, ty.strip_nullable())
                        {
                            let owner = self.comp.type_symbol(sym);
                            if !owner.type_params.is_empty() {
                                let map: HashMap<String, TypeRef> = owner
                                    .type_params
                                    .iter()
                                    .cloned()
                                    .zip(args.iter().cloned())
                                    .collect();
                                let substituted = member_ty.substitute(&map);
                                return self.record_value(span, substituted, None);
                            }
                        }
                        return bound;
                    }
                }
                BoundExpr::None
            }
            BoundExpr::None => BoundExpr::None,
        }
    }

    fn bind_invocation(&mut self, inv: &InvocationExpression, span: TextSpan) -> BoundExpr {
        // Bind arguments first so their types drive overload selection.
        let arg_info: Vec<(TypeRef, Option<ConstValue>)> = inv
            .arguments
            .iter()
            .map(|a| {
                let ty = self.bind_value(&a.expr);
                let konst = self.model.consts.get(&a.expr.span).cloned();
                (ty, konst)
            })
            .collect();

        let mut extension_fallback: Vec<MethodId> = Vec::new();
        let (candidates, receiver, explicit_targs) = match &inv.callee.kind {
            ExprKind::MemberAccess(ma) => {
                let object = self.bind_expr(&ma.object);
                let targs: Vec<TypeRef> =
                    ma.type_args.iter().map(|t| self.resolve_type(t)).collect();
                match object {
                    BoundExpr::Type(sym) => {
                        let methods: Vec<MethodId> = self
                            .comp
                            .methods_named(sym, &ma.member)
                            .into_iter()
                            .filter(|m| self.comp.method(*m).is_static)
                            .collect();
                        (methods, None, targs)
                    }
                    BoundExpr::Value(ty) => {
                        let methods: Vec<MethodId> = ty
                            .symbol()
                            .map(|s| self.comp.methods_named(s, &ma.member))
                            .unwrap_or_default()
                            .into_iter()
                            .filter(|m| !self.comp.method(*m).is_static)
                            .collect();
                        if !ty.is_error() {
                            extension_fallback = self
                                .comp
                                .extension_methods_named(&ma.member)
                                .into_iter()
                                .filter(|m| {
                                    let first = &self.comp.method(*m).params[0].ty;
                                    self.comp.conversion(&ty, first, None) != Conversion::None
                                })
                                .collect();
                        }
                        (methods, Some(ty), targs)
                    }
                    _ => (Vec::new(), None, targs),
                }
            }
            ExprKind::Variable(Identifier::Simple(name)) => {
                // Delegate-typed locals and fields are invocable directly.
                if let BoundExpr::Value(ty) = self.bind_expr(&inv.callee) {
                    if let Some(result) = self.delegate_result_type(&ty) {
                        return self.record_value(span, result, None);
                    }
                }
                let methods = self
                    .containing
                    .map(|c| self.comp.methods_named(c, name))
                    .unwrap_or_default();
                (methods, None, Vec::new())
            }
            ExprKind::GenericName { name, type_args } => {
                let targs: Vec<TypeRef> = type_args.iter().map(|t| self.resolve_type(t)).collect();
                let methods = self
                    .containing
                    .map(|c| self.comp.methods_named(c, name.simple_name()))
                    .unwrap_or_default();
                (methods, None, targs)
            }
            _ => {
                let callee_ty = self.bind_value(&inv.callee);
                if let Some(result) = self.delegate_result_type(&callee_ty) {
                    return self.record_value(span, result, None);
                }
                (Vec::new(), None, Vec::new())
            }
        };

        // Instance overloads win; extension helpers only apply when no
        // instance method fits.
        let chosen = self
            .pick_overload(&candidates, receiver.as_ref(), &inv.arguments, &arg_info, &explicit_targs)
            .or_else(|| {
                self.pick_overload(
                    &extension_fallback,
                    receiver.as_ref(),
                    &inv.arguments,
                    &arg_info,
                    &explicit_targs,
                )
            });
        if let Some((method, type_args, is_extension)) = chosen {
            let m = self.comp.method(method);
            let map: HashMap<String, TypeRef> = m
                .type_params
                .iter()
                .cloned()
                .zip(type_args.iter().cloned())
                .collect();
            let return_type = m.return_type.substitute(&map);
            self.model.calls.insert(
                span,
                ResolvedCall {
                    method,
                    type_args,
                    is_extension,
                },
            );
            return self.record_value(span, return_type, None);
        }
        self.record_value(span, TypeRef::Error, None)
    }

    /// Result type when invoking a delegate value (`Action`/`Func`).
    fn delegate_result_type(&self, ty: &TypeRef) -> Option<TypeRef> {
        let TypeRef::Named { symbol, args } = ty.strip_nullable() else {
            return None;
        };
        let sym = self.comp.type_symbol(*symbol);
        if sym.kind != TypeKind::Delegate {
            return None;
        }
        if sym.name == "Func" {
            args.last().cloned()
        } else {
            Some(TypeRef::named(self.comp.corlib.void_))
        }
    }

    fn pick_overload(
        &self,
        candidates: &[MethodId],
        receiver: Option<&TypeRef>,
        args: &[Argument],
        arg_info: &[(TypeRef, Option<ConstValue>)],
        explicit_targs: &[TypeRef],
    ) -> Option<(MethodId, Vec<TypeRef>, bool)> {
        let mut best: Option<(i32, bool, MethodId, Vec<TypeRef>)> = None;
        for &mid in candidates {
            let m = self.comp.method(mid);
            let is_extension = m.is_extension && receiver.is_some();
            if !explicit_targs.is_empty() && explicit_targs.len() != m.type_params.len() {
                continue;
            }

            // Effective arguments: receiver first for extension calls.
            let mut eff: Vec<(Option<&str>, &TypeRef, Option<&ConstValue>)> = Vec::new();
            if is_extension {
                eff.push((None, receiver.unwrap_or(&TypeRef::Error), None));
            }
            for (arg, (ty, konst)) in args.iter().zip(arg_info.iter()) {
                eff.push((arg.name.as_deref(), ty, konst.as_ref()));
            }

            let Some((score, uses_params, type_args)) = self.score_candidate(m, &eff, explicit_targs)
            else {
                continue;
            };
            let better = match &best {
                None => true,
                Some((best_score, best_params, _, _)) => {
                    (!uses_params && *best_params) || (uses_params == *best_params && score > *best_score)
                }
            };
            if better {
                best = Some((score, uses_params, mid, type_args));
            }
        }
        best.map(|(_, _, mid, targs)| {
            let is_extension = self.comp.method(mid).is_extension && receiver.is_some();
            (mid, targs, is_extension)
        })
    }

    fn score_candidate(
        &self,
        m: &crate::semantic::symbols::MethodSymbol,
        eff: &[(Option<&str>, &TypeRef, Option<&ConstValue>)],
        explicit_targs: &[TypeRef],
    ) -> Option<(i32, bool, Vec<TypeRef>)> {
        let params = &m.params;
        let params_idx = params.iter().position(|p| p.is_params);
        let fixed_count = params_idx.unwrap_or(params.len());

        // Map effective arguments to parameter slots.
        let mut slot_of_arg: Vec<usize> = Vec::with_capacity(eff.len());
        for (i, (name, _, _)) in eff.iter().enumerate() {
            let slot = match name {
                Some(n) => params.iter().position(|p| p.name == *n)?,
                None => i,
            };
            slot_of_arg.push(slot);
        }

        // Infer type arguments before conversion checks.
        let type_args: Vec<TypeRef> = if !explicit_targs.is_empty() {
            explicit_targs.to_vec()
        } else {
            m.type_params
                .iter()
                .map(|tp| {
                    for (arg_idx, slot) in slot_of_arg.iter().enumerate() {
                        if let Some(param) = params.get(*slot) {
                            if param.ty == TypeRef::TypeParam(tp.clone()) {
                                return eff[arg_idx].1.clone();
                            }
                        }
                    }
                    TypeRef::Error
                })
                .collect()
        };
        let map: HashMap<String, TypeRef> = m
            .type_params
            .iter()
            .cloned()
            .zip(type_args.iter().cloned())
            .collect();

        let mut score = 0i32;
        let mut uses_params = false;
        let mut assigned = vec![false; params.len()];

        for (arg_idx, (_, arg_ty, arg_const)) in eff.iter().enumerate() {
            let slot = slot_of_arg[arg_idx];
            let (param_ty, via_params) = if slot < fixed_count {
                (params[slot].ty.substitute(&map), false)
            } else if let Some(pi) = params_idx {
                uses_params = true;
                let params_param = &params[pi];
                // A single argument may match the params array directly.
                let direct = params_param.ty.substitute(&map);
                let elem = match &direct {
                    TypeRef::Array(e) => (**e).clone(),
                    other => other.clone(),
                };
                if eff.len() == pi + 1
                    && self.comp.conversion(arg_ty, &direct, *arg_const) != Conversion::None
                {
                    (direct, true)
                } else {
                    (elem, true)
                }
            } else {
                return None;
            };
            let conversion = self.comp.conversion(arg_ty, &param_ty, *arg_const);
            if conversion == Conversion::None {
                return None;
            }
            score += match conversion {
                Conversion::Identity => 3,
                Conversion::Implicit => 1,
                Conversion::None => 0,
            };
            if !via_params {
                if let Some(flag) = assigned.get_mut(slot) {
                    *flag = true;
                }
            }
        }

        // Unassigned fixed parameters need defaults (or the params slot).
        for (i, param) in params.iter().enumerate() {
            if i < fixed_count && !assigned[i] && !param.has_default {
                return None;
            }
        }
        Some((score, uses_params, type_args))
    }
}
