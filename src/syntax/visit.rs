//! Read-only traversal over a compilation unit.
//!
//! Analyzers use this to enumerate expressions and method declarations with
//! their enclosing namespace/type context.

use crate::syntax::declarations::{Member, MethodDeclaration, TypeDeclaration};
use crate::syntax::expressions::{Expr, ExprKind, LambdaBody, ObjectInitializerEntry};
use crate::syntax::statements::{Statement, UsingResource};
use crate::syntax::unit::{CompilationUnit, TopLevelMember};

/// Enclosing declaration path at a visit point.
#[derive(Debug, Clone, Default)]
pub struct DeclContext {
    pub namespace: String,
    pub types: Vec<String>,
    pub method: Option<String>,
}

impl DeclContext {
    /// Fully-qualified name of the enclosing type, nested types joined
    /// with `.`.
    pub fn type_fqn(&self) -> String {
        let joined = self.types.join(".");
        if self.namespace.is_empty() {
            joined
        } else if joined.is_empty() {
            self.namespace.clone()
        } else {
            format!("{}.{}", self.namespace, joined)
        }
    }
}

pub trait SyntaxVisitor {
    fn visit_expr(&mut self, _cx: &DeclContext, _expr: &Expr) {}
    fn visit_method(&mut self, _cx: &DeclContext, _method: &MethodDeclaration) {}
}

pub fn walk_unit(unit: &CompilationUnit, v: &mut impl SyntaxVisitor) {
    let mut cx = DeclContext::default();
    for member in &unit.members {
        match member {
            TopLevelMember::Namespace(ns) => {
                cx.namespace = ns.name.to_string();
                for ty in &ns.types {
                    walk_type(&mut cx, ty, v);
                }
                cx.namespace.clear();
            }
            TopLevelMember::Type(ty) => walk_type(&mut cx, ty, v),
        }
    }
}

fn walk_type(cx: &mut DeclContext, ty: &TypeDeclaration, v: &mut impl SyntaxVisitor) {
    let members = match ty {
        TypeDeclaration::Class(c) => &c.members,
        TypeDeclaration::Interface(i) => &i.members,
        TypeDeclaration::Enum(_) => return,
    };
    cx.types.push(ty.name().to_string());
    for member in members {
        match member {
            Member::Method(m) => {
                v.visit_method(cx, m);
                cx.method = Some(m.name.clone());
                if let Some(body) = &m.body {
                    walk_statement(cx, body, v);
                }
                if let Some(expr) = &m.expression_body {
                    walk_expr(cx, expr, v);
                }
                cx.method = None;
            }
            Member::Constructor(c) => {
                cx.method = Some(c.name.clone());
                if let Some(body) = &c.body {
                    walk_statement(cx, body, v);
                }
                cx.method = None;
            }
            Member::Field(f) => {
                if let Some(init) = &f.initializer {
                    walk_expr(cx, init, v);
                }
            }
            Member::Property(p) => {
                if let Some(init) = &p.initializer {
                    walk_expr(cx, init, v);
                }
            }
            Member::NestedType(nested) => walk_type(cx, nested, v),
        }
    }
    cx.types.pop();
}

fn walk_statement(cx: &DeclContext, stmt: &Statement, v: &mut impl SyntaxVisitor) {
    match stmt {
        Statement::Block(stmts) => {
            for s in stmts {
                walk_statement(cx, s, v);
            }
        }
        Statement::LocalDeclaration(decl) => {
            for d in &decl.declarators {
                if let Some(init) = &d.initializer {
                    walk_expr(cx, init, v);
                }
            }
        }
        Statement::Expression(e) => walk_expr(cx, e, v),
        Statement::If {
            condition,
            then_branch,
            else_branch,
        } => {
            walk_expr(cx, condition, v);
            walk_statement(cx, then_branch, v);
            if let Some(e) = else_branch {
                walk_statement(cx, e, v);
            }
        }
        Statement::While { condition, body } => {
            walk_expr(cx, condition, v);
            walk_statement(cx, body, v);
        }
        Statement::Do { body, condition } => {
            walk_statement(cx, body, v);
            walk_expr(cx, condition, v);
        }
        Statement::For {
            initializer,
            condition,
            iterators,
            body,
        } => {
            if let Some(init) = initializer {
                walk_statement(cx, init, v);
            }
            if let Some(c) = condition {
                walk_expr(cx, c, v);
            }
            for it in iterators {
                walk_expr(cx, it, v);
            }
            walk_statement(cx, body, v);
        }
        Statement::Foreach {
            collection, body, ..
        } => {
            walk_expr(cx, collection, v);
            walk_statement(cx, body, v);
        }
        Statement::Using { resource, body } => {
            match resource {
                UsingResource::Declaration(decl) => {
                    for d in &decl.declarators {
                        if let Some(init) = &d.initializer {
                            walk_expr(cx, init, v);
                        }
                    }
                }
                UsingResource::Expression(e) => walk_expr(cx, e, v),
            }
            walk_statement(cx, body, v);
        }
        Statement::Try {
            body,
            catches,
            finally_block,
        } => {
            walk_statement(cx, body, v);
            for c in catches {
                walk_statement(cx, &c.body, v);
            }
            if let Some(fin) = finally_block {
                walk_statement(cx, fin, v);
            }
        }
        Statement::Return(e) | Statement::Throw(e) => {
            if let Some(e) = e {
                walk_expr(cx, e, v);
            }
        }
        Statement::Break | Statement::Continue | Statement::Empty => {}
    }
}

fn walk_expr(cx: &DeclContext, expr: &Expr, v: &mut impl SyntaxVisitor) {
    v.visit_expr(cx, expr);
    match &expr.kind {
        ExprKind::Literal(_)
        | ExprKind::InterpolatedString(_)
        | ExprKind::Variable(_)
        | ExprKind::GenericName { .. }
        | ExprKind::Default(_)
        | ExprKind::Typeof(_)
        | ExprKind::This
        | ExprKind::Base => {}
        ExprKind::MemberAccess(ma) => walk_expr(cx, &ma.object, v),
        ExprKind::Invocation(inv) => {
            walk_expr(cx, &inv.callee, v);
            for arg in &inv.arguments {
                walk_expr(cx, &arg.expr, v);
            }
        }
        ExprKind::New(new) => {
            for arg in &new.arguments {
                walk_expr(cx, &arg.expr, v);
            }
            if let Some(entries) = &new.initializer {
                for entry in entries {
                    match entry {
                        ObjectInitializerEntry::Property { value, .. } => walk_expr(cx, value, v),
                        ObjectInitializerEntry::Indexer { indices, value } => {
                            for i in indices {
                                walk_expr(cx, i, v);
                            }
                            walk_expr(cx, value, v);
                        }
                        ObjectInitializerEntry::Expression(e) => walk_expr(cx, e, v),
                        ObjectInitializerEntry::Element(es) => {
                            for e in es {
                                walk_expr(cx, e, v);
                            }
                        }
                    }
                }
            }
        }
        ExprKind::ArrayCreation(arr) => {
            if let Some(len) = &arr.length {
                walk_expr(cx, len, v);
            }
            if let Some(elems) = &arr.initializer {
                for e in elems {
                    walk_expr(cx, e, v);
                }
            }
        }
        ExprKind::AnonymousObject(obj) => {
            for member in &obj.initializers {
                walk_expr(cx, &member.value, v);
            }
        }
        ExprKind::Lambda(lambda) => match &lambda.body {
            LambdaBody::Expression(e) => walk_expr(cx, e, v),
            LambdaBody::Block(b) => walk_statement(cx, b, v),
        },
        ExprKind::Cast { expr: inner, .. }
        | ExprKind::Nameof(inner)
        | ExprKind::Parenthesized(inner)
        | ExprKind::NullForgiving(inner)
        | ExprKind::Await(inner)
        | ExprKind::Unary { expr: inner, .. } => walk_expr(cx, inner, v),
        ExprKind::Conditional {
            condition,
            when_true,
            when_false,
        } => {
            walk_expr(cx, condition, v);
            walk_expr(cx, when_true, v);
            walk_expr(cx, when_false, v);
        }
        ExprKind::Binary { left, right, .. } => {
            walk_expr(cx, left, v);
            walk_expr(cx, right, v);
        }
        ExprKind::Assignment { target, value } => {
            walk_expr(cx, target, v);
            walk_expr(cx, value, v);
        }
        ExprKind::Indexing { target, indices } => {
            walk_expr(cx, target, v);
            for i in indices {
                walk_expr(cx, i, v);
            }
        }
    }
}

/// Convenience: visit every expression in the unit.
pub fn for_each_expression(unit: &CompilationUnit, f: impl FnMut(&DeclContext, &Expr)) {
    struct V<F>(F);
    impl<F: FnMut(&DeclContext, &Expr)> SyntaxVisitor for V<F> {
        fn visit_expr(&mut self, cx: &DeclContext, expr: &Expr) {
            (self.0)(cx, expr);
        }
    }
    walk_unit(unit, &mut V(f));
}

/// Convenience: visit every method declaration in the unit.
pub fn for_each_method(unit: &CompilationUnit, f: impl FnMut(&DeclContext, &MethodDeclaration)) {
    struct V<F>(F);
    impl<F: FnMut(&DeclContext, &MethodDeclaration)> SyntaxVisitor for V<F> {
        fn visit_method(&mut self, cx: &DeclContext, method: &MethodDeclaration) {
            (self.0)(cx, method);
        }
    }
    walk_unit(unit, &mut V(f));
}
