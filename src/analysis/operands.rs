//! Operand classification.
//!
//! Wrapper expressions (parentheses, casts, the null-forgiving postfix,
//! `await`) are peeled to the producing expression, which then classifies
//! as `Missing`, `Constant` or `Reference`. User code is never evaluated.

use crate::analysis::model::Operand;
use crate::analysis::TreeContext;
use crate::semantic::BoundRef;
use crate::syntax::expressions::{Expr, ExprKind};

/// Strip conversion-like wrappers down to the producing expression.
pub fn peel(expr: &Expr) -> &Expr {
    match &expr.kind {
        ExprKind::Parenthesized(inner)
        | ExprKind::NullForgiving(inner)
        | ExprKind::Await(inner)
        | ExprKind::Cast { expr: inner, .. } => peel(inner),
        _ => expr,
    }
}

pub fn resolve_operand(cx: &TreeContext<'_>, expr: &Expr) -> Operand {
    let inner = peel(expr);
    // `default` and `default(T)` mean "argument absent".
    if matches!(inner.kind, ExprKind::Default(_)) {
        return Operand::Missing;
    }
    if let Some(value) = cx.model.constant_of(inner).or_else(|| cx.model.constant_of(expr)) {
        return Operand::Constant {
            value: value.clone(),
            type_name: operand_type_name(cx, inner),
        };
    }
    Operand::Reference {
        kind: operation_kind(cx, inner),
        text: cx.text(inner.span).to_string(),
    }
}

/// Display type of an operand, falling back to `object`.
pub fn operand_type_name(cx: &TreeContext<'_>, expr: &Expr) -> String {
    match cx.model.type_of(expr) {
        Some(ty) if !ty.is_error() => cx.compilation.display_type(ty),
        _ => "object".to_string(),
    }
}

/// Operation-kind tag for reference operands, in the semantic model's
/// vocabulary rather than raw syntax kinds.
pub fn operation_kind(cx: &TreeContext<'_>, expr: &Expr) -> String {
    let from_ref = |r: &BoundRef| -> Option<&'static str> {
        Some(match r {
            BoundRef::Local => "LocalReference",
            BoundRef::Parameter => "ParameterReference",
            BoundRef::Field(_) | BoundRef::EnumMember(_) => "FieldReference",
            BoundRef::Property(_) => "PropertyReference",
            BoundRef::Type(_) => "TypeReference",
            BoundRef::Namespace(_) => return None,
        })
    };
    if let Some(kind) = cx.model.bound_ref(expr).and_then(from_ref) {
        return kind.to_string();
    }
    match &expr.kind {
        ExprKind::Variable(_) | ExprKind::GenericName { .. } => "IdentifierName",
        ExprKind::MemberAccess(_) => "MemberAccess",
        ExprKind::Invocation(_) => "Invocation",
        ExprKind::New(_) => "ObjectCreation",
        ExprKind::ArrayCreation(_) => "ArrayCreation",
        ExprKind::AnonymousObject(_) => "AnonymousObjectCreation",
        ExprKind::Lambda(_) => "Lambda",
        ExprKind::Conditional { .. } => "Conditional",
        ExprKind::Binary { .. } => "BinaryOperation",
        ExprKind::Unary { .. } => "UnaryOperation",
        ExprKind::Assignment { .. } => "Assignment",
        ExprKind::Indexing { .. } => "ElementAccess",
        ExprKind::InterpolatedString(_) => "InterpolatedString",
        ExprKind::Literal(_) => "Literal",
        ExprKind::Typeof(_) => "TypeOf",
        ExprKind::Nameof(_) => "NameOf",
        ExprKind::Default(_) => "DefaultValue",
        ExprKind::This | ExprKind::Base => "InstanceReference",
        ExprKind::Await(_) => "Await",
        ExprKind::Cast { .. } => "Conversion",
        ExprKind::Parenthesized(_) | ExprKind::NullForgiving(_) => "Conversion",
    }
    .to_string()
}
