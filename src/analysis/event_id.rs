//! Event-id extraction from argument lists and bare operands.

use crate::analysis::analyzers::ArgumentMap;
use crate::analysis::model::{EventIdInfo, Operand};
use crate::analysis::operands::{operand_type_name, operation_kind, peel, resolve_operand};
use crate::analysis::TreeContext;
use crate::semantic::{ConstValue, MethodSymbol};
use crate::syntax::expressions::{Expr, ExprKind};

/// Walk the callee's parameters, pick the first argument typed as the
/// event-id struct and extract it. Defaulted arguments are skipped in
/// favor of the next event-id parameter.
pub fn from_arguments(
    cx: &TreeContext<'_>,
    method: &MethodSymbol,
    args: &ArgumentMap<'_>,
) -> Option<EventIdInfo> {
    for (index, param) in method.params.iter().enumerate() {
        if !param.ty.is_symbol(cx.registry.event_id) {
            continue;
        }
        let Some(arg) = args.for_param(index) else {
            continue;
        };
        if resolve_operand(cx, arg).is_missing() {
            continue;
        }
        return Some(from_expr(cx, arg));
    }
    None
}

/// Extract from a bare operand.
pub fn from_expr(cx: &TreeContext<'_>, expr: &Expr) -> EventIdInfo {
    let inner = peel(expr);

    // Constructor form: `new EventId(7, "Name")`.
    if let ExprKind::New(new) = &inner.kind {
        let id = new
            .arguments
            .iter()
            .find(|a| a.name.is_none() || a.name.as_deref() == Some("id"))
            .map(|a| resolve_operand(cx, &a.expr))
            .unwrap_or(Operand::Missing);
        let name = new
            .arguments
            .iter()
            .filter(|a| a.name.is_none())
            .nth(1)
            .or_else(|| {
                new.arguments
                    .iter()
                    .find(|a| a.name.as_deref() == Some("name"))
            })
            .map(|a| resolve_operand(cx, &a.expr))
            .unwrap_or(Operand::Missing);
        if id.is_missing() && name.is_missing() {
            return EventIdInfo::Ref {
                kind: operation_kind(cx, inner),
                text: cx.text(inner.span).to_string(),
            };
        }
        return EventIdInfo::Details { id, name };
    }

    // Implicit conversion from a constant integer.
    if let Some(value) = cx.model.constant_of(inner) {
        if matches!(value, ConstValue::Int(_)) {
            return EventIdInfo::Details {
                id: Operand::Constant {
                    value: value.clone(),
                    type_name: operand_type_name(cx, inner),
                },
                name: Operand::Missing,
            };
        }
    }

    // Anything else stays symbolic.
    EventIdInfo::Ref {
        kind: operation_kind(cx, inner),
        text: cx.text(inner.span).to_string(),
    }
}
