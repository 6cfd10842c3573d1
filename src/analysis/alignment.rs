//! Parameter alignment strategies.
//!
//! Five ways of matching template placeholders with concrete program
//! entities, behind one narrow contract. Analyzers pick the strategy that
//! fits the surface form; a strategy that does not apply returns `None`.

use crate::analysis::analyzers::ArgumentMap;
use crate::analysis::model::{MessageParameter, Operand, TemplatePlaceholder};
use crate::analysis::operands::{operand_type_name, operation_kind, peel, resolve_operand};
use crate::analysis::TreeContext;
use crate::semantic::{ConstValue, MethodSymbol, TypeRef};
use crate::syntax::expressions::{Expr, ExprKind, ObjectInitializerEntry};

/// Inputs an alignment strategy may draw on; unused fields stay `None`.
pub struct AlignmentContext<'a> {
    pub cx: &'a TreeContext<'a>,
    pub placeholders: &'a [TemplatePlaceholder],
    pub method: Option<&'a MethodSymbol>,
    pub args: Option<&'a ArgumentMap<'a>>,
    pub type_args: &'a [TypeRef],
    pub state: Option<&'a Expr>,
}

pub trait AlignmentStrategy {
    fn name(&self) -> &'static str;
    fn try_extract(&self, acx: &AlignmentContext<'_>) -> Option<Vec<MessageParameter>>;
}

/// Trailing `params object?[]` arguments, element i -> placeholder i.
pub struct ParamsArrayStrategy;

/// Method signature parameters matched to placeholders by name.
pub struct MethodSignatureStrategy;

/// Invocation generic type arguments, position i -> placeholder i.
pub struct GenericTypeArgumentsStrategy;

/// Properties of an anonymous object state.
pub struct AnonymousObjectStrategy;

/// `(string, object?)` pairs discovered inside a collection state.
pub struct KeyValuePairsStrategy;

fn parameter_from_operand(
    cx: &TreeContext<'_>,
    name: &str,
    expr: &Expr,
) -> Option<MessageParameter> {
    match resolve_operand(cx, expr) {
        Operand::Constant { type_name, .. } => Some(MessageParameter {
            name: name.to_string(),
            type_name,
            kind: "Constant".to_string(),
        }),
        Operand::Reference { .. } => Some(MessageParameter {
            name: name.to_string(),
            type_name: operand_type_name(cx, peel(expr)),
            kind: "Reference".to_string(),
        }),
        // An absent slot is not fabricated.
        Operand::Missing => None,
    }
}

impl AlignmentStrategy for ParamsArrayStrategy {
    fn name(&self) -> &'static str {
        "params-array"
    }

    fn try_extract(&self, acx: &AlignmentContext<'_>) -> Option<Vec<MessageParameter>> {
        let args = acx.args?;
        args.params_index()?;
        let cx = acx.cx;
        let collected = args.params_args();
        if acx.placeholders.is_empty() {
            return Some(Vec::new());
        }

        // A single literal array-creation argument supplies its elements.
        if collected.len() == 1 {
            let arg = peel(collected[0]);
            if let ExprKind::ArrayCreation(arr) = &arg.kind {
                if let Some(elements) = &arr.initializer {
                    return Some(align_elements(cx, acx.placeholders, elements.iter()));
                }
            }
            // Any other single argument covers the whole placeholder list
            // as one opaque reference.
            if !matches!(arg.kind, ExprKind::ArrayCreation(_)) {
                let is_array = cx
                    .model
                    .type_of(arg)
                    .map(|t| matches!(t.strip_nullable(), TypeRef::Array(_)))
                    .unwrap_or(false);
                if is_array {
                    let name = &acx.placeholders[0].name;
                    return Some(
                        parameter_from_operand(cx, name, collected[0])
                            .into_iter()
                            .collect(),
                    );
                }
            }
        }

        Some(align_elements(cx, acx.placeholders, collected.into_iter()))
    }
}

fn align_elements<'e>(
    cx: &TreeContext<'_>,
    placeholders: &[TemplatePlaceholder],
    elements: impl Iterator<Item = &'e Expr>,
) -> Vec<MessageParameter> {
    placeholders
        .iter()
        .zip(elements)
        .filter_map(|(placeholder, element)| parameter_from_operand(cx, &placeholder.name, element))
        .collect()
}

impl AlignmentStrategy for MethodSignatureStrategy {
    fn name(&self) -> &'static str {
        "method-signature"
    }

    fn try_extract(&self, acx: &AlignmentContext<'_>) -> Option<Vec<MessageParameter>> {
        let method = acx.method?;
        let cx = acx.cx;
        let registry = cx.registry;
        let eligible: Vec<_> = method
            .params
            .iter()
            .filter(|p| {
                let ty = p.ty.strip_nullable();
                !(ty.is_symbol(registry.logger_interface)
                    || registry
                        .generic_logger_interface
                        .map(|g| ty.is_symbol(g))
                        .unwrap_or(false)
                    || ty.is_symbol(registry.log_level)
                    || registry.is_exception_type(cx.compilation, ty))
            })
            .collect();
        let mut out = Vec::new();
        // Each placeholder occurrence gets its own match.
        for placeholder in acx.placeholders {
            if let Some(param) = eligible
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(&placeholder.name))
            {
                out.push(MessageParameter {
                    name: param.name.clone(),
                    type_name: cx.compilation.display_type(&param.ty),
                    kind: "MethodParameter".to_string(),
                });
            }
        }
        Some(out)
    }
}

impl AlignmentStrategy for GenericTypeArgumentsStrategy {
    fn name(&self) -> &'static str {
        "generic-type-arguments"
    }

    fn try_extract(&self, acx: &AlignmentContext<'_>) -> Option<Vec<MessageParameter>> {
        if acx.type_args.is_empty() {
            return Some(Vec::new());
        }
        Some(
            acx.placeholders
                .iter()
                .zip(acx.type_args.iter())
                .map(|(placeholder, ty)| MessageParameter {
                    name: placeholder.name.clone(),
                    type_name: acx.cx.compilation.display_type(ty),
                    kind: "GenericTypeArgument".to_string(),
                })
                .collect(),
        )
    }
}

impl AlignmentStrategy for AnonymousObjectStrategy {
    fn name(&self) -> &'static str {
        "anonymous-object"
    }

    fn try_extract(&self, acx: &AlignmentContext<'_>) -> Option<Vec<MessageParameter>> {
        let state = peel(acx.state?);
        let ExprKind::AnonymousObject(obj) = &state.kind else {
            return None;
        };
        let cx = acx.cx;
        Some(
            obj.initializers
                .iter()
                .filter_map(|member| {
                    let name = member.effective_name()?;
                    Some(MessageParameter {
                        name: name.to_string(),
                        type_name: operand_type_name(cx, &member.value),
                        kind: "AnonymousProperty".to_string(),
                    })
                })
                .collect(),
        )
    }
}

impl AlignmentStrategy for KeyValuePairsStrategy {
    fn name(&self) -> &'static str {
        "key-value-pairs"
    }

    fn try_extract(&self, acx: &AlignmentContext<'_>) -> Option<Vec<MessageParameter>> {
        let cx = acx.cx;
        let state = peel(acx.state?);
        let mut out = Vec::new();
        match &state.kind {
            ExprKind::New(new) => {
                if let Some(entries) = &new.initializer {
                    for entry in entries {
                        collect_pair_entry(cx, entry, &mut out);
                    }
                } else {
                    return None;
                }
            }
            ExprKind::ArrayCreation(arr) => {
                for element in arr.initializer.as_deref().unwrap_or_default() {
                    collect_pair_expr(cx, element, &mut out);
                }
            }
            // A symbolic reference to an enumerable-of-pairs collapses to
            // one parameter covering the whole collection.
            _ => {
                let ty = cx.model.type_of(state)?;
                if !cx.compilation.is_kvp_enumerable(ty) {
                    return None;
                }
                out.push(MessageParameter {
                    name: cx.text(state.span).to_string(),
                    type_name: cx.compilation.display_type(ty),
                    kind: operation_kind(cx, state),
                });
            }
        }
        Some(out)
    }
}

fn collect_pair_entry(
    cx: &TreeContext<'_>,
    entry: &ObjectInitializerEntry,
    out: &mut Vec<MessageParameter>,
) {
    match entry {
        // `["Key"] = value` dictionary indexer assignment.
        ObjectInitializerEntry::Indexer { indices, value } => {
            if let [key] = indices.as_slice() {
                push_pair(cx, key, value, out);
            }
        }
        // `{ "Key", value }` element initializer.
        ObjectInitializerEntry::Element(parts) => {
            if let [key, value] = parts.as_slice() {
                push_pair(cx, key, value, out);
            }
        }
        ObjectInitializerEntry::Expression(expr) => collect_pair_expr(cx, expr, out),
        ObjectInitializerEntry::Property { .. } => {}
    }
}

/// A constructor call of the pair type: `new KeyValuePair<...>("k", v)` or
/// target-typed `new("k", v)`.
fn collect_pair_expr(cx: &TreeContext<'_>, expr: &Expr, out: &mut Vec<MessageParameter>) {
    let expr = peel(expr);
    if let ExprKind::New(new) = &expr.kind {
        let positional: Vec<&Expr> = new
            .arguments
            .iter()
            .filter(|a| a.name.is_none())
            .map(|a| &a.expr)
            .collect();
        if let [key, value] = positional.as_slice() {
            push_pair(cx, key, value, out);
        }
    }
}

fn push_pair(cx: &TreeContext<'_>, key: &Expr, value: &Expr, out: &mut Vec<MessageParameter>) {
    let Some(ConstValue::Str(name)) = cx.model.constant_of(peel(key)).cloned() else {
        return;
    };
    let kind = if cx.model.constant_of(peel(value)).is_some() {
        "Constant".to_string()
    } else {
        operation_kind(cx, peel(value))
    };
    out.push(MessageParameter {
        name,
        type_name: operand_type_name(cx, peel(value)),
        kind,
    });
}
