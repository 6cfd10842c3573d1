//! `BeginScope` calls, in both the extension-helper form with a template
//! and the core form with a structural state argument.

use crate::analysis::alignment::{
    AlignmentContext, AlignmentStrategy, AnonymousObjectStrategy, KeyValuePairsStrategy,
};
use crate::analysis::analyzers::{
    logger_calls::{aligned_parameters, template_from_arguments},
    map_arguments, UsageAnalyzer,
};
use crate::analysis::model::{MessageParameter, MethodKind, UsageRecord};
use crate::analysis::operands::{operand_type_name, operation_kind, peel};
use crate::analysis::TreeContext;
use crate::errors::ExtractError;
use crate::syntax::expressions::{Expr, ExprKind};
use crate::syntax::visit::for_each_expression;

pub struct ScopeCallAnalyzer;

impl UsageAnalyzer for ScopeCallAnalyzer {
    fn name(&self) -> &'static str {
        "scope-calls"
    }

    fn analyze(&self, cx: &TreeContext<'_>) -> Result<Vec<UsageRecord>, ExtractError> {
        let mut records = Vec::new();
        for_each_expression(&cx.tree.root, |_, expr| {
            if cx.cancel.is_cancelled() {
                return;
            }
            if let Some(record) = analyze_scope(cx, expr) {
                records.push(record);
            }
        });
        Ok(records)
    }
}

fn analyze_scope(cx: &TreeContext<'_>, expr: &Expr) -> Option<UsageRecord> {
    let ExprKind::Invocation(inv) = &expr.kind else {
        return None;
    };
    let call = cx.model.resolved_call(expr)?;
    let method = cx.compilation.method(call.method);
    if method.name != "BeginScope" || !cx.registry.is_logger_method(method) {
        return None;
    }

    let args = map_arguments(cx.compilation, call, inv);
    let (template, parameters) = if method.is_extension {
        // Helper form: constant template plus a params array.
        let template = template_from_arguments(cx, method, &args);
        let parameters = aligned_parameters(cx, template.as_deref(), &args);
        (template, parameters)
    } else {
        // Core form: examine the state argument structurally.
        let state = args.for_param(0)?;
        (None, state_parameters(cx, state))
    };

    let location = cx.location(expr.span);
    Some(UsageRecord {
        id: location.identifier(),
        method_kind: MethodKind::ScopeBegin,
        method_name: method.name.clone(),
        level: None,
        event_id: None,
        message_template: template,
        parameters,
        log_properties: Vec::new(),
        invocations: Vec::new(),
        location,
    })
}

fn state_parameters(cx: &TreeContext<'_>, state: &Expr) -> Vec<MessageParameter> {
    let acx = AlignmentContext {
        cx,
        placeholders: &[],
        method: None,
        args: None,
        type_args: &[],
        state: Some(state),
    };

    // Key-value-pair shaped states come first; the strategy also covers
    // symbolic references typed as an enumerable of pairs.
    let is_kvp_shape = cx
        .model
        .type_of(peel(state))
        .map(|t| cx.compilation.is_kvp_enumerable(t))
        .unwrap_or(false);
    if is_kvp_shape {
        if let Some(parameters) = KeyValuePairsStrategy.try_extract(&acx) {
            return parameters;
        }
    }

    if let Some(parameters) = AnonymousObjectStrategy.try_extract(&acx) {
        return parameters;
    }

    // Anything else is a single opaque reference parameter.
    let inner = peel(state);
    vec![MessageParameter {
        name: cx.text(inner.span).to_string(),
        type_name: operand_type_name(cx, inner),
        kind: operation_kind(cx, inner),
    }]
}
