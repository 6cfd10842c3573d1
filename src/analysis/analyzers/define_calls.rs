//! `LoggerMessage.Define<...>(...)` delegate-factory calls.

use crate::analysis::alignment::{
    AlignmentContext, AlignmentStrategy, GenericTypeArgumentsStrategy,
};
use crate::analysis::analyzers::{
    logger_calls::{level_from_arguments, template_from_arguments},
    map_arguments, UsageAnalyzer,
};
use crate::analysis::model::{MethodKind, UsageRecord};
use crate::analysis::templates::parse_template;
use crate::analysis::{event_id, TreeContext};
use crate::errors::ExtractError;
use crate::syntax::expressions::{Expr, ExprKind};
use crate::syntax::visit::for_each_expression;
use log::warn;

pub struct DefineCallAnalyzer;

impl UsageAnalyzer for DefineCallAnalyzer {
    fn name(&self) -> &'static str {
        "define-calls"
    }

    fn analyze(&self, cx: &TreeContext<'_>) -> Result<Vec<UsageRecord>, ExtractError> {
        let mut records = Vec::new();
        for_each_expression(&cx.tree.root, |_, expr| {
            if cx.cancel.is_cancelled() {
                return;
            }
            if let Some(record) = analyze_define(cx, expr) {
                records.push(record);
            }
        });
        Ok(records)
    }
}

fn analyze_define(cx: &TreeContext<'_>, expr: &Expr) -> Option<UsageRecord> {
    let ExprKind::Invocation(inv) = &expr.kind else {
        return None;
    };
    let call = cx.model.resolved_call(expr)?;
    let method = cx.compilation.method(call.method);
    if method.containing != cx.registry.logger_message_class || method.name != "Define" {
        return None;
    }

    let args = map_arguments(cx.compilation, call, inv);
    let level = level_from_arguments(cx, method, &args);
    let template = template_from_arguments(cx, method, &args);
    let event = event_id::from_arguments(cx, method, &args);

    let parameters = match &template {
        Some(template) => match parse_template(template) {
            Some(placeholders) => {
                let acx = AlignmentContext {
                    cx,
                    placeholders: &placeholders,
                    method: Some(method),
                    args: Some(&args),
                    type_args: &call.type_args,
                    state: None,
                };
                GenericTypeArgumentsStrategy
                    .try_extract(&acx)
                    .unwrap_or_default()
            }
            None => {
                warn!(
                    "{}: malformed message template {template:?}",
                    cx.tree.file_path
                );
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let location = cx.location(expr.span);
    Some(UsageRecord {
        id: location.identifier(),
        method_kind: MethodKind::DelegateFactory,
        method_name: method.name.clone(),
        level,
        event_id: event,
        message_template: template,
        parameters,
        log_properties: Vec::new(),
        invocations: Vec::new(),
        location,
    })
}
