//! Direct and helper logger calls: `logger.LogInformation(...)`,
//! `logger.Log(LogLevel.Warning, ...)` and friends.

use crate::analysis::alignment::{AlignmentContext, AlignmentStrategy, ParamsArrayStrategy};
use crate::analysis::analyzers::{map_arguments, ArgumentMap, UsageAnalyzer};
use crate::analysis::model::{LogLevel, MessageParameter, MethodKind, UsageRecord};
use crate::analysis::operands::peel;
use crate::analysis::templates::parse_template;
use crate::analysis::{event_id, TreeContext};
use crate::errors::ExtractError;
use crate::semantic::{ConstValue, MethodSymbol};
use crate::syntax::expressions::{Expr, ExprKind};
use crate::syntax::visit::for_each_expression;
use log::warn;

/// Helper names whose suffix encodes the level.
const LEVEL_METHODS: &[(&str, LogLevel)] = &[
    ("LogTrace", LogLevel::Trace),
    ("LogDebug", LogLevel::Debug),
    ("LogInformation", LogLevel::Information),
    ("LogWarning", LogLevel::Warning),
    ("LogError", LogLevel::Error),
    ("LogCritical", LogLevel::Critical),
];

pub struct LoggerCallAnalyzer;

impl UsageAnalyzer for LoggerCallAnalyzer {
    fn name(&self) -> &'static str {
        "logger-calls"
    }

    fn analyze(&self, cx: &TreeContext<'_>) -> Result<Vec<UsageRecord>, ExtractError> {
        let mut records = Vec::new();
        for_each_expression(&cx.tree.root, |_, expr| {
            if cx.cancel.is_cancelled() {
                return;
            }
            if let Some(record) = analyze_invocation(cx, expr) {
                records.push(record);
            }
        });
        Ok(records)
    }
}

fn analyze_invocation(cx: &TreeContext<'_>, expr: &Expr) -> Option<UsageRecord> {
    let ExprKind::Invocation(inv) = &expr.kind else {
        return None;
    };
    let call = cx.model.resolved_call(expr)?;
    let method = cx.compilation.method(call.method);
    if !cx.registry.is_logger_method(method) {
        return None;
    }
    let static_level = LEVEL_METHODS
        .iter()
        .find(|(n, _)| *n == method.name)
        .map(|(_, l)| *l);
    if static_level.is_none() && method.name != "Log" {
        // BeginScope and IsEnabled have their own analyzers.
        return None;
    }

    let args = map_arguments(cx.compilation, call, inv);
    let level = static_level.or_else(|| level_from_arguments(cx, method, &args));
    let template = template_from_arguments(cx, method, &args);
    let event = event_id::from_arguments(cx, method, &args);
    let parameters = aligned_parameters(cx, template.as_deref(), &args);

    let location = cx.location(expr.span);
    Some(UsageRecord {
        id: location.identifier(),
        method_kind: MethodKind::DirectLogger,
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

/// The first argument typed as the level enum; only a constant field
/// reference counts.
pub(crate) fn level_from_arguments(
    cx: &TreeContext<'_>,
    method: &MethodSymbol,
    args: &ArgumentMap<'_>,
) -> Option<LogLevel> {
    for (index, param) in method.params.iter().enumerate() {
        if !param.ty.is_symbol(cx.registry.log_level) {
            continue;
        }
        let arg = args.for_param(index)?;
        return match cx.model.constant_of(peel(arg)) {
            Some(ConstValue::Enum { ty, value, .. }) if *ty == cx.registry.log_level => {
                LogLevel::from_value(*value)
            }
            _ => None,
        };
    }
    None
}

/// The first string-typed argument whose operand is a constant.
pub(crate) fn template_from_arguments(
    cx: &TreeContext<'_>,
    method: &MethodSymbol,
    args: &ArgumentMap<'_>,
) -> Option<String> {
    for (index, param) in method.params.iter().enumerate() {
        if param.is_params || !param.ty.strip_nullable().is_symbol(cx.compilation.corlib.string_)
        {
            continue;
        }
        if let Some(arg) = args.for_param(index) {
            if let Some(ConstValue::Str(s)) = cx.model.constant_of(peel(arg)) {
                return Some(s.clone());
            }
        }
    }
    None
}

/// Parse the template and run the params-array strategy, warning (once per
/// site) on malformed templates.
pub(crate) fn aligned_parameters(
    cx: &TreeContext<'_>,
    template: Option<&str>,
    args: &ArgumentMap<'_>,
) -> Vec<MessageParameter> {
    let Some(template) = template else {
        return Vec::new();
    };
    let placeholders = match parse_template(template) {
        Some(p) => p,
        None => {
            warn!(
                "{}: malformed message template {template:?}",
                cx.tree.file_path
            );
            return Vec::new();
        }
    };
    let acx = AlignmentContext {
        cx,
        placeholders: &placeholders,
        method: None,
        args: Some(args),
        type_args: &[],
        state: None,
    };
    ParamsArrayStrategy.try_extract(&acx).unwrap_or_default()
}
