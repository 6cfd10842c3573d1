//! `[LoggerMessage]`-decorated partial methods whose bodies come from the
//! source generator.

use crate::analysis::alignment::{AlignmentContext, AlignmentStrategy, MethodSignatureStrategy};
use crate::analysis::analyzers::UsageAnalyzer;
use crate::analysis::model::{
    EventIdInfo, LogLevel, MethodKind, Operand, TemplatePlaceholder, UsageRecord,
};
use crate::analysis::properties::extract_log_properties;
use crate::analysis::templates::parse_template;
use crate::analysis::{xref, TreeContext};
use crate::errors::ExtractError;
use crate::semantic::{BoundAttribute, ConstValue};
use crate::syntax::visit::for_each_method;
use log::warn;

pub struct AttributeMethodAnalyzer;

impl UsageAnalyzer for AttributeMethodAnalyzer {
    fn name(&self) -> &'static str {
        "attribute-methods"
    }

    fn analyze(&self, cx: &TreeContext<'_>) -> Result<Vec<UsageRecord>, ExtractError> {
        let mut records = Vec::new();
        for_each_method(&cx.tree.root, |_, decl| {
            if cx.cancel.is_cancelled() || !decl.is_partial() {
                return;
            }
            let Some(method_id) = cx.compilation.declared_method(cx.tree_index, decl) else {
                return;
            };
            let method = cx.compilation.method(method_id);
            let Some(attr) = method.find_attribute(cx.registry.logger_message_attribute) else {
                return;
            };

            let (level, event, template) = read_attribute(cx, attr);
            let placeholders = parse_placeholders(cx, template.as_deref());
            let acx = AlignmentContext {
                cx,
                placeholders: &placeholders,
                method: Some(method),
                args: None,
                type_args: &[],
                state: None,
            };
            let parameters = MethodSignatureStrategy
                .try_extract(&acx)
                .unwrap_or_default();

            let location = cx.location(decl.name_span);
            records.push(UsageRecord {
                id: location.identifier(),
                method_kind: MethodKind::AttributeDeclared,
                method_name: method.name.clone(),
                level,
                event_id: event,
                message_template: template,
                parameters,
                log_properties: extract_log_properties(cx, method),
                invocations: xref::find_invocations(cx, method_id),
                location,
            });
        });
        Ok(records)
    }
}

fn parse_placeholders(cx: &TreeContext<'_>, template: Option<&str>) -> Vec<TemplatePlaceholder> {
    let Some(template) = template else {
        return Vec::new();
    };
    match parse_template(template) {
        Some(p) => p,
        None => {
            warn!(
                "{}: malformed message template {template:?}",
                cx.tree.file_path
            );
            Vec::new()
        }
    }
}

/// Read level, event id and template from the attribute, supporting the
/// positional constructor forms of arity 1, 2 and 3 plus named arguments.
fn read_attribute(
    cx: &TreeContext<'_>,
    attr: &BoundAttribute,
) -> (Option<LogLevel>, Option<EventIdInfo>, Option<String>) {
    let mut level = None;
    let mut event_id: Option<i64> = None;
    let mut event_name: Option<String> = None;
    let mut template = None;

    let positional: Vec<_> = attr.positional().collect();
    match positional.as_slice() {
        // (LogLevel) or (string message)
        [single] => match &single.value {
            Some(ConstValue::Enum { value, .. }) => level = LogLevel::from_value(*value),
            Some(ConstValue::Str(s)) => template = Some(s.clone()),
            _ => {}
        },
        // (LogLevel, string message)
        [first, second] => {
            if let Some(ConstValue::Enum { value, .. }) = &first.value {
                level = LogLevel::from_value(*value);
            }
            if let Some(ConstValue::Str(s)) = &second.value {
                template = Some(s.clone());
            }
        }
        // (int eventId, LogLevel, string message)
        [first, second, third] => {
            if let Some(ConstValue::Int(v)) = &first.value {
                event_id = Some(*v);
            }
            if let Some(ConstValue::Enum { value, .. }) = &second.value {
                level = LogLevel::from_value(*value);
            }
            if let Some(ConstValue::Str(s)) = &third.value {
                template = Some(s.clone());
            }
        }
        _ => {}
    }

    // Named arguments override the positional forms.
    if let Some(arg) = attr.named("Level") {
        match &arg.value {
            Some(ConstValue::Enum { value, .. }) | Some(ConstValue::Int(value)) => {
                level = LogLevel::from_value(*value);
            }
            _ => {}
        }
    }
    if let Some(arg) = attr.named("EventId") {
        if let Some(v) = arg.value.as_ref().and_then(|v| v.as_int()) {
            event_id = Some(v);
        }
    }
    if let Some(arg) = attr.named("EventName") {
        if let Some(s) = arg.value.as_ref().and_then(|v| v.as_str()) {
            event_name = Some(s.to_string());
        }
    }
    if let Some(arg) = attr.named("Message") {
        if let Some(s) = arg.value.as_ref().and_then(|v| v.as_str()) {
            template = Some(s.to_string());
        }
    }

    // Whichever of id/name is present forms the details; with neither,
    // the event id is absent from the record entirely.
    let int_type = cx
        .compilation
        .display_type(&crate::semantic::TypeRef::named(cx.compilation.corlib.int32));
    let event = match (event_id, event_name) {
        (None, None) => None,
        (id, name) => Some(EventIdInfo::Details {
            id: id
                .map(|v| Operand::Constant {
                    value: ConstValue::Int(v),
                    type_name: int_type,
                })
                .unwrap_or(Operand::Missing),
            name: name
                .map(|s| Operand::Constant {
                    value: ConstValue::Str(s),
                    type_name: "string".to_string(),
                })
                .unwrap_or(Operand::Missing),
        }),
    };
    (level, event, template)
}
