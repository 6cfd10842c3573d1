//! Rendering of extraction results. The result type itself is plain
//! serde data; these helpers only decide presentation.

use crate::analysis::model::{EventIdInfo, ExtractionResult, Operand, UsageRecord};
use std::fmt::Write as _;

pub fn to_json(result: &ExtractionResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

pub fn render_markdown(result: &ExtractionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Logging usage report\n");
    if result.partial {
        let _ = writeln!(out, "> Partial result: the run was cancelled.\n");
    }
    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(out, "| Method kind | Count |");
    let _ = writeln!(out, "|---|---|");
    for (kind, count) in &result.summary.by_kind {
        let _ = writeln!(out, "| {kind} | {count} |");
    }
    let _ = writeln!(out, "\n| Level | Count |");
    let _ = writeln!(out, "|---|---|");
    for (level, count) in &result.summary.by_level {
        let _ = writeln!(out, "| {level} | {count} |");
    }
    if !result.summary.inconsistencies.is_empty() {
        let _ = writeln!(out, "\n## Inconsistencies\n");
        for inconsistency in &result.summary.inconsistencies {
            let _ = writeln!(
                out,
                "- template `{}`: parameter {} typed as {}",
                inconsistency.normalized_template,
                inconsistency.position,
                inconsistency.types.join(" / "),
            );
        }
    }
    let _ = writeln!(out, "\n## Usages\n");
    for record in &result.records {
        let _ = writeln!(out, "### {}\n", record.id);
        let _ = writeln!(out, "- kind: {}", record.method_kind.as_str());
        let _ = writeln!(out, "- method: {}", record.method_name);
        if let Some(level) = record.level {
            let _ = writeln!(out, "- level: {level}");
        }
        if let Some(event) = &record.event_id {
            let _ = writeln!(out, "- event id: {}", render_event_id(event));
        }
        if let Some(template) = &record.message_template {
            let _ = writeln!(out, "- template: `{template}`");
        }
        for parameter in &record.parameters {
            let _ = writeln!(
                out,
                "- parameter `{}`: {} ({})",
                parameter.name, parameter.type_name, parameter.kind
            );
        }
        for invocation in &record.invocations {
            let _ = writeln!(
                out,
                "- called from {} at {}",
                invocation.containing_type,
                invocation.location.identifier()
            );
        }
        let _ = writeln!(out);
    }
    out
}

pub fn render_summary(result: &ExtractionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} logging usage(s)", result.records.len());
    for record in &result.records {
        let _ = writeln!(out, "  {}", render_record_line(record));
    }
    for (kind, count) in &result.summary.by_kind {
        let _ = writeln!(out, "{kind}: {count}");
    }
    if !result.summary.inconsistencies.is_empty() {
        let _ = writeln!(
            out,
            "{} template inconsistency(ies)",
            result.summary.inconsistencies.len()
        );
    }
    if result.partial {
        let _ = writeln!(out, "(partial: run was cancelled)");
    }
    out
}

fn render_record_line(record: &UsageRecord) -> String {
    let mut line = format!("{} {}", record.method_kind.as_str(), record.id);
    if let Some(level) = record.level {
        let _ = write!(line, " [{level}]");
    }
    if let Some(template) = &record.message_template {
        let _ = write!(line, " {template:?}");
    }
    line
}

fn render_event_id(event: &EventIdInfo) -> String {
    match event {
        EventIdInfo::Details { id, name } => {
            format!("{} ({})", render_operand(id), render_operand(name))
        }
        EventIdInfo::Ref { kind, text } => format!("{kind} `{text}`"),
    }
}

fn render_operand(operand: &Operand) -> String {
    match operand {
        Operand::Constant { value, .. } => value.to_string(),
        Operand::Reference { text, .. } => format!("`{text}`"),
        Operand::Missing => "-".to_string(),
    }
}
