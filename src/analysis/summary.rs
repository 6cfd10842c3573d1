//! Cross-record summary views: counts, the parameter-name histogram and
//! template inconsistency detection.

use crate::analysis::model::{ExtractionSummary, TemplateInconsistency, UsageRecord};
use crate::analysis::templates::normalize_template;
use std::collections::BTreeMap;

pub fn build(records: &[UsageRecord]) -> ExtractionSummary {
    let mut by_kind: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_level: BTreeMap<String, usize> = BTreeMap::new();
    let mut parameter_names: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        *by_kind
            .entry(record.method_kind.as_str().to_string())
            .or_default() += 1;
        if let Some(level) = record.level {
            *by_level.entry(level.as_str().to_string()).or_default() += 1;
        }
        for parameter in &record.parameters {
            *parameter_names.entry(parameter.name.clone()).or_default() += 1;
        }
    }
    ExtractionSummary {
        by_kind,
        by_level,
        parameter_names,
        inconsistencies: find_inconsistencies(records),
    }
}

/// Records whose templates normalize to the same canonical form must agree
/// on the type of each positional parameter.
fn find_inconsistencies(records: &[UsageRecord]) -> Vec<TemplateInconsistency> {
    let mut groups: BTreeMap<String, Vec<&UsageRecord>> = BTreeMap::new();
    for record in records {
        if let Some(template) = &record.message_template {
            groups
                .entry(normalize_template(template))
                .or_default()
                .push(record);
        }
    }

    let mut out = Vec::new();
    for (normalized, group) in groups {
        if group.len() < 2 {
            continue;
        }
        let widest = group.iter().map(|r| r.parameters.len()).max().unwrap_or(0);
        for position in 0..widest {
            let mut types: Vec<String> = group
                .iter()
                .filter_map(|r| r.parameters.get(position))
                .map(|p| p.type_name.clone())
                .collect();
            types.sort();
            types.dedup();
            if types.len() > 1 {
                out.push(TemplateInconsistency {
                    normalized_template: normalized.clone(),
                    position,
                    types,
                    records: group.iter().map(|r| r.id.clone()).collect(),
                });
            }
        }
    }
    out
}
