//! Extraction data model. Everything here is an owned value record holding
//! no handles back into syntax or semantic trees, so results stay valid
//! after the compilation is dropped.

use crate::semantic::ConstValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Source range of a record; 1-based, inclusive start, exclusive end column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Location {
    /// The stable usage identifier: `filepath:line:column`.
    pub fn identifier(&self) -> String {
        format!("{}:{}:{}", self.file, self.start_line, self.start_column)
    }
}

/// One `{Name}` hole in a message template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePlaceholder {
    pub name: String,
    /// 0-based position in the template.
    pub index: usize,
}

/// A classified call-site operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Constant { value: ConstValue, type_name: String },
    Reference { kind: String, text: String },
    Missing,
}

impl Operand {
    pub fn is_missing(&self) -> bool {
        matches!(self, Operand::Missing)
    }
}

/// An extracted event id: recovered details, or a symbolic reference the
/// analyzer chose not to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventIdInfo {
    Details { id: Operand, name: Operand },
    Ref { kind: String, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageParameter {
    pub name: String,
    pub type_name: String,
    /// How the parameter was discovered: "Constant", "Reference",
    /// "MethodParameter", "GenericTypeArgument", "AnonymousProperty", or
    /// an operation-kind tag.
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Information,
    Warning,
    Error,
    Critical,
    None,
}

impl LogLevel {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Trace" => Some(LogLevel::Trace),
            "Debug" => Some(LogLevel::Debug),
            "Information" => Some(LogLevel::Information),
            "Warning" => Some(LogLevel::Warning),
            "Error" => Some(LogLevel::Error),
            "Critical" => Some(LogLevel::Critical),
            "None" => Some(LogLevel::None),
            _ => Option::None,
        }
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(LogLevel::Trace),
            1 => Some(LogLevel::Debug),
            2 => Some(LogLevel::Information),
            3 => Some(LogLevel::Warning),
            4 => Some(LogLevel::Error),
            5 => Some(LogLevel::Critical),
            6 => Some(LogLevel::None),
            _ => Option::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "Trace",
            LogLevel::Debug => "Debug",
            LogLevel::Information => "Information",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
            LogLevel::Critical => "Critical",
            LogLevel::None => "None",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One property discovered on a `[LogProperties]` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPropertyInfo {
    pub name: String,
    /// Tag name after `[TagName]` renames.
    pub tag_name: String,
    pub type_name: String,
    pub nullable: bool,
    pub classification: Option<String>,
    /// Populated only for transitive extraction.
    pub nested: Vec<LogPropertyInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagProviderSpec {
    pub parameter_name: String,
    pub provider_type: String,
    pub provider_method: String,
    pub omit_reference_name: bool,
    pub valid: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPropertiesParameter {
    pub parameter_name: String,
    pub owner_type: String,
    pub omit_reference_name: bool,
    pub skip_null: bool,
    pub transitive: bool,
    pub properties: Vec<LogPropertyInfo>,
    pub tag_provider: Option<TagProviderSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    DirectLogger,
    AttributeDeclared,
    DelegateFactory,
    ScopeBegin,
}

impl MethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodKind::DirectLogger => "DirectLogger",
            MethodKind::AttributeDeclared => "AttributeDeclared",
            MethodKind::DelegateFactory => "DelegateFactory",
            MethodKind::ScopeBegin => "ScopeBegin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    pub name: String,
    pub type_name: String,
}

/// One call site of an attribute-declared log method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationRecord {
    pub containing_type: String,
    pub location: Location,
    pub arguments: Vec<ArgumentDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// `filepath:line:column`, unique within one extraction run.
    pub id: String,
    pub method_kind: MethodKind,
    pub method_name: String,
    pub level: Option<LogLevel>,
    pub event_id: Option<EventIdInfo>,
    pub message_template: Option<String>,
    pub parameters: Vec<MessageParameter>,
    pub log_properties: Vec<LogPropertiesParameter>,
    /// Call sites; populated for attribute-declared methods only.
    pub invocations: Vec<InvocationRecord>,
    pub location: Location,
}

/// Two templates with the same shape but differently-typed parameters at
/// one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInconsistency {
    pub normalized_template: String,
    pub position: usize,
    pub types: Vec<String>,
    pub records: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExtractionSummary {
    pub by_kind: BTreeMap<String, usize>,
    pub by_level: BTreeMap<String, usize>,
    pub parameter_names: BTreeMap<String, usize>,
    pub inconsistencies: Vec<TemplateInconsistency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExtractionResult {
    pub records: Vec<UsageRecord>,
    pub summary: ExtractionSummary,
    /// Set when the run was cancelled before every tree completed; never
    /// inferred from record counts.
    pub partial: bool,
}

impl ExtractionResult {
    pub fn empty() -> Self {
        Self::default()
    }
}
