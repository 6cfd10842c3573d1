use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A possibly dot-qualified name as it appears in source.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub enum Identifier {
    Simple(String),
    Qualified(Vec<String>),
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        let s: String = name.into();
        if s.contains('.') {
            Identifier::Qualified(s.split('.').map(|p| p.to_string()).collect())
        } else {
            Identifier::Simple(s)
        }
    }

    /// The final segment (`Logging` for `Microsoft.Extensions.Logging`).
    pub fn simple_name(&self) -> &str {
        match self {
            Identifier::Simple(s) => s,
            Identifier::Qualified(parts) => parts.last().map(|s| s.as_str()).unwrap_or(""),
        }
    }

    pub fn segments(&self) -> Vec<&str> {
        match self {
            Identifier::Simple(s) => vec![s.as_str()],
            Identifier::Qualified(parts) => parts.iter().map(|s| s.as_str()).collect(),
        }
    }

    pub fn is_qualified(&self) -> bool {
        matches!(self, Identifier::Qualified(_))
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Simple(name) => write!(f, "{name}"),
            Identifier::Qualified(segments) => write!(f, "{}", segments.join(".")),
        }
    }
}
