//! Logging-usage extraction.
//!
//! Four call-site analyzers run over each syntax tree and produce
//! [`UsageRecord`](model::UsageRecord)s: direct or helper logger calls,
//! `[LoggerMessage]` partial methods, `LoggerMessage.Define` factory calls
//! and `BeginScope` scopes. The driver fans trees out in parallel, merges
//! the outputs and computes the summary views.

pub mod alignment;
pub mod analyzers;
pub mod driver;
pub mod event_id;
pub mod model;
pub mod operands;
pub mod properties;
pub mod registry;
pub mod summary;
pub mod templates;
pub mod xref;

use crate::analysis::driver::{CancellationToken, ExtractionOptions};
use crate::analysis::model::Location;
use crate::analysis::registry::LoggingTypes;
use crate::semantic::{Compilation, SemanticModel, SyntaxTree};
use crate::span::TextSpan;
use crate::workspace::Solution;

/// Everything an analyzer needs to process one syntax tree.
pub struct TreeContext<'a> {
    pub compilation: &'a Compilation,
    pub tree_index: usize,
    pub tree: &'a SyntaxTree,
    pub model: &'a SemanticModel,
    pub registry: &'a LoggingTypes,
    pub solution: Option<&'a Solution>,
    pub options: &'a ExtractionOptions,
    pub cancel: &'a CancellationToken,
}

impl<'a> TreeContext<'a> {
    pub fn location(&self, span: TextSpan) -> Location {
        location_in_tree(self.tree, span)
    }

    pub fn text(&self, span: TextSpan) -> &'a str {
        self.tree.text(span)
    }
}

/// Map a span in a tree to a record location.
pub fn location_in_tree(tree: &SyntaxTree, span: TextSpan) -> Location {
    let (start_line, start_column) = tree.line_col(span.start);
    let (end_line, end_column) = tree.line_col(span.end);
    Location {
        file: tree.file_path.clone(),
        start_line,
        start_column,
        end_line,
        end_column,
    }
}
