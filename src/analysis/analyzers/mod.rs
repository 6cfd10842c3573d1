//! Call-site analyzers. Each one scans a tree for one surface form of the
//! logging API and yields usage records through a shared contract.

pub mod attribute_methods;
pub mod define_calls;
pub mod logger_calls;
pub mod scope_calls;

use crate::analysis::model::UsageRecord;
use crate::analysis::TreeContext;
use crate::errors::ExtractError;
use crate::semantic::{Compilation, ResolvedCall};
use crate::syntax::expressions::{Expr, InvocationExpression};

pub trait UsageAnalyzer: Sync {
    fn name(&self) -> &'static str;
    fn analyze(&self, cx: &TreeContext<'_>) -> Result<Vec<UsageRecord>, ExtractError>;
}

/// The fixed analyzer registry, run in order on every tree.
pub fn analyzers() -> [&'static dyn UsageAnalyzer; 4] {
    [
        &logger_calls::LoggerCallAnalyzer,
        &attribute_methods::AttributeMethodAnalyzer,
        &define_calls::DefineCallAnalyzer,
        &scope_calls::ScopeCallAnalyzer,
    ]
}

/// Syntactic arguments aligned to the resolved method's formal parameters.
/// Extension-call receivers occupy formal slot 0; positional arguments at
/// or past a `params` parameter all map to that slot.
pub struct ArgumentMap<'a> {
    pairs: Vec<(usize, &'a Expr)>,
    params_index: Option<usize>,
}

pub fn map_arguments<'a>(
    compilation: &Compilation,
    call: &ResolvedCall,
    inv: &'a InvocationExpression,
) -> ArgumentMap<'a> {
    let method = compilation.method(call.method);
    let offset = usize::from(call.is_extension);
    let params_index = method.params.iter().position(|p| p.is_params);
    let mut pairs = Vec::with_capacity(inv.arguments.len());
    for (i, arg) in inv.arguments.iter().enumerate() {
        let slot = match &arg.name {
            Some(name) => method.params.iter().position(|p| p.name == *name),
            None => Some(i + offset),
        };
        if let Some(mut slot) = slot {
            if let Some(pi) = params_index {
                if slot > pi {
                    slot = pi;
                }
            }
            pairs.push((slot, &arg.expr));
        }
    }
    ArgumentMap { pairs, params_index }
}

impl<'a> ArgumentMap<'a> {
    /// The argument occupying a fixed parameter slot.
    pub fn for_param(&self, index: usize) -> Option<&'a Expr> {
        self.pairs
            .iter()
            .find(|(slot, _)| *slot == index)
            .map(|(_, e)| *e)
    }

    /// All arguments collected by the trailing `params` parameter.
    pub fn params_args(&self) -> Vec<&'a Expr> {
        match self.params_index {
            Some(pi) => self
                .pairs
                .iter()
                .filter(|(slot, _)| *slot == pi)
                .map(|(_, e)| *e)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn params_index(&self) -> Option<usize> {
        self.params_index
    }
}
