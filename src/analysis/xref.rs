//! Cross-reference finder for attribute-declared log methods.
//!
//! With a solution, the walk runs over the solution's combined compilation
//! so calls from one project into another still bind. Identity across
//! compilations cannot use symbol ids (each compilation interns its own),
//! so the generator-synthesized counterpart is matched by containing type,
//! name and parameter-type sequence. Without a solution the fallback scans
//! only the current tree; that incompleteness is part of the contract.

use crate::analysis::model::{ArgumentDescriptor, InvocationRecord};
use crate::analysis::{location_in_tree, TreeContext};
use crate::semantic::{Compilation, MethodId, ResolvedCall, SemanticModel, SyntaxTree};
use crate::syntax::expressions::{Argument, ExprKind};
use crate::syntax::visit::for_each_expression;

/// Cross-compilation identity of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MethodFingerprint {
    containing_type: String,
    name: String,
    parameter_types: Vec<String>,
}

fn fingerprint(compilation: &Compilation, method: MethodId) -> MethodFingerprint {
    let m = compilation.method(method);
    MethodFingerprint {
        containing_type: compilation.type_symbol(m.containing).fqn(),
        name: m.name.clone(),
        parameter_types: m
            .params
            .iter()
            .map(|p| compilation.display_type(&p.ty))
            .collect(),
    }
}

pub fn find_invocations(cx: &TreeContext<'_>, target: MethodId) -> Vec<InvocationRecord> {
    match cx.solution {
        Some(solution) => {
            let print = fingerprint(cx.compilation, target);
            let compilation = solution.combined();
            let mut out = Vec::new();
            for (index, tree) in compilation.trees().iter().enumerate() {
                if cx.cancel.is_cancelled() {
                    break;
                }
                let model = compilation.semantic_model(index);
                collect_tree_invocations(compilation, tree, model, &mut out, |call| {
                    fingerprint(compilation, call.method) == print
                });
            }
            out
        }
        None => {
            let mut out = Vec::new();
            collect_tree_invocations(cx.compilation, cx.tree, cx.model, &mut out, |call| {
                call.method == target
            });
            out
        }
    }
}

fn collect_tree_invocations(
    compilation: &Compilation,
    tree: &SyntaxTree,
    model: &SemanticModel,
    out: &mut Vec<InvocationRecord>,
    matches: impl Fn(&ResolvedCall) -> bool,
) {
    for_each_expression(&tree.root, |decl_cx, expr| {
        let ExprKind::Invocation(inv) = &expr.kind else {
            return;
        };
        let Some(call) = model.resolved_call(expr) else {
            return;
        };
        if !matches(call) {
            return;
        }
        out.push(InvocationRecord {
            containing_type: decl_cx.type_fqn(),
            location: location_in_tree(tree, expr.span),
            arguments: argument_descriptors(compilation, call, &inv.arguments),
        });
    });
}

/// One descriptor per syntactic argument, named and typed from the
/// callee's formal parameters (the `params` formal repeats).
fn argument_descriptors(
    compilation: &Compilation,
    call: &ResolvedCall,
    args: &[Argument],
) -> Vec<ArgumentDescriptor> {
    let method = compilation.method(call.method);
    let offset = usize::from(call.is_extension);
    let params_index = method.params.iter().position(|p| p.is_params);
    args.iter()
        .enumerate()
        .filter_map(|(i, arg)| {
            let slot = match &arg.name {
                Some(name) => method.params.iter().position(|p| p.name == *name)?,
                None => {
                    let mut slot = i + offset;
                    if let Some(pi) = params_index {
                        slot = slot.min(pi);
                    }
                    slot
                }
            };
            let param = method.params.get(slot)?;
            Some(ArgumentDescriptor {
                name: param.name.clone(),
                type_name: compilation.display_type(&param.ty),
            })
        })
        .collect()
}
