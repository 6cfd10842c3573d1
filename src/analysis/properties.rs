//! `[LogProperties]` parameter extraction and `[TagProvider]` validation.

use crate::analysis::model::{LogPropertiesParameter, LogPropertyInfo, TagProviderSpec};
use crate::analysis::TreeContext;
use crate::semantic::{
    BoundAttribute, ConstValue, MethodSymbol, ParamSymbol, SymbolId, TypeKind, TypeRef,
};

/// Transitive extraction stops at this depth even without cycles.
const MAX_DEPTH: usize = 10;

pub fn extract_log_properties(
    cx: &TreeContext<'_>,
    method: &MethodSymbol,
) -> Vec<LogPropertiesParameter> {
    let Some(attr_class) = cx.registry.log_properties_attribute else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for param in &method.params {
        let Some(attr) = param
            .attributes
            .iter()
            .find(|a| a.class == Some(attr_class))
        else {
            continue;
        };
        let flag = |name: &str| {
            attr.named(name)
                .and_then(|a| a.value.as_ref())
                .map(|v| matches!(v, ConstValue::Bool(true)))
                .unwrap_or(false)
        };
        let transitive = flag("Transitive");
        let mut visited = Vec::new();
        if let Some(owner) = param.ty.symbol() {
            visited.push(owner);
        }
        let properties = collect_properties(cx, &param.ty, transitive, 0, &mut visited);
        out.push(LogPropertiesParameter {
            parameter_name: param.name.clone(),
            owner_type: cx.compilation.display_type(&param.ty),
            omit_reference_name: flag("OmitReferenceName"),
            skip_null: flag("SkipNullProperties"),
            transitive,
            properties,
            tag_provider: extract_tag_provider(cx, param),
        });
    }
    out
}

fn collect_properties(
    cx: &TreeContext<'_>,
    ty: &TypeRef,
    transitive: bool,
    depth: usize,
    visited: &mut Vec<SymbolId>,
) -> Vec<LogPropertyInfo> {
    let Some(symbol) = ty.symbol() else {
        return Vec::new();
    };
    let compilation = cx.compilation;
    let sym = compilation.type_symbol(symbol);
    let mut out = Vec::new();
    for prop_id in &sym.properties {
        let prop = compilation.property(*prop_id);
        if !prop.is_public || !prop.has_getter || prop.is_static {
            continue;
        }
        let tag_name = tag_rename(cx, &prop.attributes).unwrap_or_else(|| prop.name.clone());
        let nullable = matches!(prop.ty, TypeRef::Nullable(_));
        let classification = classification_tag(cx, &prop.attributes);

        let mut nested = Vec::new();
        if transitive && depth + 1 < MAX_DEPTH {
            let element = element_or_self(cx, &prop.ty);
            if is_complex(cx, &element) {
                if let Some(elem_sym) = element.symbol() {
                    // The visited set is per branch: a type may recur in a
                    // sibling property, just not in its own ancestry.
                    if !visited.contains(&elem_sym) {
                        visited.push(elem_sym);
                        nested = collect_properties(cx, &element, transitive, depth + 1, visited);
                        visited.pop();
                    }
                }
            }
        }

        out.push(LogPropertyInfo {
            name: prop.name.clone(),
            tag_name,
            type_name: compilation.simple_type_name(&prop.ty),
            nullable,
            classification,
            nested,
        });
    }
    out
}

fn tag_rename(cx: &TreeContext<'_>, attributes: &[BoundAttribute]) -> Option<String> {
    let tag_name_class = cx.registry.tag_name_attribute?;
    attributes
        .iter()
        .find(|a| a.class == Some(tag_name_class))
        .and_then(|a| a.positional().next())
        .and_then(|arg| arg.value.as_ref())
        .and_then(|v| v.as_str().map(str::to_string))
}

fn classification_tag(cx: &TreeContext<'_>, attributes: &[BoundAttribute]) -> Option<String> {
    let base = cx.registry.data_classification_attribute?;
    attributes.iter().find_map(|a| {
        let class = a.class?;
        if !cx
            .compilation
            .is_subtype(&TypeRef::named(class), &TypeRef::named(base))
        {
            return None;
        }
        let name = &cx.compilation.type_symbol(class).name;
        Some(name.strip_suffix("Attribute").unwrap_or(name).to_string())
    })
}

/// Arrays and the generic enumerable recurse into their element type.
fn element_or_self(cx: &TreeContext<'_>, ty: &TypeRef) -> TypeRef {
    match ty.strip_nullable() {
        TypeRef::Array(elem) => (**elem).clone(),
        TypeRef::Named { symbol, args }
            if *symbol == cx.registry.enumerable && args.len() == 1 =>
        {
            args[0].clone()
        }
        other => {
            // List<T> and friends expose IEnumerable<T> through their bases.
            let mut worklist = cx.compilation.instantiated_bases(other);
            let mut seen = Vec::new();
            while let Some(current) = worklist.pop() {
                if let TypeRef::Named { symbol, args } = &current {
                    if *symbol == cx.registry.enumerable && args.len() == 1 {
                        return args[0].clone();
                    }
                }
                if seen.contains(&current) {
                    continue;
                }
                worklist.extend(cx.compilation.instantiated_bases(&current));
                seen.push(current);
            }
            other.clone()
        }
    }
}

/// Complex types recurse; primitives, enums, strings and a small set of
/// well-known value types do not.
fn is_complex(cx: &TreeContext<'_>, ty: &TypeRef) -> bool {
    let Some(symbol) = ty.symbol() else {
        return false;
    };
    let sym = cx.compilation.type_symbol(symbol);
    if sym.keyword.is_some() || sym.kind == TypeKind::Enum || sym.kind == TypeKind::Delegate {
        return false;
    }
    let corlib = &cx.compilation.corlib;
    ![
        corlib.string_,
        corlib.datetime,
        corlib.datetimeoffset,
        corlib.timespan,
        corlib.guid,
        corlib.uri,
    ]
    .contains(&symbol)
}

fn extract_tag_provider(cx: &TreeContext<'_>, param: &ParamSymbol) -> Option<TagProviderSpec> {
    let attr_class = cx.registry.tag_provider_attribute?;
    let attr = param
        .attributes
        .iter()
        .find(|a| a.class == Some(attr_class))?;

    let mut positional = attr.positional();
    let provider_type_ref = positional.next().and_then(|a| a.type_ref.clone());
    let provider_method = positional
        .next()
        .and_then(|a| a.value.as_ref())
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    let omit_reference_name = attr
        .named("OmitReferenceName")
        .and_then(|a| a.value.as_ref())
        .map(|v| matches!(v, ConstValue::Bool(true)))
        .unwrap_or(false);

    let provider_type = provider_type_ref
        .as_ref()
        .map(|t| cx.compilation.display_type(t))
        .unwrap_or_default();
    let (valid, message) = validate_provider(cx, provider_type_ref.as_ref(), &provider_method, param);

    Some(TagProviderSpec {
        parameter_name: param.name.clone(),
        provider_type,
        provider_method,
        omit_reference_name,
        valid,
        message,
    })
}

/// The provider method must exist, be static and accessible, return void,
/// and take exactly (ITagCollector, owner type).
fn validate_provider(
    cx: &TreeContext<'_>,
    provider_type: Option<&TypeRef>,
    method_name: &str,
    param: &ParamSymbol,
) -> (bool, Option<String>) {
    let fail = |msg: &str| (false, Some(msg.to_string()));
    let Some(provider_ty) = provider_type else {
        return fail("provider type could not be resolved");
    };
    let Some(provider_sym) = provider_ty.symbol() else {
        return fail("provider type could not be resolved");
    };
    if method_name.is_empty() {
        return fail("provider method name is missing");
    }
    let candidates = cx.compilation.methods_named(provider_sym, method_name);
    let Some(method_id) = candidates.first() else {
        return fail("provider method was not found on the provider type");
    };
    let method = cx.compilation.method(*method_id);
    if !method.is_static {
        return fail("provider method must be static");
    }
    if !method.is_public {
        return fail("provider method must be accessible");
    }
    if !method
        .return_type
        .is_symbol(cx.compilation.corlib.void_)
    {
        return fail("provider method must return void");
    }
    if method.params.len() != 2 {
        return fail("provider method must take exactly two parameters");
    }
    if let Some(collector) = cx.registry.tag_collector {
        if !method.params[0].ty.strip_nullable().is_symbol(collector) {
            return fail("provider method's first parameter must be the tag collector");
        }
    }
    let owner = param.ty.strip_nullable();
    let second = method.params[1].ty.strip_nullable();
    if second != owner
        && cx.compilation.conversion(owner, second, None)
            == crate::semantic::compilation::Conversion::None
    {
        return fail("provider method's second parameter must match the decorated parameter");
    }
    (true, None)
}
