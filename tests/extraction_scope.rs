use loglens::analysis::driver::{extract, CancellationToken, ExtractionOptions};
use loglens::analysis::model::{ExtractionResult, MethodKind, UsageRecord};
use loglens::Compilation;

fn run(source: &str) -> ExtractionResult {
    let compilation = Compilation::parse([("scopes.cs", source)]).expect("parse");
    extract(
        &compilation,
        None,
        &ExtractionOptions::default(),
        None,
        &CancellationToken::new(),
    )
    .expect("extract")
}

fn scope_records(source: &str) -> Vec<UsageRecord> {
    run(source)
        .records
        .into_iter()
        .filter(|r| r.method_kind == MethodKind::ScopeBegin)
        .collect()
}

#[test]
fn anonymous_object_state_yields_property_parameters() {
    let records = scope_records(
        r#"
using Microsoft.Extensions.Logging;

class Worker
{
    public void Run(ILogger logger, string id)
    {
        using (logger.BeginScope(new { UserId = 5, TraceId = id }))
        {
            logger.LogInformation("in scope");
        }
    }
}
"#,
    );
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.method_name, "BeginScope");
    assert_eq!(record.message_template, None);
    assert_eq!(record.parameters.len(), 2);
    assert_eq!(record.parameters[0].name, "UserId");
    assert_eq!(record.parameters[0].kind, "AnonymousProperty");
    assert_eq!(record.parameters[1].name, "TraceId");
    assert_eq!(record.parameters[1].kind, "AnonymousProperty");
}

#[test]
fn dictionary_state_yields_key_value_parameters() {
    let records = scope_records(
        r#"
using System.Collections.Generic;
using Microsoft.Extensions.Logging;

class Worker
{
    public void Run(ILogger logger, string path)
    {
        using (logger.BeginScope(new Dictionary<string, object?>
        {
            ["UserId"] = 7,
            ["RequestPath"] = path,
        }))
        {
        }
    }
}
"#,
    );
    let record = &records[0];
    assert_eq!(record.parameters.len(), 2);
    assert_eq!(record.parameters[0].name, "UserId");
    assert_eq!(record.parameters[0].kind, "Constant");
    assert_eq!(record.parameters[1].name, "RequestPath");
    assert_eq!(record.parameters[1].kind, "ParameterReference");
}

#[test]
fn pair_list_state_descends_into_constructor_calls() {
    let records = scope_records(
        r#"
using System.Collections.Generic;
using Microsoft.Extensions.Logging;

class Worker
{
    public void Run(ILogger logger, int order)
    {
        using (logger.BeginScope(new List<KeyValuePair<string, object?>>
        {
            new KeyValuePair<string, object?>("OrderId", order),
        }))
        {
        }
    }
}
"#,
    );
    let record = &records[0];
    assert_eq!(record.parameters.len(), 1);
    assert_eq!(record.parameters[0].name, "OrderId");
}

#[test]
fn symbolic_pair_collection_collapses_to_one_parameter() {
    let records = scope_records(
        r#"
using System.Collections.Generic;
using Microsoft.Extensions.Logging;

class Worker
{
    public void Run(ILogger logger, Dictionary<string, object?> state)
    {
        using (logger.BeginScope(state))
        {
        }
    }
}
"#,
    );
    let record = &records[0];
    assert_eq!(record.parameters.len(), 1);
    assert_eq!(record.parameters[0].name, "state");
    assert_eq!(record.parameters[0].kind, "ParameterReference");
}

#[test]
fn opaque_state_is_recorded_as_a_single_reference() {
    let records = scope_records(
        r#"
using Microsoft.Extensions.Logging;

class Worker
{
    public void Run(ILogger logger, string correlationId)
    {
        using (logger.BeginScope(correlationId))
        {
        }
    }
}
"#,
    );
    let record = &records[0];
    assert_eq!(record.parameters.len(), 1);
    assert_eq!(record.parameters[0].name, "correlationId");
    assert_eq!(record.parameters[0].type_name, "string");
}

#[test]
fn extension_helper_form_uses_the_template() {
    let records = scope_records(
        r#"
using Microsoft.Extensions.Logging;

class Worker
{
    public void Run(ILogger logger, int orderId)
    {
        using (logger.BeginScope("Processing {OrderId}", orderId))
        {
        }
    }
}
"#,
    );
    let record = &records[0];
    assert_eq!(
        record.message_template.as_deref(),
        Some("Processing {OrderId}")
    );
    assert_eq!(record.parameters.len(), 1);
    assert_eq!(record.parameters[0].name, "OrderId");
    assert_eq!(record.parameters[0].kind, "Reference");
}

#[test]
fn using_declaration_form_is_recognized() {
    let records = scope_records(
        r#"
using Microsoft.Extensions.Logging;

class Worker
{
    public void Run(ILogger logger, string id)
    {
        using var scope = logger.BeginScope(new { TraceId = id });
        logger.LogDebug("inside");
    }
}
"#,
    );
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].parameters[0].name, "TraceId");
}
