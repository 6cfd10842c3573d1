use loglens::analysis::driver::{extract, CancellationToken, ExtractionOptions};
use loglens::analysis::model::{
    EventIdInfo, ExtractionResult, LogLevel, MethodKind, Operand, UsageRecord,
};
use loglens::semantic::ConstValue;
use loglens::Compilation;

fn run(sources: &[(&str, &str)]) -> ExtractionResult {
    let compilation = Compilation::parse(sources.iter().copied()).expect("parse");
    extract(
        &compilation,
        None,
        &ExtractionOptions::default(),
        None,
        &CancellationToken::new(),
    )
    .expect("extract")
}

fn single(source: &str) -> UsageRecord {
    let result = run(&[("app.cs", source)]);
    assert_eq!(result.records.len(), 1, "records: {:#?}", result.records);
    result.records.into_iter().next().unwrap()
}

#[test]
fn level_helper_with_constant_argument() {
    let record = single(
        r#"
using Microsoft.Extensions.Logging;

class Worker
{
    private readonly ILogger _logger;

    public void Run()
    {
        _logger.LogInformation("User {UserId} logged in", 42);
    }
}
"#,
    );
    assert_eq!(record.method_kind, MethodKind::DirectLogger);
    assert_eq!(record.method_name, "LogInformation");
    assert_eq!(record.level, Some(LogLevel::Information));
    assert_eq!(
        record.message_template.as_deref(),
        Some("User {UserId} logged in")
    );
    assert_eq!(record.parameters.len(), 1);
    assert_eq!(record.parameters[0].name, "UserId");
    assert_eq!(record.parameters[0].kind, "Constant");
    assert_eq!(record.parameters[0].type_name, "int");
    assert!(record.id.starts_with("app.cs:"));
}

#[test]
fn generic_log_with_event_id_and_reference_parameter() {
    let record = single(
        r#"
using Microsoft.Extensions.Logging;

class Worker
{
    public void Run(ILogger logger, string x)
    {
        logger.Log(LogLevel.Warning, new EventId(7, "WarnEvt"), "oops {X}", x);
    }
}
"#,
    );
    assert_eq!(record.level, Some(LogLevel::Warning));
    match record.event_id.as_ref().expect("event id") {
        EventIdInfo::Details { id, name } => {
            assert_eq!(
                id,
                &Operand::Constant {
                    value: ConstValue::Int(7),
                    type_name: "int".into()
                }
            );
            match name {
                Operand::Constant { value, .. } => {
                    assert_eq!(value, &ConstValue::Str("WarnEvt".into()))
                }
                other => panic!("unexpected name operand {other:?}"),
            }
        }
        other => panic!("unexpected event id {other:?}"),
    }
    assert_eq!(record.message_template.as_deref(), Some("oops {X}"));
    assert_eq!(record.parameters.len(), 1);
    assert_eq!(record.parameters[0].name, "X");
    assert_eq!(record.parameters[0].kind, "Reference");
}

#[test]
fn level_comes_from_constant_field_reference_only() {
    let result = run(&[(
        "app.cs",
        r#"
using Microsoft.Extensions.Logging;

class Worker
{
    public void Run(ILogger logger, LogLevel dynamicLevel)
    {
        logger.Log(dynamicLevel, "no level here");
    }
}
"#,
    )]);
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].level, None);
}

#[test]
fn exception_overload_keeps_template_and_parameters() {
    let record = single(
        r#"
using System;
using Microsoft.Extensions.Logging;

class Worker
{
    public void Run(ILogger logger, Exception ex, int orderId)
    {
        logger.LogError(ex, "Order {OrderId} failed", orderId);
    }
}
"#,
    );
    assert_eq!(record.level, Some(LogLevel::Error));
    assert_eq!(
        record.message_template.as_deref(),
        Some("Order {OrderId} failed")
    );
    assert_eq!(record.parameters.len(), 1);
    assert_eq!(record.parameters[0].name, "OrderId");
}

#[test]
fn params_array_literal_maps_elements_positionally() {
    let record = single(
        r#"
using Microsoft.Extensions.Logging;

class Worker
{
    public void Run(ILogger logger, string user)
    {
        logger.LogDebug("{User} did {Action}", new object[] { user, "login" });
    }
}
"#,
    );
    assert_eq!(record.parameters.len(), 2);
    assert_eq!(record.parameters[0].name, "User");
    assert_eq!(record.parameters[0].kind, "Reference");
    assert_eq!(record.parameters[1].name, "Action");
    assert_eq!(record.parameters[1].kind, "Constant");
}

#[test]
fn fewer_arguments_than_placeholders_emits_what_aligns() {
    let record = single(
        r#"
using Microsoft.Extensions.Logging;

class Worker
{
    public void Run(ILogger logger, int a)
    {
        logger.LogWarning("{A} and {B}", a);
    }
}
"#,
    );
    assert_eq!(record.parameters.len(), 1);
    assert_eq!(record.parameters[0].name, "A");
}

#[test]
fn shadowing_logger_interface_does_not_match() {
    let result = run(&[(
        "app.cs",
        r#"
namespace MyApp
{
    public interface ILogger
    {
        void LogInformation(string message, params object[] args);
    }

    class Worker
    {
        public void Run(ILogger logger)
        {
            logger.LogInformation("User {UserId} logged in", 42);
        }
    }
}
"#,
    )]);
    assert!(result.records.is_empty(), "{:#?}", result.records);
}

#[test]
fn null_conditional_call_is_still_recognized() {
    let record = single(
        r#"
using Microsoft.Extensions.Logging;

class Worker
{
    private readonly ILogger _logger;

    public void Run(int id)
    {
        _logger?.LogTrace("probe {Id}", id);
    }
}
"#,
    );
    assert_eq!(record.level, Some(LogLevel::Trace));
    assert_eq!(record.parameters.len(), 1);
}

#[test]
fn generic_category_logger_binds_through_base_interface() {
    let record = single(
        r#"
using Microsoft.Extensions.Logging;

class Worker
{
    private readonly ILogger<Worker> _logger;

    public void Run(int id)
    {
        _logger.LogCritical("worker {Id} down", id);
    }
}
"#,
    );
    assert_eq!(record.level, Some(LogLevel::Critical));
    assert_eq!(record.method_kind, MethodKind::DirectLogger);
}

#[test]
fn interpolated_template_is_not_a_constant() {
    let result = run(&[(
        "app.cs",
        r#"
using Microsoft.Extensions.Logging;

class Worker
{
    public void Run(ILogger logger, int id)
    {
        logger.LogInformation($"user {id} logged in");
    }
}
"#,
    )]);
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].message_template, None);
    assert!(result.records[0].parameters.is_empty());
}
