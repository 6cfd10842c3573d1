use loglens::analysis::driver::{extract, CancellationToken, ExtractionOptions};
use loglens::analysis::model::{
    EventIdInfo, ExtractionResult, LogLevel, MethodKind, Operand, UsageRecord,
};
use loglens::semantic::ConstValue;
use loglens::Compilation;

fn run(source: &str) -> ExtractionResult {
    let compilation = Compilation::parse([("defines.cs", source)]).expect("parse");
    extract(
        &compilation,
        None,
        &ExtractionOptions::default(),
        None,
        &CancellationToken::new(),
    )
    .expect("extract")
}

fn define_records(source: &str) -> Vec<UsageRecord> {
    run(source)
        .records
        .into_iter()
        .filter(|r| r.method_kind == MethodKind::DelegateFactory)
        .collect()
}

#[test]
fn generic_type_arguments_align_with_placeholders() {
    let records = define_records(
        r#"
using System;
using Microsoft.Extensions.Logging;

class Defs
{
    private static readonly Action<ILogger, int, string, Exception?> _ab =
        LoggerMessage.Define<int, string>(LogLevel.Debug, new EventId(9), "{A} and {B}");
}
"#,
    );
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.method_name, "Define");
    assert_eq!(record.level, Some(LogLevel::Debug));
    match record.event_id.as_ref().expect("event id") {
        EventIdInfo::Details { id, name } => {
            assert_eq!(
                id,
                &Operand::Constant {
                    value: ConstValue::Int(9),
                    type_name: "int".into()
                }
            );
            assert!(name.is_missing());
        }
        other => panic!("unexpected event id {other:?}"),
    }
    assert_eq!(record.parameters.len(), 2);
    assert_eq!(
        (record.parameters[0].name.as_str(), record.parameters[0].type_name.as_str()),
        ("A", "int")
    );
    assert_eq!(
        (record.parameters[1].name.as_str(), record.parameters[1].type_name.as_str()),
        ("B", "string")
    );
    assert!(record
        .parameters
        .iter()
        .all(|p| p.kind == "GenericTypeArgument"));
}

#[test]
fn parameter_count_never_exceeds_placeholder_count() {
    let records = define_records(
        r#"
using System;
using Microsoft.Extensions.Logging;

class Defs
{
    private static readonly Action<ILogger, int, string, Exception?> _weird =
        LoggerMessage.Define<int, string>(LogLevel.Trace, new EventId(1), "only {One}");
}
"#,
    );
    assert_eq!(records[0].parameters.len(), 1);
    assert_eq!(records[0].parameters[0].name, "One");
    assert_eq!(records[0].parameters[0].type_name, "int");
}

#[test]
fn non_constant_event_id_stays_symbolic() {
    let records = define_records(
        r#"
using System;
using Microsoft.Extensions.Logging;

class Defs
{
    private static EventId NextId() { return new EventId(1); }

    private static readonly Action<ILogger, Exception?> _x =
        LoggerMessage.Define(LogLevel.Information, NextId(), "steady");
}
"#,
    );
    match records[0].event_id.as_ref().expect("event id") {
        EventIdInfo::Ref { kind, text } => {
            assert_eq!(kind, "Invocation");
            assert_eq!(text, "NextId()");
        }
        other => panic!("unexpected event id {other:?}"),
    }
}

#[test]
fn define_scope_is_not_a_delegate_factory_usage() {
    let result = run(
        r#"
using System;
using Microsoft.Extensions.Logging;

class Defs
{
    private static readonly Func<ILogger, int, IDisposable> _scope =
        LoggerMessage.DefineScope<int>("batch {Id}");
}
"#,
    );
    assert!(result.records.is_empty(), "{:#?}", result.records);
}
