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

fn attribute_records(source: &str) -> Vec<UsageRecord> {
    run(&[("log.cs", source)])
        .records
        .into_iter()
        .filter(|r| r.method_kind == MethodKind::AttributeDeclared)
        .collect()
}

#[test]
fn positional_arity_three_form() {
    let records = attribute_records(
        r#"
using Microsoft.Extensions.Logging;

namespace App;

public static partial class Log
{
    [LoggerMessage(3, LogLevel.Error, "Bad {Thing}")]
    public static partial void BadThing(ILogger logger, string thing);
}
"#,
    );
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.method_name, "BadThing");
    assert_eq!(record.level, Some(LogLevel::Error));
    assert_eq!(record.message_template.as_deref(), Some("Bad {Thing}"));
    match record.event_id.as_ref().expect("event id") {
        EventIdInfo::Details { id, name } => {
            assert_eq!(
                id,
                &Operand::Constant {
                    value: ConstValue::Int(3),
                    type_name: "int".into()
                }
            );
            assert!(name.is_missing());
        }
        other => panic!("unexpected event id {other:?}"),
    }
    assert_eq!(record.parameters.len(), 1);
    assert_eq!(record.parameters[0].name, "thing");
    assert_eq!(record.parameters[0].type_name, "string");
    assert_eq!(record.parameters[0].kind, "MethodParameter");
}

#[test]
fn named_arguments_override_and_event_name_alone_is_enough() {
    let records = attribute_records(
        r#"
using Microsoft.Extensions.Logging;

namespace App;

public static partial class Log
{
    [LoggerMessage(Level = LogLevel.Warning, Message = "slow {Elapsed}", EventName = "Slow")]
    public static partial void Slow(ILogger logger, double elapsed);
}
"#,
    );
    let record = &records[0];
    assert_eq!(record.level, Some(LogLevel::Warning));
    match record.event_id.as_ref().expect("event id") {
        EventIdInfo::Details { id, name } => {
            assert!(id.is_missing());
            match name {
                Operand::Constant { value, .. } => assert_eq!(value, &ConstValue::Str("Slow".into())),
                other => panic!("unexpected name {other:?}"),
            }
        }
        other => panic!("unexpected event id {other:?}"),
    }
}

#[test]
fn no_event_arguments_means_absent_event_id() {
    let records = attribute_records(
        r#"
using Microsoft.Extensions.Logging;

namespace App;

public static partial class Log
{
    [LoggerMessage(LogLevel.Debug, "tick")]
    public static partial void Tick(ILogger logger);
}
"#,
    );
    assert_eq!(records[0].event_id, None);
    assert_eq!(records[0].level, Some(LogLevel::Debug));
}

#[test]
fn logger_level_and_exception_parameters_never_align() {
    let records = attribute_records(
        r#"
using System;
using Microsoft.Extensions.Logging;

namespace App;

public static partial class Log
{
    [LoggerMessage(Message = "failed {Reason} at {Level}")]
    public static partial void Failed(
        ILogger logger,
        LogLevel level,
        Exception exception,
        string reason);
}
"#,
    );
    let record = &records[0];
    // `{Level}` matches a LogLevel-typed parameter, which is excluded, so
    // only `{Reason}` aligns.
    assert_eq!(record.parameters.len(), 1);
    assert_eq!(record.parameters[0].name, "reason");
}

#[test]
fn duplicate_placeholders_emit_one_match_per_occurrence() {
    let records = attribute_records(
        r#"
using Microsoft.Extensions.Logging;

namespace App;

public static partial class Log
{
    [LoggerMessage(LogLevel.Information, "{Id} then {Id} again")]
    public static partial void Twice(ILogger logger, int id);
}
"#,
    );
    let names: Vec<&str> = records[0].parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["id", "id"]);
}

#[test]
fn call_sites_are_found_in_the_current_tree_without_a_solution() {
    let records = attribute_records(
        r#"
using Microsoft.Extensions.Logging;

namespace App;

public static partial class Log
{
    [LoggerMessage(1, LogLevel.Information, "hello {Name}")]
    public static partial void Hello(ILogger logger, string name);
}

public class Greeter
{
    private readonly ILogger _logger;

    public void Greet()
    {
        Log.Hello(_logger, "world");
    }
}
"#,
    );
    let record = &records[0];
    assert_eq!(record.invocations.len(), 1);
    let invocation = &record.invocations[0];
    assert_eq!(invocation.containing_type, "App.Greeter");
    assert_eq!(invocation.arguments.len(), 2);
    assert_eq!(invocation.arguments[0].name, "logger");
    assert_eq!(invocation.arguments[1].name, "name");
    assert_eq!(invocation.arguments[1].type_name, "string");
}

#[test]
fn log_properties_with_tag_rename_and_classification() {
    let records = attribute_records(
        r#"
using Microsoft.Extensions.Logging;

namespace App;

public class PrivateDataAttribute : Microsoft.Extensions.Compliance.Classification.DataClassificationAttribute { }

public class User
{
    [TagName("user_name")]
    public string Name { get; set; }

    [PrivateData]
    public string Email { get; set; }

    public int? Age { get; set; }
}

public static partial class Log
{
    [LoggerMessage(LogLevel.Information, "user updated")]
    public static partial void UserUpdated(ILogger logger, [LogProperties] User user);
}
"#,
    );
    let record = &records[0];
    assert_eq!(record.log_properties.len(), 1);
    let props = &record.log_properties[0];
    assert_eq!(props.parameter_name, "user");
    assert!(!props.transitive);

    let name = props.properties.iter().find(|p| p.name == "Name").unwrap();
    assert_eq!(name.tag_name, "user_name");
    let email = props.properties.iter().find(|p| p.name == "Email").unwrap();
    assert_eq!(email.classification.as_deref(), Some("PrivateData"));
    let age = props.properties.iter().find(|p| p.name == "Age").unwrap();
    assert!(age.nullable);
    assert!(age.nested.is_empty());
}

#[test]
fn transitive_extraction_recurses_and_breaks_cycles() {
    let records = attribute_records(
        r#"
using System.Collections.Generic;
using Microsoft.Extensions.Logging;

namespace App;

public class Order
{
    public string Reference { get; set; }
    public List<OrderLine> Lines { get; set; }
}

public class OrderLine
{
    public int Quantity { get; set; }
    public Order Parent { get; set; }
}

public static partial class Log
{
    [LoggerMessage(LogLevel.Information, "order placed")]
    public static partial void OrderPlaced(ILogger logger, [LogProperties(Transitive = true)] Order order);
}
"#,
    );
    let props = &records[0].log_properties[0];
    assert!(props.transitive);
    let lines = props.properties.iter().find(|p| p.name == "Lines").unwrap();
    // The collection recursed into its element type.
    let quantity = lines.nested.iter().find(|p| p.name == "Quantity").unwrap();
    assert!(quantity.nested.is_empty());
    // The back-reference to Order is cut by the per-branch visited set.
    let parent = lines.nested.iter().find(|p| p.name == "Parent").unwrap();
    assert!(parent.nested.is_empty());
}

#[test]
fn tag_provider_is_validated() {
    let records = attribute_records(
        r#"
using Microsoft.Extensions.Logging;

namespace App;

public class User
{
    public string Name { get; set; }
}

public static class UserTags
{
    public static void Provide(ITagCollector collector, User user) { }
    public static int Broken(ITagCollector collector, User user) { return 0; }
}

public static partial class Log
{
    [LoggerMessage(LogLevel.Information, "a")]
    public static partial void Good(
        ILogger logger,
        [LogProperties]
        [TagProvider(typeof(UserTags), "Provide")]
        User user);

    [LoggerMessage(LogLevel.Information, "b")]
    public static partial void Bad(
        ILogger logger,
        [LogProperties]
        [TagProvider(typeof(UserTags), "Broken")]
        User user);
}
"#,
    );
    let good = records
        .iter()
        .find(|r| r.method_name == "Good")
        .and_then(|r| r.log_properties[0].tag_provider.as_ref())
        .expect("tag provider");
    assert!(good.valid, "{good:?}");
    assert_eq!(good.provider_type, "App.UserTags");
    assert_eq!(good.provider_method, "Provide");

    let bad = records
        .iter()
        .find(|r| r.method_name == "Bad")
        .and_then(|r| r.log_properties[0].tag_provider.as_ref())
        .expect("tag provider");
    assert!(!bad.valid);
    assert!(bad.message.as_deref().unwrap_or("").contains("void"));
}

#[test]
fn non_partial_methods_are_ignored() {
    let records = attribute_records(
        r#"
using Microsoft.Extensions.Logging;

namespace App;

public static class Log
{
    public static void NotDeclared(ILogger logger, string thing)
    {
        logger.LogInformation("saw {Thing}", thing);
    }
}
"#,
    );
    assert!(records.is_empty());
}
