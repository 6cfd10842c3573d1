use loglens::analysis::driver::{extract, CancellationToken, ExtractionOptions};
use loglens::analysis::model::MethodKind;
use loglens::workspace::{Solution, Workspace};
use std::fs;

const DECLARATIONS: &str = r#"
using Microsoft.Extensions.Logging;

namespace Shared;

public static partial class Log
{
    [LoggerMessage(10, LogLevel.Information, "order {OrderId} placed")]
    public static partial void OrderPlaced(ILogger logger, int orderId);
}
"#;

const API_CALLER: &str = r#"
using Microsoft.Extensions.Logging;
using Shared;

namespace Api;

public class Checkout
{
    private readonly ILogger _logger;

    public void Place(int id)
    {
        Log.OrderPlaced(_logger, id);
    }
}
"#;

const WORKER_CALLER: &str = r#"
using Microsoft.Extensions.Logging;
using Shared;

namespace Worker;

public class Retrier
{
    public void Retry(ILogger logger)
    {
        Log.OrderPlaced(logger, 99);
    }
}
"#;

fn solution() -> Solution {
    Solution::from_project_sources(vec![
        (
            "Shared".into(),
            vec![("Shared/Log.cs".into(), DECLARATIONS.into())],
        ),
        (
            "Api".into(),
            vec![("Api/Checkout.cs".into(), API_CALLER.into())],
        ),
        (
            "Worker".into(),
            vec![("Worker/Retrier.cs".into(), WORKER_CALLER.into())],
        ),
    ])
    .expect("solution")
}

#[test]
fn callers_are_found_across_all_projects() {
    let solution = solution();
    let shared = &solution.compilations()[0];
    let result = extract(
        shared,
        Some(&solution),
        &ExtractionOptions::default(),
        None,
        &CancellationToken::new(),
    )
    .expect("extract");

    let record = result
        .records
        .iter()
        .find(|r| r.method_kind == MethodKind::AttributeDeclared)
        .expect("attribute record");
    let mut callers: Vec<&str> = record
        .invocations
        .iter()
        .map(|i| i.containing_type.as_str())
        .collect();
    callers.sort();
    assert_eq!(callers, ["Api.Checkout", "Worker.Retrier"]);
    for invocation in &record.invocations {
        assert_eq!(invocation.arguments[0].name, "logger");
        assert_eq!(invocation.arguments[1].name, "orderId");
        assert_eq!(invocation.arguments[1].type_name, "int");
    }
}

#[test]
fn without_a_solution_only_the_declaring_tree_is_scanned() {
    let solution = solution();
    let shared = &solution.compilations()[0];
    let result = extract(
        shared,
        None,
        &ExtractionOptions::default(),
        None,
        &CancellationToken::new(),
    )
    .expect("extract");
    let record = result
        .records
        .iter()
        .find(|r| r.method_kind == MethodKind::AttributeDeclared)
        .expect("attribute record");
    assert!(record.invocations.is_empty());
}

#[test]
fn workspace_discovery_to_extraction_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("Shared")).unwrap();
    fs::create_dir_all(dir.path().join("Api")).unwrap();
    fs::write(dir.path().join("Shared/Log.cs"), DECLARATIONS).unwrap();
    fs::write(dir.path().join("Api/Checkout.cs"), API_CALLER).unwrap();

    let workspace = Workspace::discover(dir.path()).unwrap();
    assert_eq!(workspace.projects.len(), 2);
    let solution = Solution::load(&workspace).unwrap();

    let mut attribute_records = 0;
    for compilation in solution.compilations() {
        let result = extract(
            compilation,
            Some(&solution),
            &ExtractionOptions::default(),
            None,
            &CancellationToken::new(),
        )
        .unwrap();
        for record in &result.records {
            if record.method_kind == MethodKind::AttributeDeclared {
                attribute_records += 1;
                assert_eq!(record.invocations.len(), 1);
            }
        }
    }
    assert_eq!(attribute_records, 1);
}
