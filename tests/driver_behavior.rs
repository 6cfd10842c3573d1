use loglens::analysis::driver::{extract, CancellationToken, ExtractionOptions, ProgressSink};
use loglens::analysis::model::ExtractionResult;
use loglens::semantic::compilation::CompilationOptions;
use loglens::Compilation;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const WORKER: &str = r#"
using Microsoft.Extensions.Logging;

namespace App
{
    class Worker
    {
        public void Run(ILogger logger, int id)
        {
            logger.LogInformation("User {Id} in", id);
            logger.LogWarning("slow {Elapsed}", 12);
        }
    }
}
"#;

const OTHER: &str = r#"
using Microsoft.Extensions.Logging;

namespace App
{
    class Other
    {
        public void Go(ILogger logger, string id)
        {
            logger.LogInformation("User {Id} in", id);
        }
    }
}
"#;

fn extract_all(compilation: &Compilation) -> ExtractionResult {
    extract(
        compilation,
        None,
        &ExtractionOptions::default(),
        None,
        &CancellationToken::new(),
    )
    .expect("extract")
}

#[test]
fn empty_compilation_yields_empty_result() {
    let compilation = Compilation::parse(Vec::<(String, String)>::new()).unwrap();
    let result = extract_all(&compilation);
    assert!(result.records.is_empty());
    assert!(result.summary.by_kind.is_empty());
    assert!(!result.partial);
}

#[test]
fn missing_logging_reference_yields_empty_result() {
    let compilation = Compilation::parse_with_options(
        [("w.cs", WORKER)],
        CompilationOptions {
            reference_logging_api: false,
        },
    )
    .unwrap();
    let result = extract_all(&compilation);
    assert!(result.records.is_empty());
}

#[test]
fn identifiers_are_unique_and_sorted_by_location() {
    let compilation = Compilation::parse([("b.cs", OTHER), ("a.cs", WORKER)]).unwrap();
    let result = extract_all(&compilation);
    assert_eq!(result.records.len(), 3);
    let ids: Vec<&str> = result.records.iter().map(|r| r.id.as_str()).collect();
    let mut deduped = ids.clone();
    deduped.dedup();
    assert_eq!(ids, deduped);
    let files: Vec<&str> = result
        .records
        .iter()
        .map(|r| r.location.file.as_str())
        .collect();
    assert_eq!(files, ["a.cs", "a.cs", "b.cs"]);
}

#[test]
fn runs_are_deterministic() {
    let sources = [("a.cs", WORKER), ("b.cs", OTHER)];
    let first = extract_all(&Compilation::parse(sources).unwrap());
    let second = extract_all(&Compilation::parse(sources).unwrap());
    assert_eq!(first, second);
}

#[test]
fn template_inconsistency_is_detected_across_records() {
    let compilation = Compilation::parse([("a.cs", WORKER), ("b.cs", OTHER)]).unwrap();
    let result = extract_all(&compilation);
    // The same "User {} in" template takes an int in one file and a
    // string in the other.
    let inconsistency = result
        .summary
        .inconsistencies
        .iter()
        .find(|i| i.normalized_template == "User {} in")
        .expect("inconsistency");
    assert_eq!(inconsistency.position, 0);
    assert_eq!(inconsistency.types, ["int", "string"]);
    assert_eq!(inconsistency.records.len(), 2);
}

#[test]
fn summary_counts_by_kind_level_and_parameter_name() {
    let compilation = Compilation::parse([("a.cs", WORKER)]).unwrap();
    let result = extract_all(&compilation);
    assert_eq!(result.summary.by_kind.get("DirectLogger"), Some(&2));
    assert_eq!(result.summary.by_level.get("Information"), Some(&1));
    assert_eq!(result.summary.by_level.get("Warning"), Some(&1));
    assert_eq!(result.summary.parameter_names.get("Id"), Some(&1));
}

#[test]
fn cancellation_before_the_pass_yields_a_partial_result() {
    let compilation = Compilation::parse([("a.cs", WORKER)]).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = extract(
        &compilation,
        None,
        &ExtractionOptions::default(),
        None,
        &cancel,
    )
    .unwrap();
    assert!(result.partial);
    assert!(result.records.is_empty());
}

#[test]
fn progress_reaches_one_hundred_percent() {
    let compilation = Compilation::parse([("a.cs", WORKER), ("b.cs", OTHER)]).unwrap();
    let seen = Arc::new(AtomicUsize::new(0));
    let max = Arc::new(AtomicUsize::new(0));
    let sink = {
        let seen = seen.clone();
        let max = max.clone();
        ProgressSink::new(move |current, total, _| {
            seen.fetch_add(1, Ordering::SeqCst);
            if current == total {
                max.store(current, Ordering::SeqCst);
            }
        })
    };
    let result = extract(
        &compilation,
        None,
        &ExtractionOptions::default(),
        Some(&sink),
        &CancellationToken::new(),
    )
    .unwrap();
    assert!(!result.partial);
    // Two per-tree reports plus the terminal one.
    assert_eq!(seen.load(Ordering::SeqCst), 3);
    assert_eq!(max.load(Ordering::SeqCst), 2);
}

#[test]
fn panicking_progress_sink_does_not_abort_extraction() {
    let compilation = Compilation::parse([("a.cs", WORKER)]).unwrap();
    let sink = ProgressSink::new(|_, _, _| panic!("sink failure"));
    let result = extract(
        &compilation,
        None,
        &ExtractionOptions::default(),
        Some(&sink),
        &CancellationToken::new(),
    )
    .unwrap();
    assert_eq!(result.records.len(), 2);
}
