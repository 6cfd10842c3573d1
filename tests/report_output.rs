use loglens::analysis::driver::{extract, CancellationToken, ExtractionOptions};
use loglens::report;
use loglens::Compilation;

const SOURCE: &str = r#"
using Microsoft.Extensions.Logging;

class Worker
{
    public void Run(ILogger logger, int id)
    {
        logger.LogInformation("User {Id} in", id);
    }
}
"#;

#[test]
fn json_round_trips_through_serde() {
    let compilation = Compilation::parse([("w.cs", SOURCE)]).unwrap();
    let result = extract(
        &compilation,
        None,
        &ExtractionOptions::default(),
        None,
        &CancellationToken::new(),
    )
    .unwrap();
    let json = report::to_json(&result).unwrap();
    let back: loglens::ExtractionResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}

#[test]
fn markdown_lists_usages_and_summary() {
    let compilation = Compilation::parse([("w.cs", SOURCE)]).unwrap();
    let result = extract(
        &compilation,
        None,
        &ExtractionOptions::default(),
        None,
        &CancellationToken::new(),
    )
    .unwrap();
    let markdown = report::render_markdown(&result);
    assert!(markdown.contains("| DirectLogger | 1 |"));
    assert!(markdown.contains("`User {Id} in`"));
    assert!(!markdown.contains("Partial result"));
}
