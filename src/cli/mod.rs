//! Command-line front-end.

use crate::analysis::driver::{extract, CancellationToken, ExtractionOptions, ProgressSink};
use crate::analysis::model::ExtractionResult;
use crate::analysis::summary;
use crate::report;
use crate::workspace::{Solution, Workspace};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "loglens", version, about = "Analyze logging usage in C# source")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a directory of C# sources and report logging usages.
    Analyze {
        /// Workspace root; immediate subdirectories become projects.
        path: PathBuf,
        #[arg(long, value_enum, default_value = "summary")]
        format: OutputFormat,
        /// Skip the solution-wide caller walk for `[LoggerMessage]` methods.
        #[arg(long)]
        no_xref: bool,
        /// Abort the run on the first per-tree failure.
        #[arg(long)]
        fail_fast: bool,
        /// Print per-file progress to stderr.
        #[arg(long)]
        progress: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Summary,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Analyze {
            path,
            format,
            no_xref,
            fail_fast,
            progress,
        } => analyze(path, format, no_xref, fail_fast, progress),
    }
}

fn analyze(
    path: PathBuf,
    format: OutputFormat,
    no_xref: bool,
    fail_fast: bool,
    progress: bool,
) -> anyhow::Result<()> {
    let workspace = Workspace::discover(&path)?;
    let solution = Solution::load(&workspace).context("loading workspace sources")?;
    let options = ExtractionOptions {
        continue_on_failure: !fail_fast,
        ..ExtractionOptions::default()
    };
    let cancel = CancellationToken::new();
    let sink = progress.then(|| {
        ProgressSink::new(|current, total, message| {
            eprintln!("[{current}/{total}] {}", message.unwrap_or(""));
        })
    });

    let mut merged = ExtractionResult::empty();
    for compilation in solution.compilations() {
        let result = extract(
            compilation,
            (!no_xref).then_some(&solution),
            &options,
            sink.as_ref(),
            &cancel,
        )?;
        merged.partial |= result.partial;
        merged.records.extend(result.records);
    }
    merged.records.sort_by(|a, b| {
        (&a.location.file, a.location.start_line, a.location.start_column)
            .cmp(&(&b.location.file, b.location.start_line, b.location.start_column))
    });
    merged.summary = summary::build(&merged.records);

    match format {
        OutputFormat::Json => println!("{}", report::to_json(&merged)?),
        OutputFormat::Markdown => print!("{}", report::render_markdown(&merged)),
        OutputFormat::Summary => print!("{}", report::render_summary(&merged)),
    }
    Ok(())
}
