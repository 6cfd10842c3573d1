//! Extraction driver: one pass over a resolved compilation.

use crate::analysis::analyzers::analyzers;
use crate::analysis::model::{ExtractionResult, UsageRecord};
use crate::analysis::registry::LoggingTypes;
use crate::analysis::{summary, TreeContext};
use crate::errors::ExtractError;
use crate::semantic::Compilation;
use crate::workspace::Solution;
use log::{debug, warn};
#[cfg(feature = "parallel_analysis")]
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Recognized extraction options, exhaustively.
#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    pub enhanced_errors: bool,
    pub log_extraction_attempts: bool,
    pub log_extraction_failures: bool,
    pub continue_on_failure: bool,
    pub collect_error_stats: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            enhanced_errors: false,
            log_extraction_attempts: false,
            log_extraction_failures: true,
            continue_on_failure: true,
            collect_error_stats: false,
        }
    }
}

/// Cooperative cancellation flag, checked at tree boundaries and between
/// invocation sites.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Best-effort progress callback: `(current, total, optional message)`.
/// A panicking sink is caught and logged; analysis continues.
pub struct ProgressSink {
    callback: Box<dyn Fn(usize, usize, Option<&str>) + Send + Sync>,
}

impl ProgressSink {
    pub fn new(callback: impl Fn(usize, usize, Option<&str>) + Send + Sync + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }

    fn report(&self, current: usize, total: usize, message: Option<&str>) {
        let result = catch_unwind(AssertUnwindSafe(|| (self.callback)(current, total, message)));
        if result.is_err() {
            warn!("progress sink panicked; continuing");
        }
    }
}

/// Extract every logging usage from the compilation.
///
/// Trees are processed in parallel; per-tree failures are logged and
/// skipped unless `continue_on_failure` is disabled. A compilation that
/// does not reference the logging API yields an empty result.
pub fn extract(
    compilation: &Compilation,
    solution: Option<&Solution>,
    options: &ExtractionOptions,
    progress: Option<&ProgressSink>,
    cancel: &CancellationToken,
) -> Result<ExtractionResult, ExtractError> {
    let Some(registry) = LoggingTypes::resolve(compilation) else {
        return Ok(ExtractionResult::empty());
    };

    let total = compilation.trees().len();
    let records: Mutex<Vec<UsageRecord>> = Mutex::new(Vec::new());
    let failure: Mutex<Option<ExtractError>> = Mutex::new(None);
    let done = AtomicUsize::new(0);
    let failed_trees = AtomicUsize::new(0);

    let analyze_tree = |index: usize| {
        if cancel.is_cancelled() {
            return;
        }
        if !options.continue_on_failure
            && failure.lock().expect("failure slot poisoned").is_some()
        {
            return;
        }
        let tree = compilation.tree(index);
        if options.log_extraction_attempts {
            debug!("analyzing {}", tree.file_path);
        }
        let cx = TreeContext {
            compilation,
            tree_index: index,
            tree,
            model: compilation.semantic_model(index),
            registry: &registry,
            solution,
            options,
            cancel,
        };
        let mut tree_records = Vec::new();
        let mut error = None;
        for analyzer in analyzers() {
            match analyzer.analyze(&cx) {
                Ok(found) => tree_records.extend(found),
                Err(e) => {
                    error = Some(e);
                    break;
                }
            }
        }
        match error {
            Some(e) => {
                failed_trees.fetch_add(1, Ordering::Relaxed);
                if options.continue_on_failure {
                    if options.log_extraction_failures {
                        if options.enhanced_errors {
                            warn!("skipping {}: {e} ({e:?})", tree.file_path);
                        } else {
                            warn!("skipping {}: {e}", tree.file_path);
                        }
                    }
                } else {
                    *failure.lock().expect("failure slot poisoned") = Some(e);
                }
            }
            None => {
                records
                    .lock()
                    .expect("record accumulator poisoned")
                    .extend(tree_records);
            }
        }
        let current = done.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(sink) = progress {
            sink.report(current, total, Some(&tree.file_path));
        }
    };

    #[cfg(feature = "parallel_analysis")]
    (0..total).into_par_iter().for_each(analyze_tree);
    #[cfg(not(feature = "parallel_analysis"))]
    (0..total).for_each(analyze_tree);

    if let Some(error) = failure.lock().expect("failure slot poisoned").take() {
        return Err(error);
    }
    if options.collect_error_stats {
        debug!(
            "{} of {} tree(s) failed analysis",
            failed_trees.load(Ordering::Relaxed),
            total
        );
    }

    let mut records = records.into_inner().expect("record accumulator poisoned");
    // Per-tree outputs land in completion order; sort once at the end.
    records.sort_by(|a, b| {
        (&a.location.file, a.location.start_line, a.location.start_column)
            .cmp(&(&b.location.file, b.location.start_line, b.location.start_column))
    });
    disambiguate_ids(&mut records);

    let partial = cancel.is_cancelled();
    if !partial {
        if let Some(sink) = progress {
            sink.report(total, total, None);
        }
    }

    Ok(ExtractionResult {
        summary: summary::build(&records),
        records,
        partial,
    })
}

/// Identifiers are position-based and positions can collide only when two
/// records start at the same token; a suffix keeps them unique.
fn disambiguate_ids(records: &mut [UsageRecord]) {
    let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for record in records.iter_mut() {
        let seen = counts.entry(record.id.clone()).or_insert(0);
        *seen += 1;
        if *seen > 1 {
            record.id = format!("{}#{}", record.id, *seen);
        }
    }
}
