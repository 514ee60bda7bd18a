//! Ordered benchmark pipelines.
//!
//! Each suite is an explicit list of named steps run in sequence; a failed
//! step aborts the suite and surfaces the error, leaving no partial result
//! for that step.

use std::io::Write;

use idxbench_domain::{BenchmarkResult, ConnectionProfile};

use crate::benchmarker::{DEFAULT_REPEAT_COUNT, QueryBenchmarker};
use crate::error::BenchError;
use crate::ports::{ExecutorError, QueryExecutor};
use crate::report;
use crate::suites::{BenchStep, INDEX_COMPARISON_STEPS, INDEX_STATEMENTS};

#[derive(Debug, Clone, Copy)]
pub struct SuiteOptions {
    pub repeat_count: usize,
    /// Include an EXPLAIN table after each timed step
    pub explain: bool,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            repeat_count: DEFAULT_REPEAT_COUNT,
            explain: false,
        }
    }
}

/// Run every step of a suite, rendering as it goes, and return the results
/// for summary or comparison use.
pub async fn run_suite<W: Write>(
    executor: &dyn QueryExecutor,
    profile: &ConnectionProfile,
    title: &str,
    steps: &[BenchStep],
    options: SuiteOptions,
    out: &mut W,
) -> Result<Vec<BenchmarkResult>, BenchError> {
    report::render_header(out, title)?;
    let bench = QueryBenchmarker::new(executor, profile);

    let mut results = Vec::with_capacity(steps.len());
    for step in steps {
        let result = bench
            .time_query(step.sql, step.label, options.repeat_count)
            .await?;
        report::render_timing(out, step.sql, &result)?;
        if options.explain {
            let plan = bench.explain_query(step.sql, step.label).await?;
            report::render_plan(out, step.label, &plan)?;
        }
        results.push(result);
    }

    report::render_summary(out, &format!("{title} SUMMARY"), &results)?;
    Ok(results)
}

/// Positionally paired timings from before and after index creation.
#[derive(Debug, Clone)]
pub struct IndexComparison {
    pub before: Vec<BenchmarkResult>,
    pub after: Vec<BenchmarkResult>,
}

/// Time the comparison steps, create the secondary indexes, re-time, and
/// render the before/after table. The baseline is taken in-process so the
/// comparison always refers to this server's current state.
pub async fn run_index_pipeline<W: Write>(
    executor: &dyn QueryExecutor,
    profile: &ConnectionProfile,
    options: SuiteOptions,
    out: &mut W,
) -> Result<IndexComparison, BenchError> {
    let before = run_suite(
        executor,
        profile,
        "SCALAR QUERIES (WITHOUT INDEXES)",
        INDEX_COMPARISON_STEPS,
        options,
        out,
    )
    .await?;

    writeln!(out)?;
    report::render_header(out, "CREATING INDEXES FOR PERFORMANCE OPTIMIZATION")?;
    for (name, sql) in INDEX_STATEMENTS {
        match executor.execute(profile, sql).await {
            Ok(()) => writeln!(out, "Index {name} created")?,
            Err(ExecutorError::QueryFailed(cause)) if is_duplicate_index(&cause) => {
                writeln!(out, "Index {name} already exists")?;
            }
            Err(e) => return Err(BenchError::from_executor(name, e)),
        }
    }

    let after = run_suite(
        executor,
        profile,
        "SCALAR QUERIES (WITH INDEXES)",
        INDEX_COMPARISON_STEPS,
        options,
        out,
    )
    .await?;

    report::render_comparison(out, &before, &after)?;
    Ok(IndexComparison { before, after })
}

// MySQL error 1061: index with that name already exists on the table
fn is_duplicate_index(cause: &str) -> bool {
    cause.contains("Duplicate key name") || cause.contains("1061")
}
