//! Console report rendering.
//!
//! Everything writes to an injected `io::Write` sink; the binary passes
//! stdout, tests pass buffers.

use std::io::Write;

use idxbench_domain::{BenchmarkResult, PlanRow};

pub fn render_header<W: Write>(out: &mut W, title: &str) -> std::io::Result<()> {
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(60))
}

/// One timed statement: label, the SQL, average time and row count.
pub fn render_timing<W: Write>(
    out: &mut W,
    sql: &str,
    result: &BenchmarkResult,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", result.label)?;
    writeln!(out, "{}", "-".repeat(50))?;
    writeln!(out, "Query: {}", sql.trim())?;
    writeln!(
        out,
        "Average execution time: {:.4} seconds",
        result.average_seconds
    )?;
    writeln!(out, "Results returned: {} rows", result.row_count)
}

/// EXPLAIN output as a pipe-separated table, header taken from the first
/// row's field names. NULL fields render as the literal NULL.
pub fn render_plan<W: Write>(out: &mut W, label: &str, plan: &[PlanRow]) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "EXPLAIN for: {label}")?;
    writeln!(out, "{}", "-".repeat(30))?;
    let Some(first) = plan.first() else {
        return writeln!(out, "(no plan rows)");
    };
    writeln!(out, "{}", first.column_names().join(" | "))?;
    writeln!(out, "{}", "-".repeat(80))?;
    for row in plan {
        let rendered = row
            .fields
            .iter()
            .map(|(_, value)| value.as_deref().unwrap_or("NULL"))
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(out, "{rendered}")?;
    }
    Ok(())
}

pub fn render_summary<W: Write>(
    out: &mut W,
    title: &str,
    results: &[BenchmarkResult],
) -> std::io::Result<()> {
    writeln!(out)?;
    render_header(out, title)?;
    writeln!(out, "{:<30} {:<12} {:<8}", "Query", "Time (s)", "Rows")?;
    writeln!(out, "{}", "-".repeat(50))?;
    for result in results {
        writeln!(
            out,
            "{:<30} {:<12.4} {:<8}",
            result.label, result.average_seconds, result.row_count
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Total queries tested: {}", results.len())?;
    if !results.is_empty() {
        let average =
            results.iter().map(|r| r.average_seconds).sum::<f64>() / results.len() as f64;
        writeln!(out, "Average query time: {average:.4} seconds")?;
    }
    Ok(())
}

/// Before/after table with per-query and overall improvement percentages.
/// Pairs entries positionally; both runs execute the same step list.
pub fn render_comparison<W: Write>(
    out: &mut W,
    before: &[BenchmarkResult],
    after: &[BenchmarkResult],
) -> std::io::Result<()> {
    writeln!(out)?;
    render_header(out, "PERFORMANCE COMPARISON: BEFORE vs AFTER INDEXES")?;
    writeln!(
        out,
        "{:<30} {:<12} {:<12} {:<15}",
        "Query", "Before (s)", "After (s)", "Improvement"
    )?;
    writeln!(out, "{}", "-".repeat(70))?;
    for (b, a) in before.iter().zip(after) {
        writeln!(
            out,
            "{:<30} {:<12.4} {:<12.4} {:>+14.1}%",
            b.label,
            b.average_seconds,
            a.average_seconds,
            improvement_pct(b.average_seconds, a.average_seconds)
        )?;
    }

    let before_avg = mean(before);
    let after_avg = mean(after);
    writeln!(out)?;
    writeln!(out, "Average time before indexes: {before_avg:.4} seconds")?;
    writeln!(out, "Average time after indexes:  {after_avg:.4} seconds")?;
    writeln!(
        out,
        "Overall improvement: {:+.1}%",
        improvement_pct(before_avg, after_avg)
    )
}

/// JSON form of the summary, for machine consumption.
pub fn render_json_summary<W: Write>(
    out: &mut W,
    results: &[BenchmarkResult],
) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, results).map_err(std::io::Error::other)?;
    writeln!(out)
}

/// JSON form of the before/after comparison: one object per step, carrying
/// both timings and the improvement percentage the console table shows.
pub fn render_json_comparison<W: Write>(
    out: &mut W,
    before: &[BenchmarkResult],
    after: &[BenchmarkResult],
) -> std::io::Result<()> {
    let rows: Vec<serde_json::Value> = before
        .iter()
        .zip(after)
        .map(|(b, a)| {
            serde_json::json!({
                "label": b.label,
                "before_seconds": b.average_seconds,
                "after_seconds": a.average_seconds,
                "improvement_pct": improvement_pct(b.average_seconds, a.average_seconds),
                "row_count": a.row_count,
            })
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &rows).map_err(std::io::Error::other)?;
    writeln!(out)
}

fn mean(results: &[BenchmarkResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| r.average_seconds).sum::<f64>() / results.len() as f64
}

fn improvement_pct(before: f64, after: f64) -> f64 {
    if before == 0.0 {
        return 0.0;
    }
    (before - after) / before * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered<F: FnOnce(&mut Vec<u8>)>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn timing_block_shows_label_query_and_metrics() {
        let result = BenchmarkResult::new("Orders by year", 0.4509, 3);
        let text = rendered(|buf| {
            render_timing(buf, "SELECT YEAR(...) FROM orders", &result).unwrap();
        });

        assert!(text.contains("Orders by year"));
        assert!(text.contains("Query: SELECT YEAR(...) FROM orders"));
        assert!(text.contains("Average execution time: 0.4509 seconds"));
        assert!(text.contains("Results returned: 3 rows"));
    }

    #[test]
    fn plan_renders_nulls_and_header_from_first_row() {
        let plan = vec![PlanRow::new(vec![
            ("id".into(), Some("1".into())),
            ("key".into(), None),
        ])];
        let text = rendered(|buf| render_plan(buf, "payments", &plan).unwrap());

        assert!(text.contains("EXPLAIN for: payments"));
        assert!(text.contains("id | key"));
        assert!(text.contains("1 | NULL"));
    }

    #[test]
    fn empty_plan_renders_placeholder() {
        let text = rendered(|buf| render_plan(buf, "none", &[]).unwrap());
        assert!(text.contains("(no plan rows)"));
    }

    #[test]
    fn summary_averages_across_results() {
        let results = vec![
            BenchmarkResult::new("a", 0.2, 10),
            BenchmarkResult::new("b", 0.4, 5),
        ];
        let text = rendered(|buf| render_summary(buf, "SUMMARY", &results).unwrap());

        assert!(text.contains("Total queries tested: 2"));
        assert!(text.contains("Average query time: 0.3000 seconds"));
    }

    #[test]
    fn comparison_shows_signed_improvement() {
        let before = vec![BenchmarkResult::new("a", 0.4, 10)];
        let after = vec![BenchmarkResult::new("a", 0.1, 10)];
        let text = rendered(|buf| render_comparison(buf, &before, &after).unwrap());

        assert!(text.contains("+75.0%"));
        assert!(text.contains("Overall improvement: +75.0%"));
    }

    #[test]
    fn json_comparison_pairs_timings_with_improvement() {
        let before = vec![BenchmarkResult::new("a", 0.4, 10)];
        let after = vec![BenchmarkResult::new("a", 0.1, 10)];
        let text = rendered(|buf| render_json_comparison(buf, &before, &after).unwrap());
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed[0]["label"], "a");
        assert_eq!(parsed[0]["before_seconds"], 0.4);
        assert_eq!(parsed[0]["after_seconds"], 0.1);
        let pct = parsed[0]["improvement_pct"].as_f64().unwrap();
        assert!((pct - 75.0).abs() < 1e-9);
    }

    #[test]
    fn json_summary_is_an_array_of_results() {
        let results = vec![BenchmarkResult::new("a", 0.05, 10)];
        let text = rendered(|buf| render_json_summary(buf, &results).unwrap());
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed[0]["label"], "a");
        assert_eq!(parsed[0]["row_count"], 10);
    }
}
