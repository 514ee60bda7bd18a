use std::time::{Duration, Instant};

use idxbench_domain::{BenchmarkResult, ConnectionProfile, PlanRow};

use crate::error::BenchError;
use crate::ports::QueryExecutor;

/// Number of executions averaged per statement when the caller does not say
/// otherwise. Matches the workload this harness was built to measure.
pub const DEFAULT_REPEAT_COUNT: usize = 3;

/// Times and explains read-only statements against a live connection.
///
/// Holds no state between calls; each operation is a single request/response
/// round trip. The connection capability is borrowed, never owned.
pub struct QueryBenchmarker<'a> {
    executor: &'a dyn QueryExecutor,
    profile: &'a ConnectionProfile,
}

impl<'a> QueryBenchmarker<'a> {
    pub fn new(executor: &'a dyn QueryExecutor, profile: &'a ConnectionProfile) -> Self {
        Self { executor, profile }
    }

    /// Execute `sql` `repeat_count` times in sequence and average the
    /// wall-clock durations.
    ///
    /// Each execution fully materializes its result set before the next
    /// begins, so timing reflects complete execution cost rather than
    /// server-side planning alone. The reported row count is the last
    /// execution's; differing counts across repeats (concurrent writers) are
    /// an accepted imprecision. A failed repeat aborts the run and discards
    /// the partial timings.
    pub async fn time_query(
        &self,
        sql: &str,
        label: &str,
        repeat_count: usize,
    ) -> Result<BenchmarkResult, BenchError> {
        if repeat_count < 1 {
            return Err(BenchError::InvalidConfiguration(format!(
                "repeat count must be >= 1, got {repeat_count}"
            )));
        }

        let mut total = Duration::ZERO;
        let mut last_row_count = 0;
        for _ in 0..repeat_count {
            let start = Instant::now();
            let result = self
                .executor
                .fetch_all(self.profile, sql)
                .await
                .map_err(|e| BenchError::from_executor(label, e))?;
            total += start.elapsed();
            last_row_count = result.row_count();
        }

        Ok(BenchmarkResult::new(
            label,
            total.as_secs_f64() / repeat_count as f64,
            last_row_count,
        ))
    }

    /// Run the statement once under `EXPLAIN` and return the plan rows in
    /// engine order. Purely descriptive: no timing, no interpretation.
    pub async fn explain_query(&self, sql: &str, label: &str) -> Result<Vec<PlanRow>, BenchError> {
        let explain_sql = format!("EXPLAIN {sql}");
        let result = self
            .executor
            .fetch_all(self.profile, &explain_sql)
            .await
            .map_err(|e| BenchError::from_executor(label, e))?;

        Ok(result
            .rows
            .into_iter()
            .map(|row| {
                PlanRow::new(
                    result
                        .columns
                        .iter()
                        .cloned()
                        .zip(row.into_iter().map(|v| if v == "NULL" { None } else { Some(v) }))
                        .collect(),
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rstest::rstest;

    use crate::ports::query_executor::MockQueryExecutor;
    use crate::ports::ExecutorError;
    use idxbench_domain::QueryResult;

    fn test_profile() -> ConnectionProfile {
        ConnectionProfile::new("localhost", 3306, "testdb", "bench", "pw")
    }

    fn fixed_result(rows: usize) -> QueryResult {
        QueryResult::new(
            vec!["a".into()],
            (0..rows).map(|i| vec![i.to_string()]).collect(),
        )
    }

    /// Counts executions and fails on a configured attempt, with an optional
    /// fixed latency per call.
    struct StubExecutor {
        calls: AtomicUsize,
        rows: usize,
        latency: Duration,
        fail_on_call: Option<usize>,
    }

    impl StubExecutor {
        fn returning(rows: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                rows,
                latency: Duration::ZERO,
                fail_on_call: None,
            }
        }

        fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        fn failing_on(mut self, call: usize) -> Self {
            self.fail_on_call = Some(call);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QueryExecutor for StubExecutor {
        async fn fetch_all(
            &self,
            _profile: &ConnectionProfile,
            _sql: &str,
        ) -> Result<QueryResult, ExecutorError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on_call == Some(call) {
                return Err(ExecutorError::QueryFailed("lock timeout".into()));
            }
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            Ok(fixed_result(self.rows))
        }

        async fn execute(
            &self,
            _profile: &ConnectionProfile,
            _sql: &str,
        ) -> Result<(), ExecutorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    mod time_query {
        use super::*;

        #[rstest]
        #[case(1)]
        #[case(3)]
        #[case(7)]
        #[tokio::test]
        async fn valid_repeat_count_reports_fixed_row_count(#[case] repeat: usize) {
            let stub = StubExecutor::returning(4);
            let profile = test_profile();
            let bench = QueryBenchmarker::new(&stub, &profile);

            let result = bench
                .time_query("SELECT 1", "fixed", repeat)
                .await
                .unwrap();

            assert_eq!(result.row_count, 4);
            assert!(result.average_seconds >= 0.0);
            assert_eq!(stub.calls(), repeat);
        }

        #[tokio::test]
        async fn zero_repeat_count_fails_without_executing() {
            let mut mock = MockQueryExecutor::new();
            mock.expect_fetch_all().times(0);
            let profile = test_profile();
            let bench = QueryBenchmarker::new(&mock, &profile);

            let err = bench.time_query("SELECT 1", "never", 0).await.unwrap_err();

            assert!(matches!(err, BenchError::InvalidConfiguration(_)));
        }

        #[tokio::test]
        async fn failure_on_second_repeat_discards_partial_timings() {
            let stub = StubExecutor::returning(4).failing_on(2);
            let profile = test_profile();
            let bench = QueryBenchmarker::new(&stub, &profile);

            let err = bench
                .time_query("SELECT 1", "flaky", 3)
                .await
                .unwrap_err();

            assert!(matches!(err, BenchError::QueryExecutionFailed { .. }));
            // No further attempts after the failure
            assert_eq!(stub.calls(), 2);
        }

        #[tokio::test]
        async fn identical_inputs_yield_identical_results() {
            let stub = StubExecutor::returning(10);
            let profile = test_profile();
            let bench = QueryBenchmarker::new(&stub, &profile);

            let first = bench.time_query("SELECT 1", "idem", 3).await.unwrap();
            let second = bench.time_query("SELECT 1", "idem", 3).await.unwrap();

            assert_eq!(first.row_count, second.row_count);
            assert_eq!(first.label, second.label);
        }

        #[tokio::test]
        async fn average_reflects_per_execution_latency() {
            let stub = StubExecutor::returning(10).with_latency(Duration::from_millis(50));
            let profile = test_profile();
            let bench = QueryBenchmarker::new(&stub, &profile);

            let result = bench.time_query("SELECT 1", "latency", 3).await.unwrap();

            assert_eq!(result.row_count, 10);
            // 50ms stub latency per execution, with generous jitter headroom
            assert!(result.average_seconds >= 0.050);
            assert!(result.average_seconds < 0.250);
            assert_eq!(stub.calls(), 3);
        }
    }

    mod explain_query {
        use super::*;

        #[tokio::test]
        async fn returns_stub_rows_in_order_with_one_execution() {
            let mut mock = MockQueryExecutor::new();
            mock.expect_fetch_all()
                .withf(|_, sql| sql.starts_with("EXPLAIN "))
                .times(1)
                .returning(|_, _| {
                    Ok(QueryResult::new(
                        vec!["id".into(), "key".into()],
                        vec![
                            vec!["1".into(), "NULL".into()],
                            vec!["2".into(), "idx_payment_value".into()],
                        ],
                    ))
                });
            let profile = test_profile();
            let bench = QueryBenchmarker::new(&mock, &profile);

            let plan = bench
                .explain_query("SELECT * FROM order_payments", "payments")
                .await
                .unwrap();

            assert_eq!(plan.len(), 2);
            assert_eq!(plan[0].fields[0], ("id".into(), Some("1".into())));
            assert_eq!(plan[0].fields[1], ("key".into(), None));
            assert_eq!(
                plan[1].fields[1],
                ("key".into(), Some("idx_payment_value".into()))
            );
        }

        #[tokio::test]
        async fn engine_rejection_surfaces_query_execution_failed() {
            let mut mock = MockQueryExecutor::new();
            mock.expect_fetch_all()
                .returning(|_, _| Err(ExecutorError::QueryFailed("EXPLAIN not supported".into())));
            let profile = test_profile();
            let bench = QueryBenchmarker::new(&mock, &profile);

            let err = bench.explain_query("SHOW TABLES", "show").await.unwrap_err();

            assert!(matches!(err, BenchError::QueryExecutionFailed { .. }));
        }
    }
}
