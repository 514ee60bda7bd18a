use async_trait::async_trait;
use thiserror::Error;

use idxbench_domain::{ConnectionProfile, QueryResult};

/// Executor-level failures, classified by the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// The server rejected or failed to complete the statement
    #[error("query failed: {0}")]
    QueryFailed(String),
    /// The server could not be reached
    #[error("connection unavailable: {0}")]
    ConnectionUnavailable(String),
    /// The client binary could not be spawned
    #[error("client not found: {0}")]
    CommandNotFound(String),
    /// The statement did not complete within the configured timeout
    #[error("statement timed out after {0}s")]
    Timeout(u64),
    /// The client produced output the adapter could not parse
    #[error("invalid client output: {0}")]
    InvalidOutput(String),
}

/// Capability to run SQL against a live server.
///
/// `fetch_all` must fully materialize the result set before returning, so a
/// wall clock around the call measures complete execution cost. Adapters
/// render SQL NULL as the literal string `NULL`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn fetch_all(
        &self,
        profile: &ConnectionProfile,
        sql: &str,
    ) -> Result<QueryResult, ExecutorError>;

    /// Run a statement that produces no result set (DDL, DML, SET).
    async fn execute(&self, profile: &ConnectionProfile, sql: &str) -> Result<(), ExecutorError>;
}
