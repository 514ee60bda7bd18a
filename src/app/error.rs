use thiserror::Error;

use crate::ports::ExecutorError;

/// Failures surfaced by the benchmarking core.
///
/// Nothing here is retried; every failure is surfaced synchronously to the
/// caller, who decides whether to continue with remaining benchmarks.
#[derive(Debug, Error)]
pub enum BenchError {
    /// A caller-supplied parameter violated a precondition
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The server rejected or failed to complete a benchmarked statement
    #[error("query '{label}' failed: {cause}")]
    QueryExecutionFailed {
        label: String,
        #[source]
        cause: ExecutorError,
    },
    /// Connection acquisition failed; fatal to the calling operation
    #[error("connection unavailable: {0}")]
    ConnectionUnavailable(String),
    #[error("csv read failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("report output failed: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchError {
    /// Attach the benchmark label to an executor failure. Unreachable-server
    /// and missing-client failures stay `ConnectionUnavailable` regardless of
    /// which statement hit them.
    pub fn from_executor(label: &str, cause: ExecutorError) -> Self {
        match cause {
            ExecutorError::ConnectionUnavailable(msg) | ExecutorError::CommandNotFound(msg) => {
                Self::ConnectionUnavailable(msg)
            }
            other => Self::QueryExecutionFailed {
                label: label.to_string(),
                cause: other,
            },
        }
    }
}
