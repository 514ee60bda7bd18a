pub mod benchmarker;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod ports;
pub mod report;
pub mod sql;
pub mod suites;

pub use benchmarker::{DEFAULT_REPEAT_COUNT, QueryBenchmarker};
pub use error::BenchError;
pub use loader::CsvLoader;
pub use pipeline::{IndexComparison, SuiteOptions, run_index_pipeline, run_suite};
pub use ports::{ExecutorError, QueryExecutor};
