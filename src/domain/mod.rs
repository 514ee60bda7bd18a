pub mod benchmark;
pub mod connection;
pub mod dataset;
pub mod query_result;

pub use benchmark::{BenchmarkResult, PlanRow};
pub use connection::ConnectionProfile;
pub use dataset::{OLIST_TABLES, TableSpec};
pub use query_result::QueryResult;
