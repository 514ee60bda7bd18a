/// A fully materialized result set.
///
/// Rows are kept as strings exactly as the client returned them; the harness
/// never interprets values, it only counts and displays them.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Column names from the result set header
    pub columns: Vec<String>,
    /// Row data as strings (each inner Vec is one row)
    pub rows: Vec<Vec<String>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// An empty result, as returned by statements that produce no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
