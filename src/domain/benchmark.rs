use serde::Serialize;

/// Averaged timing for one benchmarked statement.
///
/// Produced only for fully successful runs; a failed repeat discards the
/// whole measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    /// Human-readable label supplied by the caller
    pub label: String,
    /// Arithmetic mean of the per-execution wall-clock durations, in seconds
    pub average_seconds: f64,
    /// Row count of the last execution's result set
    pub row_count: usize,
}

impl BenchmarkResult {
    pub fn new(label: impl Into<String>, average_seconds: f64, row_count: usize) -> Self {
        Self {
            label: label.into(),
            average_seconds,
            row_count,
        }
    }
}

/// One row of the engine's `EXPLAIN` output.
///
/// Fields are opaque to the harness: engine-defined column names paired with
/// nullable string values, in engine-returned order. `None` covers both SQL
/// NULL and a field whose value is literally the string `NULL`; the client's
/// batch output does not distinguish the two.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRow {
    pub fields: Vec<(String, Option<String>)>,
}

impl PlanRow {
    pub fn new(fields: Vec<(String, Option<String>)>) -> Self {
        Self { fields }
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benchmark_result_serializes_to_json() {
        let result = BenchmarkResult::new("Orders by year", 0.4509, 3);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["label"], "Orders by year");
        assert_eq!(json["row_count"], 3);
        assert!((json["average_seconds"].as_f64().unwrap() - 0.4509).abs() < f64::EPSILON);
    }

    #[test]
    fn plan_row_preserves_field_order() {
        let row = PlanRow::new(vec![
            ("id".into(), Some("1".into())),
            ("key".into(), None),
            ("rows".into(), Some("104478".into())),
        ]);
        assert_eq!(row.column_names(), vec!["id", "key", "rows"]);
        assert_eq!(row.fields[1].1, None);
    }
}
