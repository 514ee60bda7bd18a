use std::io::Write;
use std::path::Path;

use idxbench_domain::{ConnectionProfile, OLIST_TABLES, TableSpec};

use crate::error::BenchError;
use crate::ports::QueryExecutor;
use crate::sql::{quote_ident, quote_literal};

/// Rows per INSERT statement.
pub const BATCH_SIZE: usize = 500;

/// Bulk-loads the Olist CSV files via batched `INSERT IGNORE` statements.
///
/// Empty CSV fields become SQL NULL. `SET FOREIGN_KEY_CHECKS = 0` is
/// prepended to every insert batch: the executor runs one client session per
/// statement, so the toggle has to ride along with each batch rather than be
/// issued once up front.
pub struct CsvLoader<'a> {
    executor: &'a dyn QueryExecutor,
    profile: &'a ConnectionProfile,
}

impl<'a> CsvLoader<'a> {
    pub fn new(executor: &'a dyn QueryExecutor, profile: &'a ConnectionProfile) -> Self {
        Self { executor, profile }
    }

    /// Load all four tables from `data_dir`, then print per-table counts.
    pub async fn load_dataset<W: Write>(
        &self,
        data_dir: &Path,
        out: &mut W,
    ) -> Result<(), BenchError> {
        self.load_tables(data_dir, out).await?;
        self.render_summary(out).await
    }

    async fn load_tables<W: Write>(&self, data_dir: &Path, out: &mut W) -> Result<(), BenchError> {
        for spec in OLIST_TABLES {
            writeln!(out, "Loading {}...", spec.table)?;
            let loaded = self.load_table(spec, &data_dir.join(spec.csv_file)).await?;
            writeln!(out, "Loaded {} rows into {}", loaded, spec.table)?;
        }
        Ok(())
    }

    async fn load_table(&self, spec: &TableSpec, csv_path: &Path) -> Result<usize, BenchError> {
        let mut reader = csv::Reader::from_path(csv_path)?;

        let mut batch: Vec<Vec<Option<String>>> = Vec::with_capacity(BATCH_SIZE);
        let mut loaded = 0usize;
        for record in reader.records() {
            let record = record?;
            if record.len() != spec.column_count() {
                return Err(BenchError::InvalidConfiguration(format!(
                    "{}: expected {} fields per row, got {}",
                    spec.csv_file,
                    spec.column_count(),
                    record.len()
                )));
            }
            batch.push(
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            None
                        } else {
                            Some(field.to_string())
                        }
                    })
                    .collect(),
            );

            if batch.len() == BATCH_SIZE {
                loaded += self.flush_batch(spec, &batch).await?;
                batch.clear();
            }
        }
        if !batch.is_empty() {
            loaded += self.flush_batch(spec, &batch).await?;
        }

        Ok(loaded)
    }

    async fn flush_batch(
        &self,
        spec: &TableSpec,
        batch: &[Vec<Option<String>>],
    ) -> Result<usize, BenchError> {
        let statement = format!(
            "SET FOREIGN_KEY_CHECKS = 0; {}",
            build_insert(spec, batch)
        );
        self.executor
            .execute(self.profile, &statement)
            .await
            .map_err(|e| BenchError::from_executor(spec.table, e))?;
        Ok(batch.len())
    }

    async fn render_summary<W: Write>(&self, out: &mut W) -> Result<(), BenchError> {
        writeln!(out)?;
        writeln!(out, "{}", "=".repeat(40))?;
        writeln!(out, "DATA LOADING SUMMARY")?;
        writeln!(out, "{}", "=".repeat(40))?;
        for spec in OLIST_TABLES {
            let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(spec.table));
            let result = self
                .executor
                .fetch_all(self.profile, &sql)
                .await
                .map_err(|e| BenchError::from_executor(spec.table, e))?;
            let count = result
                .rows
                .first()
                .and_then(|row| row.first())
                .cloned()
                .unwrap_or_else(|| "0".to_string());
            writeln!(out, "{}: {} rows", spec.table, count)?;
        }
        Ok(())
    }
}

/// Build one multi-row `INSERT IGNORE` statement. `None` renders as NULL.
fn build_insert(spec: &TableSpec, rows: &[Vec<Option<String>>]) -> String {
    let columns = spec
        .columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let values = rows
        .iter()
        .map(|row| {
            let rendered = row
                .iter()
                .map(|field| match field {
                    Some(value) => quote_literal(value),
                    None => "NULL".to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("({rendered})")
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT IGNORE INTO {} ({}) VALUES {}",
        quote_ident(spec.table),
        columns,
        values
    )
}
