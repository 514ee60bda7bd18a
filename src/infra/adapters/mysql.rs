use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;

use idxbench_app::ports::{ExecutorError, QueryExecutor};
use idxbench_domain::{ConnectionProfile, QueryResult};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Client error numbers for an unreachable or lost server, as opposed to a
// rejected statement.
const CONNECTION_ERROR_CODES: &[&str] = &["ERROR 2002", "ERROR 2003", "ERROR 2005", "ERROR 2013"];

/// Drives the `mysql` command-line client as a subprocess.
///
/// Statements run with `--batch`, which prints a header row followed by
/// tab-separated values with `\t`, `\n`, `\\` and `\0` escaped inside fields
/// and NULL rendered as the literal NULL. The whole result set is read before
/// returning, so callers timing this call measure full materialization.
pub struct MySqlAdapter {
    timeout_secs: u64,
}

impl MySqlAdapter {
    pub fn new() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// A hung statement blocks until this expires; expiry surfaces as a
    /// timeout failure, never an indefinite wait.
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    async fn run_client(
        &self,
        profile: &ConnectionProfile,
        sql: &str,
    ) -> Result<String, ExecutorError> {
        let mut child = Command::new("mysql")
            .arg("--host")
            .arg(&profile.host)
            .arg("--port")
            .arg(profile.port.to_string())
            .arg("--user")
            .arg(&profile.user)
            .arg("--database")
            .arg(&profile.database)
            .arg("--batch")
            .arg("--execute")
            .arg(sql)
            // Keeps the password out of the process argument list
            .env("MYSQL_PWD", &profile.password)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecutorError::CommandNotFound(e.to_string()))?;

        // Read stdout/stderr BEFORE wait() to prevent pipe buffer deadlock
        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        let result = timeout(Duration::from_secs(self.timeout_secs), async {
            let (stdout_result, stderr_result) = tokio::join!(
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut out) = stdout_handle {
                        out.read_to_end(&mut buf).await?;
                    }
                    Ok::<_, std::io::Error>(String::from_utf8_lossy(&buf).into_owned())
                },
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut err) = stderr_handle {
                        err.read_to_end(&mut buf).await?;
                    }
                    Ok::<_, std::io::Error>(String::from_utf8_lossy(&buf).into_owned())
                }
            );

            let stdout = stdout_result?;
            let stderr = stderr_result?;
            let status = child.wait().await?;

            Ok::<_, std::io::Error>((status, stdout, stderr))
        })
        .await
        .map_err(|_| ExecutorError::Timeout(self.timeout_secs))?
        .map_err(|e| ExecutorError::QueryFailed(e.to_string()))?;

        let (status, stdout, stderr) = result;

        if !status.success() {
            return Err(classify_failure(stderr.trim()));
        }

        Ok(stdout)
    }
}

impl Default for MySqlAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryExecutor for MySqlAdapter {
    async fn fetch_all(
        &self,
        profile: &ConnectionProfile,
        sql: &str,
    ) -> Result<QueryResult, ExecutorError> {
        let stdout = self.run_client(profile, sql).await?;
        parse_batch_output(&stdout)
    }

    async fn execute(&self, profile: &ConnectionProfile, sql: &str) -> Result<(), ExecutorError> {
        self.run_client(profile, sql).await?;
        Ok(())
    }
}

/// Maps connection-level client errors to `ConnectionUnavailable`, anything
/// else to `QueryFailed` with the server's message.
fn classify_failure(stderr: &str) -> ExecutorError {
    if CONNECTION_ERROR_CODES
        .iter()
        .any(|code| stderr.contains(code))
    {
        ExecutorError::ConnectionUnavailable(stderr.to_string())
    } else {
        ExecutorError::QueryFailed(stderr.to_string())
    }
}

/// Parse `--batch` output: first line is the header, remaining lines are
/// tab-separated rows. The csv crate with quoting disabled handles fields
/// containing double quotes; batch-mode escapes are undone afterwards.
fn parse_batch_output(stdout: &str) -> Result<QueryResult, ExecutorError> {
    if stdout.trim().is_empty() {
        return Ok(QueryResult::empty());
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .has_headers(true)
        .from_reader(stdout.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| ExecutorError::InvalidOutput(format!("TSV parse error: {e}")))?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| ExecutorError::InvalidOutput(format!("TSV parse error: {e}")))?;
        rows.push(record.iter().map(unescape_batch_field).collect());
    }

    Ok(QueryResult::new(columns, rows))
}

/// Undo the client's batch-mode escaping inside a field.
fn unescape_batch_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
