use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};

use idxbench_app::benchmarker::DEFAULT_REPEAT_COUNT;
use idxbench_app::loader::CsvLoader;
use idxbench_app::pipeline::{self, SuiteOptions};
use idxbench_app::ports::QueryExecutor;
use idxbench_app::{report, suites};
use idxbench_domain::ConnectionProfile;
use idxbench_domain::connection::{DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PORT};
use idxbench_infra::adapters::MySqlAdapter;
use idxbench_infra::config::TomlProfileStore;

/// Benchmark MySQL index performance on the Olist e-commerce dataset.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Command,
}

/// Connection settings. Flags beat environment, environment beats the saved
/// profile, the profile beats defaults. User and password have no default.
#[derive(Args, Debug)]
struct ConnectionArgs {
    #[arg(long, env = "IDXBENCH_HOST", global = true)]
    host: Option<String>,

    #[arg(long, env = "IDXBENCH_PORT", global = true)]
    port: Option<u16>,

    #[arg(long, env = "IDXBENCH_USER", global = true)]
    user: Option<String>,

    #[arg(long, env = "IDXBENCH_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    #[arg(long, env = "IDXBENCH_DATABASE", global = true)]
    database: Option<String>,

    /// Per-statement timeout; a hung query fails instead of blocking forever
    #[arg(long, default_value_t = 30, global = true)]
    timeout_secs: u64,
}

#[derive(Args, Debug, Clone, Copy)]
struct SuiteArgs {
    /// Executions averaged per statement
    #[arg(long, default_value_t = DEFAULT_REPEAT_COUNT)]
    repeat: usize,

    /// Show the engine's EXPLAIN output after each timed query
    #[arg(long)]
    explain: bool,

    /// Emit the summary as JSON instead of the console report
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the Olist tables (including the full-text index)
    Schema,
    /// Bulk-load the Olist CSV files
    Load {
        /// Directory containing the olist_*_dataset.csv files
        #[arg(long, default_value = "datasets")]
        data_dir: PathBuf,
    },
    /// Time the scalar-predicate queries
    Scalar(SuiteArgs),
    /// Time the full-text search queries
    Fulltext(SuiteArgs),
    /// Create secondary indexes and compare scalar timings before/after
    Index(SuiteArgs),
    /// Persist the current connection settings to the profile file
    SaveProfile,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;

    let cli = Cli::parse();
    let store = TomlProfileStore::new()?;
    let profile = resolve_profile(&cli.connection, &store)?;
    let adapter = MySqlAdapter::with_timeout(cli.connection.timeout_secs);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Schema => run_schema(&adapter, &profile, &mut out).await?,
        Command::Load { data_dir } => {
            writeln!(out, "Loading into {}", profile.to_masked_dsn())?;
            CsvLoader::new(&adapter, &profile)
                .load_dataset(&data_dir, &mut out)
                .await?;
        }
        Command::Scalar(args) => {
            run_suite_command(
                &adapter,
                &profile,
                "TESTING SCALAR FIELD QUERIES",
                suites::SCALAR_STEPS,
                args,
                &mut out,
            )
            .await?;
        }
        Command::Fulltext(args) => {
            run_suite_command(
                &adapter,
                &profile,
                "TESTING FULL-TEXT SEARCHES",
                suites::FULLTEXT_STEPS,
                args,
                &mut out,
            )
            .await?;
        }
        Command::Index(args) => {
            let options = SuiteOptions {
                repeat_count: args.repeat,
                explain: args.explain,
            };
            if args.json {
                let mut sink = std::io::sink();
                let comparison =
                    pipeline::run_index_pipeline(&adapter, &profile, options, &mut sink).await?;
                report::render_json_comparison(&mut out, &comparison.before, &comparison.after)?;
            } else {
                pipeline::run_index_pipeline(&adapter, &profile, options, &mut out).await?;
            }
        }
        Command::SaveProfile => {
            store.save(&profile)?;
            writeln!(
                out,
                "Saved {} to {}",
                profile.to_masked_dsn(),
                store.storage_path().display()
            )?;
        }
    }

    Ok(())
}

async fn run_schema<W: Write>(
    adapter: &MySqlAdapter,
    profile: &ConnectionProfile,
    out: &mut W,
) -> Result<()> {
    for statement in suites::SCHEMA_STATEMENTS {
        adapter
            .execute(profile, statement)
            .await
            .map_err(|e| eyre!("schema creation failed: {e}"))?;
    }
    writeln!(out, "Created {} tables", suites::SCHEMA_STATEMENTS.len())?;
    Ok(())
}

async fn run_suite_command<W: Write>(
    adapter: &MySqlAdapter,
    profile: &ConnectionProfile,
    title: &str,
    steps: &[suites::BenchStep],
    args: SuiteArgs,
    out: &mut W,
) -> Result<()> {
    let options = SuiteOptions {
        repeat_count: args.repeat,
        explain: args.explain,
    };
    if args.json {
        let mut sink = std::io::sink();
        let results =
            pipeline::run_suite(adapter, profile, title, steps, options, &mut sink).await?;
        report::render_json_summary(out, &results)?;
    } else {
        pipeline::run_suite(adapter, profile, title, steps, options, out).await?;
    }
    Ok(())
}

/// Merge flags, environment (already folded into flags by clap), the saved
/// profile, and defaults into a complete profile.
fn resolve_profile(args: &ConnectionArgs, store: &TomlProfileStore) -> Result<ConnectionProfile> {
    let saved = store.load()?;

    let host = args
        .host
        .clone()
        .or_else(|| saved.as_ref().map(|p| p.host.clone()))
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = args
        .port
        .or(saved.as_ref().map(|p| p.port))
        .unwrap_or(DEFAULT_PORT);
    let database = args
        .database
        .clone()
        .or_else(|| saved.as_ref().map(|p| p.database.clone()))
        .unwrap_or_else(|| DEFAULT_DATABASE.to_string());
    let user = args
        .user
        .clone()
        .or_else(|| saved.as_ref().map(|p| p.user.clone()))
        .ok_or_else(|| {
            eyre!("no user configured: pass --user, set IDXBENCH_USER, or save a profile")
        })?;
    let password = args
        .password
        .clone()
        .or_else(|| saved.as_ref().map(|p| p.password.clone()))
        .ok_or_else(|| {
            eyre!("no password configured: pass --password, set IDXBENCH_PASSWORD, or save a profile")
        })?;

    Ok(ConnectionProfile::new(host, port, database, user, password))
}
