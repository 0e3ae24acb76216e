//! Quarry CLI: run SQL on a Dremio-style job service from the shell.
//!
//! # Commands
//!
//! - `query`: Run one statement and print its result frame.
//! - `batch`: Run every target of a YAML batch file concurrently.
//! - `values`: List the distinct values of one column (variable lookup).
//! - `test-connection`: Check that the configured credentials can log in.
//!
//! Configuration comes from `--config`, `$QUARRY_CONFIG` or `~/.quarry/config.yaml`,
//! with `QUARRY_*` environment overrides (for example `QUARRY_DATASOURCE__PASSWORD`).

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use owo_colors::OwoColorize;
use quarry_common::telemetry;
use quarry_connectors::{DremioDataSource, QueryTarget};

mod commands;
mod config;
mod exit_codes;
mod output;

use output::OutputFormat;

#[derive(Parser)]
#[command(name = "quarry")]
#[command(about = "Run queries against a job-oriented SQL service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Output format (human, json, yaml)
    #[arg(long, global = true, value_enum, default_value = "human")]
    output: OutputFormat,

    /// Log filter, overrides `log_level` from the config (RUST_LOG wins over both)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single statement
    Query {
        /// SQL text
        sql: String,
        /// Identifier reported with the result
        #[arg(long, default_value = "A")]
        ref_id: String,
        /// Seconds to wait for the job (defaults to query.timeout_secs)
        #[arg(long)]
        timeout: Option<u64>,
        /// Column to treat as time (defaults to query.time_col)
        #[arg(long)]
        time_col: Option<String>,
        /// Maximum rows to fetch (defaults to query.max_records)
        #[arg(long)]
        max_records: Option<usize>,
    },
    /// Run every target of a batch file concurrently
    Batch {
        /// YAML file with `targets:` (refId, queryText, queryTimeout, timeCol, maxRecords)
        file: String,
    },
    /// List the distinct non-empty values of one column
    Values {
        /// SQL text
        sql: String,
        /// Column to project
        #[arg(long)]
        column: String,
    },
    /// Check that the datasource is reachable and the credentials are accepted
    TestConnection,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();

    let cli = Cli::parse();

    let app_config = match config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            report_error(cli.output, &e, exit_codes::CONFIG_ERROR);
            std::process::exit(exit_codes::CONFIG_ERROR);
        }
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| app_config.log_level.clone());
    telemetry::init_logging(&level, &app_config.telemetry)?;

    let exit_code = match run_cli(&cli, &app_config).await {
        Ok(code) => code,
        Err(e) => {
            let code = exit_codes::for_error(&e);
            report_error(cli.output, &e, code);
            code
        }
    };

    telemetry::shutdown_telemetry();
    if exit_code != exit_codes::SUCCESS {
        std::process::exit(exit_code);
    }
    Ok(())
}

fn report_error(format: OutputFormat, e: &anyhow::Error, exit_code: i32) {
    if format.is_machine_readable() {
        output::print_error(format, &format!("{:#}", e), exit_code).ok();
    } else {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
    }
}

async fn run_cli(cli: &Cli, app_config: &quarry_common::AppConfig) -> anyhow::Result<i32> {
    let ds = DremioDataSource::from_config(app_config)?;
    tracing::debug!(
        url = %app_config.datasource.url,
        user = %app_config.datasource.user,
        "Datasource ready"
    );

    match &cli.command {
        Commands::Query {
            sql,
            ref_id,
            timeout,
            time_col,
            max_records,
        } => {
            let target = QueryTarget {
                ref_id: ref_id.clone(),
                query_text: Some(sql.clone()),
                query_timeout: *timeout,
                time_col: time_col.clone(),
                max_records: *max_records,
            };
            commands::query(&ds, target, cli.output).await
        }
        Commands::Batch { file } => commands::batch(&ds, file, cli.output).await,
        Commands::Values { sql, column } => commands::values(&ds, sql, column, cli.output).await,
        Commands::TestConnection => {
            commands::test_connection(&ds, &app_config.datasource.url, cli.output).await
        }
    }
}
