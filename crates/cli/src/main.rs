// fosa CLI - nightly selection of outdated legal-cost cases for write-off

mod exit_codes;
mod rules;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fosa_engine::EngineError;
use fosa_io::IoError;
use tracing_subscriber::EnvFilter;

use exit_codes::{engine_exit_code, io_exit_code, EXIT_IO, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "fosa")]
#[command(about = "Select outdated legal-cost cases for write-off from ledger exports")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter ledger exports and emit the eligible (agreement, document, partner) cases
    #[command(after_help = "\
Examples:
  fosa run exports/ --blocklist fplka.txt --latest-batch --output queue.jsonl
  fosa run ledger_1.xlsx ledger_2.xlsx --blocklist fplka.txt --today 2024-03-15
  fosa run exports/ --blocklist fplka.txt --report")]
    Run {
        /// Ledger exports (xlsx, xlsm, xls, xlsb, ods, csv, tsv) or directories containing them
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Dunning-block report (text export with `ForretnPartner:` sections)
        #[arg(long)]
        blocklist: PathBuf,

        /// Rule file (TOML). Defaults to <config dir>/fosa/rules.toml when present
        #[arg(long, env = "FOSA_CONFIG")]
        config: Option<PathBuf>,

        /// Reference date for the limitation check (YYYY-MM-DD). Defaults to the local date
        #[arg(long, value_parser = parse_today)]
        today: Option<NaiveDate>,

        /// Only read the newest export batch found among the sources
        #[arg(long)]
        latest_batch: bool,

        /// Write the eligible cases as JSON lines to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Also print the JSON lines to stdout when --output is given
        #[arg(long)]
        json: bool,

        /// Print a JSON run report (stage counts, blocked cases, fingerprint) to stdout
        #[arg(long, conflicts_with = "json")]
        report: bool,
    },

    /// Parse a dunning-block report and print the partner -> agreements mapping as JSON
    #[command(after_help = "\
Examples:
  fosa blocklist fplka.txt
  fosa blocklist fplka.txt --config rules.toml")]
    Blocklist {
        /// Dunning-block report
        file: PathBuf,

        /// Rule file (TOML) providing the report layout
        #[arg(long, env = "FOSA_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Inspect or check rule files
    #[command(subcommand)]
    Config(rules::ConfigCommands),
}

fn parse_today(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  fosa-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Run {
            sources,
            blocklist,
            config,
            today,
            latest_batch,
            output,
            json,
            report,
        } => {
            // Captured once; every stage of the run compares against the same date
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            run::cmd_run(run::RunArgs {
                sources,
                blocklist,
                config,
                today,
                latest_batch,
                output,
                json,
                report,
            })
        }
        Commands::Blocklist { file, config } => rules::cmd_blocklist(file, config),
        Commands::Config(cmd) => rules::cmd_config(cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        let hint = match &err {
            EngineError::MissingColumn { .. } | EngineError::DuplicateColumn { .. } => {
                Some("check the export layout or the [columns] section of the rule file".to_string())
            }
            EngineError::DetailBeforePartner { .. } | EngineError::MalformedDetailLine { .. } => {
                Some("the dunning-block report looks truncated or was exported in another layout".to_string())
            }
            _ => None,
        };
        Self { code: engine_exit_code(&err), message: err.to_string(), hint }
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        let hint = match &err {
            IoError::BatchCount { .. } => {
                Some("the export may still be running; retry later or pass the files explicitly".to_string())
            }
            _ => None,
        };
        Self { code: io_exit_code(&err), message: err.to_string(), hint }
    }
}
