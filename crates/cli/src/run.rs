//! `fosa run`: read the exports, filter, drop blocklisted pairs, emit the queue payload.

use std::path::PathBuf;

use chrono::NaiveDate;
use fosa_engine::{OutputRecord, StageReport};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::rules::load_config;
use crate::CliError;

pub struct RunArgs {
    pub sources: Vec<PathBuf>,
    pub blocklist: PathBuf,
    pub config: Option<PathBuf>,
    pub today: NaiveDate,
    pub latest_batch: bool,
    pub output: Option<PathBuf>,
    pub json: bool,
    pub report: bool,
}

/// Printed to stdout by `--report`.
#[derive(Serialize)]
struct RunReport<'a> {
    today: NaiveDate,
    sources: Vec<String>,
    stages: &'a StageReport,
    eligible: usize,
    blocked: &'a [OutputRecord],
    fingerprint: &'a str,
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;

    let sources = fosa_io::collect_sources(&args.sources, args.latest_batch)?;
    if sources.is_empty() {
        log::warn!("no ledger exports found; the run will select nothing");
    }
    log::info!("reading {} source(s), limitation date {}", sources.len(), args.today);

    let tables = fosa_io::read_tables(&sources)?;
    let blocklist_text = fosa_io::text::read_text(&args.blocklist)?;

    // Any schema fault aborts here, before anything is written
    let result = fosa_engine::run(&config, args.today, &tables, &blocklist_text)?;

    let payload = fosa_io::json::to_json_lines(&result.eligible);
    let fingerprint = payload_fingerprint(&payload);

    if let Some(ref path) = args.output {
        fosa_io::json::write_json_lines(path, &result.eligible)?;
        eprintln!("wrote {} case(s) to {}", result.eligible.len(), path.display());
    }

    if args.report {
        let report = RunReport {
            today: args.today,
            sources: sources.iter().map(|p| p.display().to_string()).collect(),
            stages: &result.report,
            eligible: result.eligible.len(),
            blocked: &result.blocked,
            fingerprint: &fingerprint,
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json}");
    } else if args.json || args.output.is_none() {
        print!("{payload}");
    }

    // Human summary to stderr
    for line in result.report.lines() {
        eprintln!("{line}");
    }
    if !result.blocked.is_empty() {
        eprintln!("  -{} on the dunning-block report", result.blocked.len());
    }
    eprintln!("{} case(s) queued, fingerprint {fingerprint}", result.eligible.len());

    Ok(())
}

/// SHA-256 of the JSON-lines payload → "sha256:<64 hex>".
fn payload_fingerprint(payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    format!("sha256:{:x}", hasher.finalize())
}
