//! `fosa-engine`: eligibility filter for outdated legal-cost write-offs.
//!
//! Pure engine crate: receives already-read ledger tables and blocklist
//! text, returns the eligible (agreement, document, partner) cases.
//! No file IO.

pub mod blocklist;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod reconcile;
pub mod report;

pub use blocklist::Blocklist;
pub use config::RuleConfig;
pub use error::EngineError;
pub use loader::load_records;
pub use model::{CaseRecord, Cell, OutputRecord, RecordSet, Table};
pub use pipeline::{FilterOutcome, FilterPipeline};
pub use reconcile::{reconcile, split_blocked, ReconcileOutcome};
pub use report::StageReport;

use chrono::NaiveDate;

/// Result of a full run: eligible cases plus what happened on the way.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub eligible: Vec<OutputRecord>,
    pub blocked: Vec<OutputRecord>,
    pub report: StageReport,
}

/// Load, filter and reconcile in one go.
pub fn run(
    config: &RuleConfig,
    today: NaiveDate,
    tables: &[Table],
    blocklist_text: &str,
) -> Result<RunResult, EngineError> {
    let records = load_records(tables, config)?;
    let blocklist = Blocklist::parse(blocklist_text, &config.blocklist)?;

    let pipeline = FilterPipeline::new(config.clone(), today);
    let FilterOutcome { output, report } = pipeline.run_set(&records);
    let ReconcileOutcome { kept, blocked } = split_blocked(output, &blocklist);

    Ok(RunResult {
        eligible: kept,
        blocked,
        report,
    })
}
