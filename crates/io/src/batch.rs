//! Export batch selection.
//!
//! The ledger delivers one export as several files sharing a date prefix,
//! e.g. `20231024RPA03_23_23.XLSX`: an 8-digit date, a list name, and two
//! `_`-separated numbers of which the last is the batch size. Older
//! deliveries may sit next to the latest one; only the latest batch is
//! processed, and only when it is complete.

use std::path::{Path, PathBuf};

use crate::error::IoError;

/// Date prefix and expected batch size decoded from an export file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchName {
    pub date: String,
    pub expected: usize,
}

pub fn parse_batch_name(name: &str) -> Result<BatchName, IoError> {
    let invalid = || IoError::BatchName { name: name.to_string() };

    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(invalid)?;
    let date = stem.get(..8).filter(|d| d.bytes().all(|b| b.is_ascii_digit())).ok_or_else(invalid)?;
    let expected = stem
        .rsplit_once('_')
        .and_then(|(_, count)| count.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .ok_or_else(invalid)?;

    Ok(BatchName { date: date.to_string(), expected })
}

/// Keep the files of the most recent batch, sorted by name.
///
/// Files whose names do not follow the export convention are skipped. Fails
/// when the number of files in the latest batch differs from the count
/// embedded in their names.
pub fn select_latest_batch(paths: &[PathBuf]) -> Result<Vec<PathBuf>, IoError> {
    let mut named: Vec<(BatchName, &PathBuf)> = Vec::new();
    for path in paths {
        let file_name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        match parse_batch_name(&file_name) {
            Ok(batch) => named.push((batch, path)),
            Err(e) => log::warn!("skipping {}: {e}", path.display()),
        }
    }

    let Some(latest) = named.iter().map(|(b, _)| b.date.clone()).max() else {
        return Ok(Vec::new());
    };

    let mut batch: Vec<(BatchName, &PathBuf)> = named.into_iter().filter(|(b, _)| b.date == latest).collect();
    batch.sort_by(|(_, a), (_, b)| a.file_name().cmp(&b.file_name()));

    let expected = batch[0].0.expected;
    if batch.len() != expected {
        return Err(IoError::BatchCount {
            date: latest,
            expected,
            found: batch.len(),
        });
    }

    log::info!("using export batch {latest} ({expected} file(s))");
    Ok(batch.into_iter().map(|(_, p)| p.clone()).collect())
}
