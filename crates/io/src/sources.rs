//! Source discovery and parallel reading.
//!
//! Sources are sorted by file name before reading so the concatenated
//! record order is reproducible; each file is parsed on its own rayon
//! worker and the results are collected back in that order.

use std::path::{Path, PathBuf};

use fosa_engine::model::Table;
use rayon::prelude::*;

use crate::batch::select_latest_batch;
use crate::error::IoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Spreadsheet,
    Delimited,
}

pub fn source_kind(path: &Path) -> Option<SourceKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(SourceKind::Spreadsheet),
        "csv" | "tsv" => Some(SourceKind::Delimited),
        _ => None,
    }
}

pub fn read_table(path: &Path) -> Result<Table, IoError> {
    match source_kind(path) {
        Some(SourceKind::Spreadsheet) => crate::xlsx::read_table(path),
        Some(SourceKind::Delimited) => crate::csv::read_table(path),
        None => Err(IoError::UnsupportedFormat { path: path.to_path_buf() }),
    }
}

/// Sort by file name (full path breaks ties).
pub fn sort_sources(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
}

/// Read every source in parallel. Output order is file-name order.
pub fn read_tables(paths: &[PathBuf]) -> Result<Vec<Table>, IoError> {
    let mut sorted = paths.to_vec();
    sort_sources(&mut sorted);
    sorted.par_iter().map(|p| read_table(p)).collect()
}

/// Expand inputs into source files. Directories contribute their supported
/// files; with `latest_batch` each directory is narrowed to its newest
/// complete export batch. Explicit file arguments are taken as given.
pub fn collect_sources(inputs: &[PathBuf], latest_batch: bool) -> Result<Vec<PathBuf>, IoError> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let entries = std::fs::read_dir(input).map_err(|e| IoError::read(input, e))?;
            let mut found = Vec::new();
            for entry in entries {
                let path = entry.map_err(|e| IoError::read(input, e))?.path();
                if path.is_file() && source_kind(&path).is_some() {
                    found.push(path);
                }
            }
            sort_sources(&mut found);
            if latest_batch {
                found = select_latest_batch(&found)?;
            }
            log::debug!("{}: {} source file(s)", input.display(), found.len());
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }

    sort_sources(&mut files);
    Ok(files)
}
