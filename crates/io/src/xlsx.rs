// Excel ledger exports (xlsx, xls, xlsb, ods)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::{Days, NaiveDate};
use fosa_engine::model::{Cell, Table};

use crate::csv::source_name;
use crate::error::IoError;

/// Read the first worksheet of a workbook. Its first row is the header row.
pub fn read_table(path: &Path) -> Result<Table, IoError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| IoError::open(path, e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let Some(sheet_name) = sheet_names.first() else {
        return Err(IoError::NoSheets { path: path.to_path_buf() });
    };

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| IoError::read(path, format!("sheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(header_text).collect())
        .unwrap_or_default();
    let rows: Vec<Vec<Cell>> = rows.map(|row| row.iter().map(to_cell).collect()).collect();

    log::debug!(
        "read {} row(s) x {} column(s) from {} [{sheet_name}]",
        rows.len(),
        header.len(),
        path.display()
    );

    Ok(Table {
        name: source_name(path),
        header,
        rows,
    })
}

fn header_text(cell: &Data) -> String {
    to_cell(cell).to_code().unwrap_or_default()
}

fn to_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.as_str()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::text(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => Cell::Text(format!("#{e:?}")),
        Data::DateTime(dt) => {
            // Out-of-range serials stay numeric so the date column reads them as unknown.
            let serial = dt.as_f64();
            serial_to_date(serial).map_or(Cell::Number(serial), Cell::Date)
        }
        Data::DateTimeIso(s) => Cell::text(s.as_str()),
        Data::DurationIso(s) => Cell::text(s.as_str()),
    }
}

/// Convert an Excel 1900-system serial to a calendar date (time of day dropped).
///
/// Uses the 1899-12-30 epoch, which is exact for every serial after the
/// phantom 1900-02-29 (serial 60).
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}
