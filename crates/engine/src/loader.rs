use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::{ColumnNames, RuleConfig};
use crate::error::EngineError;
use crate::model::{CaseRecord, Cell, RecordSet, Table};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Positions of the required columns, resolved once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    co_debtor: usize,
    rim_agreement: usize,
    rim_status: usize,
    content_type: usize,
    agreement_type: usize,
    main_transaction: usize,
    installment_spec: usize,
    dunning_block_reason: usize,
    limitation_date: usize,
    partner: usize,
    agreement: usize,
    document: usize,
}

impl ColumnIndex {
    /// Resolve every configured column name against a header row.
    /// A missing or repeated required column is a schema fault.
    pub fn resolve(source: &str, header: &[String], names: &ColumnNames) -> Result<Self, EngineError> {
        let idx = |name: &str| -> Result<usize, EngineError> {
            let mut hits = header
                .iter()
                .enumerate()
                .filter(|(_, h)| h.trim() == name)
                .map(|(i, _)| i);
            let first = hits.next().ok_or_else(|| EngineError::MissingColumn {
                source: source.into(),
                column: name.into(),
            })?;
            if hits.next().is_some() {
                return Err(EngineError::DuplicateColumn {
                    source: source.into(),
                    column: name.into(),
                });
            }
            Ok(first)
        };

        Ok(Self {
            co_debtor: idx(&names.co_debtor)?,
            rim_agreement: idx(&names.rim_agreement)?,
            rim_status: idx(&names.rim_status)?,
            content_type: idx(&names.content_type)?,
            agreement_type: idx(&names.agreement_type)?,
            main_transaction: idx(&names.main_transaction)?,
            installment_spec: idx(&names.installment_spec)?,
            dunning_block_reason: idx(&names.dunning_block_reason)?,
            limitation_date: idx(&names.limitation_date)?,
            partner: idx(&names.partner)?,
            agreement: idx(&names.agreement)?,
            document: idx(&names.document)?,
        })
    }

    fn record(&self, row: &[Cell], unparsed_dates: &mut usize) -> CaseRecord {
        let code = |i: usize| row.get(i).and_then(Cell::to_code);
        let limitation_cell = row.get(self.limitation_date);
        let limitation_date = limitation_cell.and_then(parse_date);
        if limitation_date.is_none() && limitation_cell.is_some_and(|c| !c.is_empty()) {
            *unparsed_dates += 1;
        }

        CaseRecord {
            co_debtor: code(self.co_debtor),
            rim_agreement: code(self.rim_agreement),
            rim_status: code(self.rim_status),
            content_type: code(self.content_type),
            agreement_type: code(self.agreement_type),
            main_transaction: code(self.main_transaction),
            installment_spec: code(self.installment_spec),
            dunning_block_reason: code(self.dunning_block_reason),
            limitation_date,
            partner: code(self.partner).unwrap_or_default(),
            agreement: code(self.agreement).unwrap_or_default(),
            document: code(self.document).unwrap_or_default(),
        }
    }
}

/// Combine already-read tables into one record set.
///
/// Column positions come from the first table's header and are applied to
/// every table; callers guarantee that all tables share one layout. Output
/// order is table order, then row order within a table.
pub fn load_records(tables: &[Table], config: &RuleConfig) -> Result<RecordSet, EngineError> {
    let Some(first) = tables.first() else {
        log::debug!("no sources to load");
        return Ok(RecordSet::default());
    };

    if first.header.is_empty() {
        log::warn!("source '{}' has an empty header row", first.name);
    }

    let index = ColumnIndex::resolve(&first.name, &first.header, &config.columns)?;

    let mut columns = HashMap::new();
    for (i, name) in first.header.iter().enumerate() {
        columns.entry(name.trim().to_string()).or_insert(i);
    }

    let mut records = Vec::with_capacity(tables.iter().map(|t| t.rows.len()).sum());
    for table in tables {
        let mut unparsed_dates = 0;
        records.extend(table.rows.iter().map(|row| index.record(row, &mut unparsed_dates)));
        if unparsed_dates > 0 {
            log::warn!(
                "source '{}': {unparsed_dates} row(s) with an unrecognized '{}' value",
                table.name,
                config.columns.limitation_date
            );
        }
        log::debug!("loaded {} row(s) from '{}'", table.rows.len(), table.name);
    }

    Ok(RecordSet { columns, records })
}

/// Interpret a cell as a calendar date. Anything unrecognizable is `None`.
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::Text(s) => {
            let s = s.trim();
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .or_else(|| {
                    DATETIME_FORMATS
                        .iter()
                        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                        .map(|dt| dt.date())
                })
        }
        Cell::Empty | Cell::Number(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn full_header() -> Vec<String> {
        let names = ColumnNames::default();
        names.entries().iter().map(|(_, n)| n.to_string()).collect()
    }

    #[test]
    fn resolves_by_name_not_position() {
        let mut h = full_header();
        h.reverse();
        let index = ColumnIndex::resolve("s", &h, &ColumnNames::default()).unwrap();
        assert_eq!(index.document, 0);
        assert_eq!(index.co_debtor, 11);
    }

    #[test]
    fn missing_column_is_fault() {
        let mut h = full_header();
        h.retain(|c| c != "Bilagsnummer");
        let err = ColumnIndex::resolve("export.xlsx", &h, &ColumnNames::default()).unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingColumn {
                source: "export.xlsx".into(),
                column: "Bilagsnummer".into()
            }
        );
        assert!(err.is_schema_fault());
    }

    #[test]
    fn duplicate_required_column_is_fault() {
        let mut h = full_header();
        h.push("Aftale".into());
        let err = ColumnIndex::resolve("s", &h, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateColumn { ref column, .. } if column == "Aftale"));
    }

    #[test]
    fn extra_columns_may_repeat() {
        let mut h = full_header();
        h.extend(header(&["Note", "Note"]));
        assert!(ColumnIndex::resolve("s", &h, &ColumnNames::default()).is_ok());
    }

    #[test]
    fn header_names_are_trimmed() {
        let h: Vec<String> = full_header().into_iter().map(|n| format!(" {n} ")).collect();
        assert!(ColumnIndex::resolve("s", &h, &ColumnNames::default()).is_ok());
    }

    #[test]
    fn date_parsing() {
        let d = NaiveDate::from_ymd_opt(2000, 1, 31).unwrap();
        assert_eq!(parse_date(&Cell::Date(d)), Some(d));
        assert_eq!(parse_date(&Cell::text("2000-01-31")), Some(d));
        assert_eq!(parse_date(&Cell::text("31-01-2000")), Some(d));
        assert_eq!(parse_date(&Cell::text("31.01.2000")), Some(d));
        assert_eq!(parse_date(&Cell::text("2000-01-31 00:00:00")), Some(d));
        assert_eq!(parse_date(&Cell::text("not a date")), None);
        assert_eq!(parse_date(&Cell::Number(36556.0)), None);
        assert_eq!(parse_date(&Cell::Empty), None);
    }

    #[test]
    fn no_tables_is_empty_set() {
        let set = load_records(&[], &RuleConfig::default()).unwrap();
        assert!(set.is_empty());
        assert!(set.columns.is_empty());
    }

    #[test]
    fn short_rows_read_missing_cells_as_empty() {
        let table = Table {
            name: "t".into(),
            header: full_header(),
            rows: vec![vec![Cell::text("only co-debtor")]],
        };
        let set = load_records(&[table], &RuleConfig::default()).unwrap();
        let rec = &set.records[0];
        assert_eq!(rec.co_debtor.as_deref(), Some("only co-debtor"));
        assert_eq!(rec.partner, "");
        assert_eq!(rec.limitation_date, None);
    }
}
