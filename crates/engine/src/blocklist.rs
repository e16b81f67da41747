//! Parser for the dunning-block ("rykkerspærre") text report.
//!
//! The report is a tab-indented listing. A partner header line
//! (`\tForretnPartner:\t...\t<partner>`) opens a section; each following
//! line whose second character is a digit is a detail line carrying one
//! blocked agreement in its second tab-delimited field, written as
//! `<leading zeros><agreement><fixed-width suffix>`. Everything else is
//! report furniture and ignored.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::BlocklistFormat;
use crate::error::EngineError;

/// Blocked agreements per business partner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Blocklist {
    entries: BTreeMap<String, Vec<String>>,
}

impl Blocklist {
    /// Parse a report. A repeated partner header starts a fresh list that
    /// replaces the earlier one.
    pub fn parse(text: &str, format: &BlocklistFormat) -> Result<Self, EngineError> {
        let header_prefix = format!("\t{}", format.partner_header);
        let mut entries = BTreeMap::new();
        let mut active: Option<(String, Vec<String>)> = None;

        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;

            if line.starts_with(&header_prefix) {
                if let Some((partner, agreements)) = active.take() {
                    entries.insert(partner, agreements);
                }
                let partner = line.rsplit('\t').next().unwrap_or_default().to_string();
                if entries.remove(&partner).is_some() {
                    log::warn!("blocklist line {line_no}: partner '{partner}' repeated, earlier list replaced");
                }
                active = Some((partner, Vec::new()));
            } else if is_detail_line(line) {
                let Some((_, agreements)) = active.as_mut() else {
                    return Err(EngineError::DetailBeforePartner { line: line_no });
                };
                let field = line
                    .split('\t')
                    .nth(1)
                    .ok_or(EngineError::MalformedDetailLine { line: line_no })?;
                agreements.push(agreement_id(field, format.trailing_width));
            }
        }

        if let Some((partner, agreements)) = active {
            entries.insert(partner, agreements);
        }

        log::debug!("parsed blocklist with {} partner(s)", entries.len());
        Ok(Self { entries })
    }

    pub fn is_blocked(&self, partner: &str, agreement: &str) -> bool {
        self.entries
            .get(partner)
            .is_some_and(|agreements| agreements.iter().any(|a| a == agreement))
    }

    pub fn agreements(&self, partner: &str) -> Option<&[String]> {
        self.entries.get(partner).map(Vec::as_slice)
    }

    /// Number of partners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn agreement_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(p, a)| (p.as_str(), a.as_slice()))
    }
}

fn is_detail_line(line: &str) -> bool {
    line.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
}

/// Strip leading zeros, then drop the fixed-width suffix.
fn agreement_id(field: &str, trailing_width: usize) -> String {
    let stripped = field.trim_start_matches('0');
    let keep = stripped.chars().count().saturating_sub(trailing_width);
    stripped.chars().take(keep).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Blocklist, EngineError> {
        Blocklist::parse(text, &BlocklistFormat::default())
    }

    #[test]
    fn agreement_field_decoding() {
        assert_eq!(agreement_id("000123456789012345678901", 12), "123456789");
        assert_eq!(agreement_id("0000A1XXXXXXXXXXXX", 12), "A1");
        assert_eq!(agreement_id("0012345", 12), "");
    }

    #[test]
    fn parses_sections() {
        let text = "\
Rykkerspærrer
\tForretnPartner:\tHansen\tP1
 1\t000111000000000000\t51
 2\t000222000000000000\t51
\tForretnPartner:\tJensen\tP2
 3\t000333000000000000\t51
";
        let list = parse(text).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.agreements("P1").unwrap(), &["111", "222"]);
        assert_eq!(list.agreements("P2").unwrap(), &["333"]);
        assert!(list.is_blocked("P1", "222"));
        assert!(!list.is_blocked("P2", "222"));
        assert_eq!(list.agreement_count(), 3);
    }

    #[test]
    fn header_without_details_registers_empty_list() {
        let list = parse("\tForretnPartner:\tP9\n").unwrap();
        assert_eq!(list.agreements("P9"), Some(&[][..]));
    }

    #[test]
    fn crlf_line_endings() {
        let list = parse("\tForretnPartner:\tP1\r\n 1\t0042000000000000\r\n").unwrap();
        assert_eq!(list.agreements("P1").unwrap(), &["42"]);
    }

    #[test]
    fn repeated_partner_replaces_earlier_list() {
        let text = "\
\tForretnPartner:\tP1
 1\t000111000000000000
\tForretnPartner:\tP2
 2\t000222000000000000
\tForretnPartner:\tP1
 3\t000333000000000000
";
        let list = parse(text).unwrap();
        assert_eq!(list.agreements("P1").unwrap(), &["333"]);
        assert_eq!(list.agreements("P2").unwrap(), &["222"]);
    }

    #[test]
    fn ignores_other_lines() {
        let text = "\
Header text
\tForretnPartner:\tP1
x
 a\t000111000000000000
\t\tTotal
 1\t000111000000000000
";
        let list = parse(text).unwrap();
        assert_eq!(list.agreements("P1").unwrap(), &["111"]);
    }

    #[test]
    fn detail_before_header_is_fault() {
        let err = parse("Report\n 1\t000111000000000000\n").unwrap_err();
        assert_eq!(err, EngineError::DetailBeforePartner { line: 2 });
        assert!(err.is_schema_fault());
    }

    #[test]
    fn detail_without_second_field_is_fault() {
        let err = parse("\tForretnPartner:\tP1\n 1 no tabs\n").unwrap_err();
        assert_eq!(err, EngineError::MalformedDetailLine { line: 2 });
    }

    #[test]
    fn serializes_as_plain_mapping() {
        let list = parse("\tForretnPartner:\tP1\n 1\t0042000000000000\n").unwrap();
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"{"P1":["42"]}"#);
    }
}
