use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tabular input
// ---------------------------------------------------------------------------

/// A single cell of an already-read tabular source.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    /// Build a text cell, mapping the empty string to `Empty`.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Render the cell as a code string. Integral numbers print without
    /// decimals so a numeric `28` compares equal to the code `"28"`.
    pub fn to_code(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }),
            Self::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// One already-read export: header row plus data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Source label used in error messages (usually the file name).
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

// ---------------------------------------------------------------------------
// Case records
// ---------------------------------------------------------------------------

/// One ledger row, resolved into named fields at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub co_debtor: Option<String>,
    pub rim_agreement: Option<String>,
    pub rim_status: Option<String>,
    pub content_type: Option<String>,
    pub agreement_type: Option<String>,
    pub main_transaction: Option<String>,
    pub installment_spec: Option<String>,
    pub dunning_block_reason: Option<String>,
    /// `None` when the cell is empty or not a recognizable date.
    pub limitation_date: Option<NaiveDate>,
    pub partner: String,
    pub agreement: String,
    pub document: String,
}

impl CaseRecord {
    pub fn project(&self) -> OutputRecord {
        OutputRecord {
            agreement: self.agreement.clone(),
            document: self.document.clone(),
            partner: self.partner.clone(),
        }
    }

    /// The limitation date has passed, or is `today`. Unknown dates never qualify.
    pub fn limitation_passed(&self, today: NaiveDate) -> bool {
        self.limitation_date.is_some_and(|date| date <= today)
    }
}

/// Combined records of every source plus the first source's header mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    pub columns: HashMap<String, usize>,
    pub records: Vec<CaseRecord>,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// An eligible case. Serializes to the queue payload
/// `{"aftale": .., "bilagsnummer": .., "fp": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "aftale")]
    pub agreement: String,
    #[serde(rename = "bilagsnummer")]
    pub document: String,
    #[serde(rename = "fp")]
    pub partner: String,
}

impl OutputRecord {
    pub fn new(agreement: &str, document: &str, partner: &str) -> Self {
        Self {
            agreement: agreement.into(),
            document: document.into(),
            partner: partner.into(),
        }
    }
}
