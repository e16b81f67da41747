use serde::{Deserialize, Serialize};

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Immutable rule set handed to the loader, the pipeline and the blocklist
/// parser. `RuleConfig::default()` is the production rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleConfig {
    pub columns: ColumnNames,
    pub rules: RuleSet,
    pub blocklist: BlocklistFormat,
}

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Header names of the ledger export. Lookup is by name, never by position.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    pub co_debtor: String,
    pub rim_agreement: String,
    pub rim_status: String,
    pub content_type: String,
    pub agreement_type: String,
    pub main_transaction: String,
    pub installment_spec: String,
    pub dunning_block_reason: String,
    pub limitation_date: String,
    pub partner: String,
    pub agreement: String,
    pub document: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            co_debtor: "Medhæfter".into(),
            rim_agreement: "RIM Aftale".into(),
            rim_status: "RIM aftalestatus".into(),
            content_type: "Indholdsart".into(),
            agreement_type: "Aftale type".into(),
            main_transaction: "Hovedtransakt.".into(),
            installment_spec: "Ratespecifikation".into(),
            dunning_block_reason: "RykkespærÅrsag".into(),
            limitation_date: "Forældelsesdato".into(),
            partner: "ForretnPartner".into(),
            agreement: "Aftale".into(),
            document: "Bilagsnummer".into(),
        }
    }
}

impl ColumnNames {
    /// (config key, header name) for every required column, in declaration order.
    pub fn entries(&self) -> [(&'static str, &str); 12] {
        [
            ("co_debtor", self.co_debtor.as_str()),
            ("rim_agreement", self.rim_agreement.as_str()),
            ("rim_status", self.rim_status.as_str()),
            ("content_type", self.content_type.as_str()),
            ("agreement_type", self.agreement_type.as_str()),
            ("main_transaction", self.main_transaction.as_str()),
            ("installment_spec", self.installment_spec.as_str()),
            ("dunning_block_reason", self.dunning_block_reason.as_str()),
            ("limitation_date", self.limitation_date.as_str()),
            ("partner", self.partner.as_str()),
            ("agreement", self.agreement.as_str()),
            ("document", self.document.as_str()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Business rules
// ---------------------------------------------------------------------------

/// An (RIM agreement, RIM status) code combination.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CodePair {
    pub agreement: String,
    pub status: String,
}

impl CodePair {
    fn new(agreement: &str, status: &str) -> Self {
        Self {
            agreement: agreement.into(),
            status: status.into(),
        }
    }

    pub fn matches(&self, agreement: Option<&str>, status: Option<&str>) -> bool {
        agreement == Some(self.agreement.as_str()) && status == Some(self.status.as_str())
    }
}

// Table-valued fields (`dormant`, `inactive`) stay last so the struct
// serializes to valid TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleSet {
    /// Content types dropped before bucketing.
    pub excluded_content_types: Vec<String>,
    /// Main transaction types that route straight to the legal-cost bucket.
    pub legal_cost_transactions: Vec<String>,
    /// Installment spec that marks a legal-cost installment.
    pub legal_cost_installment: String,
    /// Dunning-block reason that disqualifies a legal cost.
    pub blocked_dunning_reason: String,
    /// Content types exempt from the principal cross-reference.
    pub protected_content_types: Vec<String>,
    pub dormant: CodePair,
    pub inactive: CodePair,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            excluded_content_types: [
                "BØVO", "EJEN", "BYGS", "BYGB", "MERE", "MERU", "BUMR", "PLAL", "PLFL", "KAAL",
                "KAFL",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            legal_cost_transactions: vec!["ZGBY".into(), "ZREN".into()],
            legal_cost_installment: "LRT".into(),
            blocked_dunning_reason: "N".into(),
            protected_content_types: vec!["DAGI".into(), "DAG2".into(), "SFO2".into()],
            dormant: CodePair::new("MO", "28"),
            inactive: CodePair::new("IN", "21"),
        }
    }
}

pub(crate) fn contains(codes: &[String], value: Option<&str>) -> bool {
    value.is_some_and(|v| codes.iter().any(|c| c == v))
}

// ---------------------------------------------------------------------------
// Blocklist text format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlocklistFormat {
    /// Literal following the leading tab on a partner header line.
    pub partner_header: String,
    /// Fixed-width suffix trailing the agreement id in a detail line.
    pub trailing_width: usize,
}

impl Default for BlocklistFormat {
    fn default() -> Self {
        Self {
            partner_header: "ForretnPartner:".into(),
            trailing_width: 12,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl RuleConfig {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let config: RuleConfig =
            toml::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self).map_err(|e| EngineError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let entries = self.columns.entries();

        for (key, name) in &entries {
            if name.trim().is_empty() {
                return Err(EngineError::ConfigValidation(format!(
                    "column '{key}' has an empty name"
                )));
            }
        }

        for (i, (key, name)) in entries.iter().enumerate() {
            if let Some((other, _)) = entries[i + 1..].iter().find(|(_, n)| n == name) {
                return Err(EngineError::ConfigValidation(format!(
                    "columns '{key}' and '{other}' both map to '{name}'"
                )));
            }
        }

        if self.blocklist.partner_header.is_empty() {
            return Err(EngineError::ConfigValidation(
                "blocklist partner_header must not be empty".into(),
            ));
        }

        let rules = &self.rules;
        if let Some(code) = rules
            .protected_content_types
            .iter()
            .find(|c| rules.excluded_content_types.contains(c))
        {
            return Err(EngineError::ConfigValidation(format!(
                "content type '{code}' is both excluded and protected"
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_production_defaults() {
        let config = RuleConfig::from_toml("").unwrap();
        assert_eq!(config, RuleConfig::default());
        assert_eq!(config.columns.limitation_date, "Forældelsesdato");
        assert_eq!(config.rules.excluded_content_types.len(), 11);
        assert_eq!(config.rules.dormant, CodePair::new("MO", "28"));
        assert_eq!(config.blocklist.trailing_width, 12);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let input = r#"
[columns]
partner = "FP"

[rules]
excluded_content_types = ["BØVO"]

[rules.inactive]
agreement = "IN"
status = "22"
"#;
        let config = RuleConfig::from_toml(input).unwrap();
        assert_eq!(config.columns.partner, "FP");
        assert_eq!(config.columns.agreement, "Aftale");
        assert_eq!(config.rules.excluded_content_types, vec!["BØVO"]);
        assert_eq!(config.rules.inactive.status, "22");
        assert_eq!(config.rules.legal_cost_installment, "LRT");
    }

    #[test]
    fn toml_round_trip_of_defaults() {
        let text = RuleConfig::default().to_toml().unwrap();
        let back = RuleConfig::from_toml(&text).unwrap();
        assert_eq!(back, RuleConfig::default());
    }

    #[test]
    fn reject_unknown_key() {
        let err = RuleConfig::from_toml("[rules]\nexcluded_contnet_types = []\n").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn reject_clashing_column_names() {
        let err = RuleConfig::from_toml("[columns]\ndocument = \"Aftale\"\n").unwrap_err();
        assert!(err.to_string().contains("'agreement' and 'document'"), "{err}");
    }

    #[test]
    fn reject_empty_column_name() {
        let err = RuleConfig::from_toml("[columns]\nco_debtor = \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("'co_debtor'"));
    }

    #[test]
    fn reject_protected_type_that_is_also_excluded() {
        let input = r#"
[rules]
protected_content_types = ["DAGI", "BYGS"]
"#;
        let err = RuleConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("'BYGS'"));
    }

    #[test]
    fn code_pair_needs_both_codes() {
        let pair = CodePair::new("MO", "28");
        assert!(pair.matches(Some("MO"), Some("28")));
        assert!(!pair.matches(Some("MO"), Some("21")));
        assert!(!pair.matches(None, Some("28")));
    }
}
