use std::collections::HashSet;

use chrono::NaiveDate;

use crate::config::{contains, RuleConfig};
use crate::model::{CaseRecord, OutputRecord, RecordSet};
use crate::report::StageReport;

/// Why a record was dropped before bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    CoDebtor,
    Dormant,
    ContentType,
    AgreementType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    LegalCost,
    Principal,
}

/// Records surviving the row exclusions, split into the two buckets.
/// Every survivor lands in exactly one bucket.
#[derive(Debug, Default)]
pub struct Buckets<'a> {
    pub legal_cost: Vec<&'a CaseRecord>,
    pub principal: Vec<&'a CaseRecord>,
}

#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub output: Vec<OutputRecord>,
    pub report: StageReport,
}

/// Ordered rule stages that reduce ledger records to write-off candidates.
///
/// `today` is fixed at construction, so every date comparison in a run uses
/// the same reference date and re-runs over frozen input are identical.
#[derive(Debug, Clone)]
pub struct FilterPipeline {
    config: RuleConfig,
    today: NaiveDate,
}

impl FilterPipeline {
    pub fn new(config: RuleConfig, today: NaiveDate) -> Self {
        Self { config, today }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn filter(&self, records: &[CaseRecord]) -> Vec<OutputRecord> {
        self.run(records).output
    }

    pub fn run_set(&self, set: &RecordSet) -> FilterOutcome {
        self.run(&set.records)
    }

    pub fn run(&self, records: &[CaseRecord]) -> FilterOutcome {
        let mut report = StageReport {
            input: records.len(),
            ..Default::default()
        };

        let Buckets {
            mut legal_cost,
            principal,
        } = self.partition(records, &mut report);

        let rules = &self.config.rules;

        let before = legal_cost.len();
        legal_cost.retain(|r| r.dunning_block_reason.as_deref() != Some(rules.blocked_dunning_reason.as_str()));
        report.dunning_block = before - legal_cost.len();

        let before = legal_cost.len();
        legal_cost.retain(|r| r.limitation_passed(self.today));
        report.not_expired = before - legal_cost.len();

        let (protected, mut ordinary): (Vec<&CaseRecord>, Vec<&CaseRecord>) = legal_cost
            .into_iter()
            .partition(|r| contains(&rules.protected_content_types, r.content_type.as_deref()));
        report.protected = protected.len();

        let open_principals: HashSet<(&str, &str)> = principal
            .iter()
            .map(|r| (r.partner.as_str(), r.agreement.as_str()))
            .collect();
        let before = ordinary.len();
        ordinary.retain(|r| !open_principals.contains(&(r.partner.as_str(), r.agreement.as_str())));
        report.principal_overlap = before - ordinary.len();

        let mut eligible = ordinary;
        eligible.extend(protected);

        let before = eligible.len();
        eligible.retain(|r| {
            !rules
                .inactive
                .matches(r.rim_agreement.as_deref(), r.rim_status.as_deref())
        });
        report.inactive = before - eligible.len();

        let output: Vec<OutputRecord> = eligible.iter().map(|r| r.project()).collect();
        report.output = output.len();

        log::debug!("filter pipeline: {report:?}");

        FilterOutcome { output, report }
    }

    /// Apply the row exclusions and split the survivors into buckets,
    /// counting drops into `report`.
    pub fn partition<'a>(&self, records: &'a [CaseRecord], report: &mut StageReport) -> Buckets<'a> {
        let mut buckets = Buckets::default();

        for record in records {
            match self.exclusion(record) {
                Some(Exclusion::CoDebtor) => report.co_debtor += 1,
                Some(Exclusion::Dormant) => report.dormant += 1,
                Some(Exclusion::ContentType) => report.content_type += 1,
                Some(Exclusion::AgreementType) => report.agreement_type += 1,
                None => match self.bucket(record) {
                    Bucket::LegalCost => buckets.legal_cost.push(record),
                    Bucket::Principal => buckets.principal.push(record),
                },
            }
        }

        report.legal_cost = buckets.legal_cost.len();
        report.principal = buckets.principal.len();
        buckets
    }

    /// First matching row exclusion, in stage order.
    pub fn exclusion(&self, record: &CaseRecord) -> Option<Exclusion> {
        let rules = &self.config.rules;

        if record.co_debtor.is_some() {
            return Some(Exclusion::CoDebtor);
        }
        if rules
            .dormant
            .matches(record.rim_agreement.as_deref(), record.rim_status.as_deref())
        {
            return Some(Exclusion::Dormant);
        }
        if contains(&rules.excluded_content_types, record.content_type.as_deref()) {
            return Some(Exclusion::ContentType);
        }
        if record.agreement_type.is_some() {
            return Some(Exclusion::AgreementType);
        }
        None
    }

    /// Legal cost when the main transaction type says so, otherwise when the
    /// installment spec marks a legal-cost installment.
    pub fn bucket(&self, record: &CaseRecord) -> Bucket {
        let rules = &self.config.rules;

        if contains(&rules.legal_cost_transactions, record.main_transaction.as_deref()) {
            return Bucket::LegalCost;
        }
        if record.installment_spec.as_deref() == Some(rules.legal_cost_installment.as_str()) {
            Bucket::LegalCost
        } else {
            Bucket::Principal
        }
    }
}
