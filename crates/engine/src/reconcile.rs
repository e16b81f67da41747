use crate::blocklist::Blocklist;
use crate::model::OutputRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub kept: Vec<OutputRecord>,
    pub blocked: Vec<OutputRecord>,
}

/// Drop every record whose (partner, agreement) pair is on the blocklist.
/// Survivors keep their input order.
pub fn reconcile(records: Vec<OutputRecord>, blocklist: &Blocklist) -> Vec<OutputRecord> {
    split_blocked(records, blocklist).kept
}

/// Like [`reconcile`], but also returns the dropped records.
pub fn split_blocked(records: Vec<OutputRecord>, blocklist: &Blocklist) -> ReconcileOutcome {
    let (blocked, kept): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|r| blocklist.is_blocked(&r.partner, &r.agreement));

    log::debug!("reconcile: {} kept, {} blocked", kept.len(), blocked.len());
    ReconcileOutcome { kept, blocked }
}
