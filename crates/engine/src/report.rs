use serde::Serialize;

/// Per-stage record counts of one pipeline run.
///
/// `co_debtor` .. `agreement_type` count records dropped by the row
/// exclusions; `legal_cost` and `principal` are the bucket sizes right after
/// partitioning, so `input - excluded() == legal_cost + principal`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub input: usize,
    pub co_debtor: usize,
    pub dormant: usize,
    pub content_type: usize,
    pub agreement_type: usize,
    pub legal_cost: usize,
    pub principal: usize,
    pub dunning_block: usize,
    pub not_expired: usize,
    /// Legal costs set aside as exempt from the principal cross-reference.
    pub protected: usize,
    pub principal_overlap: usize,
    pub inactive: usize,
    pub output: usize,
}

impl StageReport {
    /// Records dropped before bucketing.
    pub fn excluded(&self) -> usize {
        self.co_debtor + self.dormant + self.content_type + self.agreement_type
    }

    /// Human summary lines, one per stage with a non-trivial effect.
    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![format!("{} record(s) loaded", self.input)];
        let drops = [
            ("co-debtor", self.co_debtor),
            ("dormant agreement", self.dormant),
            ("excluded content type", self.content_type),
            ("agreement type set", self.agreement_type),
        ];
        for (label, n) in drops {
            if n > 0 {
                out.push(format!("  -{n} {label}"));
            }
        }
        out.push(format!(
            "{} legal cost(s), {} principal(s)",
            self.legal_cost, self.principal
        ));
        let legal_drops = [
            ("dunning block", self.dunning_block),
            ("limitation date not passed", self.not_expired),
            ("principal still open", self.principal_overlap),
            ("inactive agreement", self.inactive),
        ];
        for (label, n) in legal_drops {
            if n > 0 {
                out.push(format!("  -{n} {label}"));
            }
        }
        if self.protected > 0 {
            out.push(format!("  {} protected content type(s) kept", self.protected));
        }
        out.push(format!("{} eligible case(s)", self.output));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_skip_zero_counts() {
        let report = StageReport {
            input: 5,
            co_debtor: 1,
            legal_cost: 3,
            principal: 1,
            output: 3,
            ..Default::default()
        };
        let lines = report.lines();
        assert_eq!(lines[0], "5 record(s) loaded");
        assert!(lines.contains(&"  -1 co-debtor".to_string()));
        assert!(!lines.iter().any(|l| l.contains("dormant")));
        assert_eq!(lines.last().unwrap(), "3 eligible case(s)");
        assert_eq!(report.excluded(), 1);
    }
}
