//! Drift report produced by the read-only check

use serde::{Deserialize, Serialize};

/// Overall verdict of a check, worst first: Broken, Drifted, Missing, Healthy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Healthy,
    /// A mapped lead or card is gone, or an open lead has no card yet
    Missing,
    /// Lead status and card list of some pair disagree
    Drifted,
    /// The mapping file could not be loaded
    Broken,
}

/// One finding of the check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftItem {
    pub lead_id: Option<String>,
    pub card_id: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub status: CheckStatus,
    pub drifted: Vec<DriftItem>,
    pub missing: Vec<DriftItem>,
    /// Free-form notes, e.g. why the mapping is broken
    pub messages: Vec<String>,
}

impl CheckReport {
    /// Report for a mapping that could not be loaded; nothing else is inspected.
    pub fn broken(message: String) -> Self {
        Self {
            status: CheckStatus::Broken,
            drifted: Vec::new(),
            missing: Vec::new(),
            messages: vec![message],
        }
    }

    /// Derive the status from the findings. Drift outranks missing entities.
    pub fn from_items(drifted: Vec<DriftItem>, missing: Vec<DriftItem>) -> Self {
        let status = match (drifted.is_empty(), missing.is_empty()) {
            (false, _) => CheckStatus::Drifted,
            (true, false) => CheckStatus::Missing,
            (true, true) => CheckStatus::Healthy,
        };
        Self {
            status,
            drifted,
            missing,
            messages: Vec::new(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == CheckStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(description: &str) -> DriftItem {
        DriftItem {
            lead_id: Some("1".to_string()),
            card_id: Some("c1".to_string()),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_drift_outranks_missing() {
        let report = CheckReport::from_items(vec![item("Drifted")], vec![item("Missing")]);
        assert_eq!(report.status, CheckStatus::Drifted);

        let report = CheckReport::from_items(Vec::new(), vec![item("Missing")]);
        assert_eq!(report.status, CheckStatus::Missing);

        let report = CheckReport::from_items(Vec::new(), Vec::new());
        assert!(report.is_healthy());
        assert!(report.messages.is_empty());
    }

    #[test]
    fn test_broken_report_carries_message() {
        let report = CheckReport::broken("bad mapping".to_string());
        assert_eq!(report.status, CheckStatus::Broken);
        assert_eq!(report.messages, vec!["bad mapping".to_string()]);
    }
}
