use serde::{Deserialize, Serialize};

pub const HIGH_RISK_ISSUE_COUNT: usize = 3;
pub const HIGH_RISK_SCORE_FLOOR: f64 = 0.65;
pub const LOW_RISK_SCORE_FLOOR: f64 = 0.85;

/// Coarse triage bucket assigned to a provider record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Review workflow state, always derived together with [`RiskLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationStatus {
    Pending,
    Validated,
    #[serde(rename = "Needs Review")]
    NeedsReview,
}

impl ValidationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ValidationStatus::Pending => "Pending",
            ValidationStatus::Validated => "Validated",
            ValidationStatus::NeedsReview => "Needs Review",
        }
    }
}

/// Map an issue count and bounded score to a risk level and review status.
///
/// The high-risk branch is checked first, so a record matching both the high
/// and medium predicates is always high risk.
pub fn classify(issue_count: usize, score: f64) -> (RiskLevel, ValidationStatus) {
    if issue_count >= HIGH_RISK_ISSUE_COUNT || score < HIGH_RISK_SCORE_FLOOR {
        (RiskLevel::High, ValidationStatus::NeedsReview)
    } else if issue_count >= 1 || score < LOW_RISK_SCORE_FLOOR {
        (RiskLevel::Medium, ValidationStatus::NeedsReview)
    } else {
        (RiskLevel::Low, ValidationStatus::Validated)
    }
}
