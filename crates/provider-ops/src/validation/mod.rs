//! Deterministic provider scoring.
//!
//! Every record runs through the same fixed checklist: each triggered check
//! subtracts a fixed penalty from a starting score of 1.0, the result is
//! clamped, and the classifier maps the issue count and score to a risk level
//! and review status. Scoring never fails; sparse rows simply score low.

mod normalizer;
mod policy;
mod rules;

pub use normalizer::normalize_phone;
pub use policy::{
    classify, RiskLevel, ValidationStatus, HIGH_RISK_ISSUE_COUNT, HIGH_RISK_SCORE_FLOOR,
    LOW_RISK_SCORE_FLOOR,
};
pub use rules::{is_well_formed_npi, score_fields, CheckKind, Deficiency, ScoreCard};

use serde::{Deserialize, Serialize};

/// The five raw directory fields of one provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFields {
    pub provider_name: String,
    pub specialty: Option<String>,
    pub npi: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ProviderFields {
    pub fn new(
        provider_name: &str,
        specialty: Option<&str>,
        npi: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            specialty: specialty.map(str::to_string),
            npi: npi.map(str::to_string),
            phone: phone.map(str::to_string),
            address: address.map(str::to_string),
        }
    }
}

/// Derived fields copied onto a provider record after scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub confidence_score: f64,
    pub risk_level: RiskLevel,
    pub validation_status: ValidationStatus,
    pub primary_issue: Option<String>,
}

/// Score one provider and classify the result.
pub fn evaluate_provider(fields: &ProviderFields) -> ValidationOutcome {
    let card = score_fields(fields);
    let (risk_level, validation_status) = classify(card.issue_count(), card.score);

    ValidationOutcome {
        confidence_score: card.score,
        risk_level,
        validation_status,
        primary_issue: card.primary_issue().map(str::to_string),
    }
}
