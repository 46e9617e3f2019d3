use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::UserId;
use crate::validation::{
    evaluate_provider, ProviderFields, RiskLevel, ValidationOutcome, ValidationStatus,
};

/// Identifier wrapper for stored provider records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub String);

impl ProviderId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// A provider directory row owned by one tenant.
///
/// The derived validation fields are only reachable through [`ProviderRecord::outcome`]
/// and are always recomputed together from the raw fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRecord {
    pub id: ProviderId,
    pub owner_id: UserId,
    pub fields: ProviderFields,
    pub source_file: Option<String>,
    pub created_at: DateTime<Utc>,
    outcome: ValidationOutcome,
    updated_at: DateTime<Utc>,
}

impl ProviderRecord {
    /// Build a new record and score it immediately.
    pub fn scored(
        owner_id: UserId,
        fields: ProviderFields,
        source_file: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let outcome = evaluate_provider(&fields);
        Self {
            id: ProviderId::generate(),
            owner_id,
            fields,
            source_file,
            created_at: now,
            outcome,
            updated_at: now,
        }
    }

    /// Rescore from the unchanged raw fields.
    pub fn revalidate(&mut self, now: DateTime<Utc>) -> &ValidationOutcome {
        self.outcome = evaluate_provider(&self.fields);
        self.updated_at = now;
        &self.outcome
    }

    pub fn outcome(&self) -> &ValidationOutcome {
        &self.outcome
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.outcome.risk_level
    }

    pub fn validation_status(&self) -> ValidationStatus {
        self.outcome.validation_status
    }

    pub fn confidence_score(&self) -> f64 {
        self.outcome.confidence_score
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, owner: &UserId) -> bool {
        &self.owner_id == owner
    }

    pub fn view(&self) -> ProviderView {
        ProviderView {
            id: self.id.clone(),
            fields: self.fields.clone(),
            outcome: self.outcome.clone(),
            source_file: self.source_file.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// API representation of a provider record.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderView {
    pub id: ProviderId,
    #[serde(flatten)]
    pub fields: ProviderFields,
    #[serde(flatten)]
    pub outcome: ValidationOutcome,
    pub source_file: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
