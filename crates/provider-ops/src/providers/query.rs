use serde::{Deserialize, Serialize};

use super::domain::{ProviderRecord, ProviderView};
use crate::validation::RiskLevel;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const MAX_SEARCH_LEN: usize = 200;

/// Filters and pagination accepted by the provider listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub min_confidence: Option<f64>,
    #[serde(default)]
    pub search: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for ProviderQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            risk_level: None,
            min_confidence: None,
            search: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("page must be at least 1")]
    InvalidPage,
    #[error("page_size must be between 1 and {MAX_PAGE_SIZE}")]
    InvalidPageSize,
    #[error("min_confidence must be between 0.0 and 1.0")]
    InvalidMinConfidence,
    #[error("search must be at most {MAX_SEARCH_LEN} characters")]
    SearchTooLong,
}

impl ProviderQuery {
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.page < 1 {
            return Err(QueryError::InvalidPage);
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(QueryError::InvalidPageSize);
        }
        if let Some(min) = self.min_confidence {
            if !(0.0..=1.0).contains(&min) {
                return Err(QueryError::InvalidMinConfidence);
            }
        }
        if let Some(search) = &self.search {
            if search.chars().count() > MAX_SEARCH_LEN {
                return Err(QueryError::SearchTooLong);
            }
        }
        Ok(())
    }

    pub fn matches(&self, record: &ProviderRecord) -> bool {
        if let Some(risk) = self.risk_level {
            if record.risk_level() != risk {
                return false;
            }
        }

        if let Some(min) = self.min_confidence {
            if record.confidence_score() < min {
                return false;
            }
        }

        match self.search.as_deref().filter(|needle| !needle.is_empty()) {
            Some(needle) => {
                let needle = needle.to_lowercase();
                let fields = &record.fields;
                [
                    Some(fields.provider_name.as_str()),
                    fields.specialty.as_deref(),
                    fields.npi.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|haystack| haystack.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }

    /// Filter, order newest first, and cut one page out of the owner's records.
    pub fn apply(&self, mut records: Vec<ProviderRecord>) -> ProviderPage {
        records.retain(|record| self.matches(record));
        records.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        let total = records.len();
        let offset = (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size as usize);
        let items = records
            .iter()
            .skip(offset)
            .take(self.page_size as usize)
            .map(ProviderRecord::view)
            .collect();

        ProviderPage {
            items,
            total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderPage {
    pub items: Vec<ProviderView>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
}

/// Per-owner dashboard aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSummary {
    pub total_providers: usize,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub avg_confidence: f64,
    pub requires_review: usize,
}

impl ProviderSummary {
    pub fn from_records(records: &[ProviderRecord]) -> Self {
        let total_providers = records.len();
        let count = |level: RiskLevel| {
            records
                .iter()
                .filter(|record| record.risk_level() == level)
                .count()
        };
        let high_risk_count = count(RiskLevel::High);
        let medium_risk_count = count(RiskLevel::Medium);

        let avg_confidence = if total_providers == 0 {
            0.0
        } else {
            records
                .iter()
                .map(ProviderRecord::confidence_score)
                .sum::<f64>()
                / total_providers as f64
        };

        Self {
            total_providers,
            high_risk_count,
            medium_risk_count,
            avg_confidence,
            requires_review: high_risk_count + medium_risk_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserId;
    use crate::validation::ProviderFields;
    use chrono::{Duration, Utc};

    fn record(
        name: &str,
        specialty: Option<&str>,
        npi: Option<&str>,
        age_minutes: i64,
    ) -> ProviderRecord {
        ProviderRecord::scored(
            UserId("owner".to_string()),
            ProviderFields::new(
                name,
                specialty,
                npi,
                Some("5551234567"),
                Some("123 Main Street"),
            ),
            None,
            Utc::now() - Duration::minutes(age_minutes),
        )
    }

    fn sample() -> Vec<ProviderRecord> {
        vec![
            record("Dr. Jane Smith", Some("Cardiology"), Some("1234567890"), 30),
            record("Dr. John Doe", Some("Pediatrics"), Some("12345"), 20),
            record("Dr. Ann Lee", None, Some("1234567890"), 10),
        ]
    }

    #[test]
    fn defaults_are_first_page_of_twenty_five() {
        let query: ProviderQuery = serde_json::from_str("{}").expect("deserializes");
        assert_eq!(query, ProviderQuery::default());
        assert!(query.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut query = ProviderQuery {
            page: 0,
            ..ProviderQuery::default()
        };
        assert_eq!(query.validate(), Err(QueryError::InvalidPage));

        query.page = 1;
        query.page_size = 101;
        assert_eq!(query.validate(), Err(QueryError::InvalidPageSize));

        query.page_size = 10;
        query.min_confidence = Some(1.5);
        assert_eq!(query.validate(), Err(QueryError::InvalidMinConfidence));

        query.min_confidence = None;
        query.search = Some("x".repeat(201));
        assert_eq!(query.validate(), Err(QueryError::SearchTooLong));
    }

    #[test]
    fn apply_orders_newest_first_and_counts_before_paging() {
        let query = ProviderQuery {
            page: 1,
            page_size: 2,
            ..ProviderQuery::default()
        };
        let page = query.apply(sample());

        assert_eq!(page.total, 3);
        let names: Vec<_> = page
            .items
            .iter()
            .map(|item| item.fields.provider_name.as_str())
            .collect();
        assert_eq!(names, vec!["Dr. Ann Lee", "Dr. John Doe"]);

        let second = ProviderQuery {
            page: 2,
            page_size: 2,
            ..ProviderQuery::default()
        }
        .apply(sample());
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].fields.provider_name, "Dr. Jane Smith");
    }

    #[test]
    fn filters_by_risk_confidence_and_search() {
        let high = ProviderQuery {
            risk_level: Some(RiskLevel::High),
            ..ProviderQuery::default()
        }
        .apply(sample());
        assert_eq!(high.total, 0);

        let medium = ProviderQuery {
            risk_level: Some(RiskLevel::Medium),
            ..ProviderQuery::default()
        }
        .apply(sample());
        assert_eq!(medium.total, 2);

        let confident = ProviderQuery {
            min_confidence: Some(0.9),
            ..ProviderQuery::default()
        }
        .apply(sample());
        assert_eq!(confident.total, 2);

        let search = ProviderQuery {
            search: Some("PEDIA".to_string()),
            ..ProviderQuery::default()
        }
        .apply(sample());
        assert_eq!(search.total, 1);
        assert_eq!(search.items[0].fields.provider_name, "Dr. John Doe");

        let by_npi = ProviderQuery {
            search: Some("12345".to_string()),
            ..ProviderQuery::default()
        }
        .apply(sample());
        assert_eq!(by_npi.total, 3);
    }

    #[test]
    fn summary_counts_review_queue() {
        let summary = ProviderSummary::from_records(&sample());
        assert_eq!(summary.total_providers, 3);
        assert_eq!(summary.high_risk_count, 0);
        assert_eq!(summary.medium_risk_count, 2);
        assert_eq!(summary.requires_review, 2);
        assert!((summary.avg_confidence - (1.0 + 0.8 + 0.95) / 3.0).abs() < 1e-9);

        let empty = ProviderSummary::from_records(&[]);
        assert_eq!(empty.avg_confidence, 0.0);
        assert_eq!(empty.total_providers, 0);
    }
}
