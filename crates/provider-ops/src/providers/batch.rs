use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::ProviderRecord;
use crate::auth::UserId;
use crate::validation::{ProviderFields, RiskLevel};

/// Aggregate counts for one batch of scored records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchTally {
    pub processed: usize,
    pub low_risk: usize,
    pub medium_risk: usize,
    pub high_risk: usize,
}

impl BatchTally {
    fn record(&mut self, risk: RiskLevel) {
        self.processed += 1;
        match risk {
            RiskLevel::Low => self.low_risk += 1,
            RiskLevel::Medium => self.medium_risk += 1,
            RiskLevel::High => self.high_risk += 1,
        }
    }

    pub fn requires_review(&self) -> usize {
        self.medium_risk + self.high_risk
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ProviderRecord>,
    {
        let mut tally = Self::default();
        for record in records {
            tally.record(record.risk_level());
        }
        tally
    }
}

/// Score freshly imported rows, one record per row, in input order.
pub fn score_rows(
    owner: &UserId,
    rows: Vec<ProviderFields>,
    source_file: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<ProviderRecord> {
    rows.into_iter()
        .map(|fields| {
            ProviderRecord::scored(
                owner.clone(),
                fields,
                source_file.map(str::to_string),
                now,
            )
        })
        .collect()
}

/// Rescore existing records in place.
pub fn revalidate_records(records: &mut [ProviderRecord], now: DateTime<Utc>) -> BatchTally {
    let mut tally = BatchTally::default();
    for record in records.iter_mut() {
        let outcome = record.revalidate(now);
        tally.record(outcome.risk_level);
    }
    tally
}
