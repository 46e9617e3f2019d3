use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use super::batch::{revalidate_records, score_rows, BatchTally};
use super::domain::{ProviderId, ProviderRecord};
use super::export::export_to_string;
use super::import::{ensure_csv_file_name, parse_provider_rows, ImportError};
use super::query::{ProviderPage, ProviderQuery, ProviderSummary, QueryError};
use super::repository::ProviderRepository;
use crate::auth::UserId;
use crate::repository::RepositoryError;

/// Result of a CSV import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub source_file: String,
}

/// Service composing the CSV importer, the batch scorer, and the repository.
pub struct ProviderService<R> {
    repository: Arc<R>,
}

impl<R> ProviderService<R>
where
    R: ProviderRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Parse an uploaded file, score every row, and persist one record per row.
    pub fn import_csv(
        &self,
        owner: &UserId,
        file_name: &str,
        contents: &[u8],
    ) -> Result<ImportSummary, ProviderServiceError> {
        ensure_csv_file_name(file_name)?;
        let rows = parse_provider_rows(contents)?;

        let records = score_rows(owner, rows, Some(file_name), Utc::now());
        let tally = BatchTally::from_records(&records);
        let imported = self.repository.insert_batch(records)?;

        info!(
            owner = %owner.0,
            source_file = file_name,
            imported,
            high_risk = tally.high_risk,
            medium_risk = tally.medium_risk,
            "provider import scored"
        );

        Ok(ImportSummary {
            imported,
            source_file: file_name.to_string(),
        })
    }

    pub fn list(
        &self,
        owner: &UserId,
        query: &ProviderQuery,
    ) -> Result<ProviderPage, ProviderServiceError> {
        query.validate()?;
        let records = self.repository.for_owner(owner)?;
        Ok(query.apply(records))
    }

    pub fn summary(&self, owner: &UserId) -> Result<ProviderSummary, ProviderServiceError> {
        let records = self.repository.for_owner(owner)?;
        Ok(ProviderSummary::from_records(&records))
    }

    pub fn get(
        &self,
        owner: &UserId,
        id: &ProviderId,
    ) -> Result<ProviderRecord, ProviderServiceError> {
        self.repository
            .fetch(owner, id)?
            .ok_or(ProviderServiceError::NotFound)
    }

    /// Rescore one record from its stored raw fields.
    pub fn revalidate(
        &self,
        owner: &UserId,
        id: &ProviderId,
    ) -> Result<ProviderRecord, ProviderServiceError> {
        let mut record = self.get(owner, id)?;
        record.revalidate(Utc::now());
        self.repository.update(record.clone())?;

        debug!(provider = %record.id.0, risk = record.risk_level().label(), "provider revalidated");
        Ok(record)
    }

    /// Rescore every record the owner holds.
    pub fn revalidate_all(&self, owner: &UserId) -> Result<BatchTally, ProviderServiceError> {
        let mut records = self.repository.for_owner(owner)?;
        let tally = revalidate_records(&mut records, Utc::now());
        self.repository.update_batch(records)?;

        info!(
            owner = %owner.0,
            processed = tally.processed,
            requires_review = tally.requires_review(),
            "provider revalidation complete"
        );
        Ok(tally)
    }

    /// Render every owner record as CSV, newest first.
    pub fn export_csv(&self, owner: &UserId) -> Result<String, ProviderServiceError> {
        let mut records = self.repository.for_owner(owner)?;
        records.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(export_to_string(&records)?)
    }
}

/// Error raised by the provider service.
#[derive(Debug, thiserror::Error)]
pub enum ProviderServiceError {
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("Provider not found.")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("failed to render provider export: {0}")]
    Export(#[from] csv::Error),
}
