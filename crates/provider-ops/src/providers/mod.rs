//! Provider directory records: CSV intake, scoring, listing, revalidation, and export.

pub mod batch;
pub mod domain;
pub mod export;
pub mod import;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use batch::{revalidate_records, score_rows, BatchTally};
pub use domain::{ProviderId, ProviderRecord, ProviderView};
pub use export::{export_to_string, write_provider_csv, EXPORT_FILE_NAME};
pub use import::{parse_provider_rows, read_provider_csv, ImportError, REQUIRED_COLUMNS};
pub use query::{ProviderPage, ProviderQuery, ProviderSummary, QueryError};
pub use repository::ProviderRepository;
pub use router::provider_router;
pub use service::{ImportSummary, ProviderService, ProviderServiceError};
