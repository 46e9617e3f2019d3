use super::domain::{ProviderId, ProviderRecord};
use crate::auth::UserId;
use crate::repository::RepositoryError;

/// Storage abstraction for provider records; every lookup is scoped to an owner.
///
/// `for_owner` returns records in insertion order. Listing and export sort by
/// `created_at` with a stable sort, so rows of one import keep their file order.
pub trait ProviderRepository: Send + Sync {
    fn insert_batch(&self, records: Vec<ProviderRecord>) -> Result<usize, RepositoryError>;
    fn update(&self, record: ProviderRecord) -> Result<(), RepositoryError>;
    fn update_batch(&self, records: Vec<ProviderRecord>) -> Result<(), RepositoryError>;
    fn fetch(
        &self,
        owner: &UserId,
        id: &ProviderId,
    ) -> Result<Option<ProviderRecord>, RepositoryError>;
    fn for_owner(&self, owner: &UserId) -> Result<Vec<ProviderRecord>, RepositoryError>;
}
