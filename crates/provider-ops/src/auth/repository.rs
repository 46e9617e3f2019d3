use super::domain::User;
use crate::repository::RepositoryError;

/// Storage abstraction for registered users. `insert` rejects duplicate emails
/// with [`RepositoryError::Conflict`].
pub trait UserRepository: Send + Sync {
    fn insert(&self, user: User) -> Result<User, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
}
