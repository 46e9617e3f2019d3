use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use indexmap::IndexMap;
use axum::Router;
use chrono::Duration;
use serde_json::Value;

use crate::auth::{
    AuthService, RegisterRequest, TokenService, User, UserId, UserRepository, MIN_HASH_COST,
};
use crate::providers::{
    provider_router, ProviderId, ProviderRecord, ProviderRepository, ProviderService,
};
use crate::repository::RepositoryError;

pub(super) const SAMPLE_CSV: &str = "\
provider_name,specialty,npi,phone,address
Dr. Jane Smith,Cardiology,1234567890,(555) 123-4567,\"100 Main Street, Springfield\"
Dr. John Doe,Pediatrics,12345,55512345,1 A St
,,,,
";

pub(super) fn owner() -> UserId {
    UserId("owner-1".to_string())
}

pub(super) fn build_service() -> (
    ProviderService<MemoryProviderRepository>,
    Arc<MemoryProviderRepository>,
) {
    let repository = Arc::new(MemoryProviderRepository::default());
    let service = ProviderService::new(repository.clone());
    (service, repository)
}

pub(super) fn auth_service() -> Arc<AuthService<MemoryUserRepository>> {
    Arc::new(
        AuthService::new(
            Arc::new(MemoryUserRepository::default()),
            TokenService::new("test-secret", Duration::minutes(5)),
        )
        .with_password_cost(MIN_HASH_COST),
    )
}

/// Register a tenant and return a bearer token for it.
pub(super) fn register_tenant(auth: &AuthService<MemoryUserRepository>, email: &str) -> String {
    auth.register(RegisterRequest {
        email: email.to_string(),
        password: "correct-horse".to_string(),
    })
    .expect("registration succeeds");
    auth.login(email, "correct-horse")
        .expect("login succeeds")
        .access_token
}

pub(super) fn router_with(
    service: ProviderService<MemoryProviderRepository>,
    auth: Arc<AuthService<MemoryUserRepository>>,
) -> Router {
    provider_router(Arc::new(service), auth)
}

#[derive(Default, Clone)]
pub(super) struct MemoryProviderRepository {
    pub(super) records: Arc<Mutex<IndexMap<ProviderId, ProviderRecord>>>,
}

impl ProviderRepository for MemoryProviderRepository {
    fn insert_batch(&self, records: Vec<ProviderRecord>) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let inserted = records.len();
        for record in records {
            guard.insert(record.id.clone(), record);
        }
        Ok(inserted)
    }

    fn update(&self, record: ProviderRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn update_batch(&self, records: Vec<ProviderRecord>) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        for record in records {
            guard.insert(record.id.clone(), record);
        }
        Ok(())
    }

    fn fetch(
        &self,
        owner: &UserId,
        id: &ProviderId,
    ) -> Result<Option<ProviderRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .get(id)
            .filter(|record| record.is_owned_by(owner))
            .cloned())
    }

    fn for_owner(&self, owner: &UserId) -> Result<Vec<ProviderRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.is_owned_by(owner))
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl ProviderRepository for UnavailableRepository {
    fn insert_batch(&self, _records: Vec<ProviderRecord>) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ProviderRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_batch(&self, _records: Vec<ProviderRecord>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _owner: &UserId,
        _id: &ProviderId,
    ) -> Result<Option<ProviderRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_owner(&self, _owner: &UserId) -> Result<Vec<ProviderRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryUserRepository {
    users: Arc<Mutex<HashMap<String, User>>>,
}

impl UserRepository for MemoryUserRepository {
    fn insert(&self, user: User) -> Result<User, RepositoryError> {
        let mut guard = self.users.lock().expect("user mutex poisoned");
        if guard.contains_key(&user.email) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let guard = self.users.lock().expect("user mutex poisoned");
        Ok(guard.get(email).cloned())
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}
