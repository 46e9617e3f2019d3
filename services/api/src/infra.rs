use indexmap::IndexMap;
use metrics_exporter_prometheus::PrometheusHandle;
use provider_ops::auth::{User, UserId, UserRepository};
use provider_ops::providers::{ProviderId, ProviderRecord, ProviderRepository};
use provider_ops::repository::RepositoryError;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Records kept in insertion order so equal `created_at` values list in upload order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProviderRepository {
    records: Arc<Mutex<IndexMap<ProviderId, ProviderRecord>>>,
}

impl ProviderRepository for InMemoryProviderRepository {
    fn insert_batch(&self, records: Vec<ProviderRecord>) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if records.iter().any(|record| guard.contains_key(&record.id)) {
            return Err(RepositoryError::Conflict);
        }
        let inserted = records.len();
        for record in records {
            guard.insert(record.id.clone(), record);
        }
        Ok(inserted)
    }

    fn update(&self, record: ProviderRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn update_batch(&self, records: Vec<ProviderRecord>) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !records.iter().all(|record| guard.contains_key(&record.id)) {
            return Err(RepositoryError::NotFound);
        }
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

/// Users keyed by email, which is unique across tenants.
#[derive(Default, Clone)]
pub(crate) struct InMemoryUserRepository {
    users: Arc<Mutex<HashMap<String, User>>>,
}

impl UserRepository for InMemoryUserRepository {
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use provider_ops::providers::score_rows;
    use provider_ops::validation::ProviderFields;

    #[test]
    fn provider_lookups_are_scoped_to_owner() {
        let repository = InMemoryProviderRepository::default();
        let owner = UserId("owner-a".to_string());
        let records = score_rows(
            &owner,
            vec![ProviderFields::new("Dr. Jane Smith", None, None, None, None)],
            None,
            Utc::now(),
        );
        let id = records[0].id.clone();
        assert_eq!(repository.insert_batch(records).expect("insert"), 1);

        assert!(repository.fetch(&owner, &id).expect("fetch").is_some());
        let other = UserId("owner-b".to_string());
        assert!(repository.fetch(&other, &id).expect("fetch").is_none());
        assert!(repository.for_owner(&other).expect("list").is_empty());
    }

    #[test]
    fn owner_records_come_back_in_insertion_order() {
        let repository = InMemoryProviderRepository::default();
        let owner = UserId("owner-a".to_string());
        let rows = (0..12)
            .map(|row| ProviderFields::new(&format!("Dr. Row {row:02}"), None, None, None, None))
            .collect();
        let records = score_rows(&owner, rows, None, Utc::now());
        let expected: Vec<ProviderId> = records.iter().map(|record| record.id.clone()).collect();
        repository.insert_batch(records).expect("insert");

        let mut stored = repository.for_owner(&owner).expect("list");
        let ids: Vec<ProviderId> = stored.iter().map(|record| record.id.clone()).collect();
        assert_eq!(ids, expected);

        let touched = stored.remove(3);
        repository.update(touched).expect("update");
        let ids: Vec<ProviderId> = repository
            .for_owner(&owner)
            .expect("list")
            .iter()
            .map(|record| record.id.clone())
            .collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn update_of_unknown_record_is_not_found() {
        let repository = InMemoryProviderRepository::default();
        let record = score_rows(
            &UserId("owner-a".to_string()),
            vec![ProviderFields::default()],
            None,
            Utc::now(),
        )
        .remove(0);

        assert!(matches!(
            repository.update(record),
            Err(RepositoryError::NotFound)
        ));
    }
}
