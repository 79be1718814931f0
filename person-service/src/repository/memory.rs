//! In-process person store
//!
//! Backs the service when no database is configured, and backs the tests.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::traits::{PersonStore, RepositoryResult};
use crate::person::{Person, PersonId};

#[derive(Debug)]
struct Table {
    rows: BTreeMap<PersonId, Person>,
    /// `None` once an id at `i64::MAX` has been used
    next_id: Option<i64>,
}

/// Person store holding every record in a `BTreeMap` behind a tokio `RwLock`
///
/// Ids start at 1. Saving under an explicit id moves the id counter past it,
/// matching the sequence handling of the PostgreSQL store. Once the counter
/// cannot advance, saves without an id fail and explicit ids still work.
#[derive(Debug)]
pub struct InMemoryPersonStore {
    table: RwLock<Table>,
}

impl InMemoryPersonStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: Some(1),
            }),
        }
    }
}

impl Default for InMemoryPersonStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonStore for InMemoryPersonStore {
    async fn save(&self, mut person: Person) -> RepositoryResult<Person> {
        let mut table = self.table.write().await;

        let id = match (person.id, table.next_id) {
            (Some(id), Some(next)) => {
                if id.get() >= next {
                    table.next_id = id.get().checked_add(1);
                }
                id
            }
            (Some(id), None) => id,
            (None, Some(next)) => {
                table.next_id = next.checked_add(1);
                PersonId(next)
            }
            (None, None) => {
                return Err(RepositoryError::constraint_violation(
                    RepositoryOperation::Save,
                    "id sequence exhausted",
                )
                .with_entity("Person", "<new>"));
            }
        };

        person.id = Some(id);
        table.rows.insert(id, person.clone());
        Ok(person)
    }

    async fn find_by_id(&self, id: PersonId) -> RepositoryResult<Option<Person>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Person>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn delete_by_id(&self, id: PersonId) -> RepositoryResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.table.read().await.rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryErrorKind;

    fn person(username: &str) -> Person {
        Person::new(username, format!("{username}@email.com"), "first", "last")
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let store = InMemoryPersonStore::new();

        let a = store.save(person("a")).await.unwrap();
        let b = store.save(person("b")).await.unwrap();

        assert_eq!(a.id, Some(PersonId(1)));
        assert_eq!(b.id, Some(PersonId(2)));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_save_with_explicit_id_overwrites() {
        let store = InMemoryPersonStore::new();
        let saved = store.save(person("a")).await.unwrap();

        let mut changed = saved.clone();
        changed.username = Some("renamed".to_string());
        store.save(changed).await.unwrap();

        let found = store.find_by_id(PersonId(1)).await.unwrap().unwrap();
        assert_eq!(found.username.as_deref(), Some("renamed"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_explicit_id_advances_counter() {
        let store = InMemoryPersonStore::new();

        store
            .save(person("far").with_id(PersonId(50)))
            .await
            .unwrap();
        let next = store.save(person("next")).await.unwrap();

        assert_eq!(next.id, Some(PersonId(51)));
    }

    #[tokio::test]
    async fn test_max_explicit_id_exhausts_counter() {
        let store = InMemoryPersonStore::new();

        let saved = store
            .save(person("last").with_id(PersonId(i64::MAX)))
            .await
            .unwrap();
        assert_eq!(saved.id, Some(PersonId(i64::MAX)));

        let err = store.save(person("fresh")).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::ConstraintViolation);
        assert_eq!(err.operation, RepositoryOperation::Save);

        // Explicit ids keep working, and nothing wrapped around
        store.save(person("low").with_id(PersonId(7))).await.unwrap();
        store
            .save(person("again").with_id(PersonId(i64::MAX)))
            .await
            .unwrap();
        let ids: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .filter_map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![PersonId(7), PersonId(i64::MAX)]);
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let store = InMemoryPersonStore::new();
        assert!(store.find_by_id(PersonId(999_999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_ordered_by_id() {
        let store = InMemoryPersonStore::new();
        store.save(person("x").with_id(PersonId(9))).await.unwrap();
        store.save(person("y").with_id(PersonId(3))).await.unwrap();

        let ids: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .filter_map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![PersonId(3), PersonId(9)]);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryPersonStore::new();
        store.save(person("a")).await.unwrap();

        assert!(store.delete_by_id(PersonId(1)).await.unwrap());
        assert!(!store.delete_by_id(PersonId(1)).await.unwrap());
        assert!(!store.delete_by_id(PersonId(42)).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
