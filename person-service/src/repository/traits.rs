//! The person store contract
//!
//! Uses RPITIT (Return Position Impl Trait In Traits) so implementations can
//! be written with plain `async fn` and no `async_trait`.

use std::future::Future;

use super::error::RepositoryError;
use crate::person::{Person, PersonId};

/// Result type for store operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Persistence collaborator for [`Person`] records
///
/// The store exclusively owns id assignment. Each call is atomic on its own;
/// callers get no multi-call transactions.
pub trait PersonStore: Send + Sync + 'static {
    /// Persist a person and return it with its id
    ///
    /// With `id == None` a fresh id is assigned. With an explicit id the record
    /// at that id is inserted or overwritten, and later generated ids will not
    /// collide with it.
    fn save(&self, person: Person) -> impl Future<Output = RepositoryResult<Person>> + Send;

    /// Find a person by id
    ///
    /// Returns `Ok(None)` if no record has that id.
    fn find_by_id(
        &self,
        id: PersonId,
    ) -> impl Future<Output = RepositoryResult<Option<Person>>> + Send;

    /// Every persisted person, ordered by id
    fn find_all(&self) -> impl Future<Output = RepositoryResult<Vec<Person>>> + Send;

    /// Delete a person by id
    ///
    /// Returns `true` if a record was removed, `false` if none existed.
    /// A missing id is not an error.
    fn delete_by_id(&self, id: PersonId) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Number of persisted people
    fn count(&self) -> impl Future<Output = RepositoryResult<u64>> + Send;
}
