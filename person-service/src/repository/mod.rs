//! Person persistence
//!
//! The [`PersonStore`] trait is the only seam between request handling and
//! storage. Two backends ship with the service:
//!
//! - [`InMemoryPersonStore`]: default, and used by the tests
//! - `PgPersonStore`: PostgreSQL via `sqlx` (requires the `database` feature)

mod error;
mod memory;
#[cfg(feature = "database")]
mod postgres;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::InMemoryPersonStore;
#[cfg(feature = "database")]
pub use postgres::PgPersonStore;
pub use traits::{PersonStore, RepositoryResult};
