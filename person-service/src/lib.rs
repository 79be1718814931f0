//! # person-service
//!
//! CRUD HTTP service for Person records with hypermedia (HAL) responses.
//!
//! ## Features
//!
//! - **Resource**: list, read, create, field-scoped and full update, delete
//! - **Upsert-on-miss**: updates against an unknown id create the record there
//! - **Hypermedia**: every person carries `self` and `people` links
//! - **Stores**: in-memory by default, PostgreSQL with the `database` feature
//! - **Middleware stack**: request ids, CORS, compression, timeouts, body limits, panic recovery
//! - **Health checks**: liveness and readiness probes
//! - **Graceful shutdown**: SIGTERM and SIGINT
//!
//! ## Example
//!
//! ```rust,no_run
//! use person_service::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let store = Arc::new(InMemoryPersonStore::new());
//!     preload(store.as_ref(), &config.people).await?;
//!
//!     let app = router(AppState::new(config.clone(), store));
//!     Server::new(config).serve(app).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
#[cfg(feature = "database")]
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod observability;
pub mod person;
pub mod preload;
pub mod repository;
pub mod responses;
pub mod routes;
pub mod server;
pub mod state;
pub mod tracking;

pub mod prelude {
    pub use crate::config::{Config, MissingRecordPolicy, PeopleConfig};
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{
        ApiError, ApiErrorKind, ApiOperation, CollectionHandler, CollectionModel, EntityModel,
        Link, PersonHandler, PersonModelAssembler,
    };
    pub use crate::health::{health, readiness};
    pub use crate::observability::init_tracing;
    pub use crate::person::{FieldErrors, Person, PersonField, PersonId};
    pub use crate::preload::preload;
    #[cfg(feature = "database")]
    pub use crate::repository::PgPersonStore;
    pub use crate::repository::{
        InMemoryPersonStore, PersonStore, RepositoryError, RepositoryErrorKind,
        RepositoryOperation, RepositoryResult,
    };
    pub use crate::responses::{Created, NoContent};
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::state::AppState;
    pub use crate::tracking::{MakeTypedRequestId, RequestId};
}
