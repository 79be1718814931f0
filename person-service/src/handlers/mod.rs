//! Request handling for the person resource
//!
//! - [`PersonHandler`]: list/get/create/update/delete plus field-scoped updates
//! - [`PersonModelAssembler`]: person -> HAL representation with links
//! - [`ApiError`]: failures mapped to HTTP statuses and JSON bodies

mod error;
mod person;
mod representation;
mod traits;

pub use error::{ApiError, ApiErrorKind, ApiOperation};
pub use person::PersonHandler;
pub use representation::{
    CollectionModel, EntityModel, Link, Links, PersonModelAssembler, PEOPLE_REL,
    PERSON_LIST_REL, SELF_REL,
};
pub use traits::CollectionHandler;
