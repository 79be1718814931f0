//! HTTP routes for the person resource and health probes
//!
//! | Method | Path                      | Handler                  |
//! |--------|---------------------------|--------------------------|
//! | GET    | `/people`                 | list                     |
//! | POST   | `/person`                 | create (201 + Location)  |
//! | GET    | `/person/{id}`            | get                      |
//! | PUT    | `/person/{id}`            | full update or create    |
//! | DELETE | `/person/{id}`            | delete (204)             |
//! | PUT    | `/person/{id}/{field}`    | field update or create   |
//! | GET    | `/health`, `/ready`       | probes                   |

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, post, put},
    Json, Router,
};

use crate::handlers::{ApiError, CollectionHandler, CollectionModel, EntityModel};
use crate::health::{health, readiness};
use crate::person::{Person, PersonField, PersonId};
use crate::repository::PersonStore;
use crate::responses::{Created, NoContent};
use crate::state::AppState;

type PathId = Result<Path<PersonId>, PathRejection>;
type Body = Result<Json<Person>, JsonRejection>;

/// Build the router for `state`, without middleware
pub fn router<S: PersonStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health::<S>))
        .route("/ready", get(readiness::<S>))
        .route("/people", get(list_people::<S>))
        .route("/person", post(create_person::<S>))
        .route(
            "/person/{id}",
            get(get_person::<S>)
                .put(replace_person::<S>)
                .delete(delete_person::<S>),
        )
        .route("/person/{id}/username", put(update_username::<S>))
        .route("/person/{id}/email", put(update_email::<S>))
        .route("/person/{id}/firstname", put(update_firstname::<S>))
        .route("/person/{id}/lastname", put(update_lastname::<S>))
        .with_state(state)
}

async fn list_people<S: PersonStore>(
    State(state): State<AppState<S>>,
) -> Result<CollectionModel<Person>, ApiError> {
    state.people().list().await
}

async fn create_person<S: PersonStore>(
    State(state): State<AppState<S>>,
    body: Body,
) -> Result<Created<EntityModel<Person>>, ApiError> {
    let Json(person) = body?;
    let model = state.people().create(person).await?;

    let location = model.self_link().map(|l| l.href.clone());
    let created = Created::new(model);
    Ok(match location {
        Some(href) => created.with_location(href),
        None => created,
    })
}

async fn get_person<S: PersonStore>(
    State(state): State<AppState<S>>,
    id: PathId,
) -> Result<EntityModel<Person>, ApiError> {
    let Path(id) = id?;
    state.people().get(id).await
}

async fn replace_person<S: PersonStore>(
    State(state): State<AppState<S>>,
    id: PathId,
    body: Body,
) -> Result<EntityModel<Person>, ApiError> {
    let Path(id) = id?;
    let Json(person) = body?;
    state.people().update(id, person).await
}

async fn delete_person<S: PersonStore>(
    State(state): State<AppState<S>>,
    id: PathId,
) -> Result<NoContent, ApiError> {
    let Path(id) = id?;
    state.people().delete(id).await?;
    Ok(NoContent)
}

async fn update_field<S: PersonStore>(
    state: AppState<S>,
    id: PathId,
    field: PersonField,
    body: Body,
) -> Result<EntityModel<Person>, ApiError> {
    let Path(id): Path<PersonId> = id?;
    let Json(person) = body?;
    state.people().update_field(id, field, person).await
}

async fn update_username<S: PersonStore>(
    State(state): State<AppState<S>>,
    id: PathId,
    body: Body,
) -> Result<EntityModel<Person>, ApiError> {
    update_field(state, id, PersonField::Username, body).await
}

async fn update_email<S: PersonStore>(
    State(state): State<AppState<S>>,
    id: PathId,
    body: Body,
) -> Result<EntityModel<Person>, ApiError> {
    update_field(state, id, PersonField::Email, body).await
}

async fn update_firstname<S: PersonStore>(
    State(state): State<AppState<S>>,
    id: PathId,
    body: Body,
) -> Result<EntityModel<Person>, ApiError> {
    update_field(state, id, PersonField::Firstname, body).await
}

async fn update_lastname<S: PersonStore>(
    State(state): State<AppState<S>>,
    id: PathId,
    body: Body,
) -> Result<EntityModel<Person>, ApiError> {
    update_field(state, id, PersonField::Lastname, body).await
}
