//! Person resource handler
//!
//! Every write goes through [`PersonHandler::persist`], which checks the
//! required fields before touching the store.
//!
//! Updates against an id with no record fall back to creating the record at
//! that id (upsert-on-miss). For field-scoped updates this fallback can be
//! switched off with [`MissingRecordPolicy::Reject`].

use std::sync::Arc;

use super::error::{ApiError, ApiOperation};
use super::representation::{CollectionModel, EntityModel, PersonModelAssembler};
use super::traits::CollectionHandler;
use crate::config::MissingRecordPolicy;
use crate::person::{Person, PersonField, PersonId};
use crate::repository::PersonStore;

const ENTITY: &str = "Person";

/// CRUD handler for [`Person`] records over any [`PersonStore`]
#[derive(Debug)]
pub struct PersonHandler<S> {
    store: Arc<S>,
    assembler: PersonModelAssembler,
    on_missing_field_update: MissingRecordPolicy,
}

impl<S: PersonStore> PersonHandler<S> {
    pub fn new(
        store: Arc<S>,
        assembler: PersonModelAssembler,
        on_missing_field_update: MissingRecordPolicy,
    ) -> Self {
        Self {
            store,
            assembler,
            on_missing_field_update,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn assembler(&self) -> &PersonModelAssembler {
        &self.assembler
    }

    /// Overwrite one field of the person at `id`
    ///
    /// Only `field` is copied from `payload`; a null value clears it. When no
    /// record exists the configured [`MissingRecordPolicy`] decides: `Create`
    /// saves the whole payload at `id`, `Reject` returns `NotFound`.
    pub async fn update_field(
        &self,
        id: PersonId,
        field: PersonField,
        payload: Person,
    ) -> Result<EntityModel<Person>, ApiError> {
        let op = ApiOperation::UpdateField;

        let saved = match self.find(id, op).await? {
            Some(mut existing) => {
                field.copy(&payload, &mut existing);
                tracing::info!(id = %id, field = %field, "updating person field");
                self.persist(existing, op).await?
            }
            None => match self.on_missing_field_update {
                MissingRecordPolicy::Create => {
                    tracing::info!(id = %id, field = %field, "no person at id, creating from payload");
                    self.persist(payload.with_id(id), op).await?
                }
                MissingRecordPolicy::Reject => {
                    return Err(ApiError::not_found(ENTITY, id.to_string()).with_operation(op));
                }
            },
        };

        Ok(self.assembler.to_model(saved))
    }

    async fn find(&self, id: PersonId, op: ApiOperation) -> Result<Option<Person>, ApiError> {
        self.store
            .find_by_id(id)
            .await
            .map_err(|e| ApiError::from(e).with_operation(op))
    }

    /// Validate then save
    async fn persist(&self, person: Person, op: ApiOperation) -> Result<Person, ApiError> {
        if let Err(fields) = person.validate() {
            let mut error = ApiError::validation_failed(fields).with_operation(op);
            if let Some(id) = person.id {
                error = error.with_entity(ENTITY, id.to_string());
            }
            return Err(error);
        }

        let saved = self
            .store
            .save(person)
            .await
            .map_err(|e| ApiError::from(e).with_operation(op))?;
        tracing::debug!(person = %saved, "saved");
        Ok(saved)
    }
}

impl<S: PersonStore> CollectionHandler<PersonId, Person, Person, Person> for PersonHandler<S> {
    async fn list(&self) -> Result<CollectionModel<Person>, ApiError> {
        let people = self
            .store
            .find_all()
            .await
            .map_err(|e| ApiError::from(e).with_operation(ApiOperation::List))?;

        tracing::debug!(count = people.len(), "listing people");
        Ok(self.assembler.to_collection(people))
    }

    async fn get(&self, id: PersonId) -> Result<EntityModel<Person>, ApiError> {
        let person = self
            .find(id, ApiOperation::Get)
            .await?
            .ok_or_else(|| {
                ApiError::not_found(ENTITY, id.to_string()).with_operation(ApiOperation::Get)
            })?;

        Ok(self.assembler.to_model(person))
    }

    /// Any `id` in the payload is discarded; the store assigns one
    async fn create(&self, mut dto: Person) -> Result<EntityModel<Person>, ApiError> {
        dto.id = None;
        let saved = self.persist(dto, ApiOperation::Create).await?;

        tracing::info!(id = ?saved.id, "created person");
        Ok(self.assembler.to_model(saved))
    }

    /// Replace all four mutable fields, or create the record at `id`
    async fn update(&self, id: PersonId, dto: Person) -> Result<EntityModel<Person>, ApiError> {
        let op = ApiOperation::Update;

        let person = match self.find(id, op).await? {
            Some(mut existing) => {
                existing.replace_attributes(dto);
                tracing::info!(id = %id, "replacing person");
                existing
            }
            None => {
                tracing::info!(id = %id, "no person at id, creating from payload");
                dto.with_id(id)
            }
        };

        let saved = self.persist(person, op).await?;
        Ok(self.assembler.to_model(saved))
    }

    async fn delete(&self, id: PersonId) -> Result<(), ApiError> {
        let existed = self
            .store
            .delete_by_id(id)
            .await
            .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Delete))?;

        tracing::info!(id = %id, existed, "deleted person");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use crate::handlers::ApiErrorKind;
    use crate::person::{EMAIL_MANDATORY, USERNAME_MANDATORY};
    use crate::repository::InMemoryPersonStore;

    fn handler(policy: MissingRecordPolicy) -> PersonHandler<InMemoryPersonStore> {
        PersonHandler::new(
            Arc::new(InMemoryPersonStore::new()),
            PersonModelAssembler::new(None),
            policy,
        )
    }

    fn nolan() -> Person {
        Person::new("chrisnolan123", "nolan@email.com", "chris", "nolan")
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let handler = handler(MissingRecordPolicy::Create);

        let model = handler.create(nolan()).await.unwrap();
        assert!(model.content.id.is_some());
        assert_eq!(model.content.username.as_deref(), Some("chrisnolan123"));
        assert_eq!(model.content.email.as_deref(), Some("nolan@email.com"));
        assert_eq!(model.content.firstname.as_deref(), Some("chris"));
        assert_eq!(model.content.lastname.as_deref(), Some("nolan"));
    }

    #[tokio::test]
    async fn test_create_discards_payload_id() {
        let handler = handler(MissingRecordPolicy::Create);

        let model = handler
            .create(nolan().with_id(PersonId(500)))
            .await
            .unwrap();
        assert_eq!(model.content.id, Some(PersonId(1)));
    }

    #[tokio::test]
    async fn test_create_blank_username_rejected() {
        let handler = handler(MissingRecordPolicy::Create);
        let mut person = nolan();
        person.username = Some(String::new());

        let error = handler.create(person).await.unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::ValidationFailed);
        let fields = error.field_errors.unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("username").unwrap(), USERNAME_MANDATORY);
        assert_eq!(handler.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let handler = handler(MissingRecordPolicy::Create);

        let error = handler.get(PersonId(999_999)).await.unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::NotFound);
        assert_eq!(error.operation, ApiOperation::Get);
        assert!(error.message.contains("999999"));
    }

    #[tokio::test]
    async fn test_get_returns_links() {
        let handler = handler(MissingRecordPolicy::Create);
        let created = handler.create(nolan()).await.unwrap();
        let id = created.content.id.unwrap();

        let model = handler.get(id).await.unwrap();
        assert_eq!(model.self_link().unwrap().href, format!("/person/{id}"));
        assert_eq!(model.links.get("people").unwrap().href, "/people");
    }

    #[tokio::test]
    async fn test_update_field_changes_only_that_field() {
        let handler = handler(MissingRecordPolicy::Create);
        let id = handler.create(nolan()).await.unwrap().content.id.unwrap();

        let payload = Person {
            username: Some("nolan_renamed".to_string()),
            email: Some("ignored@email.com".to_string()),
            ..Person::default()
        };
        let model = handler
            .update_field(id, PersonField::Username, payload)
            .await
            .unwrap();

        assert_eq!(model.content.id, Some(id));
        assert_eq!(model.content.username.as_deref(), Some("nolan_renamed"));
        assert_eq!(model.content.email.as_deref(), Some("nolan@email.com"));
        assert_eq!(model.content.firstname.as_deref(), Some("chris"));
    }

    #[tokio::test]
    async fn test_update_field_null_clears_optional_field() {
        let handler = handler(MissingRecordPolicy::Create);
        let id = handler.create(nolan()).await.unwrap().content.id.unwrap();

        let model = handler
            .update_field(id, PersonField::Lastname, Person::default())
            .await
            .unwrap();
        assert!(model.content.lastname.is_none());
    }

    #[tokio::test]
    async fn test_update_field_null_required_field_rejected() {
        let handler = handler(MissingRecordPolicy::Create);
        let id = handler.create(nolan()).await.unwrap().content.id.unwrap();

        let error = handler
            .update_field(id, PersonField::Email, Person::default())
            .await
            .unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::ValidationFailed);
        assert_eq!(error.operation, ApiOperation::UpdateField);
        assert_eq!(
            error.field_errors.unwrap().get("email").unwrap(),
            EMAIL_MANDATORY
        );

        let stored = handler.store().find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.email.as_deref(), Some("nolan@email.com"));
    }

    #[tokio::test]
    async fn test_update_field_missing_creates_at_id() {
        let handler = handler(MissingRecordPolicy::Create);

        let model = handler
            .update_field(PersonId(77), PersonField::Username, nolan())
            .await
            .unwrap();

        assert_eq!(model.content.id, Some(PersonId(77)));
        assert_eq!(model.content.email.as_deref(), Some("nolan@email.com"));
        assert_eq!(model.content.lastname.as_deref(), Some("nolan"));
        assert_eq!(handler.store().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_field_missing_rejected_by_policy() {
        let handler = handler(MissingRecordPolicy::Reject);

        let error = handler
            .update_field(PersonId(77), PersonField::Username, nolan())
            .await
            .unwrap_err();

        assert_eq!(error.kind, ApiErrorKind::NotFound);
        assert_eq!(error.operation, ApiOperation::UpdateField);
        assert_eq!(handler.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_full_update_overwrites_all_fields() {
        let handler = handler(MissingRecordPolicy::Create);
        let id = handler.create(nolan()).await.unwrap().content.id.unwrap();

        let replacement = Person {
            username: Some("new".to_string()),
            email: Some("new@email.com".to_string()),
            ..Person::default()
        };
        let model = handler.update(id, replacement).await.unwrap();

        assert_eq!(model.content.id, Some(id));
        assert_eq!(model.content.username.as_deref(), Some("new"));
        assert!(model.content.firstname.is_none());
        assert!(model.content.lastname.is_none());
    }

    #[tokio::test]
    async fn test_full_update_missing_upserts_even_when_rejecting_fields() {
        let handler = handler(MissingRecordPolicy::Reject);

        let model = handler.update(PersonId(12), nolan()).await.unwrap();
        assert_eq!(model.content.id, Some(PersonId(12)));
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let handler = handler(MissingRecordPolicy::Create);
        assert!(handler.delete(PersonId(999_999)).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_distinct_self_links() {
        let handler = handler(MissingRecordPolicy::Create);
        for i in 0..3 {
            handler
                .create(Person::new(format!("user{i}"), format!("u{i}@email.com"), "f", "l"))
                .await
                .unwrap();
        }

        let collection = handler.list().await.unwrap();
        let hrefs: BTreeSet<_> = collection
            .items()
            .map(|m| m.self_link().unwrap().href.clone())
            .collect();
        assert_eq!(collection.len(), 3);
        assert_eq!(hrefs.len(), 3);
    }
}
