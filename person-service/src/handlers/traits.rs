//! Handler trait definitions for REST collection resources
//!
//! Uses RPITIT (Return Position Impl Trait In Traits) so handlers can be
//! written with plain `async fn`.

use std::future::Future;

use super::error::ApiError;
use super::representation::{CollectionModel, EntityModel};

/// Standard operations on a collection resource
///
/// # Type Parameters
///
/// - `Id`: identifier of one entity
/// - `Entity`: the entity carried inside each representation
/// - `CreateDto`: payload accepted by `create`
/// - `UpdateDto`: payload accepted by `update`
pub trait CollectionHandler<Id, Entity, CreateDto, UpdateDto>: Send + Sync {
    /// Every entity, each with its links, plus a collection link
    fn list(&self) -> impl Future<Output = Result<CollectionModel<Entity>, ApiError>> + Send;

    /// One entity, or `NotFound`
    fn get(&self, id: Id) -> impl Future<Output = Result<EntityModel<Entity>, ApiError>> + Send;

    /// Validate and persist a new entity
    fn create(
        &self,
        dto: CreateDto,
    ) -> impl Future<Output = Result<EntityModel<Entity>, ApiError>> + Send;

    /// Replace the entity at `id`
    fn update(
        &self,
        id: Id,
        dto: UpdateDto,
    ) -> impl Future<Output = Result<EntityModel<Entity>, ApiError>> + Send;

    /// Remove the entity at `id`; a missing id is not an error
    fn delete(&self, id: Id) -> impl Future<Output = Result<(), ApiError>> + Send;
}
