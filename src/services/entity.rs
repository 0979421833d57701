//! Entity creation and lookup.

use std::sync::Arc;

use tracing::info;

use crate::allocator::IdAllocator;
use crate::models::{Entity, EntityType, Location};
use crate::store::{EntityStore, StoreError};

use super::ServiceError;

/// Input for entity creation. The ID is either supplied by the caller
/// (administrative flows, seeding) or allocated.
#[derive(Debug, Clone)]
pub struct NewEntity {
    pub id: Option<String>,
    pub name: String,
    pub entity_type: EntityType,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub location: Option<Location>,
}

pub struct EntityService {
    entities: Arc<dyn EntityStore>,
    allocator: IdAllocator,
}

impl EntityService {
    pub fn new(entities: Arc<dyn EntityStore>) -> Self {
        let allocator = IdAllocator::new(entities.clone());
        Self { entities, allocator }
    }

    /// Create an entity, allocating an ID when none is supplied.
    ///
    /// Creation goes through `insert_if_absent` so the ID is reserved
    /// atomically; with an allocated ID, a collision from a concurrent
    /// creation in the same category is retried with the next index.
    pub async fn create(&self, new: NewEntity) -> Result<Entity, ServiceError> {
        let NewEntity { id, name, entity_type, description, tags, location } = new;

        let build = |id: String| {
            let mut entity = Entity::new(id, name.clone(), entity_type);
            entity.description = description.clone();
            entity.tags = tags.clone();
            entity.location = location;
            entity
        };

        if let Some(id) = id.filter(|id| !id.is_empty()) {
            let entity = build(id);
            match self.entities.insert_if_absent(&entity).await {
                Ok(()) => {
                    info!(entity_id = %entity.id, entity_type = %entity_type.as_str(), "entity created");
                    Ok(entity)
                }
                Err(StoreError::AlreadyExists(id)) => Err(ServiceError::Conflict(format!(
                    "entity with ID '{id}' already exists"
                ))),
                Err(e) => Err(e.into()),
            }
        } else {
            for _ in 0..crate::allocator::MAX_ATTEMPTS {
                let candidate = self.allocator.allocate(entity_type).await?;
                let entity = build(candidate);
                match self.entities.insert_if_absent(&entity).await {
                    Ok(()) => {
                        info!(entity_id = %entity.id, entity_type = %entity_type.as_str(), "entity created");
                        return Ok(entity);
                    }
                    // Lost the race for this index; rescan and try again.
                    Err(StoreError::AlreadyExists(_)) => continue,
                    Err(e) => return Err(e.into()),
                }
            }
            Err(ServiceError::Conflict(format!(
                "could not allocate a {} ID after {} attempts",
                entity_type.as_str(),
                crate::allocator::MAX_ATTEMPTS
            )))
        }
    }

    pub async fn get(&self, id: &str) -> Result<Entity, ServiceError> {
        self.entities
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("entity", id))
    }

    /// List entities, optionally filtered by category.
    pub async fn list(&self, entity_type: Option<EntityType>) -> Result<Vec<Entity>, ServiceError> {
        let mut entities = self.entities.list(None).await?;
        if let Some(t) = entity_type {
            entities.retain(|e| e.entity_type == t);
        }
        Ok(entities)
    }

    pub async fn delete(&self, id: &str) -> Result<Entity, ServiceError> {
        match self.entities.delete(id).await {
            Ok(entity) => {
                info!(entity_id = %id, "entity deleted");
                Ok(entity)
            }
            Err(StoreError::NotFound(_)) => Err(ServiceError::not_found("entity", id)),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service(store: &MemoryStore) -> EntityService {
        EntityService::new(Arc::new(store.clone()))
    }

    fn new_canteen(id: Option<&str>, name: &str) -> NewEntity {
        NewEntity {
            id: id.map(str::to_string),
            name: name.to_string(),
            entity_type: EntityType::Canteen,
            description: None,
            tags: None,
            location: None,
        }
    }

    #[tokio::test]
    async fn test_create_allocates_sequential_ids() {
        let store = MemoryStore::new();
        let service = service(&store);

        let first = service.create(new_canteen(None, "The Deck")).await.unwrap();
        let second = service.create(new_canteen(None, "Frontier")).await.unwrap();
        assert_eq!(first.id, "C01");
        assert_eq!(second.id, "C02");
        assert_eq!(first.avg_rating, 0.0);
        assert_eq!(first.rating_count, 0);
    }

    #[tokio::test]
    async fn test_create_with_supplied_id_conflicts_on_duplicate() {
        let store = MemoryStore::new();
        let service = service(&store);

        service.create(new_canteen(Some("C01"), "The Deck")).await.unwrap();
        let err = service
            .create(new_canteen(Some("C01"), "Impostor"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_filters_by_type() {
        let store = MemoryStore::new();
        let service = service(&store);
        service.create(new_canteen(None, "The Deck")).await.unwrap();
        service
            .create(NewEntity {
                id: None,
                name: "PGP House".to_string(),
                entity_type: EntityType::Dorm,
                description: None,
                tags: None,
                location: None,
            })
            .await
            .unwrap();

        let canteens = service.list(Some(EntityType::Canteen)).await.unwrap();
        assert_eq!(canteens.len(), 1);
        assert_eq!(canteens[0].id, "C01");
        assert_eq!(service.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_entity_is_not_found() {
        let store = MemoryStore::new();
        let service = service(&store);
        let err = service.delete("C99").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: "entity", .. }));
    }
}
