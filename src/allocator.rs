//! Sequential entity ID allocation.
//!
//! IDs are category-prefixed with a fixed-width numeric suffix ("C01",
//! "CR012"). The allocator scans existing IDs for the category prefix,
//! takes the highest cleanly-parsing suffix, and proposes max+1. A scan is
//! O(n) in the category's document count, which is fine at the expected
//! low thousands of entities.
//!
//! The scan-then-write window is closed by reserving the ID with a
//! create-if-absent insert: callers pair [`IdAllocator::allocate`] with
//! [`EntityStore::insert_if_absent`] and retry on collision up to
//! [`MAX_ATTEMPTS`] before surfacing a conflict.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::models::EntityType;
use crate::store::{EntityStore, StoreError};

/// Bounded retry count for collision handling.
pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum AllocError {
    /// Every candidate in the retry window was already taken.
    #[error("could not allocate a {0} ID after {MAX_ATTEMPTS} attempts")]
    Exhausted(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Allocates the next unused category-prefixed entity ID.
pub struct IdAllocator {
    entities: Arc<dyn EntityStore>,
}

impl IdAllocator {
    pub fn new(entities: Arc<dyn EntityStore>) -> Self {
        Self { entities }
    }

    /// Format an ID from a category and numeric index.
    pub fn format_id(entity_type: EntityType, index: u64) -> String {
        format!(
            "{}{:0width$}",
            entity_type.id_prefix(),
            index,
            width = entity_type.id_pad_width()
        )
    }

    /// Scan the category and return the next free index (max parsed + 1).
    ///
    /// IDs whose suffix does not parse as an integer are ignored. That also
    /// covers cross-category prefix overlap: a classroom ID "CR001" shows up
    /// under the canteen prefix "C", but its suffix "R001" never parses.
    pub async fn next_index(&self, entity_type: EntityType) -> Result<u64, AllocError> {
        let prefix = entity_type.id_prefix();
        let ids = self.entities.list_ids_with_prefix(prefix).await?;
        let max = ids
            .iter()
            .filter_map(|id| id[prefix.len()..].parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }

    /// Allocate the next unused ID for a category.
    ///
    /// Verifies the candidate is free before returning it; a verified
    /// collision (another writer got there first) is retried with the next
    /// index up to [`MAX_ATTEMPTS`] times. Note the returned ID is only
    /// *reserved* once the caller creates the document with
    /// [`EntityStore::insert_if_absent`].
    pub async fn allocate(&self, entity_type: EntityType) -> Result<String, AllocError> {
        let mut index = self.next_index(entity_type).await?;
        for _ in 0..MAX_ATTEMPTS {
            let candidate = Self::format_id(entity_type, index);
            if self.entities.get(&candidate).await?.is_none() {
                debug!(id = %candidate, "allocated entity ID");
                return Ok(candidate);
            }
            index += 1;
        }
        Err(AllocError::Exhausted(entity_type.as_str()))
    }
}
