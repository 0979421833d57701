//! Service layer: the operations behind the HTTP surface and CLI.

mod entity;
mod review;
mod summarize;

pub use entity::{EntityService, NewEntity};
pub use review::ReviewService;
pub use summarize::{BatchStats, SummarizeService};

use thiserror::Error;

use crate::allocator::AllocError;
use crate::store::StoreError;
use crate::validation::ValidationError;

/// Errors surfaced to callers of the service layer.
///
/// Callers branch on the variant, not on catching: validation, not-found,
/// and conflict map to immediate structured responses; everything else is a
/// server-side failure.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{kind} with ID '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Store(StoreError),
}

impl ServiceError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<AllocError> for ServiceError {
    fn from(err: AllocError) -> Self {
        match err {
            AllocError::Exhausted(_) => Self::Conflict(err.to_string()),
            AllocError::Store(e) => Self::Store(e),
        }
    }
}
