//! Data models for campusrate.

mod entity;
mod review;

pub use entity::{Entity, EntityType, Location};
pub use review::Review;
