//! SeaORM entities, one per collection.

pub mod portfolio;
pub mod post;
pub mod session;
pub mod user;
