//! # Folio Core
//!
//! The domain layer of the Folio blog and portfolio backend.
//! Entities, error taxonomy, ports and the services built on top of them.
//! No infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use services::{AuthService, ContentService};
