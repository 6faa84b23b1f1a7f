//! # Photogram Core
//!
//! The domain layer of the Photogram backend: members, photo posts, comments
//! and likes, the ports the infrastructure has to implement, and the
//! [`SnsService`] that enforces the cross-entity invariants.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use service::SnsService;
