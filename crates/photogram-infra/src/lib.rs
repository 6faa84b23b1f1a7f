//! # Photogram Infrastructure
//!
//! Concrete implementations of the ports defined in `photogram-core`.
//! This crate contains the database, photo storage and authentication integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;
pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::InMemoryStore;
pub use storage::{InMemoryPhotoStorage, LocalPhotoStorage, PhotoStorageConfig};

#[cfg(feature = "postgres")]
pub use database::DatabaseConnection;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
