//! # progrmobil-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `progrmobil-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Translate domain filters into parameterized SQL
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `progrmobil-app` (for port traits) and `progrmobil-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod alumno_repo;
mod error;
mod pool;
mod query;

pub use alumno_repo::SqliteAlumnoRepository;
pub use error::StorageError;
pub use pool::{Config, Database};
