//! # progrmobil-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **alumno REST API** (`/alumnos`, `/alumnos/count`,
//!   `/alumnos/{id}`) as JSON
//! - Decode JSON-encoded `filter` / `where` query parameters and request
//!   bodies, validating them against the entity schema before any service
//!   call
//! - Map application results into HTTP responses and domain errors into
//!   status codes with a `{"error": "..."}` body
//!
//! ## Dependency rule
//! Depends on `progrmobil-app` (for port traits and services) and `progrmobil-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
