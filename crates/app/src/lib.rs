//! # progrmobil-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AlumnoRepository`: CRUD and filtered queries for alumnos
//! - Define **driving/inbound ports** as use-case structs:
//!   - `AlumnoService`: create, count, find, find by id, bulk update,
//!     partial update, replace, delete
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `progrmobil-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
