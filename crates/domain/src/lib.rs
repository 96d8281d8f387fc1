//! # progrmobil-domain
//!
//! Pure domain model for the progrmobil student registry.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define the **Alumno** entity and its static field **schema**
//! - Define the request payload shapes derived from it
//!   (`NewAlumno` for create/replace, `AlumnoPatch` for partial updates)
//! - Define **filters** (predicate, projection, ordering, pagination,
//!   relation inclusion) and validate them against the schema
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod schema;

pub mod alumno;
pub mod filter;
