//! Storage port: repository trait for persistence.

use std::future::Future;

use progrmobil_domain::alumno::{Alumno, AlumnoPatch, NewAlumno};
use progrmobil_domain::error::ProgrMobilError;
use progrmobil_domain::filter::{Filter, Where};
use progrmobil_domain::id::AlumnoId;

/// Repository for persisting and querying [`Alumno`]s.
///
/// Lookups by identifier report absence as `None`/`false`; turning that into
/// a not-found error is the service's job.
pub trait AlumnoRepository {
    /// Insert a new alumno and return it with its assigned identifier.
    fn create(
        &self,
        alumno: NewAlumno,
    ) -> impl Future<Output = Result<Alumno, ProgrMobilError>> + Send;

    /// Count alumnos matching `predicate`, or all of them.
    fn count(
        &self,
        predicate: Option<Where>,
    ) -> impl Future<Output = Result<u64, ProgrMobilError>> + Send;

    /// Find alumnos matching `filter`, ordered by the filter's order
    /// (identifier ascending when none is given).
    fn find(&self, filter: Filter)
    -> impl Future<Output = Result<Vec<Alumno>, ProgrMobilError>> + Send;

    /// Get an alumno by its unique identifier.
    fn get_by_id(
        &self,
        id: AlumnoId,
    ) -> impl Future<Output = Result<Option<Alumno>, ProgrMobilError>> + Send;

    /// Apply `patch` to every alumno matching `predicate` (or all of them)
    /// and return how many matched.
    fn update_all(
        &self,
        patch: AlumnoPatch,
        predicate: Option<Where>,
    ) -> impl Future<Output = Result<u64, ProgrMobilError>> + Send;

    /// Apply `patch` to one alumno. Returns `false` when it does not exist.
    fn update_by_id(
        &self,
        id: AlumnoId,
        patch: AlumnoPatch,
    ) -> impl Future<Output = Result<bool, ProgrMobilError>> + Send;

    /// Overwrite every property but the identifier. Returns `false` when the
    /// alumno does not exist.
    fn replace_by_id(
        &self,
        id: AlumnoId,
        alumno: NewAlumno,
    ) -> impl Future<Output = Result<bool, ProgrMobilError>> + Send;

    /// Delete an alumno. Returns `false` when it does not exist.
    fn delete_by_id(&self, id: AlumnoId)
    -> impl Future<Output = Result<bool, ProgrMobilError>> + Send;
}
