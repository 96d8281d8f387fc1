//! Alumno service: the eight CRUD use-cases exposed over REST.

use progrmobil_domain::alumno::{Alumno, AlumnoPatch, NewAlumno};
use progrmobil_domain::error::{NotFoundError, ProgrMobilError};
use progrmobil_domain::filter::{Filter, Where};
use progrmobil_domain::id::AlumnoId;

use crate::ports::AlumnoRepository;

const ENTITY: &str = "Alumno";

/// Application service for alumno CRUD operations.
///
/// Stateless: every call is one round trip to the repository.
pub struct AlumnoService<R> {
    repo: R,
}

impl<R: AlumnoRepository> AlumnoService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new alumno after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ProgrMobilError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    pub async fn create_alumno(&self, alumno: NewAlumno) -> Result<Alumno, ProgrMobilError> {
        alumno.validate()?;
        let created = self.repo.create(alumno).await?;
        tracing::info!(id = %created.id_alumno, "alumno created");
        Ok(created)
    }

    /// Count alumnos matching `predicate`, or all of them.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count_alumnos(&self, predicate: Option<Where>) -> Result<u64, ProgrMobilError> {
        self.repo.count(predicate).await
    }

    /// Find alumnos matching `filter`. No match is an empty list.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn find_alumnos(&self, filter: Filter) -> Result<Vec<Alumno>, ProgrMobilError> {
        let alumnos = self.repo.find(filter).await?;
        tracing::debug!(count = alumnos.len(), "alumnos found");
        Ok(alumnos)
    }

    /// Look up an alumno by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`ProgrMobilError::NotFound`] when no alumno with `id` exists,
    /// or a storage error from the repository.
    pub async fn find_alumno_by_id(&self, id: AlumnoId) -> Result<Alumno, ProgrMobilError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Apply `patch` to every alumno matching `predicate` (or all of them).
    /// Reports zero when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`ProgrMobilError::Validation`] if the patch breaks an
    /// invariant, or a storage error from the repository.
    pub async fn update_all_alumnos(
        &self,
        patch: AlumnoPatch,
        predicate: Option<Where>,
    ) -> Result<u64, ProgrMobilError> {
        patch.validate()?;
        let count = self.repo.update_all(patch, predicate).await?;
        tracing::info!(count, "alumnos updated");
        Ok(count)
    }

    /// Apply a partial update to one alumno.
    ///
    /// # Errors
    ///
    /// Returns [`ProgrMobilError::NotFound`] when no alumno with `id` exists,
    /// [`ProgrMobilError::Validation`] if the patch breaks an invariant, or a
    /// storage error from the repository.
    pub async fn update_alumno_by_id(
        &self,
        id: AlumnoId,
        patch: AlumnoPatch,
    ) -> Result<(), ProgrMobilError> {
        patch.validate()?;
        if !self.repo.update_by_id(id, patch).await? {
            return Err(not_found(id));
        }
        tracing::info!(%id, "alumno updated");
        Ok(())
    }

    /// Overwrite every property of one alumno except its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProgrMobilError::NotFound`] when no alumno with `id` exists,
    /// [`ProgrMobilError::Validation`] if invariants fail, or a storage error
    /// from the repository.
    pub async fn replace_alumno_by_id(
        &self,
        id: AlumnoId,
        alumno: NewAlumno,
    ) -> Result<(), ProgrMobilError> {
        alumno.validate()?;
        if !self.repo.replace_by_id(id, alumno).await? {
            return Err(not_found(id));
        }
        tracing::info!(%id, "alumno replaced");
        Ok(())
    }

    /// Delete an alumno by id.
    ///
    /// # Errors
    ///
    /// Returns [`ProgrMobilError::NotFound`] when no alumno with `id` exists,
    /// or a storage error from the repository.
    pub async fn delete_alumno_by_id(&self, id: AlumnoId) -> Result<(), ProgrMobilError> {
        if !self.repo.delete_by_id(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(%id, "alumno deleted");
        Ok(())
    }
}

fn not_found(id: AlumnoId) -> ProgrMobilError {
    NotFoundError {
        entity: ENTITY,
        id: id.to_string(),
    }
    .into()
}
