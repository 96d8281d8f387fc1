//! Shared application state for axum handlers.

use std::sync::Arc;

use progrmobil_app::ports::AlumnoRepository;
use progrmobil_app::services::alumno_service::AlumnoService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository type to avoid dynamic dispatch.
/// `Clone` is implemented manually so the repository itself does not
/// need to be `Clone`; only the `Arc` wrapper is cloned.
pub struct AppState<R> {
    /// Alumno CRUD service.
    pub alumno_service: Arc<AlumnoService<R>>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            alumno_service: Arc::clone(&self.alumno_service),
        }
    }
}

impl<R> AppState<R>
where
    R: AlumnoRepository + Send + Sync + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(alumno_service: AlumnoService<R>) -> Self {
        Self {
            alumno_service: Arc::new(alumno_service),
        }
    }
}
