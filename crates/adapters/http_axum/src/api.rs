//! JSON REST API handler modules and the route table.

#[allow(clippy::missing_errors_doc)]
pub mod alumnos;

use axum::Router;
use axum::routing::get;

use progrmobil_app::ports::AlumnoRepository;

use crate::state::AppState;

/// Build the alumno API router.
///
/// `/alumnos/count` is a static segment and takes precedence over
/// `/alumnos/{id}`, so the by-id methods are answered there with an invalid
/// id error.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: AlumnoRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/alumnos",
            get(alumnos::find::<R>)
                .post(alumnos::create::<R>)
                .patch(alumnos::update_all::<R>),
        )
        .route(
            "/alumnos/count",
            get(alumnos::count::<R>)
                .patch(alumnos::count_as_id)
                .put(alumnos::count_as_id)
                .delete(alumnos::count_as_id),
        )
        .route(
            "/alumnos/{id}",
            get(alumnos::find_by_id::<R>)
                .patch(alumnos::update_by_id::<R>)
                .put(alumnos::replace_by_id::<R>)
                .delete(alumnos::delete_by_id::<R>),
        )
}
