//! `SQLite` implementation of [`AlumnoRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Row, Sqlite, SqlitePool};

use progrmobil_app::ports::AlumnoRepository;
use progrmobil_domain::alumno::{Alumno, AlumnoPatch, NewAlumno};
use progrmobil_domain::error::ProgrMobilError;
use progrmobil_domain::filter::{Filter, Where};
use progrmobil_domain::id::AlumnoId;

use crate::error::StorageError;
use crate::query;

/// Wrapper for converting database rows into domain [`Alumno`].
struct Wrapper(Alumno);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Alumno> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Alumno {
            id_alumno: AlumnoId::new(row.try_get("id_alumno")?),
            name: row.try_get("name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            active: row.try_get("active")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO alumnos (name, last_name, email, active) VALUES (?, ?, ?, ?) \
                      RETURNING id_alumno, name, last_name, email, active";
const SELECT: &str = "SELECT id_alumno, name, last_name, email, active FROM alumnos";
const SELECT_BY_ID: &str =
    "SELECT id_alumno, name, last_name, email, active FROM alumnos WHERE id_alumno = ?";
const EXISTS_BY_ID: &str = "SELECT EXISTS(SELECT 1 FROM alumnos WHERE id_alumno = ?)";
const COUNT: &str = "SELECT COUNT(*) FROM alumnos";
const REPLACE: &str =
    "UPDATE alumnos SET name = ?, last_name = ?, email = ?, active = ? WHERE id_alumno = ?";
const DELETE_BY_ID: &str = "DELETE FROM alumnos WHERE id_alumno = ?";

/// `SQLite`-backed alumno repository.
pub struct SqliteAlumnoRepository {
    pool: SqlitePool,
}

impl SqliteAlumnoRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn count_matching(
    pool: &SqlitePool,
    predicate: Option<&Where>,
) -> Result<u64, ProgrMobilError> {
    let mut builder = QueryBuilder::<Sqlite>::new(COUNT);
    query::push_where_clause(&mut builder, predicate);
    let count: i64 = builder
        .build_query_scalar()
        .fetch_one(pool)
        .await
        .map_err(StorageError::from)?;
    Ok(u64::try_from(count).unwrap_or_default())
}

impl AlumnoRepository for SqliteAlumnoRepository {
    fn create(
        &self,
        alumno: NewAlumno,
    ) -> impl Future<Output = Result<Alumno, ProgrMobilError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Wrapper = sqlx::query_as(INSERT)
                .bind(alumno.name)
                .bind(alumno.last_name)
                .bind(alumno.email)
                .bind(alumno.active)
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.0)
        }
    }

    fn count(
        &self,
        predicate: Option<Where>,
    ) -> impl Future<Output = Result<u64, ProgrMobilError>> + Send {
        let pool = self.pool.clone();
        async move { count_matching(&pool, predicate.as_ref()).await }
    }

    fn find(
        &self,
        filter: Filter,
    ) -> impl Future<Output = Result<Vec<Alumno>, ProgrMobilError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut builder = QueryBuilder::<Sqlite>::new(SELECT);
            query::push_where_clause(&mut builder, filter.predicate.as_ref());
            query::push_order(&mut builder, &filter.order);
            query::push_pagination(&mut builder, filter.limit, filter.skip);

            let rows: Vec<Wrapper> = builder
                .build_query_as()
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn get_by_id(
        &self,
        id: AlumnoId,
    ) -> impl Future<Output = Result<Option<Alumno>, ProgrMobilError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.as_i64())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn update_all(
        &self,
        patch: AlumnoPatch,
        predicate: Option<Where>,
    ) -> impl Future<Output = Result<u64, ProgrMobilError>> + Send {
        let pool = self.pool.clone();
        async move {
            if patch.is_empty() {
                return count_matching(&pool, predicate.as_ref()).await;
            }

            let mut builder = QueryBuilder::<Sqlite>::new("UPDATE alumnos SET ");
            query::push_assignments(&mut builder, patch.assignments());
            query::push_where_clause(&mut builder, predicate.as_ref());

            let result = builder
                .build()
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected())
        }
    }

    fn update_by_id(
        &self,
        id: AlumnoId,
        patch: AlumnoPatch,
    ) -> impl Future<Output = Result<bool, ProgrMobilError>> + Send {
        let pool = self.pool.clone();
        async move {
            if patch.is_empty() {
                let exists: bool = sqlx::query_scalar(EXISTS_BY_ID)
                    .bind(id.as_i64())
                    .fetch_one(&pool)
                    .await
                    .map_err(StorageError::from)?;
                return Ok(exists);
            }

            let mut builder = QueryBuilder::<Sqlite>::new("UPDATE alumnos SET ");
            query::push_assignments(&mut builder, patch.assignments());
            builder
                .push(" WHERE ")
                .push(query::ID_COLUMN)
                .push(" = ")
                .push_bind(id.as_i64());

            let result = builder
                .build()
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }

    fn replace_by_id(
        &self,
        id: AlumnoId,
        alumno: NewAlumno,
    ) -> impl Future<Output = Result<bool, ProgrMobilError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(REPLACE)
                .bind(alumno.name)
                .bind(alumno.last_name)
                .bind(alumno.email)
                .bind(alumno.active)
                .bind(id.as_i64())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }

    fn delete_by_id(
        &self,
        id: AlumnoId,
    ) -> impl Future<Output = Result<bool, ProgrMobilError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_BY_ID)
                .bind(id.as_i64())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }
}
