//! JSON REST handlers for alumnos.
//!
//! Bodies are taken as raw JSON and checked against the alumno schema at the
//! top of each handler, so unknown, mistyped and server-assigned properties
//! are reported before the service runs. Query strings are closed too: a key
//! other than `filter` or `where` (bracket notation included) is refused
//! rather than read as "no filter".

use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use progrmobil_app::ports::AlumnoRepository;
use progrmobil_domain::alumno::{Alumno, AlumnoPatch, NewAlumno, SCHEMA};
use progrmobil_domain::error::{FilterError, PayloadError, ValidationError};
use progrmobil_domain::filter::{Filter, Projection, Where};
use progrmobil_domain::id::AlumnoId;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string of the find endpoints: a JSON-encoded filter.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterQuery {
    pub filter: Option<String>,
}

/// Query string of the count and bulk update endpoints: a JSON-encoded
/// predicate.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WhereQuery {
    #[serde(rename = "where")]
    pub predicate: Option<String>,
}

/// Body of the count and bulk update endpoints.
#[derive(Debug, Serialize)]
pub struct CountBody {
    pub count: u64,
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Ok(Json<Alumno>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the count and bulk update endpoints.
pub enum CountResponse {
    Ok(Json<CountBody>),
}

impl IntoResponse for CountResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the find endpoint.
pub enum FindResponse {
    Ok(Json<Vec<Value>>),
}

impl IntoResponse for FindResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the find-by-id endpoint.
pub enum FindByIdResponse {
    Ok(Json<Value>),
}

impl IntoResponse for FindByIdResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the update, replace and delete endpoints.
pub enum NoContentResponse {
    NoContent,
}

impl IntoResponse for NoContentResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

fn parse_id(raw: &str) -> Result<AlumnoId, ValidationError> {
    AlumnoId::from_str(raw).map_err(|_| ValidationError::InvalidId(raw.to_string()))
}

fn read_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ValidationError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| PayloadError::Malformed(rejection.body_text()).into())
}

fn read_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ValidationError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| FilterError::Malformed(rejection.body_text()).into())
}

fn parse_where(query: &WhereQuery) -> Result<Option<Where>, ValidationError> {
    query
        .predicate
        .as_deref()
        .map(|raw| Where::from_query(&SCHEMA, raw))
        .transpose()
        .map_err(ValidationError::from)
}

fn project(projection: Option<&Projection>, alumno: &Alumno) -> Value {
    let object = match projection {
        Some(projection) => projection.project(alumno),
        None => Projection::all(&SCHEMA).project(alumno),
    };
    Value::Object(object)
}

/// `POST /alumnos`
pub async fn create<R>(
    State(state): State<AppState<R>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    R: AlumnoRepository + Send + Sync + 'static,
{
    let alumno = NewAlumno::from_json(&read_body(body)?)?;
    let created = state.alumno_service.create_alumno(alumno).await?;
    Ok(CreateResponse::Ok(Json(created)))
}

/// `GET /alumnos/count`
pub async fn count<R>(
    State(state): State<AppState<R>>,
    query: Result<Query<WhereQuery>, QueryRejection>,
) -> Result<CountResponse, ApiError>
where
    R: AlumnoRepository + Send + Sync + 'static,
{
    let predicate = parse_where(&read_query(query)?)?;
    let count = state.alumno_service.count_alumnos(predicate).await?;
    Ok(CountResponse::Ok(Json(CountBody { count })))
}

/// `GET /alumnos`
pub async fn find<R>(
    State(state): State<AppState<R>>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<FindResponse, ApiError>
where
    R: AlumnoRepository + Send + Sync + 'static,
{
    let filter = match read_query(query)?.filter.as_deref() {
        Some(raw) => Filter::from_query(&SCHEMA, raw).map_err(ValidationError::from)?,
        None => Filter::default(),
    };
    let projection = filter.fields.clone();
    let alumnos = state.alumno_service.find_alumnos(filter).await?;
    let body = alumnos
        .iter()
        .map(|alumno| project(projection.as_ref(), alumno))
        .collect();
    Ok(FindResponse::Ok(Json(body)))
}

/// `PATCH /alumnos`
pub async fn update_all<R>(
    State(state): State<AppState<R>>,
    query: Result<Query<WhereQuery>, QueryRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<CountResponse, ApiError>
where
    R: AlumnoRepository + Send + Sync + 'static,
{
    let predicate = parse_where(&read_query(query)?)?;
    let patch = AlumnoPatch::from_json(&read_body(body)?)?;
    let count = state
        .alumno_service
        .update_all_alumnos(patch, predicate)
        .await?;
    Ok(CountResponse::Ok(Json(CountBody { count })))
}

/// `GET /alumnos/{id}`
pub async fn find_by_id<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<FindByIdResponse, ApiError>
where
    R: AlumnoRepository + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let filter = match read_query(query)?.filter.as_deref() {
        Some(raw) => {
            Filter::from_query_excluding_where(&SCHEMA, raw).map_err(ValidationError::from)?
        }
        None => Filter::default(),
    };
    let alumno = state.alumno_service.find_alumno_by_id(id).await?;
    Ok(FindByIdResponse::Ok(Json(project(
        filter.fields.as_ref(),
        &alumno,
    ))))
}

/// `PATCH /alumnos/{id}`
pub async fn update_by_id<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<NoContentResponse, ApiError>
where
    R: AlumnoRepository + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let patch = AlumnoPatch::for_id(id, &read_body(body)?)?;
    state.alumno_service.update_alumno_by_id(id, patch).await?;
    Ok(NoContentResponse::NoContent)
}

/// `PUT /alumnos/{id}`
pub async fn replace_by_id<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<NoContentResponse, ApiError>
where
    R: AlumnoRepository + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let alumno = NewAlumno::from_replacement(id, &read_body(body)?)?;
    state.alumno_service.replace_alumno_by_id(id, alumno).await?;
    Ok(NoContentResponse::NoContent)
}

/// `PATCH`, `PUT` and `DELETE` on `/alumnos/count`: `count` is not an id.
pub async fn count_as_id() -> ApiError {
    ValidationError::InvalidId("count".to_string()).into()
}

/// `DELETE /alumnos/{id}`
pub async fn delete_by_id<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<NoContentResponse, ApiError>
where
    R: AlumnoRepository + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    state.alumno_service.delete_alumno_by_id(id).await?;
    Ok(NoContentResponse::NoContent)
}
