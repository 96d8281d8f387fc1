//! End-to-end tests for the full progrmobild stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real repo,
//! real service, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot`; no TCP port is bound.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use progrmobil_adapter_http_axum::router;
use progrmobil_adapter_http_axum::state::AppState;
use progrmobil_adapter_storage_sqlite_sqlx::{Config, SqliteAlumnoRepository};
use progrmobil_app::services::alumno_service::AlumnoService;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Build a fully-wired router backed by an in-memory `SQLite` database.
async fn app() -> axum::Router {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");

    let repo = SqliteAlumnoRepository::new(db.pool().clone());
    router::build(AppState::new(AlumnoService::new(repo)))
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Percent-encode a JSON query parameter value.
fn encode(value: &Value) -> String {
    value
        .to_string()
        .bytes()
        .map(|byte| match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                char::from(byte).to_string()
            }
            other => format!("%{other:02X}"),
        })
        .collect()
}

async fn create(app: &axum::Router, body: Value) -> Value {
    let resp = send(app, "POST", "/alumnos", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    json_body(resp).await
}

async fn seed(app: &axum::Router) -> Vec<i64> {
    let mut ids = Vec::new();
    for body in [
        json!({"name": "Ana", "lastName": "Ruiz", "email": "ana@x.io"}),
        json!({"name": "Bea", "active": false}),
        json!({"name": "Ciro", "email": "ciro@x.io"}),
        json!({"name": "Dani", "lastName": "Vega"}),
    ] {
        ids.push(create(app, body).await["idAlumno"].as_i64().unwrap());
    }
    ids
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let app = app().await;
    let resp = send(&app, "GET", "/health", None).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_assign_identifier_and_defaults_on_create() {
    let app = app().await;
    let created = create(&app, json!({"name": "Ana"})).await;

    assert!(created["idAlumno"].is_i64());
    assert_eq!(created["name"], "Ana");
    assert_eq!(created["lastName"], Value::Null);
    assert_eq!(created["email"], Value::Null);
    assert_eq!(created["active"], true);
}

#[tokio::test]
async fn should_reject_invalid_create_payloads() {
    let app = app().await;
    for body in [
        json!({"idAlumno": 10, "name": "Ana"}),
        json!({}),
        json!({"name": ""}),
        json!({"name": null}),
        json!({"name": 42}),
        json!({"name": "Ana", "age": 20}),
        json!(["Ana"]),
    ] {
        let resp = send(&app, "POST", "/alumnos", Some(body.clone())).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "body {body}");
        assert!(json_body(resp).await["error"].is_string());
    }

    let count = json_body(send(&app, "GET", "/alumnos/count", None).await).await;
    assert_eq!(count, json!({"count": 0}));
}

// ---------------------------------------------------------------------------
// Find & count
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_find_as_many_alumnos_as_counted() {
    let app = app().await;
    seed(&app).await;

    let all = json_body(send(&app, "GET", "/alumnos", None).await).await;
    let count = json_body(send(&app, "GET", "/alumnos/count", None).await).await;

    assert_eq!(all.as_array().unwrap().len(), 4);
    assert_eq!(count["count"], 4);
}

#[tokio::test]
async fn should_list_in_identifier_order_by_default() {
    let app = app().await;
    let ids = seed(&app).await;

    let all = json_body(send(&app, "GET", "/alumnos", None).await).await;
    let listed: Vec<i64> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|alumno| alumno["idAlumno"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn should_filter_order_and_paginate() {
    let app = app().await;
    seed(&app).await;

    let filter = encode(&json!({
        "where": {"active": true},
        "order": "name DESC",
        "skip": 1,
        "limit": 1,
        "fields": ["name"]
    }));
    let resp = send(&app, "GET", &format!("/alumnos?filter={filter}"), None).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!([{"name": "Ciro"}]));
}

#[tokio::test]
async fn should_combine_operators_in_where() {
    let app = app().await;
    seed(&app).await;

    let filter = encode(&json!({
        "where": {"or": [{"email": null}, {"name": {"ilike": "c%"}}]},
        "fields": {"name": true}
    }));
    let resp = send(&app, "GET", &format!("/alumnos?filter={filter}"), None).await;

    assert_eq!(
        json_body(resp).await,
        json!([{"name": "Bea"}, {"name": "Ciro"}, {"name": "Dani"}])
    );
}

#[tokio::test]
async fn should_count_with_where() {
    let app = app().await;
    seed(&app).await;

    let predicate = encode(&json!({"lastName": {"neq": null}}));
    let resp = send(&app, "GET", &format!("/alumnos/count?where={predicate}"), None).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({"count": 2}));
}

#[tokio::test]
async fn should_return_empty_list_when_nothing_matches() {
    let app = app().await;
    seed(&app).await;

    let filter = encode(&json!({"where": {"name": "Zoe"}}));
    let resp = send(&app, "GET", &format!("/alumnos?filter={filter}"), None).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!([]));
}

#[tokio::test]
async fn should_reject_invalid_filters() {
    let app = app().await;
    for filter in [
        json!({"where": {"age": 20}}),
        json!({"where": {"name": {"regexp": "^A"}}}),
        json!({"where": {"active": {"like": "t%"}}}),
        json!({"order": "age DESC"}),
        json!({"include": ["courses"]}),
        json!({"limit": "ten"}),
        json!({"page": 2}),
    ] {
        let resp = send(&app, "GET", &format!("/alumnos?filter={}", encode(&filter)), None).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "filter {filter}");
    }
}

// ---------------------------------------------------------------------------
// Find by id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_find_alumno_by_id_with_projection() {
    let app = app().await;
    let ids = seed(&app).await;

    let filter = encode(&json!({"fields": {"email": false, "lastName": false}}));
    let resp = send(&app, "GET", &format!("/alumnos/{}?filter={filter}", ids[0]), None).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json_body(resp).await,
        json!({"idAlumno": ids[0], "name": "Ana", "active": true})
    );
}

#[tokio::test]
async fn should_return_not_found_when_alumno_missing() {
    let app = app().await;
    let resp = send(&app, "GET", "/alumnos/999", None).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(json_body(resp).await["error"].is_string());
}

#[tokio::test]
async fn should_return_bad_request_for_non_numeric_identifier() {
    let app = app().await;
    for method in ["GET", "DELETE"] {
        let resp = send(&app, method, "/alumnos/abc", None).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{method}");
    }
    for method in ["PATCH", "PUT"] {
        let resp = send(&app, method, "/alumnos/abc", Some(json!({"name": "X"}))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{method}");
    }
}

// ---------------------------------------------------------------------------
// Update, replace & delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_patch_only_given_fields() {
    let app = app().await;
    let ids = seed(&app).await;
    let uri = format!("/alumnos/{}", ids[0]);
    let before = json_body(send(&app, "GET", &uri, None).await).await;

    let resp = send(&app, "PATCH", &uri, Some(json!({"name": "X"}))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let after = json_body(send(&app, "GET", &uri, None).await).await;
    assert_eq!(after["name"], "X");
    assert_eq!(after["idAlumno"], before["idAlumno"]);
    assert_eq!(after["lastName"], before["lastName"]);
    assert_eq!(after["email"], before["email"]);
    assert_eq!(after["active"], before["active"]);
}

#[tokio::test]
async fn should_accept_matching_identifier_in_patch_body() {
    let app = app().await;
    let ids = seed(&app).await;
    let uri = format!("/alumnos/{}", ids[1]);

    let resp = send(&app, "PATCH", &uri, Some(json!({"idAlumno": ids[1], "email": "b@x.io"}))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "PATCH", &uri, Some(json!({"idAlumno": ids[0]}))).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn should_replace_every_field_but_the_identifier() {
    let app = app().await;
    let ids = seed(&app).await;
    let uri = format!("/alumnos/{}", ids[0]);

    let resp = send(&app, "PUT", &uri, Some(json!({"name": "Eva", "active": false}))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let after = json_body(send(&app, "GET", &uri, None).await).await;
    assert_eq!(
        after,
        json!({
            "idAlumno": ids[0],
            "name": "Eva",
            "lastName": null,
            "email": null,
            "active": false
        })
    );
}

#[tokio::test]
async fn should_reject_replace_without_required_name() {
    let app = app().await;
    let ids = seed(&app).await;

    let resp = send(
        &app,
        "PUT",
        &format!("/alumnos/{}", ids[0]),
        Some(json!({"email": "x@x.io"})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn should_return_not_found_when_modifying_missing_alumno() {
    let app = app().await;
    for (method, body) in [
        ("PATCH", Some(json!({"name": "X"}))),
        ("PUT", Some(json!({"name": "X"}))),
        ("DELETE", None),
    ] {
        let resp = send(&app, method, "/alumnos/404", body).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{method}");
    }
}

#[tokio::test]
async fn should_not_find_alumno_after_delete() {
    let app = app().await;
    let ids = seed(&app).await;
    let uri = format!("/alumnos/{}", ids[2]);

    let resp = send(&app, "DELETE", &uri, None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "GET", &uri, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let count = json_body(send(&app, "GET", "/alumnos/count", None).await).await;
    assert_eq!(count["count"], 3);
}

// ---------------------------------------------------------------------------
// Bulk update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_deactivate_all_active_alumnos() {
    let app = app().await;
    seed(&app).await;

    let predicate = encode(&json!({"active": true}));
    let resp = send(
        &app,
        "PATCH",
        &format!("/alumnos?where={predicate}"),
        Some(json!({"active": false})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({"count": 3}));

    let filter = encode(&json!({"where": {"active": true}}));
    let resp = send(&app, "GET", &format!("/alumnos?filter={filter}"), None).await;
    assert_eq!(json_body(resp).await, json!([]));
}

#[tokio::test]
async fn should_update_every_alumno_without_where() {
    let app = app().await;
    seed(&app).await;

    let resp = send(&app, "PATCH", "/alumnos", Some(json!({"lastName": null}))).await;
    assert_eq!(json_body(resp).await, json!({"count": 4}));

    let predicate = encode(&json!({"lastName": null}));
    let resp = send(&app, "GET", &format!("/alumnos/count?where={predicate}"), None).await;
    assert_eq!(json_body(resp).await, json!({"count": 4}));
}

#[tokio::test]
async fn should_reject_identifier_in_bulk_update() {
    let app = app().await;
    seed(&app).await;

    let resp = send(&app, "PATCH", "/alumnos", Some(json!({"idAlumno": 1, "active": false}))).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn should_refuse_bracket_notation_without_writing() {
    let app = app().await;
    seed(&app).await;

    let resp = send(
        &app,
        "PATCH",
        "/alumnos?where%5Bname%5D=Ana",
        Some(json!({"name": "Wiped"})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());

    let predicate = encode(&json!({"name": "Wiped"}));
    let resp = send(&app, "GET", &format!("/alumnos/count?where={predicate}"), None).await;
    assert_eq!(json_body(resp).await, json!({"count": 0}));

    let resp = send(&app, "GET", "/alumnos?filter%5Bwhere%5D%5Bname%5D=Ana", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_leave_records_alone_when_count_is_used_as_identifier() {
    let app = app().await;
    seed(&app).await;

    let resp = send(&app, "DELETE", "/alumnos/count", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());

    let resp = send(&app, "GET", "/alumnos/count", None).await;
    assert_eq!(json_body(resp).await, json!({"count": 4}));
}
