use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use eticket_server::routes::create_routes;
use eticket_server::store::{TicketStore, MIGRATOR};
use eticket_server::tickets::TicketService;

async fn setup_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    MIGRATOR.run(&pool).await.expect("failed to run migrations");

    create_routes(TicketService::new(TicketStore::new(pool)))
}

fn demo_body() -> Value {
    json!({
        "ticket_id": "DEMO123",
        "passenger_name": "John Doe",
        "travel_date": "2024-01-15",
        "travel_time": "14:30",
        "origin": "New York",
        "destination": "Boston",
        "seat_number": "12A",
        "booking_reference": "ABC123XYZ"
    })
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn create_wraps_record_in_success_envelope() {
    let app = setup_app().await;

    let response = app
        .oneshot(json_request("POST", "/tickets", &demo_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["ticket_id"], json!("DEMO123"));
    assert_eq!(body["data"]["travel_date"], json!("2024-01-15"));
    assert_eq!(body["data"]["qr_code_data"], json!("TICKET:DEMO123:ABC123XYZ"));
}

#[tokio::test]
async fn missing_field_in_body_gets_validation_error_envelope() {
    let app = setup_app().await;

    let mut body = demo_body();
    body.as_object_mut().unwrap().remove("passenger_name");

    let response = app
        .oneshot(json_request("POST", "/tickets", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn unparseable_travel_date_gets_validation_error_envelope() {
    let app = setup_app().await;

    let mut body = demo_body();
    body["travel_date"] = json!("not-a-date");

    let response = app
        .oneshot(json_request("POST", "/tickets", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn field_rule_failure_names_the_field_in_details() {
    let app = setup_app().await;

    let mut body = demo_body();
    body["origin"] = json!("");

    let response = app
        .oneshot(json_request("POST", "/tickets", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
    assert_eq!(body["error"]["details"]["field"], json!("origin"));
    assert_eq!(body["error"]["details"]["rule"], json!("is required"));
}

#[tokio::test]
async fn malformed_patch_body_gets_validation_error_envelope() {
    let app = setup_app().await;

    app.clone()
        .oneshot(json_request("POST", "/tickets", &demo_body()))
        .await
        .unwrap();

    // travel_time must be a string
    let patch = json!({ "travel_time": 1430 });
    let response = app
        .oneshot(json_request("PATCH", "/tickets/1", &patch))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn duplicate_create_gets_conflict_envelope() {
    let app = setup_app().await;

    app.clone()
        .oneshot(json_request("POST", "/tickets", &demo_body()))
        .await
        .unwrap();
    let response = app
        .oneshot(json_request("POST", "/tickets", &demo_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("CONFLICT"));
}

#[tokio::test]
async fn missing_ticket_lookup_returns_null_data_with_200() {
    let app = setup_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/tickets/MISSING")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert!(body["data"].is_null());
}
