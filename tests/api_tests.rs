use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["service"], "matatu-fleet");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_check_in_uses_envelope_and_201() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/matatus/KBX123A/check-in")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], 1);
    assert_eq!(body["message"], "Matatu checked in successfully");
    assert_eq!(body["data"]["stage_name"], "Town");
    assert_eq!(body["data"]["trip_number"], 1);
}

#[tokio::test]
async fn test_failure_envelope_keeps_shape() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/matatus/UNKNOWN/check-in-missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], 0);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/matatus/KBX123A/check-in")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// Router de test con el mismo contrato de envelope que la app real
fn create_test_app() -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async {
                Json(json!({
                    "status": "ok",
                    "service": "matatu-fleet",
                }))
            }),
        )
        .route(
            "/api/matatus/:plate/check-in",
            post(|| async {
                (
                    StatusCode::CREATED,
                    Json(json!({
                        "status": 1,
                        "message": "Matatu checked in successfully",
                        "data": {
                            "plate_number": "KBX123A",
                            "stage_name": "Town",
                            "trip_number": 1,
                            "check_out_time": null,
                        },
                    })),
                )
            }),
        )
        .route(
            "/api/matatus/:plate/check-in-missing",
            post(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "status": 0,
                        "message": "Matatu not found with plate number: UNKNOWN",
                        "data": null,
                    })),
                )
            }),
        )
}
