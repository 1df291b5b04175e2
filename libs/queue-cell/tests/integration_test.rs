use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use doctor_cell::{DoctorRepository, InMemoryDoctorRepository, NewDoctor};
use queue_cell::router::queue_routes;
use queue_cell::{InMemoryQueueRepository, QueueService};
use shared_utils::test_utils::{test_time, FixedClock};

async fn create_test_app(clinic_time: &str) -> Router {
    let doctors = Arc::new(InMemoryDoctorRepository::new());
    doctors
        .insert_doctor(NewDoctor {
            name: "Dr. Lee".to_string(),
            specialization: "Pediatrics".to_string(),
            gender: "male".to_string(),
            location: "Room 2".to_string(),
            available_from: test_time("09:00"),
            available_to: test_time("17:00"),
        })
        .await
        .unwrap();

    let service = QueueService::new(
        doctors,
        Arc::new(InMemoryQueueRepository::new()),
        FixedClock::shared("2024-01-01", clinic_time),
    );
    queue_routes(Arc::new(service))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

#[tokio::test]
async fn test_join_queue() {
    let app = create_test_app("09:00").await;

    let (status, first) = send(&app, "POST", "/", Some(json!({ "patient_name": "Jane Doe", "doctor_id": 1 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["queue_number"], 1);
    assert_eq!(first["status"], "waiting");

    let (_, second) = send(&app, "POST", "/", Some(json!({ "patient_name": "John Doe", "doctor_id": 1 }))).await;
    assert_eq!(second["queue_number"], 2);

    let (status, listing) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["total"], 2);
    assert_eq!(listing["queue"][0]["patient_name"], "Jane Doe");
}

#[tokio::test]
async fn test_join_queue_before_hours_is_conflict() {
    let app = create_test_app("08:59").await;

    let (status, body) = send(&app, "POST", "/", Some(json!({ "patient_name": "Jane Doe", "doctor_id": 1 }))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("08:59"));
}

#[tokio::test]
async fn test_join_queue_for_unknown_doctor() {
    let app = create_test_app("10:00").await;

    let (status, body) = send(&app, "POST", "/", Some(json!({ "patient_name": "Jane Doe", "doctor_id": 3 }))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Doctor with ID 3 not found");
}

#[tokio::test]
async fn test_patch_status() {
    let app = create_test_app("10:00").await;
    send(&app, "POST", "/", Some(json!({ "patient_name": "Jane Doe", "doctor_id": 1 }))).await;

    let (status, updated) = send(&app, "PATCH", "/1", Some(json!({ "status": "with doctor" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "with doctor");
    assert_eq!(updated["queue_number"], 1);

    let (status, _) = send(&app, "PATCH", "/1", Some(json!({ "status": "seen" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PATCH", "/9", Some(json!({ "status": "completed" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, filtered) = send(&app, "GET", "/?status=with%20doctor", None).await;
    assert_eq!(filtered["total"], 1);
}

#[tokio::test]
async fn test_delete_entry_twice() {
    let app = create_test_app("10:00").await;
    send(&app, "POST", "/", Some(json!({ "patient_name": "Jane Doe", "doctor_id": 1 }))).await;

    let (status, body) = send(&app, "DELETE", "/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Queue entry with ID 1 has been deleted");

    let (status, body) = send(&app, "DELETE", "/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Queue entry with ID 1 not found");
}
