use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{CreateQueueEntryRequest, QueueEntryId, QueueSearchQuery, UpdateQueueStatusRequest};
use crate::services::queue::QueueService;

#[axum::debug_handler]
pub async fn create_queue_entry(
    State(service): State<Arc<QueueService>>,
    Json(request): Json<CreateQueueEntryRequest>,
) -> Result<Json<Value>, AppError> {
    let entry = service.create_queue_entry(request).await?;

    Ok(Json(json!(entry)))
}

#[axum::debug_handler]
pub async fn list_queue_entries(
    State(service): State<Arc<QueueService>>,
    Query(query): Query<QueueSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let entries = service.search_queue_entries(&query).await?;

    Ok(Json(json!({
        "queue": entries,
        "total": entries.len()
    })))
}

#[axum::debug_handler]
pub async fn get_queue_entry(
    State(service): State<Arc<QueueService>>,
    Path(entry_id): Path<QueueEntryId>,
) -> Result<Json<Value>, AppError> {
    let entry = service.get_queue_entry(entry_id).await?;

    Ok(Json(json!(entry)))
}

#[axum::debug_handler]
pub async fn update_queue_status(
    State(service): State<Arc<QueueService>>,
    Path(entry_id): Path<QueueEntryId>,
    Json(request): Json<UpdateQueueStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let entry = service.update_queue_status(entry_id, &request.status).await?;

    Ok(Json(json!(entry)))
}

#[axum::debug_handler]
pub async fn remove_queue_entry(
    State(service): State<Arc<QueueService>>,
    Path(entry_id): Path<QueueEntryId>,
) -> Result<Json<Value>, AppError> {
    service.remove_queue_entry(entry_id).await?;

    Ok(Json(json!({
        "message": format!("Queue entry with ID {} has been deleted", entry_id)
    })))
}
