use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{
    AppointmentId, AppointmentSearchQuery, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::services::scheduler::AppointmentScheduler;

#[axum::debug_handler]
pub async fn create_appointment(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = scheduler.create_appointment(request).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Query(query): Query<AppointmentSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = scheduler.search_appointments(&query).await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Path(appointment_id): Path<AppointmentId>,
) -> Result<Json<Value>, AppError> {
    let appointment = scheduler.get_appointment(appointment_id).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Path(appointment_id): Path<AppointmentId>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = scheduler.update_appointment(appointment_id, request).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn remove_appointment(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Path(appointment_id): Path<AppointmentId>,
) -> Result<Json<Value>, AppError> {
    scheduler.remove_appointment(appointment_id).await?;

    Ok(Json(json!({
        "message": format!("Appointment with ID {} has been deleted", appointment_id)
    })))
}
