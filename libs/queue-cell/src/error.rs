use thiserror::Error;

use doctor_cell::{DoctorId, DoctorUnavailable};
use shared_database::DatabaseError;
use shared_models::AppError;

use crate::models::QueueEntryId;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Queue entry with ID {0} not found")]
    NotFound(QueueEntryId),

    #[error("Doctor with ID {0} not found")]
    DoctorNotFound(DoctorId),

    #[error(transparent)]
    DoctorUnavailable(#[from] DoctorUnavailable),

    #[error("Invalid queue status '{0}', expected one of: waiting, with doctor, completed")]
    InvalidStatus(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<QueueError> for AppError {
    fn from(error: QueueError) -> Self {
        match error {
            QueueError::NotFound(_) | QueueError::DoctorNotFound(_) => AppError::NotFound(error.to_string()),
            QueueError::DoctorUnavailable(_) => AppError::Conflict(error.to_string()),
            QueueError::InvalidStatus(_) => AppError::BadRequest(error.to_string()),
            QueueError::ValidationError(_) => AppError::ValidationError(error.to_string()),
            QueueError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}
