// libs/appointment-cell/src/models.rs
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use doctor_cell::{DoctorId, DoctorUnavailable};
use shared_database::{DatabaseError, RecordId};
use shared_models::AppError;
use shared_utils::time::hhmm;

pub type AppointmentId = RecordId;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_name: String,
    pub doctor_id: DoctorId,
    pub appointment_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub appointment_time: NaiveTime,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Sort key for the schedule: earliest date first, then earliest time.
    pub fn schedule_key(&self) -> (NaiveDate, NaiveTime, AppointmentId) {
        (self.appointment_date, self.appointment_time, self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Booked,
    Completed,
    Canceled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Booked,
        AppointmentStatus::Completed,
        AppointmentStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "booked",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppointmentError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| AppointmentError::InvalidStatus(raw.to_string()))
    }
}

/// A validated appointment that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient_name: String,
    pub doctor_id: DoctorId,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl NewAppointment {
    pub fn with_id(self, id: AppointmentId) -> Appointment {
        Appointment {
            id,
            patient_name: self.patient_name,
            doctor_id: self.doctor_id,
            appointment_date: self.appointment_date,
            appointment_time: self.appointment_time,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Validated field changes for a stored appointment. Fields left `None` keep
/// whatever value is stored when the change is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppointmentChanges {
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<NaiveTime>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentChanges {
    pub fn apply_to(&self, appointment: &mut Appointment) {
        if let Some(date) = self.appointment_date {
            appointment.appointment_date = date;
        }
        if let Some(time) = self.appointment_time {
            appointment.appointment_time = time;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_name: String,
    pub doctor_id: DoctorId,
    pub appointment_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub appointment_time: NaiveTime,
}

/// Partial update. `status` stays a raw string so an unknown value surfaces
/// as [`AppointmentError::InvalidStatus`] instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub appointment_date: Option<NaiveDate>,
    #[serde(default, with = "hhmm::option")]
    pub appointment_time: Option<NaiveTime>,
    pub status: Option<String>,
}

impl UpdateAppointmentRequest {
    pub fn changes_schedule(&self) -> bool {
        self.appointment_date.is_some() || self.appointment_time.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentSearchQuery {
    pub patient_name: Option<String>,
    pub doctor_id: Option<DoctorId>,
    pub doctor_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment with ID {0} not found")]
    NotFound(AppointmentId),

    #[error("Doctor with ID {0} not found")]
    DoctorNotFound(DoctorId),

    #[error(transparent)]
    DoctorUnavailable(#[from] DoctorUnavailable),

    #[error("Invalid appointment status '{0}', expected one of: booked, completed, canceled")]
    InvalidStatus(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<AppointmentError> for AppError {
    fn from(error: AppointmentError) -> Self {
        match error {
            AppointmentError::NotFound(_) | AppointmentError::DoctorNotFound(_) => {
                AppError::NotFound(error.to_string())
            }
            AppointmentError::DoctorUnavailable(_) => AppError::Conflict(error.to_string()),
            AppointmentError::InvalidStatus(_) => AppError::BadRequest(error.to_string()),
            AppointmentError::ValidationError(_) => AppError::ValidationError(error.to_string()),
            AppointmentError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}
