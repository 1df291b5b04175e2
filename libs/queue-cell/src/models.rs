use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use doctor_cell::DoctorId;
use shared_database::RecordId;

use crate::error::QueueError;

pub type QueueEntryId = RecordId;

/// A walk-in patient waiting for a specific doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: QueueEntryId,
    pub patient_name: String,
    pub doctor_id: DoctorId,
    /// Position in the doctor's queue, starting at 1. Never reassigned.
    pub queue_number: i32,
    pub status: QueueStatus,
    pub created_at: DateTime<Utc>,
}

impl QueueEntry {
    pub fn arrival_key(&self) -> (DateTime<Utc>, QueueEntryId) {
        (self.created_at, self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    Waiting,
    #[serde(rename = "with doctor")]
    WithDoctor,
    Completed,
}

impl QueueStatus {
    pub const ALL: [QueueStatus; 3] = [QueueStatus::Waiting, QueueStatus::WithDoctor, QueueStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Waiting => "waiting",
            QueueStatus::WithDoctor => "with doctor",
            QueueStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueStatus {
    type Err = QueueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| QueueError::InvalidStatus(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQueueEntry {
    pub patient_name: String,
    pub doctor_id: DoctorId,
    pub queue_number: i32,
    pub status: QueueStatus,
    pub created_at: DateTime<Utc>,
}

impl NewQueueEntry {
    pub fn with_id(self, id: QueueEntryId) -> QueueEntry {
        QueueEntry {
            id,
            patient_name: self.patient_name,
            doctor_id: self.doctor_id,
            queue_number: self.queue_number,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQueueEntryRequest {
    pub patient_name: String,
    pub doctor_id: DoctorId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQueueStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueSearchQuery {
    pub patient_name: Option<String>,
    pub doctor_id: Option<DoctorId>,
    pub status: Option<String>,
}
