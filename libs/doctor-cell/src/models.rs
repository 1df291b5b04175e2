use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::{DatabaseError, RecordId};
use shared_models::AppError;
use shared_utils::time::hhmm;

use crate::services::availability::DoctorUnavailable;

pub type DoctorId = RecordId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub specialization: String,
    pub gender: String,
    pub location: String,
    #[serde(with = "hhmm")]
    pub available_from: NaiveTime,
    #[serde(with = "hhmm")]
    pub available_to: NaiveTime,
}

impl Doctor {
    pub fn ensure_available_at(&self, time: NaiveTime) -> Result<(), DoctorUnavailable> {
        crate::services::availability::check_availability(self, time)
    }
}

/// A validated doctor record that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDoctor {
    pub name: String,
    pub specialization: String,
    pub gender: String,
    pub location: String,
    pub available_from: NaiveTime,
    pub available_to: NaiveTime,
}

impl NewDoctor {
    pub fn with_id(self, id: DoctorId) -> Doctor {
        Doctor {
            id,
            name: self.name,
            specialization: self.specialization,
            gender: self.gender,
            location: self.location,
            available_from: self.available_from,
            available_to: self.available_to,
        }
    }
}

/// Validated field changes for a stored doctor. Fields left `None` keep
/// whatever value is stored when the change is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorChanges {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub available_from: Option<NaiveTime>,
    pub available_to: Option<NaiveTime>,
}

impl DoctorChanges {
    pub fn apply_to(&self, doctor: &mut Doctor) {
        if let Some(name) = &self.name {
            doctor.name = name.clone();
        }
        if let Some(specialization) = &self.specialization {
            doctor.specialization = specialization.clone();
        }
        if let Some(gender) = &self.gender {
            doctor.gender = gender.clone();
        }
        if let Some(location) = &self.location {
            doctor.location = location.clone();
        }
        if let Some(available_from) = self.available_from {
            doctor.available_from = available_from;
        }
        if let Some(available_to) = self.available_to {
            doctor.available_to = available_to;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialization: String,
    pub gender: String,
    pub location: String,
    #[serde(with = "hhmm")]
    pub available_from: NaiveTime,
    #[serde(with = "hhmm")]
    pub available_to: NaiveTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub gender: Option<String>,
    pub location: Option<String>,
    #[serde(default, with = "hhmm::option")]
    pub available_from: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    pub available_to: Option<NaiveTime>,
}

/// Read-side doctor filters. Text fields match case-insensitive substrings,
/// window bounds match exactly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorSearchFilters {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub location: Option<String>,
    pub gender: Option<String>,
    #[serde(default, with = "hhmm::option")]
    pub available_from: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    pub available_to: Option<NaiveTime>,
}

impl DoctorSearchFilters {
    pub fn matches(&self, doctor: &Doctor) -> bool {
        contains_ignore_case(&doctor.name, self.name.as_deref())
            && contains_ignore_case(&doctor.specialization, self.specialization.as_deref())
            && contains_ignore_case(&doctor.location, self.location.as_deref())
            && self
                .gender
                .as_deref()
                .map_or(true, |gender| doctor.gender.eq_ignore_ascii_case(gender.trim()))
            && self.available_from.map_or(true, |from| doctor.available_from == from)
            && self.available_to.map_or(true, |to| doctor.available_to == to)
    }
}

/// Case-insensitive substring match; an absent or blank needle matches anything.
pub fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle.map(str::trim) {
        None | Some("") => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor with ID {0} not found")]
    NotFound(DoctorId),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<DoctorError> for AppError {
    fn from(error: DoctorError) -> Self {
        match error {
            DoctorError::NotFound(_) => AppError::NotFound(error.to_string()),
            DoctorError::ValidationError(_) => AppError::ValidationError(error.to_string()),
            DoctorError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}
