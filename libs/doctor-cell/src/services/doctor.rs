use std::sync::Arc;

use chrono::NaiveTime;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::{
    CreateDoctorRequest, Doctor, DoctorChanges, DoctorError, DoctorId, DoctorSearchFilters,
    NewDoctor, UpdateDoctorRequest,
};
use crate::repository::DoctorRepository;
use crate::services::availability::is_valid_window;

pub struct DoctorService {
    repository: Arc<dyn DoctorRepository>,
    // Held from reading a doctor until its update is written.
    updates: Mutex<()>,
}

impl DoctorService {
    pub fn new(repository: Arc<dyn DoctorRepository>) -> Self {
        Self {
            repository,
            updates: Mutex::new(()),
        }
    }

    pub fn repository(&self) -> Arc<dyn DoctorRepository> {
        Arc::clone(&self.repository)
    }

    /// Register a doctor in the directory.
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        debug!("Creating doctor profile for: {}", request.name);

        let new_doctor = NewDoctor {
            name: required("name", &request.name)?,
            specialization: required("specialization", &request.specialization)?,
            gender: required("gender", &request.gender)?,
            location: required("location", &request.location)?,
            available_from: request.available_from,
            available_to: request.available_to,
        };
        validate_window(new_doctor.available_from, new_doctor.available_to)?;

        let doctor = self.repository.insert_doctor(new_doctor).await?;
        info!("Doctor created with ID: {}", doctor.id);

        Ok(doctor)
    }

    pub async fn get_doctor(&self, doctor_id: DoctorId) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor: {}", doctor_id);

        self.repository
            .get_doctor_by_id(doctor_id)
            .await?
            .ok_or(DoctorError::NotFound(doctor_id))
    }

    /// Apply a partial update. The window that results from merging the
    /// request with the stored doctor is validated before anything is written.
    pub async fn update_doctor(
        &self,
        doctor_id: DoctorId,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, DoctorError> {
        debug!("Updating doctor: {}", doctor_id);

        let _guard = self.updates.lock().await;
        let current = self.get_doctor(doctor_id).await?;

        let changes = DoctorChanges {
            name: request.name.as_deref().map(|v| required("name", v)).transpose()?,
            specialization: request
                .specialization
                .as_deref()
                .map(|v| required("specialization", v))
                .transpose()?,
            gender: request.gender.as_deref().map(|v| required("gender", v)).transpose()?,
            location: request.location.as_deref().map(|v| required("location", v)).transpose()?,
            available_from: request.available_from,
            available_to: request.available_to,
        };
        validate_window(
            changes.available_from.unwrap_or(current.available_from),
            changes.available_to.unwrap_or(current.available_to),
        )?;

        let updated = self
            .repository
            .update_doctor(doctor_id, changes)
            .await?
            .ok_or(DoctorError::NotFound(doctor_id))?;
        info!("Doctor {} updated", doctor_id);

        Ok(updated)
    }

    pub async fn delete_doctor(&self, doctor_id: DoctorId) -> Result<(), DoctorError> {
        debug!("Deleting doctor: {}", doctor_id);

        if !self.repository.delete_doctor(doctor_id).await? {
            return Err(DoctorError::NotFound(doctor_id));
        }
        info!("Doctor {} deleted", doctor_id);

        Ok(())
    }

    pub async fn list_doctors(&self, filters: &DoctorSearchFilters) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing doctors with filters: {:?}", filters);

        let doctors = self
            .repository
            .list_doctors()
            .await?
            .into_iter()
            .filter(|doctor| filters.matches(doctor))
            .collect();

        Ok(doctors)
    }
}

fn required(field: &str, value: &str) -> Result<String, DoctorError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DoctorError::ValidationError(format!("Doctor {} must not be empty", field)));
    }
    Ok(value.to_string())
}

fn validate_window(available_from: NaiveTime, available_to: NaiveTime) -> Result<(), DoctorError> {
    if !is_valid_window(available_from, available_to) {
        warn!(
            "Rejected doctor window {} - {}",
            available_from.format("%H:%M"),
            available_to.format("%H:%M")
        );
        return Err(DoctorError::ValidationError(
            "Doctor available_from must not be later than available_to".to_string(),
        ));
    }
    Ok(())
}
