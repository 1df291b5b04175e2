// libs/appointment-cell/src/services/scheduler.rs
use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use doctor_cell::{contains_ignore_case, Doctor, DoctorId, DoctorRepository};
use shared_utils::Clock;

use crate::models::{
    Appointment, AppointmentChanges, AppointmentError, AppointmentId, AppointmentSearchQuery,
    AppointmentStatus, CreateAppointmentRequest, NewAppointment, UpdateAppointmentRequest,
};
use crate::repository::AppointmentRepository;
use crate::services::lifecycle::AppointmentLifecycleService;

/// Books, moves and closes appointments. Every write is preceded by all of
/// its validation, so a rejected request leaves the store untouched.
pub struct AppointmentScheduler {
    doctors: Arc<dyn DoctorRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    clock: Arc<dyn Clock>,
    lifecycle: AppointmentLifecycleService,
}

impl AppointmentScheduler {
    pub fn new(
        doctors: Arc<dyn DoctorRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            doctors,
            appointments,
            clock,
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        debug!(
            "Booking appointment with doctor {} on {} at {}",
            request.doctor_id,
            request.appointment_date,
            request.appointment_time.format("%H:%M")
        );

        let patient_name = validate_patient_name(&request.patient_name)?;
        let doctor = self.load_doctor(request.doctor_id).await?;
        doctor.ensure_available_at(request.appointment_time)?;

        let appointment = self
            .appointments
            .insert_appointment(NewAppointment {
                patient_name,
                doctor_id: doctor.id,
                appointment_date: request.appointment_date,
                appointment_time: request.appointment_time,
                status: self.lifecycle.initial_status(),
                created_at: self.clock.now(),
            })
            .await?;

        info!("Appointment {} booked with doctor {}", appointment.id, doctor.id);
        Ok(appointment)
    }

    pub async fn get_appointment(&self, appointment_id: AppointmentId) -> Result<Appointment, AppointmentError> {
        self.appointments
            .get_appointment(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound(appointment_id))
    }

    /// Apply a partial update. A new date or time is checked against the
    /// doctor's window; a status-only change never consults the directory.
    /// Only the requested fields are written, so concurrent updates to
    /// different fields all land.
    pub async fn update_appointment(
        &self,
        appointment_id: AppointmentId,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Updating appointment: {}", appointment_id);

        let appointment = self.get_appointment(appointment_id).await?;

        let new_status = request
            .status
            .as_deref()
            .map(|raw| self.lifecycle.resolve_status_change(appointment.status, raw))
            .transpose()?;

        if request.changes_schedule() {
            let new_time = request.appointment_time.unwrap_or(appointment.appointment_time);
            let doctor = self.load_doctor(appointment.doctor_id).await?;
            doctor.ensure_available_at(new_time).map_err(|e| {
                warn!("Appointment {} cannot move: {}", appointment_id, e);
                e
            })?;
        }

        let changes = AppointmentChanges {
            appointment_date: request.appointment_date,
            appointment_time: request.appointment_time,
            status: new_status,
        };
        let updated = self
            .appointments
            .update_appointment(appointment_id, changes)
            .await?
            .ok_or(AppointmentError::NotFound(appointment_id))?;

        info!("Appointment {} updated ({})", appointment_id, updated.status);
        Ok(updated)
    }

    pub async fn remove_appointment(&self, appointment_id: AppointmentId) -> Result<(), AppointmentError> {
        debug!("Removing appointment: {}", appointment_id);

        if !self.appointments.delete_appointment(appointment_id).await? {
            return Err(AppointmentError::NotFound(appointment_id));
        }

        info!("Appointment {} removed", appointment_id);
        Ok(())
    }

    /// All appointments, earliest date first and earliest time within a date.
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, AppointmentError> {
        let mut appointments = self.appointments.list_appointments().await?;
        appointments.sort_by_key(Appointment::schedule_key);
        Ok(appointments)
    }

    /// Schedule-ordered listing narrowed by the query. `doctor_name` is
    /// resolved through the doctor directory.
    pub async fn search_appointments(
        &self,
        query: &AppointmentSearchQuery,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Searching appointments: {:?}", query);

        let status = query
            .status
            .as_deref()
            .map(str::parse::<AppointmentStatus>)
            .transpose()?;

        let doctor_ids = match query.doctor_name.as_deref() {
            Some(name) if !name.trim().is_empty() => Some(self.doctor_ids_matching(name).await?),
            _ => None,
        };

        let appointments = self
            .list_appointments()
            .await?
            .into_iter()
            .filter(|a| contains_ignore_case(&a.patient_name, query.patient_name.as_deref()))
            .filter(|a| query.doctor_id.map_or(true, |id| a.doctor_id == id))
            .filter(|a| doctor_ids.as_ref().map_or(true, |ids| ids.contains(&a.doctor_id)))
            .filter(|a| query.date.map_or(true, |date| a.appointment_date == date))
            .filter(|a| status.map_or(true, |status| a.status == status))
            .collect();

        Ok(appointments)
    }

    async fn doctor_ids_matching(&self, name: &str) -> Result<HashSet<DoctorId>, AppointmentError> {
        Ok(self
            .doctors
            .list_doctors()
            .await?
            .into_iter()
            .filter(|doctor| contains_ignore_case(&doctor.name, Some(name)))
            .map(|doctor| doctor.id)
            .collect())
    }

    async fn load_doctor(&self, doctor_id: DoctorId) -> Result<Doctor, AppointmentError> {
        self.doctors
            .get_doctor_by_id(doctor_id)
            .await?
            .ok_or_else(|| {
                warn!("Doctor {} not found", doctor_id);
                AppointmentError::DoctorNotFound(doctor_id)
            })
    }
}

fn validate_patient_name(raw: &str) -> Result<String, AppointmentError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppointmentError::ValidationError(
            "Appointment patient_name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}
