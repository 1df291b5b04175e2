// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::models::{AppointmentError, AppointmentStatus};

/// Status rules for appointments. Every appointment starts `booked`. An update
/// may set any of the three statuses from any other, so a completed or canceled
/// appointment can be reopened. Nothing expires on its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    pub fn initial_status(&self) -> AppointmentStatus {
        AppointmentStatus::Booked
    }

    /// Validate a requested status against the closed set of statuses.
    pub fn resolve_status_change(
        &self,
        current_status: AppointmentStatus,
        requested: &str,
    ) -> Result<AppointmentStatus, AppointmentError> {
        let new_status = requested.parse::<AppointmentStatus>().map_err(|e| {
            warn!("Rejected appointment status '{}'", requested);
            e
        })?;

        debug!("Appointment status {} -> {}", current_status, new_status);

        Ok(new_status)
    }
}
