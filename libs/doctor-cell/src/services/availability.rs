//! Availability window checks.
//!
//! A doctor's window is the inclusive range `[available_from, available_to]` of
//! clinic-local times of day. Windows never wrap past midnight. Requested times
//! are compared at minute resolution, which is the ordering of their "HH:MM"
//! forms.

use chrono::NaiveTime;
use thiserror::Error;
use tracing::debug;

use shared_utils::time::{format_time_of_day, truncate_to_minute};

use crate::models::{Doctor, DoctorId};

fn hhmm(time: &NaiveTime) -> String {
    format_time_of_day(*time)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Doctor {doctor_id} is unavailable at {} (available {} to {})",
    hhmm(.requested),
    hhmm(.available_from),
    hhmm(.available_to)
)]
pub struct DoctorUnavailable {
    pub doctor_id: DoctorId,
    pub requested: NaiveTime,
    pub available_from: NaiveTime,
    pub available_to: NaiveTime,
}

pub fn is_within_availability(doctor: &Doctor, time: NaiveTime) -> bool {
    let time = truncate_to_minute(time);
    doctor.available_from <= time && time <= doctor.available_to
}

pub fn check_availability(doctor: &Doctor, time: NaiveTime) -> Result<(), DoctorUnavailable> {
    if is_within_availability(doctor, time) {
        return Ok(());
    }

    debug!(
        "Doctor {} rejected {}: outside {}-{}",
        doctor.id,
        hhmm(&time),
        hhmm(&doctor.available_from),
        hhmm(&doctor.available_to)
    );

    Err(DoctorUnavailable {
        doctor_id: doctor.id,
        requested: truncate_to_minute(time),
        available_from: doctor.available_from,
        available_to: doctor.available_to,
    })
}

/// A window is well formed when it does not run backwards.
pub fn is_valid_window(available_from: NaiveTime, available_to: NaiveTime) -> bool {
    available_from <= available_to
}
