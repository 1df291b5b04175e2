use std::sync::Arc;

use tracing::{debug, info, warn};

use doctor_cell::{contains_ignore_case, Doctor, DoctorId, DoctorRepository};
use shared_utils::Clock;

use crate::error::QueueError;
use crate::models::{
    CreateQueueEntryRequest, NewQueueEntry, QueueEntry, QueueEntryId, QueueSearchQuery, QueueStatus,
};
use crate::repository::QueueRepository;
use crate::services::sequencer::QueueSequencer;

/// Walk-in queue manager. Admission is checked against the doctor's window at
/// the clinic's current time of day.
pub struct QueueService {
    doctors: Arc<dyn DoctorRepository>,
    queue: Arc<dyn QueueRepository>,
    sequencer: QueueSequencer,
    clock: Arc<dyn Clock>,
}

impl QueueService {
    pub fn new(
        doctors: Arc<dyn DoctorRepository>,
        queue: Arc<dyn QueueRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sequencer: QueueSequencer::new(queue.clone()),
            doctors,
            queue,
            clock,
        }
    }

    pub fn sequencer(&self) -> &QueueSequencer {
        &self.sequencer
    }

    pub async fn create_queue_entry(&self, request: CreateQueueEntryRequest) -> Result<QueueEntry, QueueError> {
        debug!("Adding patient to queue of doctor {}", request.doctor_id);

        let patient_name = validate_patient_name(&request.patient_name)?;
        let doctor = self.load_doctor(request.doctor_id).await?;

        let now = self.clock.time_of_day();
        doctor.ensure_available_at(now).map_err(|e| {
            warn!("Queue entry rejected: {}", e);
            e
        })?;

        let ticket = self.sequencer.reserve(doctor.id).await?;
        let entry = self
            .queue
            .insert_queue_entry(NewQueueEntry {
                patient_name,
                doctor_id: doctor.id,
                queue_number: ticket.queue_number(),
                status: QueueStatus::Waiting,
                created_at: self.clock.now(),
            })
            .await?;
        drop(ticket);

        info!(
            "Queue entry {} created for doctor {} with number {}",
            entry.id, entry.doctor_id, entry.queue_number
        );
        Ok(entry)
    }

    pub async fn get_queue_entry(&self, entry_id: QueueEntryId) -> Result<QueueEntry, QueueError> {
        self.queue
            .get_queue_entry(entry_id)
            .await?
            .ok_or(QueueError::NotFound(entry_id))
    }

    /// Change the status of an entry. Queue number and doctor never change.
    pub async fn update_queue_status(&self, entry_id: QueueEntryId, status: &str) -> Result<QueueEntry, QueueError> {
        debug!("Updating status of queue entry {}", entry_id);

        let current = self.get_queue_entry(entry_id).await?;
        let new_status = status.parse::<QueueStatus>().map_err(|e| {
            warn!("Rejected queue status '{}' for entry {}", status, entry_id);
            e
        })?;

        let updated = self
            .queue
            .update_queue_status(entry_id, new_status)
            .await?
            .ok_or(QueueError::NotFound(entry_id))?;

        info!("Queue entry {} status {} -> {}", entry_id, current.status, updated.status);
        Ok(updated)
    }

    pub async fn remove_queue_entry(&self, entry_id: QueueEntryId) -> Result<(), QueueError> {
        debug!("Removing queue entry: {}", entry_id);

        if !self.queue.delete_queue_entry(entry_id).await? {
            return Err(QueueError::NotFound(entry_id));
        }

        info!("Queue entry {} removed", entry_id);
        Ok(())
    }

    /// Every entry in arrival order across all doctors.
    pub async fn list_queue_entries(&self) -> Result<Vec<QueueEntry>, QueueError> {
        let mut entries = self.queue.list_queue_entries().await?;
        entries.sort_by_key(QueueEntry::arrival_key);
        Ok(entries)
    }

    pub async fn search_queue_entries(&self, query: &QueueSearchQuery) -> Result<Vec<QueueEntry>, QueueError> {
        debug!("Searching queue: {:?}", query);

        let status = query
            .status
            .as_deref()
            .map(str::parse::<QueueStatus>)
            .transpose()?;

        Ok(self
            .list_queue_entries()
            .await?
            .into_iter()
            .filter(|e| contains_ignore_case(&e.patient_name, query.patient_name.as_deref()))
            .filter(|e| query.doctor_id.map_or(true, |id| e.doctor_id == id))
            .filter(|e| status.map_or(true, |status| e.status == status))
            .collect())
    }

    async fn load_doctor(&self, doctor_id: DoctorId) -> Result<Doctor, QueueError> {
        self.doctors
            .get_doctor_by_id(doctor_id)
            .await?
            .ok_or_else(|| {
                warn!("Doctor {} not found", doctor_id);
                QueueError::DoctorNotFound(doctor_id)
            })
    }
}

fn validate_patient_name(raw: &str) -> Result<String, QueueError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(QueueError::ValidationError(
            "Queue entry patient_name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}
