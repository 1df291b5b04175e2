use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use doctor_cell::DoctorId;

use crate::error::QueueError;
use crate::repository::QueueRepository;

/// A queue number held for one doctor. While the ticket is alive no other
/// caller can reserve a number for the same doctor, so the holder can persist
/// its entry before the next maximum is read.
pub struct QueueTicket {
    doctor_id: DoctorId,
    queue_number: i32,
    _guard: OwnedMutexGuard<()>,
}

impl QueueTicket {
    pub fn doctor_id(&self) -> DoctorId {
        self.doctor_id
    }

    pub fn queue_number(&self) -> i32 {
        self.queue_number
    }
}

/// Hands out per-doctor queue numbers: one more than the highest number the
/// doctor already has.
pub struct QueueSequencer {
    repository: Arc<dyn QueueRepository>,
    doctor_locks: Mutex<HashMap<DoctorId, Arc<Mutex<()>>>>,
}

impl QueueSequencer {
    pub fn new(repository: Arc<dyn QueueRepository>) -> Self {
        Self {
            repository,
            doctor_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Next number for the doctor without holding a reservation.
    pub async fn next_queue_number(&self, doctor_id: DoctorId) -> Result<i32, QueueError> {
        let highest = self.repository.max_queue_number(doctor_id).await?;
        Ok(highest.unwrap_or(0) + 1)
    }

    /// Lock the doctor's queue and compute its next number. Dropping the
    /// ticket without persisting an entry leaves the number free.
    pub async fn reserve(&self, doctor_id: DoctorId) -> Result<QueueTicket, QueueError> {
        let guard = self.doctor_lock(doctor_id).await.lock_owned().await;
        let queue_number = self.next_queue_number(doctor_id).await?;

        debug!("Reserved queue number {} for doctor {}", queue_number, doctor_id);
        Ok(QueueTicket {
            doctor_id,
            queue_number,
            _guard: guard,
        })
    }

    async fn doctor_lock(&self, doctor_id: DoctorId) -> Arc<Mutex<()>> {
        self.doctor_locks
            .lock()
            .await
            .entry(doctor_id)
            .or_default()
            .clone()
    }
}
