use async_trait::async_trait;

use doctor_cell::DoctorId;
use shared_database::{DatabaseError, MemoryTable};

use crate::models::{NewQueueEntry, QueueEntry, QueueEntryId, QueueStatus};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueRepository: Send + Sync {
    async fn insert_queue_entry(&self, entry: NewQueueEntry) -> Result<QueueEntry, DatabaseError>;

    async fn get_queue_entry(&self, id: QueueEntryId) -> Result<Option<QueueEntry>, DatabaseError>;

    async fn list_queue_entries(&self) -> Result<Vec<QueueEntry>, DatabaseError>;

    /// Set the status of an entry. Returns `None` when no entry has `id`.
    async fn update_queue_status(
        &self,
        id: QueueEntryId,
        status: QueueStatus,
    ) -> Result<Option<QueueEntry>, DatabaseError>;

    async fn delete_queue_entry(&self, id: QueueEntryId) -> Result<bool, DatabaseError>;

    /// Highest queue number issued to the doctor, `None` when the doctor has no entries.
    async fn max_queue_number(&self, doctor_id: DoctorId) -> Result<Option<i32>, DatabaseError>;
}

pub struct InMemoryQueueRepository {
    table: MemoryTable<QueueEntry>,
}

impl InMemoryQueueRepository {
    pub fn new() -> Self {
        Self {
            table: MemoryTable::new("queue_entries"),
        }
    }

    pub async fn count(&self) -> usize {
        self.table.len().await
    }
}

impl Default for InMemoryQueueRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueueRepository for InMemoryQueueRepository {
    async fn insert_queue_entry(&self, entry: NewQueueEntry) -> Result<QueueEntry, DatabaseError> {
        Ok(self.table.insert_with(|id| entry.with_id(id)).await)
    }

    async fn get_queue_entry(&self, id: QueueEntryId) -> Result<Option<QueueEntry>, DatabaseError> {
        Ok(self.table.get(id).await)
    }

    async fn list_queue_entries(&self) -> Result<Vec<QueueEntry>, DatabaseError> {
        Ok(self.table.all().await)
    }

    async fn update_queue_status(
        &self,
        id: QueueEntryId,
        status: QueueStatus,
    ) -> Result<Option<QueueEntry>, DatabaseError> {
        Ok(self.table.update(id, |entry| entry.status = status).await)
    }

    async fn delete_queue_entry(&self, id: QueueEntryId) -> Result<bool, DatabaseError> {
        Ok(self.table.remove(id).await.is_some())
    }

    async fn max_queue_number(&self, doctor_id: DoctorId) -> Result<Option<i32>, DatabaseError> {
        Ok(self
            .table
            .filter(|entry| entry.doctor_id == doctor_id)
            .await
            .into_iter()
            .map(|entry| entry.queue_number)
            .max())
    }
}
