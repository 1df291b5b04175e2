use async_trait::async_trait;

use shared_database::{DatabaseError, MemoryTable};

use crate::models::{Doctor, DoctorChanges, DoctorId, NewDoctor};

/// Doctor lookup and storage used by the directory and the scheduling cells.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn get_doctor_by_id(&self, id: DoctorId) -> Result<Option<Doctor>, DatabaseError>;

    /// All doctors in id order.
    async fn list_doctors(&self) -> Result<Vec<Doctor>, DatabaseError>;

    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, DatabaseError>;

    /// Apply `changes` to the stored doctor. Returns `None` when no doctor has `id`.
    async fn update_doctor(&self, id: DoctorId, changes: DoctorChanges) -> Result<Option<Doctor>, DatabaseError>;

    /// Returns whether a doctor was removed.
    async fn delete_doctor(&self, id: DoctorId) -> Result<bool, DatabaseError>;
}

pub struct InMemoryDoctorRepository {
    table: MemoryTable<Doctor>,
}

impl InMemoryDoctorRepository {
    pub fn new() -> Self {
        Self {
            table: MemoryTable::new("doctors"),
        }
    }
}

impl Default for InMemoryDoctorRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DoctorRepository for InMemoryDoctorRepository {
    async fn get_doctor_by_id(&self, id: DoctorId) -> Result<Option<Doctor>, DatabaseError> {
        Ok(self.table.get(id).await)
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, DatabaseError> {
        Ok(self.table.all().await)
    }

    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, DatabaseError> {
        Ok(self.table.insert_with(|id| doctor.with_id(id)).await)
    }

    async fn update_doctor(&self, id: DoctorId, changes: DoctorChanges) -> Result<Option<Doctor>, DatabaseError> {
        Ok(self.table.update(id, |stored| changes.apply_to(stored)).await)
    }

    async fn delete_doctor(&self, id: DoctorId) -> Result<bool, DatabaseError> {
        Ok(self.table.remove(id).await.is_some())
    }
}
