use async_trait::async_trait;

use shared_database::{DatabaseError, MemoryTable};

use crate::models::{Appointment, AppointmentChanges, AppointmentId, NewAppointment};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<Appointment, DatabaseError>;

    async fn get_appointment(&self, id: AppointmentId) -> Result<Option<Appointment>, DatabaseError>;

    /// All appointments, in no particular order.
    async fn list_appointments(&self) -> Result<Vec<Appointment>, DatabaseError>;

    /// Apply `changes` to the stored appointment, leaving other fields as stored.
    /// Returns `None` when no appointment has `id`.
    async fn update_appointment(
        &self,
        id: AppointmentId,
        changes: AppointmentChanges,
    ) -> Result<Option<Appointment>, DatabaseError>;

    /// Returns whether an appointment was removed.
    async fn delete_appointment(&self, id: AppointmentId) -> Result<bool, DatabaseError>;
}

pub struct InMemoryAppointmentRepository {
    table: MemoryTable<Appointment>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self {
            table: MemoryTable::new("appointments"),
        }
    }

    pub async fn count(&self) -> usize {
        self.table.len().await
    }
}

impl Default for InMemoryAppointmentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<Appointment, DatabaseError> {
        Ok(self.table.insert_with(|id| appointment.with_id(id)).await)
    }

    async fn get_appointment(&self, id: AppointmentId) -> Result<Option<Appointment>, DatabaseError> {
        Ok(self.table.get(id).await)
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, DatabaseError> {
        Ok(self.table.all().await)
    }

    async fn update_appointment(
        &self,
        id: AppointmentId,
        changes: AppointmentChanges,
    ) -> Result<Option<Appointment>, DatabaseError> {
        Ok(self.table.update(id, |stored| changes.apply_to(stored)).await)
    }

    async fn delete_appointment(&self, id: AppointmentId) -> Result<bool, DatabaseError> {
        Ok(self.table.remove(id).await.is_some())
    }
}
