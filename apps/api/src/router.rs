use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::{appointment_routes, AppointmentScheduler, InMemoryAppointmentRepository};
use doctor_cell::{doctor_routes, DoctorRepository, DoctorService, InMemoryDoctorRepository};
use queue_cell::{queue_routes, InMemoryQueueRepository, QueueService};
use shared_utils::Clock;

/// Services behind the HTTP surface. All of them share one doctor directory.
pub struct ClinicServices {
    pub doctors: Arc<DoctorService>,
    pub appointments: Arc<AppointmentScheduler>,
    pub queue: Arc<QueueService>,
}

impl ClinicServices {
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        let directory: Arc<dyn DoctorRepository> = Arc::new(InMemoryDoctorRepository::new());

        Self {
            doctors: Arc::new(DoctorService::new(directory.clone())),
            appointments: Arc::new(AppointmentScheduler::new(
                directory.clone(),
                Arc::new(InMemoryAppointmentRepository::new()),
                clock.clone(),
            )),
            queue: Arc::new(QueueService::new(
                directory,
                Arc::new(InMemoryQueueRepository::new()),
                clock,
            )),
        }
    }
}

pub fn create_router(services: &ClinicServices) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic front-desk API is running!" }))
        .nest("/doctors", doctor_routes(services.doctors.clone()))
        .nest("/appointments", appointment_routes(services.appointments.clone()))
        .nest("/queue", queue_routes(services.queue.clone()))
}
