pub mod handlers;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;

pub use models::*;
pub use repository::{DoctorRepository, InMemoryDoctorRepository};
pub use router::doctor_routes;
pub use services::*;
