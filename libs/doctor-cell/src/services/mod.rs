pub mod availability;
pub mod doctor;

pub use availability::*;
pub use doctor::*;
