pub mod lifecycle;
pub mod scheduler;

pub use lifecycle::*;
pub use scheduler::*;
