pub mod queue;
pub mod sequencer;

pub use queue::*;
pub use sequencer::*;
