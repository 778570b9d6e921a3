pub mod pending;
pub mod queue;
