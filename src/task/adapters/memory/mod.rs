//! In-memory adapter for the task store port.

mod task;

pub use task::InMemoryTaskStore;
