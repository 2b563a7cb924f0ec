//! Application services for the task status lifecycle.

mod lifecycle;
mod views;

pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
pub use views::{StatusSummary, TaskBoard, TaskView};
