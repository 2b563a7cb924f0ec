//! Domain model for the task status lifecycle.
//!
//! The task domain models due-date driven status transitions, owner-scoped
//! identity, and the derived display properties, while keeping all
//! infrastructure concerns outside of the domain boundary.

mod error;
mod ids;
mod task;

pub use error::{ParseTaskStatusError, TaskRejection, TaskValidationError};
pub use ids::{OwnerId, TaskId, TaskTitle};
pub use task::{PersistedTaskData, Task, TaskChanges, TaskStatus, ensure_future_due_date};
