//! Error types for task domain validation and status transitions.

use super::{TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned when task input fails a precondition.
///
/// Validation failures never mutate state; the offending input is simply
/// refused at the boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskValidationError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The due date is not strictly in the future.
    #[error("due date {due_at} must be in the future (now: {now})")]
    DueDateNotInFuture {
        /// The rejected due date.
        due_at: DateTime<Utc>,
        /// The reference time the due date was compared against.
        now: DateTime<Utc>,
    },
}

/// Errors returned when a business precondition on an existing task fails.
///
/// Distinct from [`TaskValidationError`]: the task exists and is visible to
/// the caller, but the requested change is disallowed in its current status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskRejection {
    /// The requested status transition is not permitted.
    #[error("invalid status transition for task {task_id}: {from} -> {to}")]
    InvalidStatusTransition {
        /// Identifier of the task that rejected the transition.
        task_id: TaskId,
        /// Status the task was in.
        from: TaskStatus,
        /// Status the transition targeted.
        to: TaskStatus,
    },

    /// Field edits are only permitted on active tasks.
    #[error("task {task_id} is {status}; only active tasks can be edited")]
    NotEditable {
        /// Identifier of the task that rejected the edit.
        task_id: TaskId,
        /// Status the task was in.
        status: TaskStatus,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
