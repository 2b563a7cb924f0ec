//! Externally visible projections of task records.

use crate::task::domain::{Task, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Read-only projection of a task handed to the presentation layer.
///
/// Carries the stored fields plus the derived due-date properties, computed
/// against the reference time of the request that produced the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Due date.
    pub due_at: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Number of times the task has been reactivated.
    pub reactivation_count: u32,
    /// Whether the due date has passed.
    pub is_overdue: bool,
    /// Whole days past the due date; zero when not overdue.
    pub overdue_days: i64,
    /// Whole days until the due date; negative when overdue. Display only.
    pub days_until_due: i64,
}

impl TaskView {
    /// Projects a task against the given reference time.
    #[must_use]
    pub fn project(task: &Task, now: DateTime<Utc>) -> Self {
        Self {
            id: task.id(),
            title: task.title().as_str().to_owned(),
            description: task.description().to_owned(),
            due_at: task.due_at(),
            created_at: task.created_at(),
            status: task.status(),
            reactivation_count: task.reactivation_count(),
            is_overdue: task.is_overdue(now),
            overdue_days: task.overdue_days(now),
            days_until_due: task.days_until_due(now),
        }
    }
}

/// An owner's tasks grouped by status, newest first within each group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskBoard {
    /// Active tasks.
    pub active: Vec<TaskView>,
    /// Completed tasks.
    pub completed: Vec<TaskView>,
    /// Failed tasks.
    pub failed: Vec<TaskView>,
    /// Total number of tasks across all groups.
    pub total: usize,
}

/// Status-count summary returned by the status endpoint.
///
/// `updated_count` reports how many tasks the triggering sweep failed; the
/// remaining counts are taken after the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    /// Tasks transitioned to failed by the sweep this read triggered.
    pub updated_count: u64,
    /// Active tasks after the sweep.
    pub active_count: u64,
    /// Completed tasks after the sweep.
    pub completed_count: u64,
    /// Failed tasks after the sweep.
    pub failed_count: u64,
}
