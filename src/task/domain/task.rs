//! Task aggregate root and the due-date driven status lifecycle.

use super::{OwnerId, ParseTaskStatusError, TaskId, TaskRejection, TaskTitle, TaskValidationError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is pending and its due date has not passed.
    Active,
    /// Task has been finished by its owner.
    Completed,
    /// Task passed its due date without being completed.
    Failed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns whether this status permits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns whether a transition from this status to `target` is allowed.
    ///
    /// Permitted transitions:
    ///
    /// - `Active -> Completed` (owner completes the task)
    /// - `Active -> Failed` (reconciliation sweep past the due date)
    /// - `Failed -> Active` (reactivation with a new future due date)
    /// - `Failed -> Completed` (late completion of a failed task)
    ///
    /// `Completed` is terminal and self-transitions are never allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Active, Self::Completed | Self::Failed)
                | (Self::Failed, Self::Active | Self::Completed)
        )
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validates that a due date lies strictly in the future.
///
/// Applied at the service boundary for creation, edits, and reactivation.
///
/// # Errors
///
/// Returns [`TaskValidationError::DueDateNotInFuture`] when `due_at <= now`.
pub fn ensure_future_due_date(
    due_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), TaskValidationError> {
    if due_at <= now {
        return Err(TaskValidationError::DueDateNotInFuture { due_at, now });
    }
    Ok(())
}

/// Field changes applicable to an active task.
///
/// Enumerates exactly the owner-editable fields; status and the reactivation
/// counter are mutated only through their named operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    title: Option<TaskTitle>,
    description: Option<String>,
    due_at: Option<DateTime<Utc>>,
}

impl TaskChanges {
    /// Creates an empty change set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            title: None,
            description: None,
            due_at: None,
        }
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: TaskTitle) -> Self {
        self.title = Some(title);
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a new due date.
    #[must_use]
    pub const fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }

    /// Returns the new due date, if one is being set.
    #[must_use]
    pub const fn due_at(&self) -> Option<DateTime<Utc>> {
        self.due_at
    }

    /// Returns whether the change set carries no changes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.due_at.is_none()
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: OwnerId,
    title: TaskTitle,
    description: String,
    due_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    status: TaskStatus,
    reactivation_count: u32,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner identifier.
    pub owner: OwnerId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: String,
    /// Persisted due date.
    pub due_at: DateTime<Utc>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted reactivation counter.
    pub reactivation_count: u32,
}

impl Task {
    /// Creates a new active task owned by `owner`.
    ///
    /// The caller is expected to have validated the due date against the
    /// same clock and to reconcile the task immediately after creation; the
    /// clock may advance past `due_at` between validation and persistence.
    #[must_use]
    pub fn new(
        owner: OwnerId,
        title: TaskTitle,
        description: String,
        due_at: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: TaskId::new(),
            owner,
            title,
            description,
            due_at,
            created_at: clock.utc(),
            status: TaskStatus::Active,
            reactivation_count: 0,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            title: data.title,
            description: data.description,
            due_at: data.due_at,
            created_at: data.created_at,
            status: data.status,
            reactivation_count: data.reactivation_count,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user's identifier.
    #[must_use]
    pub const fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns how many times this task has been reactivated.
    #[must_use]
    pub const fn reactivation_count(&self) -> u32 {
        self.reactivation_count
    }

    /// Applies the status invariant against the given reference time.
    ///
    /// An active task whose due date has passed becomes failed. Returns
    /// whether the status changed. Pure with respect to persistence; callers
    /// decide whether to write the result back.
    pub fn reconcile(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == TaskStatus::Active && self.due_at < now {
            self.status = TaskStatus::Failed;
            return true;
        }
        false
    }

    /// Marks the task as completed.
    ///
    /// Failed tasks may be completed late; completed tasks reject the call.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRejection::InvalidStatusTransition`] when the task is
    /// already completed.
    pub fn complete(&mut self) -> Result<(), TaskRejection> {
        self.transition_to(TaskStatus::Completed)
    }

    /// Returns a failed task to active status with a new deadline.
    ///
    /// Increments the reactivation counter; the counter never resets. The
    /// due date must already have been validated as strictly future. No
    /// field changes on rejection.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRejection::InvalidStatusTransition`] when the task is
    /// not failed.
    pub fn reactivate(&mut self, new_due_at: DateTime<Utc>) -> Result<(), TaskRejection> {
        self.transition_to(TaskStatus::Active)?;
        self.due_at = new_due_at;
        self.reactivation_count += 1;
        Ok(())
    }

    /// Applies owner edits to an active task.
    ///
    /// Fully applied or fully rejected; a new due date must already have
    /// been validated as strictly future.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRejection::NotEditable`] when the task is not active.
    pub fn edit(&mut self, changes: TaskChanges) -> Result<(), TaskRejection> {
        if self.status != TaskStatus::Active {
            return Err(TaskRejection::NotEditable {
                task_id: self.id,
                status: self.status,
            });
        }
        let TaskChanges {
            title,
            description,
            due_at,
        } = changes;
        if let Some(new_title) = title {
            self.title = new_title;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(new_due_at) = due_at {
            self.due_at = new_due_at;
        }
        Ok(())
    }

    /// Returns whether the task is past its due date.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        now > self.due_at
    }

    /// Returns the number of whole days until the due date.
    ///
    /// Negative when the task is overdue. Display-only; status logic uses
    /// [`Task::reconcile`].
    #[must_use]
    pub fn days_until_due(&self, now: DateTime<Utc>) -> i64 {
        (self.due_at - now).num_days()
    }

    /// Returns the number of whole days the task is overdue.
    ///
    /// Zero when the due date has not passed; never negative.
    #[must_use]
    pub fn overdue_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.due_at).num_days().max(0)
    }

    fn transition_to(&mut self, target: TaskStatus) -> Result<(), TaskRejection> {
        if !self.status.can_transition_to(target) {
            return Err(TaskRejection::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }
}
