//! Service layer orchestrating the task status lifecycle.
//!
//! Every user-facing read path sweeps the owner's overdue tasks before
//! querying, so a task is never displayed as active past its due date.
//! Write paths re-check the invariant only for the record they mutate.

use crate::task::{
    domain::{
        OwnerId, Task, TaskChanges, TaskId, TaskRejection, TaskStatus, TaskTitle,
        TaskValidationError, ensure_future_due_date,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
    services::views::{StatusSummary, TaskBoard, TaskView},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    owner: OwnerId,
    title: String,
    description: String,
    due_at: DateTime<Utc>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(owner: OwnerId, title: impl Into<String>, due_at: DateTime<Utc>) -> Self {
        Self {
            owner,
            title: title.into(),
            description: String::new(),
            due_at,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Input failed a precondition; nothing was mutated.
    #[error(transparent)]
    Validation(#[from] TaskValidationError),

    /// The task exists but its current status disallows the operation.
    #[error(transparent)]
    Rejected(#[from] TaskRejection),

    /// The task does not exist, or belongs to a different owner. The two
    /// cases are deliberately indistinguishable so that callers cannot probe
    /// for other users' task identifiers.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskLifecycleService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a new task and reconciles it against the creation time.
    ///
    /// The presentation layer enforces future due dates on its forms; the
    /// core accepts the submitted date and immediately fails a task that is
    /// already overdue, which also covers the clock advancing past the due
    /// date between form validation and persistence.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] when the title is empty
    /// and [`TaskLifecycleError::Store`] when persistence fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<TaskView> {
        let CreateTaskRequest {
            owner,
            title,
            description,
            due_at,
        } = request;
        let validated_title = TaskTitle::new(title)?;

        let mut task = Task::new(owner, validated_title, description, due_at, &*self.clock);
        task.reconcile(task.created_at());
        self.store.store(&task).await?;
        Ok(TaskView::project(&task, self.clock.utc()))
    }

    /// Retrieves one of the owner's tasks, sweeping the owner's overdue
    /// tasks first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is missing or
    /// owned by someone else, and [`TaskLifecycleError::Store`] when
    /// persistence fails.
    pub async fn get_task(&self, task_id: TaskId, owner: OwnerId) -> TaskLifecycleResult<TaskView> {
        self.sweep(Some(owner)).await?;
        let task = self.find_owned(task_id, owner).await?;
        Ok(TaskView::project(&task, self.clock.utc()))
    }

    /// Lists the owner's tasks grouped by status, sweeping first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when persistence fails.
    pub async fn list_tasks(&self, owner: OwnerId) -> TaskLifecycleResult<TaskBoard> {
        self.sweep(Some(owner)).await?;
        let now = self.clock.utc();

        let active = self.list_views(owner, TaskStatus::Active, now).await?;
        let completed = self.list_views(owner, TaskStatus::Completed, now).await?;
        let failed = self.list_views(owner, TaskStatus::Failed, now).await?;
        let total = active.len() + completed.len() + failed.len();

        Ok(TaskBoard {
            active,
            completed,
            failed,
            total,
        })
    }

    /// Marks one of the owner's tasks as completed.
    ///
    /// Failed tasks may be completed late; `Completed` is terminal.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is missing or
    /// owned by someone else, [`TaskLifecycleError::Rejected`] when it is
    /// already completed, and [`TaskLifecycleError::Store`] when persistence
    /// fails.
    pub async fn complete_task(
        &self,
        task_id: TaskId,
        owner: OwnerId,
    ) -> TaskLifecycleResult<TaskView> {
        let mut task = self.find_owned(task_id, owner).await?;
        task.complete()?;
        self.store.update(&task).await?;
        Ok(TaskView::project(&task, self.clock.utc()))
    }

    /// Returns a failed task to active status with a new deadline.
    ///
    /// The record's own invariant is re-checked first, so an active task
    /// that quietly went overdue since the last sweep is failed and then
    /// reactivated in one step. No field changes on rejection.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] when the new due date is
    /// not in the future, [`TaskLifecycleError::NotFound`] when the task is
    /// missing or owned by someone else, [`TaskLifecycleError::Rejected`]
    /// when the task is not failed, and [`TaskLifecycleError::Store`] when
    /// persistence fails.
    pub async fn reactivate_task(
        &self,
        task_id: TaskId,
        owner: OwnerId,
        new_due_at: DateTime<Utc>,
    ) -> TaskLifecycleResult<TaskView> {
        let now = self.clock.utc();
        ensure_future_due_date(new_due_at, now)?;

        let mut task = self.find_owned(task_id, owner).await?;
        let reconciled = task.reconcile(now);
        match task.reactivate(new_due_at) {
            Ok(()) => {
                self.store.update(&task).await?;
                Ok(TaskView::project(&task, now))
            }
            Err(rejection) => {
                if reconciled {
                    self.store.update(&task).await?;
                }
                Err(rejection.into())
            }
        }
    }

    /// Applies field edits to one of the owner's active tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] when a new due date is
    /// not in the future, [`TaskLifecycleError::NotFound`] when the task is
    /// missing or owned by someone else, [`TaskLifecycleError::Rejected`]
    /// when the task is not active, and [`TaskLifecycleError::Store`] when
    /// persistence fails.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        owner: OwnerId,
        changes: TaskChanges,
    ) -> TaskLifecycleResult<TaskView> {
        let mut task = self.find_owned(task_id, owner).await?;
        let now = self.clock.utc();
        // Re-check the invariant for this record: an overdue task must
        // reject the edit as failed, not accept it as active.
        let reconciled = task.reconcile(now);

        if let Some(new_due_at) = changes.due_at() {
            ensure_future_due_date(new_due_at, now)?;
        }
        match task.edit(changes) {
            Ok(()) => {
                self.store.update(&task).await?;
                Ok(TaskView::project(&task, now))
            }
            Err(rejection) => {
                if reconciled {
                    self.store.update(&task).await?;
                }
                Err(rejection.into())
            }
        }
    }

    /// Deletes one of the owner's tasks, in any status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is missing or
    /// owned by someone else, and [`TaskLifecycleError::Store`] when
    /// persistence fails.
    pub async fn delete_task(&self, task_id: TaskId, owner: OwnerId) -> TaskLifecycleResult<()> {
        let task = self.find_owned(task_id, owner).await?;
        Ok(self.store.delete(task.id()).await?)
    }

    /// Sweeps and then counts the owner's tasks per status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when persistence fails.
    pub async fn status_counts(&self, owner: OwnerId) -> TaskLifecycleResult<StatusSummary> {
        let updated_count = self.sweep(Some(owner)).await?;
        let active_count = self.count(owner, TaskStatus::Active).await?;
        let completed_count = self.count(owner, TaskStatus::Completed).await?;
        let failed_count = self.count(owner, TaskStatus::Failed).await?;

        Ok(StatusSummary {
            updated_count,
            active_count,
            completed_count,
            failed_count,
        })
    }

    /// Transitions every overdue active task to failed.
    ///
    /// Scoped to one owner on user-facing read paths; unscoped for
    /// scheduled maintenance across all owners. Idempotent: a second call
    /// without the clock advancing changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when persistence fails.
    pub async fn sweep(&self, owner: Option<OwnerId>) -> TaskLifecycleResult<u64> {
        Ok(self.store.fail_overdue(owner, self.clock.utc()).await?)
    }

    async fn find_owned(&self, task_id: TaskId, owner: OwnerId) -> TaskLifecycleResult<Task> {
        match self.store.find_by_id(task_id).await? {
            Some(task) if task.owner() == owner => Ok(task),
            _ => Err(TaskLifecycleError::NotFound(task_id)),
        }
    }

    async fn list_views(
        &self,
        owner: OwnerId,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> TaskLifecycleResult<Vec<TaskView>> {
        let tasks: TaskStoreResult<Vec<Task>> =
            self.store.list_by_owner_and_status(owner, status).await;
        Ok(tasks?
            .iter()
            .map(|task| TaskView::project(task, now))
            .collect())
    }

    async fn count(&self, owner: OwnerId, status: TaskStatus) -> TaskLifecycleResult<u64> {
        Ok(self.store.count_by_owner_and_status(owner, status).await?)
    }
}
