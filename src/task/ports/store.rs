//! Store port for task persistence and owner-scoped queries.

use crate::task::domain::{OwnerId, Task, TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// The store exclusively owns all task records; services mutate them only
/// through these operations. Implementations must be safe for concurrent
/// invocation from multiple request handlers.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskStoreResult<()>;

    /// Persists changes to an existing task.
    ///
    /// The record is fully applied or fully rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskStoreResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist. Ownership checks are the
    /// caller's responsibility.
    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Returns all of an owner's tasks in the given status, newest first.
    async fn list_by_owner_and_status(
        &self,
        owner: OwnerId,
        status: TaskStatus,
    ) -> TaskStoreResult<Vec<Task>>;

    /// Returns all tasks with `due_at < now` regardless of status, newest
    /// first, optionally scoped to one owner.
    async fn list_overdue(
        &self,
        owner: Option<OwnerId>,
        now: DateTime<Utc>,
    ) -> TaskStoreResult<Vec<Task>>;

    /// Counts an owner's tasks in the given status.
    async fn count_by_owner_and_status(
        &self,
        owner: OwnerId,
        status: TaskStatus,
    ) -> TaskStoreResult<u64>;

    /// Transitions every task that is still active and still overdue at
    /// write time to failed, optionally scoped to one owner.
    ///
    /// The qualifying records are updated as a single logical batch; callers
    /// never observe a partially swept state after the call returns. The
    /// status check happens at write time (compare-and-swap, not a blind
    /// write), so concurrent sweeps cannot double-count or resurrect a
    /// completed task. Returns the number of tasks changed; calling again
    /// without the clock advancing returns zero.
    async fn fail_overdue(
        &self,
        owner: Option<OwnerId>,
        now: DateTime<Utc>,
    ) -> TaskStoreResult<u64>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskStoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
