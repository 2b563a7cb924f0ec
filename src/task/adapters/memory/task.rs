//! In-memory task store for tests and single-process use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{OwnerId, Task, TaskId, TaskStatus},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
///
/// Cloning shares the underlying state, so a cloned handle observes writes
/// made through the original.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Collects matching tasks ordered newest first by creation time.
fn collect_sorted<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<Task> {
    let mut matched: Vec<Task> = tasks.cloned().collect();
    matched.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    matched
}

fn lock_poisoned(err: impl std::fmt::Display) -> TaskStoreError {
    TaskStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn store(&self, task: &Task) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.contains_key(&task.id()) {
            return Err(TaskStoreError::DuplicateTask(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.contains_key(&task.id()) {
            return Err(TaskStoreError::NotFound(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_by_owner_and_status(
        &self,
        owner: OwnerId,
        status: TaskStatus,
    ) -> TaskStoreResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(collect_sorted(
            state
                .values()
                .filter(|task| task.owner() == owner && task.status() == status),
        ))
    }

    async fn list_overdue(
        &self,
        owner: Option<OwnerId>,
        now: DateTime<Utc>,
    ) -> TaskStoreResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(collect_sorted(state.values().filter(|task| {
            task.due_at() < now && owner.is_none_or(|scope| task.owner() == scope)
        })))
    }

    async fn count_by_owner_and_status(
        &self,
        owner: OwnerId,
        status: TaskStatus,
    ) -> TaskStoreResult<u64> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let count = state
            .values()
            .filter(|task| task.owner() == owner && task.status() == status)
            .count();
        u64::try_from(count).map_err(TaskStoreError::persistence)
    }

    async fn fail_overdue(
        &self,
        owner: Option<OwnerId>,
        now: DateTime<Utc>,
    ) -> TaskStoreResult<u64> {
        // A single write section makes the whole batch atomic with respect
        // to readers, and re-checking the status under the lock keeps
        // concurrent sweeps idempotent.
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let mut changed = 0_u64;
        for task in state
            .values_mut()
            .filter(|task| owner.is_none_or(|scope| task.owner() == scope))
        {
            if task.reconcile(now) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskStoreError::NotFound(id))
    }
}
