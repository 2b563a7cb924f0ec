//! `PostgreSQL` store implementation for task persistence.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{OwnerId, PersistedTaskData, Task, TaskId, TaskStatus, TaskTitle},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::persistence)?
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn store(&self, task: &Task) -> TaskStoreResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskStoreError::DuplicateTask(task_id)
                    }
                    _ => TaskStoreError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskStoreResult<()> {
        let task_id = task.id();
        let title = task.title().as_str().to_owned();
        let description = task.description().to_owned();
        let due_at = task.due_at();
        let status = task.status().as_str();
        let reactivation_count =
            i32::try_from(task.reactivation_count()).map_err(TaskStoreError::persistence)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(tasks::table.find(task_id.into_inner()))
                .set((
                    tasks::title.eq(title),
                    tasks::description.eq(description),
                    tasks::due_at.eq(due_at),
                    tasks::status.eq(status),
                    tasks::reactivation_count.eq(reactivation_count),
                ))
                .execute(connection)
                .map_err(TaskStoreError::persistence)?;
            if affected == 0 {
                return Err(TaskStoreError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskStoreError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_owner_and_status(
        &self,
        owner: OwnerId,
        status: TaskStatus,
    ) -> TaskStoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::owner.eq(owner.into_inner()))
                .filter(tasks::status.eq(status.as_str()))
                .order(tasks::created_at.desc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_overdue(
        &self,
        owner: Option<OwnerId>,
        now: DateTime<Utc>,
    ) -> TaskStoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .filter(tasks::due_at.lt(now))
                .order(tasks::created_at.desc())
                .select(TaskRow::as_select())
                .into_boxed();
            if let Some(scope) = owner {
                query = query.filter(tasks::owner.eq(scope.into_inner()));
            }
            let rows = query
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn count_by_owner_and_status(
        &self,
        owner: OwnerId,
        status: TaskStatus,
    ) -> TaskStoreResult<u64> {
        self.run_blocking(move |connection| {
            let count: i64 = tasks::table
                .filter(tasks::owner.eq(owner.into_inner()))
                .filter(tasks::status.eq(status.as_str()))
                .count()
                .get_result(connection)
                .map_err(TaskStoreError::persistence)?;
            u64::try_from(count).map_err(TaskStoreError::persistence)
        })
        .await
    }

    async fn fail_overdue(
        &self,
        owner: Option<OwnerId>,
        now: DateTime<Utc>,
    ) -> TaskStoreResult<u64> {
        self.run_blocking(move |connection| {
            // Single UPDATE statement: the status predicate is evaluated at
            // write time, so a racing sweep or completion wins cleanly and
            // the second writer changes nothing.
            let changed = match owner {
                Some(scope) => diesel::update(
                    tasks::table
                        .filter(tasks::owner.eq(scope.into_inner()))
                        .filter(tasks::status.eq(TaskStatus::Active.as_str()))
                        .filter(tasks::due_at.lt(now)),
                )
                .set(tasks::status.eq(TaskStatus::Failed.as_str()))
                .execute(connection),
                None => diesel::update(
                    tasks::table
                        .filter(tasks::status.eq(TaskStatus::Active.as_str()))
                        .filter(tasks::due_at.lt(now)),
                )
                .set(tasks::status.eq(TaskStatus::Failed.as_str()))
                .execute(connection),
            }
            .map_err(TaskStoreError::persistence)?;
            u64::try_from(changed).map_err(TaskStoreError::persistence)
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskStoreError::persistence)?;
            if affected == 0 {
                return Err(TaskStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn to_new_row(task: &Task) -> TaskStoreResult<NewTaskRow> {
    let reactivation_count =
        i32::try_from(task.reactivation_count()).map_err(TaskStoreError::persistence)?;
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        owner: task.owner().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        due_at: task.due_at(),
        created_at: task.created_at(),
        status: task.status().as_str().to_owned(),
        reactivation_count,
    })
}

fn row_to_task(row: TaskRow) -> TaskStoreResult<Task> {
    let TaskRow {
        id,
        owner,
        title: persisted_title,
        description,
        due_at,
        created_at,
        status: persisted_status,
        reactivation_count: persisted_count,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskStoreError::persistence)?;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskStoreError::persistence)?;
    let reactivation_count = u32::try_from(persisted_count).map_err(TaskStoreError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner: OwnerId::from_uuid(owner),
        title,
        description,
        due_at,
        created_at,
        status,
        reactivation_count,
    };
    Ok(Task::from_persisted(data))
}
