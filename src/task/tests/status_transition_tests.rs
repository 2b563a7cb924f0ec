//! Unit tests for status transition validation.

use crate::task::domain::{OwnerId, Task, TaskRejection, TaskStatus, TaskTitle};
use crate::task::tests::support::{ManualClock, base_time};
use chrono::Duration;
use eyre::{bail, ensure};
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> ManualClock {
    ManualClock::starting_at(base_time())
}

#[fixture]
fn active_task(clock: ManualClock) -> Task {
    Task::new(
        OwnerId::new(),
        TaskTitle::new("File the tax return").expect("valid title"),
        String::new(),
        base_time() + Duration::days(1),
        &clock,
    )
}

fn failed(mut task: Task) -> Task {
    assert!(task.reconcile(task.due_at() + Duration::hours(1)));
    task
}

fn completed(mut task: Task) -> Task {
    task.complete().expect("active task completes");
    task
}

#[rstest]
#[case(TaskStatus::Active, TaskStatus::Active, false)]
#[case(TaskStatus::Active, TaskStatus::Completed, true)]
#[case(TaskStatus::Active, TaskStatus::Failed, true)]
#[case(TaskStatus::Completed, TaskStatus::Active, false)]
#[case(TaskStatus::Completed, TaskStatus::Completed, false)]
#[case(TaskStatus::Completed, TaskStatus::Failed, false)]
#[case(TaskStatus::Failed, TaskStatus::Active, true)]
#[case(TaskStatus::Failed, TaskStatus::Completed, true)]
#[case(TaskStatus::Failed, TaskStatus::Failed, false)]
fn can_transition_to_returns_expected(
    #[case] from: TaskStatus,
    #[case] to: TaskStatus,
    #[case] expected: bool,
) {
    assert_eq!(from.can_transition_to(to), expected);
}

#[rstest]
#[case(TaskStatus::Active, false)]
#[case(TaskStatus::Completed, true)]
#[case(TaskStatus::Failed, false)]
fn is_terminal_returns_expected(#[case] status: TaskStatus, #[case] expected: bool) {
    assert_eq!(status.is_terminal(), expected);
}

#[rstest]
fn complete_succeeds_from_active(active_task: Task) -> eyre::Result<()> {
    let mut task = active_task;

    task.complete()?;

    ensure!(task.status() == TaskStatus::Completed);
    Ok(())
}

#[rstest]
fn complete_succeeds_late_from_failed(active_task: Task) -> eyre::Result<()> {
    let mut task = failed(active_task);

    task.complete()?;

    ensure!(task.status() == TaskStatus::Completed);
    Ok(())
}

#[rstest]
fn complete_rejects_already_completed_without_mutation(active_task: Task) -> eyre::Result<()> {
    let mut task = completed(active_task);
    let task_id = task.id();
    let before = task.clone();

    let result = task.complete();
    let expected = Err(TaskRejection::InvalidStatusTransition {
        task_id,
        from: TaskStatus::Completed,
        to: TaskStatus::Completed,
    });

    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    ensure!(task == before);
    Ok(())
}

#[rstest]
fn reactivate_returns_failed_task_to_active(active_task: Task) -> eyre::Result<()> {
    let mut task = failed(active_task);
    let new_due = base_time() + Duration::days(3);

    task.reactivate(new_due)?;

    ensure!(task.status() == TaskStatus::Active);
    ensure!(task.due_at() == new_due);
    ensure!(task.reactivation_count() == 1);
    Ok(())
}

#[rstest]
fn reactivation_counter_only_ever_increases(active_task: Task) -> eyre::Result<()> {
    let mut task = active_task;
    let mut last_count = task.reactivation_count();

    for cycle in 1..=3_u32 {
        ensure!(task.reconcile(task.due_at() + Duration::hours(1)));
        task.reactivate(task.due_at() + Duration::days(i64::from(cycle)))?;
        ensure!(task.reactivation_count() == cycle);
        ensure!(task.reactivation_count() > last_count);
        last_count = task.reactivation_count();
    }
    Ok(())
}

#[rstest]
fn reactivate_rejects_active_task_without_field_changes(active_task: Task) -> eyre::Result<()> {
    let mut task = active_task;
    let task_id = task.id();
    let before = task.clone();

    let result = task.reactivate(base_time() + Duration::days(5));
    let expected = Err(TaskRejection::InvalidStatusTransition {
        task_id,
        from: TaskStatus::Active,
        to: TaskStatus::Active,
    });

    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    ensure!(task == before);
    Ok(())
}

#[rstest]
fn reactivate_rejects_completed_task_without_field_changes(active_task: Task) -> eyre::Result<()> {
    let mut task = completed(active_task);
    let task_id = task.id();
    let before = task.clone();

    let result = task.reactivate(base_time() + Duration::days(5));
    let expected = Err(TaskRejection::InvalidStatusTransition {
        task_id,
        from: TaskStatus::Completed,
        to: TaskStatus::Active,
    });

    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    ensure!(task == before);
    Ok(())
}

#[rstest]
fn edit_rejects_failed_task(active_task: Task) -> eyre::Result<()> {
    let mut task = failed(active_task);
    let task_id = task.id();

    let result = task.edit(crate::task::domain::TaskChanges::new().with_description("too late"));
    let expected = Err(TaskRejection::NotEditable {
        task_id,
        status: TaskStatus::Failed,
    });

    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    ensure!(task.description().is_empty());
    Ok(())
}
