//! Behavioural integration tests for the task status lifecycle.
//!
//! These tests exercise the service and the in-memory store together in a
//! realistic multi-week usage flow, verifying that reconcile-on-read keeps
//! the user-visible state consistent as the clock advances.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

mod test_helpers;

use duetrack::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{OwnerId, TaskStatus},
    services::{CreateTaskRequest, TaskLifecycleService},
};
use chrono::Duration;
use mockable::Clock;
use std::sync::Arc;
use test_helpers::{ManualClock, base_time};
use tokio::runtime::Runtime;

/// Creates a tokio runtime for async operations in tests.
fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Walks one owner's tasks through completion, failure, reactivation, and
/// deletion, checking the grouped listing and status counts along the way.
#[test]
fn multi_week_task_lifecycle_flow() {
    let rt = test_runtime();
    let clock = Arc::new(ManualClock::starting_at(base_time()));
    let service = TaskLifecycleService::new(
        Arc::new(InMemoryTaskStore::new()),
        Arc::clone(&clock),
    );
    let owner = OwnerId::new();

    // Week one: three tasks with staggered deadlines.
    let groceries = rt
        .block_on(service.create_task(CreateTaskRequest::new(
            owner,
            "Buy groceries",
            clock.utc() + Duration::days(1),
        )))
        .expect("create groceries");
    let tax_return = rt
        .block_on(service.create_task(
            CreateTaskRequest::new(owner, "File the tax return", clock.utc() + Duration::days(2))
                .with_description("Forms are in the blue folder"),
        ))
        .expect("create tax return");
    let library = rt
        .block_on(service.create_task(CreateTaskRequest::new(
            owner,
            "Return library books",
            clock.utc() + Duration::days(5),
        )))
        .expect("create library");

    // Groceries get done the same day.
    rt.block_on(service.complete_task(groceries.id, owner))
        .expect("complete groceries");

    // Three days later the tax return has slipped past its deadline.
    clock.advance(Duration::days(3));
    let summary = rt
        .block_on(service.status_counts(owner))
        .expect("status counts");
    assert_eq!(summary.updated_count, 1);
    assert_eq!(summary.active_count, 1);
    assert_eq!(summary.completed_count, 1);
    assert_eq!(summary.failed_count, 1);

    // The failed tax return gets a new deadline.
    let reactivated = rt
        .block_on(service.reactivate_task(
            tax_return.id,
            owner,
            clock.utc() + Duration::days(2),
        ))
        .expect("reactivate tax return");
    assert_eq!(reactivated.status, TaskStatus::Active);
    assert_eq!(reactivated.reactivation_count, 1);

    let board = rt.block_on(service.list_tasks(owner)).expect("list tasks");
    assert_eq!(board.total, 3);
    assert_eq!(board.active.len(), 2);
    assert_eq!(board.completed.len(), 1);
    assert!(board.failed.is_empty());

    // The tax return gets finished this time; the library books do not.
    rt.block_on(service.complete_task(tax_return.id, owner))
        .expect("complete tax return");
    clock.advance(Duration::days(10));

    let late_summary = rt
        .block_on(service.status_counts(owner))
        .expect("status counts");
    assert_eq!(late_summary.updated_count, 1);
    assert_eq!(late_summary.active_count, 0);
    assert_eq!(late_summary.completed_count, 2);
    assert_eq!(late_summary.failed_count, 1);

    // Cleaning up the failed entry leaves only the finished work.
    rt.block_on(service.delete_task(library.id, owner))
        .expect("delete library");
    let final_board = rt.block_on(service.list_tasks(owner)).expect("list tasks");
    assert_eq!(final_board.total, 2);
    assert!(
        final_board
            .completed
            .iter()
            .all(|view| view.status == TaskStatus::Completed)
    );
}

/// Two owners' sweeps and listings never interfere with each other.
#[test]
fn sweeps_are_scoped_per_owner_across_the_service() {
    let rt = test_runtime();
    let clock = Arc::new(ManualClock::starting_at(base_time()));
    let service = TaskLifecycleService::new(
        Arc::new(InMemoryTaskStore::new()),
        Arc::clone(&clock),
    );
    let alice = OwnerId::new();
    let bob = OwnerId::new();

    let hers = rt
        .block_on(service.create_task(CreateTaskRequest::new(
            alice,
            "Hers",
            clock.utc() + Duration::hours(1),
        )))
        .expect("create hers");
    let his = rt
        .block_on(service.create_task(CreateTaskRequest::new(
            bob,
            "His",
            clock.utc() + Duration::hours(1),
        )))
        .expect("create his");

    clock.advance(Duration::hours(2));

    // Alice's page load sweeps only her tasks.
    let her_board = rt.block_on(service.list_tasks(alice)).expect("her board");
    assert_eq!(her_board.failed.len(), 1);
    assert_eq!(her_board.failed.first().map(|view| view.id), Some(hers.id));

    // Bob's record is untouched until a read of his own sweeps it.
    let unswept = rt
        .block_on(service.sweep(None))
        .expect("global sweep succeeds");
    assert_eq!(unswept, 1);
    let his_view = rt
        .block_on(service.get_task(his.id, bob))
        .expect("his task");
    assert_eq!(his_view.status, TaskStatus::Failed);
}
