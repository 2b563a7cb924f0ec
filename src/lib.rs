//! Duetrack: personal task tracking core.
//!
//! This crate provides the status lifecycle for user-owned tasks: records
//! transition between active, completed, and failed states based on a due
//! date, with overdue detection reconciled synchronously on every read path.
//!
//! # Architecture
//!
//! Duetrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`task`]: Task aggregate, status reconciliation, and store operations

pub mod task;
