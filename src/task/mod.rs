//! Task status lifecycle for Duetrack.
//!
//! Tasks are owned by a single user and carry a due date. A task that is
//! still active past its due date is failed by a reconciliation sweep; failed
//! tasks can be reactivated with a new future deadline. Every user-facing
//! read path sweeps the owner's tasks before querying so that nobody ever
//! sees a task displayed as active past its due date. All due-date
//! comparisons happen in UTC. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
