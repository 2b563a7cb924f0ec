//! Diesel schema for task persistence.
//!
//! `owner` is indexed for per-user queries and `due_at` for overdue scans.

diesel::table! {
    /// Task records with owner scoping and due-date lifecycle fields.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning user's identifier.
        owner -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Due date, stored in UTC.
        due_at -> Timestamptz,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Number of times the task has been reactivated.
        reactivation_count -> Integer,
    }
}
