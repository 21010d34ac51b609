//! # planner-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `ScheduleStore` port defined in `planner-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between the schedule document and its rows
//!
//! ## Dependency rule
//! Depends on `planner-app` (for port traits) and `planner-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod pool;
pub mod schedule_store;

pub use pool::{Config, Database};
pub use schedule_store::SqliteScheduleStore;
