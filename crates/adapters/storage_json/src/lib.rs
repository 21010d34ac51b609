//! # planner-adapter-storage-json
//!
//! Schedule persistence in a single JSON file.
//!
//! ## Responsibilities
//! - Implement the `ScheduleStore` port defined in `planner-app::ports`
//! - Read and write the add-on document format:
//!   `{ "phases": { mode: table }, "modes": { "YYYY-MM-DD": mode } }`
//! - Replace the file atomically so readers never see a partial write
//!
//! ## Dependency rule
//! Depends on `planner-app` (for port traits) and `planner-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod schedule_store;

pub use schedule_store::JsonFileScheduleStore;
