//! # planner-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ScheduleStore`: read and replace the schedule document
//!   - `NotificationSink`: push a value to a named external entity
//!   - `Clock`: the local wall clock
//! - Define **driving/inbound ports** as use-case structs:
//!   - `ScheduleService`: read, edit, validate and preview the schedule
//!   - `SyncLoop`: resolve the current state and push only what changed
//! - Provide **in-process infrastructure** (the cancellable periodic task and
//!   the sync status channel) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `planner-domain` only (plus `tokio` for channels, timers and
//! spawning). Never imports adapter crates. Adapters depend on *this* crate,
//! not the reverse.

pub mod periodic;
pub mod ports;
pub mod services;
pub mod sync_loop;
