//! # planner-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** to read and edit the schedule
//!   (`/api/planner/config`, `/api/planner/overrides/{date}`,
//!   `/api/planner/phases/{mode}/{hour}`)
//! - Preview what the resolvers give for any date and hour
//! - Expose the vocabulary and the sync loop status
//! - Map HTTP requests into application service calls (driving adapter)
//!
//! ## Dependency rule
//! Depends on `planner-app` (for port traits and services) and `planner-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
