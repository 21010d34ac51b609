//! # planner-adapter-home-assistant
//!
//! Home Assistant adapter for the `NotificationSink` port.
//!
//! ## Responsibilities
//! - Select the resolved option on `input_select` entities through the
//!   `input_select.select_option` service
//! - Authenticate with a long-lived or supervisor bearer token
//! - Classify failures: missing or rejected credential, error status,
//!   unreachable hub, timeout
//!
//! ## Dependency rule
//! Depends on `planner-app` (for the port trait and its error type).
//! The `app` and `domain` crates must never reference this adapter.

pub mod config;
pub mod sink;

pub use config::HomeAssistantConfig;
pub use sink::HomeAssistantSink;
