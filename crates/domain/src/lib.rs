//! # planner-domain
//!
//! Pure domain model for the household planner.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, hours, month-days, date keys
//! - Define the **Vocabulary** (recognized modes and phases, weekday defaults,
//!   the reserved holiday mode and the fallback phase)
//! - Define the **Schedule** (per-date mode overrides, per-mode 24-slot phase
//!   tables) and its invariants
//! - Define the **Holiday calendar** (year-independent month-days)
//! - Resolve the effective mode for a date and the phase for an hour
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod holiday;
pub mod resolver;
pub mod schedule;
pub mod vocabulary;
