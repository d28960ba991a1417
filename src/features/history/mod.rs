//! # Feature: History
//!
//! Append-only log of deleted tasks.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

pub mod journal;

pub use journal::{HistoryEntry, HistoryLog};
