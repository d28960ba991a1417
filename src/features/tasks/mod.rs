//! # Feature: Tasks
//!
//! Task records, form validation and the persisted task repository.
//!
//! - **Version**: 1.3.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.3.0: Older stored records are upgraded in place on load
//! - 1.2.0: Unique task ids; title removal kept for bulk deletes
//! - 1.1.0: 24-hour storage of due time
//! - 1.0.0: Initial release

pub mod form;
pub mod model;
pub mod repository;

pub use form::{parse_tags, TaskForm};
pub use model::{Meridiem, Priority, Repeat, Task, TaskId};
pub use repository::TaskRepository;
