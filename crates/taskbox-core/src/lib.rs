//! Taskbox Core Library
//!
//! Domain operations and export pipeline for the task/list backend:
//! hierarchical key scheme, list/item operations over a [`taskbox_store::TaskTable`],
//! and the queue-decoupled CSV export worker.

pub mod config;
pub mod error;
pub mod export;
pub mod keys;
pub mod task;

pub use error::{TaskboxError, TaskboxResult};
