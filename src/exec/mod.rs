// src/exec/mod.rs

//! Work execution layer.
//!
//! - [`backend`] provides the `ExecutorBackend` trait and the production
//!   `ThreadPoolBackend`, which runs each work function on Tokio's blocking
//!   thread pool. Tests can replace it with an inline implementation.
//! - [`worker`] runs a single work item, turning errors and panics into a
//!   failed outcome, and reports it as a `Completion`.

pub mod backend;
pub mod worker;

pub use backend::{ExecutorBackend, ThreadPoolBackend};
pub use worker::run_work;
