// src/lib.rs

//! Dependency-graph task executor.
//!
//! Callers describe [`Task`]s wired together by [`Binding`]s, then
//! [`run_graph`] validates that the graph is acyclic and returns a lazily
//! started [`GraphRun`]: independent tasks run concurrently on a bounded
//! worker pool, and outputs of streaming tasks arrive in completion order.
//!
//! ```no_run
//! use taskdag::{run_graph, Binding, Task};
//!
//! # async fn demo() -> taskdag::errors::Result<()> {
//! let hello = Task::new("hello", |_| Ok("Hello, World!".to_string()))
//!     .ready()
//!     .streaming();
//! let thanked = Task::new("thanked", |inputs| Ok(format!("{} thanks", inputs.arg(0)?)))
//!     .arg(Binding::of(&hello))
//!     .streaming();
//!
//! let mut run = run_graph(vec![hello, thanked], 4)?;
//! while let Some(item) = run.next().await {
//!     let (value, task) = item?.into_pair();
//!     println!("{task}: {value}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dag;
pub mod demo;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod task;
pub mod types;

pub use dag::{GraphSummary, TaskGraph};
pub use engine::{run_graph, run_graph_with, GraphRun, RunOptions, StreamItem};
pub use errors::TaskdagError;
pub use task::{Binding, Task, TaskInputs};

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_and_validate, ConfigFile};
use crate::dag::check_acyclic;
use crate::exec::ThreadPoolBackend;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the demo task graph
/// - optional summary / dry-run output
/// - the run itself, printing each streamed output
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_config(args.config.as_deref())?;

    let mut options = RunOptions::from(&cfg);
    if let Some(max_workers) = args.max_workers {
        options.max_workers = max_workers;
    }

    let graph = TaskGraph::new(demo::demo_tasks())?;

    if args.summary || args.dry_run || cfg.summary.print {
        println!("{}", GraphSummary::from_graph(&graph));
    }

    if args.dry_run {
        check_acyclic(&graph)?;
        println!("taskdag dry-run: {} tasks, no cycles", graph.len());
        debug!("dry-run complete (no execution)");
        return Ok(());
    }

    info!(max_workers = options.max_workers, "running demo graph");
    let mut run = run_graph_with(graph, options, ThreadPoolBackend::new())?;
    while let Some(item) = run.next().await {
        let (value, task) = item?.into_pair();
        println!("{:?}", (value, task));
    }

    Ok(())
}

/// Explicit path must exist; otherwise use `Taskdag.toml` if present, or
/// built-in defaults.
fn load_config(path: Option<&str>) -> Result<ConfigFile> {
    match path {
        Some(path) => Ok(load_and_validate(Path::new(path))?),
        None => {
            let path = default_config_path();
            if path.exists() {
                Ok(load_and_validate(&path)?)
            } else {
                debug!(path = %path.display(), "no config file; using defaults");
                Ok(ConfigFile::default())
            }
        }
    }
}
