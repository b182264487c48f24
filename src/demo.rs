// src/demo.rs

//! Built-in demo workflow run by the `taskdag` binary.
//!
//! ```text
//! hello ──► after_hello ──┐
//!                         ├──► after_both ──┐
//! another ────────────────┘                 ├──► final*
//!    └────► after_another* ─────────────────┘
//! ```
//! Tasks marked `*` stream their output.

use std::thread;
use std::time::Duration;

use anyhow::Result;

use crate::task::{Binding, Task, TaskInputs};

pub fn demo_tasks() -> Vec<Task<String>> {
    vec![
        Task::new("hello", |_| Ok("Hello, World!".to_string())).ready(),
        Task::new("another", |_| Ok("Another hello world".to_string())).ready(),
        Task::new("after_hello", add_thanks).arg(Binding::to("hello")),
        Task::new("after_another", add_thanks)
            .arg(Binding::to("another"))
            .streaming(),
        Task::new("after_both", merge)
            .arg(Binding::to("another"))
            .arg(Binding::to("after_hello")),
        Task::new("final", echo)
            .arg(Binding::to("after_another"))
            .kwarg("after_both", Binding::to("after_both"))
            .streaming(),
    ]
}

fn add_thanks(inputs: TaskInputs<String>) -> Result<String> {
    thread::sleep(Duration::from_millis(20));
    Ok(format!("{} thanks", inputs.arg(0)?))
}

fn merge(inputs: TaskInputs<String>) -> Result<String> {
    Ok(format!("{}\n\n{}", inputs.arg(0)?, inputs.arg(1)?))
}

fn echo(inputs: TaskInputs<String>) -> Result<String> {
    let after_both = inputs.kwarg("after_both").map(String::as_str).unwrap_or("");
    Ok(format!("{}{}", inputs.arg(0)?, after_both))
}
