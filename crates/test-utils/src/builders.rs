#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use taskdag::{Binding, Task, TaskInputs};

/// What a recorded task did, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkEvent {
    Started(String),
    Finished(String),
}

/// Shared, thread-safe log of [`WorkEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<WorkEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: WorkEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<WorkEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn position(&self, event: &WorkEvent) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }

    /// Index of `Started(name)`; panics if the task never started.
    pub fn started_at(&self, name: &str) -> usize {
        self.position(&WorkEvent::Started(name.to_string()))
            .unwrap_or_else(|| panic!("task {name} never started"))
    }

    /// Index of `Finished(name)`; panics if the task never finished.
    pub fn finished_at(&self, name: &str) -> usize {
        self.position(&WorkEvent::Finished(name.to_string()))
            .unwrap_or_else(|| panic!("task {name} never finished"))
    }

    pub fn times_started(&self, name: &str) -> usize {
        let started = WorkEvent::Started(name.to_string());
        self.events().iter().filter(|e| **e == started).count()
    }
}

/// A task that logs its start and finish, sleeps for `delay`, and returns
/// `name` or `name(input,input,...)` built from its positional inputs.
pub fn recorded_task(log: &EventLog, name: &str, deps: &[&str], delay: Duration) -> Task<String> {
    let log = log.clone();
    let own = name.to_string();

    let task = Task::new(name, move |inputs: TaskInputs<String>| {
        log.push(WorkEvent::Started(own.clone()));
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        let out = if inputs.args.is_empty() {
            own.clone()
        } else {
            format!("{}({})", own, inputs.args.join(","))
        };
        log.push(WorkEvent::Finished(own.clone()));
        Ok(out)
    });

    let task = task.args(deps.iter().map(|dep| Binding::to(*dep)));
    if deps.is_empty() { task.ready() } else { task }
}

/// A ready task returning `value`.
pub fn constant_task(name: &str, value: &str) -> Task<String> {
    let value = value.to_string();
    Task::new(name, move |_| Ok(value.clone())).ready()
}

/// A task whose work always returns an error carrying `message`.
pub fn failing_task(name: &str, message: &str) -> Task<String> {
    let message = message.to_string();
    Task::new(name, move |_| Err(anyhow!("{message}")))
}
