// tests/failure_handling.rs

mod common;
use crate::common::builders::{constant_task, failing_task, recorded_task, EventLog};
use crate::common::{drain, init_tracing, with_timeout, InlineBackend};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use taskdag::task::RunState;
use taskdag::{
    run_graph, run_graph_with, Binding, RunOptions, Task, TaskGraph, TaskInputs, TaskdagError,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::test]
async fn failure_aborts_and_reports_unreachable_tasks() -> TestResult {
    init_tracing();
    let log = EventLog::new();

    let boom = failing_task("boom", "exploded").ready();
    let after = recorded_task(&log, "after_boom", &["boom"], Duration::ZERO).streaming();

    let mut run = run_graph(vec![boom, after], 2)?;
    let (items, err) = with_timeout(drain(&mut run)).await;

    assert!(items.is_empty());
    match err {
        Some(TaskdagError::TaskFailed {
            task,
            message,
            unreachable,
            skipped,
        }) => {
            assert_eq!(task, "boom");
            assert!(message.contains("exploded"), "message: {message}");
            assert_eq!(unreachable, vec!["after_boom"]);
            assert!(skipped.is_empty());
        }
        other => panic!("expected TaskFailed, got {other:?}"),
    }

    // The sequence stays finished after the error.
    assert!(run.next().await.is_none());

    let graph = run.into_graph().await?;
    assert_eq!(graph.get("boom").unwrap().state(), RunState::Failed);
    assert!(!graph.get("after_boom").unwrap().is_started());
    assert_eq!(log.times_started("after_boom"), 0);
    Ok(())
}

#[tokio::test]
async fn outputs_streamed_before_the_failure_are_delivered() -> TestResult {
    init_tracing();
    let log = EventLog::new();

    let ok = constant_task("ok", "fine").streaming();
    let boom = Task::new("boom", |inputs| -> anyhow::Result<String> {
        anyhow::bail!("cannot handle {}", inputs.arg(0)?)
    })
    .arg(Binding::to("ok"));
    let after = recorded_task(&log, "after", &["boom"], Duration::ZERO).streaming();

    let mut run = run_graph(vec![ok, boom, after], 1)?;
    let (items, err) = with_timeout(drain(&mut run)).await;

    assert_eq!(items, vec![("fine".to_string(), "ok".to_string())]);
    let err = err.expect("run should fail");
    assert!(err.to_string().contains("cannot handle fine"), "{err}");
    assert_eq!(log.times_started("after"), 0);
    Ok(())
}

#[tokio::test]
async fn independent_tasks_left_unstarted_are_reported_as_skipped() -> TestResult {
    init_tracing();
    let log = EventLog::new();
    let backend = InlineBackend::new();

    let graph = TaskGraph::new(vec![
        failing_task("boom", "nope").ready(),
        recorded_task(&log, "other", &[], Duration::ZERO),
        recorded_task(&log, "downstream", &["boom"], Duration::ZERO),
    ])?;

    let mut run = run_graph_with(graph, RunOptions::with_max_workers(1), backend.clone())?;
    let (_, err) = with_timeout(drain(&mut run)).await;

    match err {
        Some(TaskdagError::TaskFailed {
            unreachable,
            skipped,
            ..
        }) => {
            assert_eq!(unreachable, vec!["downstream"]);
            assert_eq!(skipped, vec!["other"]);
        }
        other => panic!("expected TaskFailed, got {other:?}"),
    }
    assert_eq!(backend.dispatched(), vec!["boom"]);
    assert!(log.events().is_empty());
    Ok(())
}

#[tokio::test]
async fn panicking_work_fails_the_run() -> TestResult {
    init_tracing();

    let bad = Task::new("bad", |_| -> anyhow::Result<u32> { panic!("kaboom") }).ready();

    let err = with_timeout(run_graph(vec![bad], 1)?.collect())
        .await
        .expect_err("panic should fail the run");

    match err {
        TaskdagError::TaskFailed { task, message, .. } => {
            assert_eq!(task, "bad");
            assert!(message.contains("kaboom"), "message: {message}");
        }
        other => panic!("expected TaskFailed, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn eagerly_ready_task_with_pending_binding_fails_for_any_worker_count() -> TestResult {
    init_tracing();

    for max_workers in 1..=3 {
        let log = EventLog::new();
        let slow = recorded_task(&log, "slow", &[], Duration::from_millis(20));
        let eager = Task::new("eager", |inputs: TaskInputs<String>| Ok(inputs.arg(0)?.clone()))
            .arg(Binding::to("slow"))
            .ready()
            .streaming();

        let err = with_timeout(run_graph(vec![slow, eager], max_workers)?.collect())
            .await
            .expect_err("unresolved binding should fail the run");

        match err {
            TaskdagError::UnresolvedBinding { source_task } => assert_eq!(source_task, "slow"),
            other => panic!("expected UnresolvedBinding, got {other:?}"),
        }
        assert_eq!(log.times_started("slow"), 0, "max_workers={max_workers}");
    }
    Ok(())
}

#[tokio::test]
async fn panicking_postprocess_fails_its_task() -> TestResult {
    init_tracing();
    let log = EventLog::new();

    let a = Task::new("a", |_| Ok("raw".to_string()))
        .postprocess(|_: String| -> String { panic!("post blew up") })
        .ready();
    let b = recorded_task(&log, "b", &["a"], Duration::ZERO).streaming();

    let mut run = run_graph(vec![a, b], 2)?;
    let (items, err) = with_timeout(drain(&mut run)).await;

    assert!(items.is_empty());
    match err {
        Some(TaskdagError::TaskFailed {
            task,
            message,
            unreachable,
            ..
        }) => {
            assert_eq!(task, "a");
            assert!(message.contains("post blew up"), "message: {message}");
            assert_eq!(unreachable, vec!["b"]);
        }
        other => panic!("expected TaskFailed, got {other:?}"),
    }

    // The graph survives the panic.
    let graph = run.into_graph().await?;
    assert!(graph.get("a").unwrap().is_failed());
    assert_eq!(log.times_started("b"), 0);
    Ok(())
}

#[tokio::test]
async fn panicking_transform_fails_the_dependent() -> TestResult {
    init_tracing();
    let log = EventLog::new();

    let a = constant_task("a", "value");
    let b = Task::new("b", |inputs: TaskInputs<String>| Ok(inputs.arg(0)?.clone()))
        .arg(Binding::to("a").map(|_: &String| -> String { panic!("transform blew up") }));
    let c = recorded_task(&log, "c", &["b"], Duration::ZERO);

    let mut run = run_graph(vec![a, b, c], 2)?;
    let (_, err) = with_timeout(drain(&mut run)).await;

    match err {
        Some(TaskdagError::TaskFailed {
            task,
            message,
            unreachable,
            ..
        }) => {
            assert_eq!(task, "b");
            assert!(message.contains("transform blew up"), "message: {message}");
            assert_eq!(unreachable, vec!["c"]);
        }
        other => panic!("expected TaskFailed, got {other:?}"),
    }

    let graph = run.into_graph().await?;
    assert_eq!(graph.get("a").unwrap().output()?, "value");
    assert!(graph.get("b").unwrap().is_failed());
    assert_eq!(log.times_started("c"), 0);
    Ok(())
}

#[tokio::test]
async fn cyclic_graph_is_rejected_before_any_work_runs() -> TestResult {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));

    let counted = |name: &str, dep: &str| {
        let calls = Arc::clone(&calls);
        Task::new(name, move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(0u32)
        })
        .arg(Binding::to(dep))
    };

    let err = run_graph(vec![counted("x", "y"), counted("y", "x")], 2)
        .expect_err("cycle should be rejected");

    assert_eq!(err.cycle().map(|c| c.len()), Some(2));
    assert!(err.to_string().contains("x → y → x"), "{err}");
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn graph_construction_rejects_bad_names() {
    let dup = TaskGraph::new(vec![constant_task("a", "1"), constant_task("a", "2")]);
    assert!(matches!(dup, Err(TaskdagError::DuplicateTask(name)) if name == "a"));

    let unknown = TaskGraph::new(vec![
        Task::new("b", |_| Ok(String::new())).arg(Binding::to("missing")),
    ]);
    match unknown {
        Err(TaskdagError::UnknownDependency { task, dependency }) => {
            assert_eq!(task, "b");
            assert_eq!(dependency, "missing");
        }
        other => panic!("expected UnknownDependency, got {other:?}"),
    }
}
