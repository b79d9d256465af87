//! Shared-knowledge-base visibility under concurrent tool invocations.
//!
//! The service layer adds no locking of its own; it relies on the engine's
//! internal synchronization (the fixture's fact store is a `DashMap`).
//! These tests pin down the visibility contract: a mutation is visible to
//! any call issued after the mutating call returns.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use heka::collect::SolutionCollector;
use heka::engine::LogicEngine;
use heka::fixture::FactEngine;
use heka::tool::ToolInput;
use heka::tools;

const WRITERS: usize = 8;

#[test]
fn concurrent_execs_then_conjunctive_query() {
    let engine = Arc::new(FactEngine::new());
    let registry = Arc::new(tools::default_registry());

    thread::scope(|scope| {
        for i in 0..WRITERS {
            let engine = Arc::clone(&engine);
            let registry = Arc::clone(&registry);
            scope.spawn(move || {
                let program = format!("claim{i}(value{i}).");
                registry
                    .execute(
                        "exec",
                        ToolInput::new().with_param("program", program),
                        engine.as_ref(),
                    )
                    .unwrap();
            });
        }
    });

    // All writers have returned, so every fact must be visible. The
    // conjunction of all ground facts has exactly one solution.
    let conjunction: Vec<String> = (0..WRITERS)
        .map(|i| format!("claim{i}(value{i})"))
        .collect();
    let out = registry
        .execute(
            "query",
            ToolInput::new().with_param("query", conjunction.join(", ")),
            engine.as_ref(),
        )
        .unwrap();
    assert_eq!(out.text, "[{}]");
}

#[test]
fn concurrent_queries_do_not_disturb_each_other() {
    let engine = Arc::new(FactEngine::new());
    engine
        .consult("color(red). color(green). color(blue).")
        .unwrap();

    thread::scope(|scope| {
        for _ in 0..4 {
            let engine = Arc::clone(&engine);
            scope.spawn(move || {
                let collector = SolutionCollector::default();
                for _ in 0..50 {
                    let set = collector.collect(engine.as_ref(), "color(X)").unwrap();
                    assert_eq!(set.len(), 3);
                }
            });
        }
    });
    assert_eq!(engine.open_iterators(), 0);
}

#[test]
fn timeout_in_one_call_leaves_other_calls_unaffected() {
    let engine = Arc::new(FactEngine::new());
    engine.consult("stable(yes).").unwrap();

    thread::scope(|scope| {
        let spinner = Arc::clone(&engine);
        scope.spawn(move || {
            let collector = SolutionCollector::new(Duration::from_millis(50));
            collector
                .collect(spinner.as_ref(), "spin_forever(X)")
                .unwrap_err();
        });

        let reader = Arc::clone(&engine);
        scope.spawn(move || {
            let collector = SolutionCollector::default();
            for _ in 0..10 {
                let set = collector.collect(reader.as_ref(), "stable(X)").unwrap();
                assert_eq!(set.len(), 1);
            }
        });
    });
    assert_eq!(engine.open_iterators(), 0);
}
