//! Common utilities for acceptance tests.

#![allow(dead_code)] // Not every helper is used by every test module

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tick_core::Action;

/// A shared fire counter readable from the test body.
pub type FireCount = Arc<AtomicU32>;

/// Build an action that counts its own invocations.
pub fn counting_action() -> (Action, FireCount) {
    let count = Arc::new(AtomicU32::new(0));
    let c = Arc::clone(&count);
    (
        Box::new(move || {
            c.fetch_add(1, Ordering::Relaxed);
        }),
        count,
    )
}

/// Read a fire counter.
pub fn fires(count: &FireCount) -> u32 {
    count.load(Ordering::Relaxed)
}

/// A shared append-only log of string tags, for ordering assertions.
pub type FireLog = Arc<Mutex<Vec<&'static str>>>;

/// Create an empty fire log.
pub fn fire_log() -> FireLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Build an action that appends `tag` to the log each time it runs.
pub fn tagging_action(log: &FireLog, tag: &'static str) -> Action {
    let log = Arc::clone(log);
    Box::new(move || {
        log.lock().unwrap().push(tag);
    })
}

/// Snapshot the log contents.
pub fn logged(log: &FireLog) -> Vec<&'static str> {
    log.lock().unwrap().clone()
}
