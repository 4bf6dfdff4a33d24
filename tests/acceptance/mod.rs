//! Acceptance test modules for the tick scheduler.

mod common;
mod concurrency_test;
mod scheduling_test;
mod wraparound_test;
