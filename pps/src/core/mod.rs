//! Deterministic, pure logic shared by the workflows.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests.

pub mod classifier;
pub mod name;
pub mod report;
pub mod template;
pub mod types;
