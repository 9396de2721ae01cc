//! I/O helpers for workflow operations.

pub mod config;
pub mod git;
pub mod process;
pub mod scaffold;
pub mod templates;
