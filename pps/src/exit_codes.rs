//! Stable exit codes for `pps` commands.

/// Every step succeeded or had nothing to do (warnings included).
pub const OK: i32 = 0;
/// A required tool step failed (commit, pull, push, status).
pub const TOOL_FAILURE: i32 = 1;
/// Bad user input: invalid name, empty message, not a repository.
pub const INVALID: i32 = 2;
/// Environment problem: executable not installed, unreadable config.
pub const SETUP: i32 = 3;
/// Scaffolding could not be written (target exists, template problem, I/O).
pub const FILESYSTEM: i32 = 4;
