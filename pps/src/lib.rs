//! Project starter: scaffold Python projects and wrap everyday git verbs.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (name validation, template
//!   substitution, output classification, result aggregation). No I/O.
//! - **[`io`]**: Side-effecting operations (filesystem, process execution,
//!   configuration). The [`io::process::ProcessRunner`] trait is the seam that
//!   tests replace.
//!
//! Workflow modules ([`init`], [`save`], [`sync`], [`status`]) compose the two
//! into the four CLI verbs, sharing the plumbing in [`workflow`]. Each returns
//! a [`core::report::WorkflowResult`]; presenting it is the caller's job.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod init;
pub mod io;
pub mod logging;
pub mod save;
pub mod status;
pub mod sync;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod workflow;
