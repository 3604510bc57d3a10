//! Core tasks – folder validation, listing, and the maintenance jobs.
//!
//! Nothing in this module depends on any TUI or rendering crate.
//! Every task takes a folder plus a `report` callback and returns a
//! summary, so it can run on a worker thread or from the headless CLI.

pub mod cleanup;
pub mod dedupe;
pub mod error;
pub mod fs;
pub mod organize;
pub mod rename;
pub mod script;
pub mod task;
