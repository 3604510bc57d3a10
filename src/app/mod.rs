//! Application orchestration: state, input handling, background jobs.

pub mod event;
pub mod handler;
pub mod input;
pub mod jobs;
pub mod log;
pub mod picker;
pub mod state;
