//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the application state and turns it into cells on the
//! terminal.  No filesystem I/O happens here.

pub mod buttons;
pub mod layout;
pub mod log_view;
pub mod popup;
pub mod screen;
pub mod spinner;
pub mod theme;
