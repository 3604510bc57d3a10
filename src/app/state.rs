//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use ratatui::layout::Rect;

use crate::config::{Action, AppConfig};
use crate::core::task::TaskKind;

use super::input::TextInput;
use super::jobs::Job;
use super::log::ActivityLog;
use super::picker::Picker;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Main,
    /// Typing into the folder field.
    EditFolder,
    Picker,
    SaveLogPrompt,
    Controls,
}

/// Top-level application state.
pub struct AppState {
    /// Preferences and key bindings.
    pub config: AppConfig,
    /// Current working folder (the folder field).
    pub folder: String,
    /// Text being edited in the folder field or a prompt.
    pub input: TextInput,
    pub log: ActivityLog,
    /// Button with keyboard focus.
    pub focus: Action,
    pub active_view: ActiveView,
    pub picker: Option<Picker>,
    /// Set while a job runs; the only state shared with workers.
    pub busy: Option<TaskKind>,
    /// Jobs queued by the handler; the event loop spawns them.
    pub pending_jobs: Vec<Job>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Last known terminal size, for mouse hit-testing.
    pub terminal_area: Rect,
    /// Monotonic tick counter (drives the busy spinner).
    pub tick: u64,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let folder = config.prefs.last_folder.clone();
        Self {
            config,
            folder,
            input: TextInput::default(),
            log: ActivityLog::default(),
            focus: Action::Rename,
            active_view: ActiveView::default(),
            picker: None,
            busy: None,
            pending_jobs: Vec::new(),
            should_quit: false,
            terminal_area: Rect::default(),
            tick: 0,
        }
    }
}
