//! Input handling: maps key/mouse events to state mutations.
//!
//! Nothing here spawns work directly: jobs are queued on
//! `AppState::pending_jobs` and the event loop starts them.

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Action;
use crate::core::error::TaskError;
use crate::core::fs;
use crate::core::script::{self, ScriptKind};
use crate::core::task::{Severity, TaskKind};
use crate::ui::buttons::{self, hit_test};
use crate::ui::layout::{contains, AppLayout};
use crate::ui::popup::picker_list_height;

use super::input::TextInput;
use super::jobs::{failure_message, Job, JobUpdate};
use super::log::default_log_name;
use super::picker::{PickOutcome, Picker, PickerPurpose};
use super::state::{ActiveView, AppState};

pub const GITHUB_URL: &str = "https://github.com";

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        perform(state, Action::Quit);
        return;
    }

    match state.active_view {
        ActiveView::Main => handle_main_key(state, key),
        ActiveView::EditFolder => handle_edit_folder_key(state, key),
        ActiveView::Picker => handle_picker_key(state, key),
        ActiveView::SaveLogPrompt => handle_save_prompt_key(state, key),
        ActiveView::Controls => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q'))
                || state.config.match_key(key) == Some(Action::ShowControls)
            {
                state.active_view = ActiveView::Main;
            }
        }
    }
}

/// Text pasted into the terminal goes to whichever field is being edited.
pub fn handle_paste(state: &mut AppState, text: &str) {
    if matches!(state.active_view, ActiveView::EditFolder | ActiveView::SaveLogPrompt) {
        state.input.insert_str(text.trim_end_matches(['\r', '\n']));
    }
}

// ── Main window ─────────────────────────────────────────────────

fn handle_main_key(state: &mut AppState, key: KeyEvent) {
    // Focus and log navigation are fixed; everything else is configurable.
    match key.code {
        KeyCode::Tab | KeyCode::Right => {
            state.focus = buttons::next_focus(state.focus);
            return;
        }
        KeyCode::BackTab | KeyCode::Left => {
            state.focus = buttons::prev_focus(state.focus);
            return;
        }
        KeyCode::Up if key.modifiers.is_empty() => {
            state.focus = buttons::vertical_focus(state.focus, false);
            return;
        }
        KeyCode::Down if key.modifiers.is_empty() => {
            state.focus = buttons::vertical_focus(state.focus, true);
            return;
        }
        KeyCode::Enter => {
            let focus = state.focus;
            perform(state, focus);
            return;
        }
        KeyCode::PageUp => {
            state.log.scroll_up(10);
            return;
        }
        KeyCode::PageDown => {
            state.log.scroll_down(10);
            return;
        }
        KeyCode::End => {
            state.log.scroll = 0;
            return;
        }
        _ => {}
    }

    if let Some(action) = state.config.match_key(key) {
        perform(state, action);
    }
}

/// Run a user command. Shared by key bindings, Enter on a focused button
/// and mouse clicks.
pub fn perform(state: &mut AppState, action: Action) {
    if action.is_task() && refuse_if_busy(state) {
        return;
    }

    match action {
        Action::Browse => open_picker(state, PickerPurpose::Folder),
        Action::EditFolder => {
            state.input = TextInput::with_value(state.folder.clone());
            state.active_view = ActiveView::EditFolder;
        }
        Action::Rename => start_file_task(state, TaskKind::Rename),
        Action::Organize => start_file_task(state, TaskKind::Organize),
        Action::Dedupe => start_file_task(state, TaskKind::Dedupe),
        Action::CleanTemp => start_file_task(state, TaskKind::CleanTemp),
        Action::RunPython => open_picker(state, PickerPurpose::Script(ScriptKind::Python)),
        Action::RunAhk => {
            // Check the interpreter before making the user pick a script.
            let configured = state.config.prefs.ahk_interpreter.clone();
            if let Err(e) = script::resolve_interpreter(ScriptKind::AutoHotkey, configured.as_deref()) {
                state.log.push(Severity::Error, format!("Error: {e}"));
                return;
            }
            open_picker(state, PickerPurpose::Script(ScriptKind::AutoHotkey));
        }
        Action::OpenFolder => open_folder(state),
        Action::ClearLog => {
            state.log.clear();
            state.log.info("Log cleared.");
        }
        Action::SaveLog => {
            let dir = fs::validate_folder(&state.folder).unwrap_or_default();
            let suggestion = dir.join(default_log_name());
            state.input = TextInput::with_value(suggestion.display().to_string());
            state.active_view = ActiveView::SaveLogPrompt;
        }
        Action::OpenGithub => match open::that_detached(GITHUB_URL) {
            Ok(()) => state.log.info("Browser opened at GitHub"),
            Err(e) => state
                .log
                .push(Severity::Warning, format!("Could not open browser: {e}")),
        },
        Action::ShowControls => state.active_view = ActiveView::Controls,
        Action::Quit => quit(state),
    }
}

fn refuse_if_busy(state: &mut AppState) -> bool {
    let Some(running) = state.busy else {
        return false;
    };
    state.log.push(
        Severity::Warning,
        format!("A task is already running ({running}); wait for it to finish."),
    );
    true
}

fn report_folder_error(state: &mut AppState, err: &TaskError) {
    match err {
        TaskError::NoFolder => state
            .log
            .push(Severity::Warning, "Please select a folder first."),
        other => state.log.push(Severity::Error, format!("Error: {other}")),
    }
}

fn start_file_task(state: &mut AppState, task: TaskKind) {
    let folder = match fs::validate_folder(&state.folder) {
        Ok(f) => f,
        Err(e) => {
            report_folder_error(state, &e);
            return;
        }
    };
    state.busy = Some(task);
    state.pending_jobs.push(Job::File {
        task,
        folder,
        rename_prefix: state.config.prefs.rename_prefix.clone(),
    });
}

fn start_script(state: &mut AppState, kind: ScriptKind, script_path: PathBuf) {
    if refuse_if_busy(state) {
        return;
    }
    let task = match kind {
        ScriptKind::Python => TaskKind::Python,
        ScriptKind::AutoHotkey => TaskKind::AutoHotkey,
    };
    let configured = match kind {
        ScriptKind::Python => state.config.prefs.python_interpreter.clone(),
        ScriptKind::AutoHotkey => state.config.prefs.ahk_interpreter.clone(),
    };
    let interpreter = match script::resolve_interpreter(kind, configured.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            state.log.push(Severity::Error, failure_message(task, &e));
            return;
        }
    };

    state.busy = Some(task);
    state.pending_jobs.push(Job::Script {
        kind,
        interpreter,
        script: script_path,
        folder: state.folder.clone(),
        timeout: state.config.script_timeout(),
    });
}

fn open_folder(state: &mut AppState) {
    let folder = match fs::validate_folder(&state.folder) {
        Ok(f) => f,
        Err(e) => {
            state.log.push(
                Severity::Warning,
                format!("Could not open folder: {e}"),
            );
            return;
        }
    };
    match open::that_detached(&folder) {
        Ok(()) => state.log.info("Folder opened in the file manager"),
        Err(e) => state
            .log
            .push(Severity::Warning, format!("Could not open folder: {e}")),
    }
}

fn quit(state: &mut AppState) {
    save_preferences(state);
    state.log.info("AutoTask finished. Preferences saved.");
    state.should_quit = true;
}

fn save_preferences(state: &mut AppState) {
    let folder = state.folder.clone();
    state.config.set_folder(folder);
    if let Err(e) = state.config.save() {
        state
            .log
            .push(Severity::Error, format!("Could not save preferences: {e:#}"));
    }
}

/// Accept a new working folder (empty clears it).
fn set_folder(state: &mut AppState, folder: &Path) -> bool {
    let text = folder.display().to_string();
    if !text.trim().is_empty() && !folder.is_dir() {
        state
            .log
            .push(Severity::Error, format!("Not a folder: {}", folder.display()));
        return false;
    }
    state.folder = text;
    save_preferences(state);
    state.log.info(format!("Folder selected: {}", state.folder));
    true
}

// ── Folder field ────────────────────────────────────────────────

fn handle_edit_folder_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => state.active_view = ActiveView::Main,
        KeyCode::Enter => {
            let value = PathBuf::from(state.input.value().trim());
            if set_folder(state, &value) {
                state.active_view = ActiveView::Main;
            }
        }
        _ => {
            state.input.handle_key(key);
        }
    }
}

// ── Save-log prompt ─────────────────────────────────────────────

fn handle_save_prompt_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => state.active_view = ActiveView::Main,
        KeyCode::Enter => {
            let path = PathBuf::from(state.input.value().trim());
            if path.as_os_str().is_empty() {
                return;
            }
            state.active_view = ActiveView::Main;
            match state.log.save_to(&path) {
                Ok(()) => state
                    .log
                    .push(Severity::Success, format!("Log saved to: {}", path.display())),
                Err(e) => state
                    .log
                    .push(Severity::Error, format!("Error saving log: {e:#}")),
            }
        }
        _ => {
            state.input.handle_key(key);
        }
    }
}

// ── Picker ──────────────────────────────────────────────────────

fn open_picker(state: &mut AppState, purpose: PickerPurpose) {
    state.picker = Some(Picker::new(
        purpose,
        &state.folder,
        &state.config.prefs.saved_scripts,
    ));
    state.active_view = ActiveView::Picker;
}

fn close_picker(state: &mut AppState) {
    state.picker = None;
    state.active_view = ActiveView::Main;
}

fn handle_picker_key(state: &mut AppState, key: KeyEvent) {
    let page = picker_list_height(state.terminal_area).max(1);
    let Some(picker) = state.picker.as_mut() else {
        state.active_view = ActiveView::Main;
        return;
    };
    let purpose = picker.purpose;

    let outcome = match key.code {
        KeyCode::Esc => {
            close_picker(state);
            return;
        }
        KeyCode::Up => {
            picker.select_prev(1);
            PickOutcome::Stay
        }
        KeyCode::Down => {
            picker.select_next(1);
            PickOutcome::Stay
        }
        KeyCode::PageUp => {
            picker.select_prev(page);
            PickOutcome::Stay
        }
        KeyCode::PageDown => {
            picker.select_next(page);
            PickOutcome::Stay
        }
        KeyCode::Home => {
            picker.selected = 0;
            PickOutcome::Stay
        }
        KeyCode::End => {
            picker.select_last();
            PickOutcome::Stay
        }
        KeyCode::Backspace | KeyCode::Left => {
            picker.go_parent();
            PickOutcome::Stay
        }
        KeyCode::Right => {
            if picker.selected_row().is_some_and(|r| r.is_dir()) {
                picker.activate();
            }
            PickOutcome::Stay
        }
        KeyCode::Enter => picker.activate(),
        KeyCode::Tab => {
            picker.toggle_show_all();
            PickOutcome::Stay
        }
        KeyCode::Char('.') => {
            picker.toggle_hidden();
            PickOutcome::Stay
        }
        KeyCode::Char(' ') | KeyCode::Char('s') if purpose == PickerPurpose::Folder => {
            picker.choose_folder().map_or(PickOutcome::Stay, PickOutcome::Chosen)
        }
        _ => PickOutcome::Stay,
    };

    if let PickOutcome::Chosen(path) = outcome {
        close_picker(state);
        match purpose {
            PickerPurpose::Folder => {
                set_folder(state, &path);
            }
            PickerPurpose::Script(kind) => start_script(state, kind, path),
        }
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view == ActiveView::Picker {
        if let Some(picker) = state.picker.as_mut() {
            match mouse.kind {
                MouseEventKind::ScrollUp => picker.select_prev(1),
                MouseEventKind::ScrollDown => picker.select_next(1),
                _ => {}
            }
        }
        return;
    }
    if state.active_view != ActiveView::Main {
        return;
    }

    let layout = AppLayout::from_area(state.terminal_area);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(action) = hit_test(&layout, mouse.column, mouse.row) {
                state.focus = action;
                perform(state, action);
            } else if contains(layout.folder_area, mouse.column, mouse.row) {
                perform(state, Action::EditFolder);
            }
        }
        MouseEventKind::ScrollUp if contains(layout.log_area, mouse.column, mouse.row) => {
            state.log.scroll_up(3);
        }
        MouseEventKind::ScrollDown if contains(layout.log_area, mouse.column, mouse.row) => {
            state.log.scroll_down(3);
        }
        _ => {}
    }
}

// ── Job updates ─────────────────────────────────────────────────

/// Apply a message from a background job.
pub fn apply_job_update(state: &mut AppState, update: JobUpdate) {
    match update {
        JobUpdate::Log(severity, message) => state.log.push(severity, message),
        JobUpdate::Finished { task, ok, script } => {
            tracing::debug!(%task, ok, "job finished");
            state.busy = None;
            if let Some(script) = script {
                state.config.remember_script(&script);
                save_preferences(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn state_in(dir: &Path) -> AppState {
        let mut cfg = AppConfig::with_defaults(dir.join("config.json"));
        cfg.prefs.last_folder = dir.display().to_string();
        AppState::new(cfg)
    }

    fn press(state: &mut AppState, code: KeyCode) {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn last_message(state: &AppState) -> (Severity, String) {
        let e = state.log.entries().last().unwrap();
        (e.severity, e.message.clone())
    }

    #[test]
    fn task_key_queues_job_and_sets_busy() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = state_in(tmp.path());
        press(&mut state, KeyCode::Char('d'));

        assert_eq!(state.busy, Some(TaskKind::Dedupe));
        assert_eq!(
            state.pending_jobs,
            [Job::File {
                task: TaskKind::Dedupe,
                folder: tmp.path().to_path_buf(),
                rename_prefix: "document".into(),
            }]
        );
    }

    #[test]
    fn second_task_is_refused_while_busy() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = state_in(tmp.path());
        press(&mut state, KeyCode::Char('r'));
        press(&mut state, KeyCode::Char('o'));

        assert_eq!(state.pending_jobs.len(), 1);
        let (sev, msg) = last_message(&state);
        assert_eq!(sev, Severity::Warning);
        assert!(msg.contains("already running"));

        apply_job_update(
            &mut state,
            JobUpdate::Finished {
                task: TaskKind::Rename,
                ok: true,
                script: None,
            },
        );
        assert_eq!(state.busy, None);
        press(&mut state, KeyCode::Char('o'));
        assert_eq!(state.pending_jobs.len(), 2);
    }

    #[test]
    fn missing_folder_is_reported_not_run() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = state_in(tmp.path());
        state.folder = tmp.path().join("gone").display().to_string();
        press(&mut state, KeyCode::Char('t'));
        assert!(state.pending_jobs.is_empty());
        assert_eq!(state.busy, None);
        assert_eq!(last_message(&state).0, Severity::Error);

        state.folder.clear();
        press(&mut state, KeyCode::Char('t'));
        assert_eq!(
            last_message(&state),
            (Severity::Warning, "Please select a folder first.".to_string())
        );
    }

    #[test]
    fn enter_runs_the_focused_button() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = state_in(tmp.path());
        state.focus = Action::Organize;
        press(&mut state, KeyCode::Down);
        assert_eq!(state.focus, Action::RunPython);
        press(&mut state, KeyCode::Left);
        assert_eq!(state.focus, Action::CleanTemp);
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.busy, Some(TaskKind::CleanTemp));
    }

    #[test]
    fn editing_the_folder_saves_preferences() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        let mut state = state_in(tmp.path());

        press(&mut state, KeyCode::Char('e'));
        assert_eq!(state.active_view, ActiveView::EditFolder);
        handle_paste(&mut state, "/sub\n");
        press(&mut state, KeyCode::Enter);

        assert_eq!(state.active_view, ActiveView::Main);
        assert_eq!(PathBuf::from(&state.folder), sub);
        let saved = AppConfig::load(tmp.path().join("config.json"));
        assert_eq!(PathBuf::from(saved.prefs.last_folder), sub);
    }

    #[test]
    fn invalid_folder_keeps_the_editor_open() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = state_in(tmp.path());
        let before = state.folder.clone();
        press(&mut state, KeyCode::Char('e'));
        handle_paste(&mut state, "/nope");
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.active_view, ActiveView::EditFolder);
        assert_eq!(state.folder, before);
        press(&mut state, KeyCode::Esc);
        assert_eq!(state.active_view, ActiveView::Main);
    }

    #[test]
    fn browse_and_pick_a_folder() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("photos")).unwrap();
        let mut state = state_in(tmp.path());

        press(&mut state, KeyCode::Char('b'));
        assert_eq!(state.active_view, ActiveView::Picker);
        press(&mut state, KeyCode::Down); // past "../"
        press(&mut state, KeyCode::Char(' '));

        assert_eq!(state.active_view, ActiveView::Main);
        assert!(state.picker.is_none());
        assert_eq!(PathBuf::from(&state.folder), tmp.path().join("photos"));
    }

    #[cfg(unix)]
    #[test]
    fn picking_a_script_queues_it_with_the_configured_interpreter() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("job.py"), "print('hi')").unwrap();
        let mut state = state_in(tmp.path());
        state.config.prefs.python_interpreter = Some("sh".into());

        press(&mut state, KeyCode::Char('p'));
        press(&mut state, KeyCode::End);
        press(&mut state, KeyCode::Enter);

        assert_eq!(state.busy, Some(TaskKind::Python));
        match &state.pending_jobs[..] {
            [Job::Script {
                interpreter,
                script,
                ..
            }] => {
                assert_eq!(interpreter, &PathBuf::from("sh"));
                assert_eq!(script, &tmp.path().join("job.py"));
            }
            other => panic!("unexpected jobs: {other:?}"),
        }

        apply_job_update(
            &mut state,
            JobUpdate::Finished {
                task: TaskKind::Python,
                ok: true,
                script: Some(tmp.path().join("job.py")),
            },
        );
        assert_eq!(
            state.config.prefs.saved_scripts,
            [tmp.path().join("job.py").display().to_string()]
        );
    }

    #[test]
    fn save_log_writes_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = state_in(tmp.path());
        state.log.info("something happened");

        press(&mut state, KeyCode::Char('s'));
        assert_eq!(state.active_view, ActiveView::SaveLogPrompt);
        assert!(state.input.value().starts_with(&tmp.path().display().to_string()));
        state.input = TextInput::with_value(tmp.path().join("out.log").display().to_string());
        press(&mut state, KeyCode::Enter);

        let text = std::fs::read_to_string(tmp.path().join("out.log")).unwrap();
        assert!(text.contains("something happened"));
        assert_eq!(last_message(&state).0, Severity::Success);
    }

    #[test]
    fn ctrl_c_quits_and_saves() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = state_in(tmp.path());
        handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(state.should_quit);
        assert!(tmp.path().join("config.json").is_file());
    }
}
