//! A small desktop task runner for everyday folder chores.
//!
//! Run the binary to open the interactive window. Pass `--task` to run a
//! single task headless and print the activity log to stdout.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    jobs::{self, failure_message, JobUpdate},
    log::LogEntry,
    state::AppState,
};
use crate::config::AppConfig;
use crate::core::script::{self, ScriptKind};
use crate::core::task::{Severity, TaskKind};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), version, about = "Folder chores and script launcher")]
struct Cli {
    /// Folder to work in (defaults to the last one used).
    folder: Option<PathBuf>,

    /// Preferences file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run one task without the window: rename, organize, dedupe, clean,
    /// python or ahk.
    #[arg(long, value_parser = parse_task)]
    task: Option<TaskKind>,

    /// Script to run with `--task python` or `--task ahk`.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Script time limit in seconds.
    #[arg(long)]
    timeout: Option<u64>,
}

fn parse_task(s: &str) -> Result<TaskKind, String> {
    TaskKind::from_cli(s).ok_or_else(|| {
        format!("unknown task `{s}` (expected rename, organize, dedupe, clean, python or ahk)")
    })
}

// ───────────────────────────────────────── headless ─────────

fn print_line(severity: Severity, message: String) {
    println!("{}", LogEntry::new(severity, message).line());
}

/// Run `task` once and print its log. Returns whether it succeeded.
async fn run_headless(config: &AppConfig, folder: &str, task: TaskKind, script_path: Option<PathBuf>) -> Result<bool> {
    if let Some(kind) = script_kind(task) {
        let Some(script_path) = script_path else {
            bail!("--task {task} needs --script PATH");
        };
        let configured = match kind {
            ScriptKind::Python => config.prefs.python_interpreter.as_deref(),
            ScriptKind::AutoHotkey => config.prefs.ahk_interpreter.as_deref(),
        };
        let result = script::execute(
            kind,
            configured,
            &script_path,
            folder,
            config.script_timeout(),
            print_line,
        )
        .await;
        if script::was_launched(&result) {
            remember_script(config, &script_path);
        }
        return match result {
            Ok(output) => Ok(output.success()),
            Err(e) => {
                print_line(Severity::Error, failure_message(task, &e));
                Ok(false)
            }
        };
    }

    let result = core::fs::validate_folder(folder).and_then(|dir| {
        jobs::run_file_task(task, &dir, &config.prefs.rename_prefix, print_line)
    });
    match result {
        Ok(()) => Ok(true),
        Err(e) => {
            print_line(Severity::Error, failure_message(task, &e));
            Ok(false)
        }
    }
}

/// Record a launched script in the stored preferences. The file is re-read
/// so that command-line overrides are not persisted.
fn remember_script(config: &AppConfig, script_path: &Path) {
    let mut stored = AppConfig::load(config.path.clone());
    stored.remember_script(script_path);
    if let Err(e) = stored.save() {
        print_line(Severity::Warning, format!("Could not save preferences: {e:#}"));
    }
}

fn script_kind(task: TaskKind) -> Option<ScriptKind> {
    match task {
        TaskKind::Python => Some(ScriptKind::Python),
        TaskKind::AutoHotkey => Some(ScriptKind::AutoHotkey),
        _ => None,
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Silent unless RUST_LOG is set.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // stdout belongs to headless output
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let mut user_config = AppConfig::load(config_path);
    if let Some(secs) = cli.timeout {
        user_config.prefs.script_timeout_secs = secs;
    }
    if let Some(ref folder) = cli.folder {
        user_config.set_folder(folder.display().to_string());
    }

    // ── headless mode ─────────────────────────────────────────
    if let Some(task) = cli.task {
        let folder = user_config.prefs.last_folder.clone();
        let ok = run_headless(&user_config, &folder, task, cli.script).await?;
        return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    let mut state = AppState::new(user_config);
    state.log.info("AutoTask started. Select a folder and a task.");
    let default_folder = state.folder.clone();
    state.log.info(format!("Default folder: {default_folder}"));

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(
        stderr_handle,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let (job_tx, mut job_rx) = tokio::sync::mpsc::unbounded_channel::<JobUpdate>();

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| ui::screen::draw(frame, &mut state))?;

        // Start work queued by the last event only after it has been drawn,
        // so the busy indicator shows up right away.
        for job in state.pending_jobs.drain(..) {
            jobs::spawn(job, job_tx.clone());
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Paste(text) => handler::handle_paste(&mut state, &text),
                    AppEvent::Resize(_, _) => {}
                    AppEvent::Tick => state.tick = state.tick.wrapping_add(1),
                }
            }

            Some(update) = job_rx.recv() => {
                // Batch-drain before redrawing; scripts can print a lot.
                handler::apply_job_update(&mut state, update);
                while let Ok(update) = job_rx.try_recv() {
                    handler::apply_job_update(&mut state, update);
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    Ok(ExitCode::SUCCESS)
}
