//! Background jobs: keep the UI thread responsive while a task runs.
//!
//! File tasks run on a plain OS thread; scripts run on the tokio runtime so
//! the timeout can be enforced with `tokio::time::timeout`. Both report back
//! over the same channel.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::core::error::{TaskError, TaskResult};
use crate::core::script::{self, ScriptKind};
use crate::core::task::{Severity, TaskKind};
use crate::core::{cleanup, dedupe, organize, rename};

#[derive(Debug)]
pub enum JobUpdate {
    Log(Severity, String),
    Finished {
        task: TaskKind,
        ok: bool,
        /// Script that was launched, to be remembered in preferences.
        script: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    File {
        task: TaskKind,
        folder: PathBuf,
        rename_prefix: String,
    },
    Script {
        kind: ScriptKind,
        interpreter: PathBuf,
        script: PathBuf,
        folder: String,
        timeout: Duration,
    },
}

impl Job {
    pub fn task(&self) -> TaskKind {
        match self {
            Job::File { task, .. } => *task,
            Job::Script {
                kind: ScriptKind::Python,
                ..
            } => TaskKind::Python,
            Job::Script {
                kind: ScriptKind::AutoHotkey,
                ..
            } => TaskKind::AutoHotkey,
        }
    }
}

/// Run one of the four folder tasks synchronously.
pub fn run_file_task(
    task: TaskKind,
    folder: &std::path::Path,
    rename_prefix: &str,
    report: impl FnMut(Severity, String),
) -> TaskResult<()> {
    match task {
        TaskKind::Rename => rename::rename_files(folder, rename_prefix, report).map(drop),
        TaskKind::Organize => organize::organize_by_type(folder, report).map(drop),
        TaskKind::Dedupe => dedupe::remove_duplicates(folder, report).map(drop),
        TaskKind::CleanTemp => cleanup::clean_temporary_files(folder, report).map(drop),
        TaskKind::Python | TaskKind::AutoHotkey => {
            unreachable!("scripts are not folder tasks")
        }
    }
}

/// Message logged when a task fails as a whole.
pub fn failure_message(task: TaskKind, err: &TaskError) -> String {
    format!("Error during {}: {err}", task.activity())
}

pub fn spawn(job: Job, tx: mpsc::UnboundedSender<JobUpdate>) {
    let task = job.task();
    tracing::debug!(%task, "spawning job");
    match job {
        Job::File {
            task,
            folder,
            rename_prefix,
        } => {
            std::thread::spawn(move || {
                let log_tx = tx.clone();
                let result = run_file_task(task, &folder, &rename_prefix, |sev, msg| {
                    let _ = log_tx.send(JobUpdate::Log(sev, msg));
                });
                finish(&tx, task, result, None);
            });
        }
        Job::Script {
            kind,
            interpreter,
            script,
            folder,
            timeout,
        } => {
            tokio::spawn(async move {
                let log_tx = tx.clone();
                let result = script::run_and_report(
                    kind,
                    &interpreter,
                    &script,
                    &folder,
                    timeout,
                    |sev, msg| {
                        let _ = log_tx.send(JobUpdate::Log(sev, msg));
                    },
                )
                .await
                .map(drop);
                let launched = script::was_launched(&result);
                finish(&tx, task, result, launched.then_some(script));
            });
        }
    }
}

fn finish(
    tx: &mpsc::UnboundedSender<JobUpdate>,
    task: TaskKind,
    result: TaskResult<()>,
    script: Option<PathBuf>,
) {
    let ok = match result {
        Ok(()) => true,
        Err(e) => {
            let _ = tx.send(JobUpdate::Log(Severity::Error, failure_message(task, &e)));
            false
        }
    };
    let _ = tx.send(JobUpdate::Finished { task, ok, script });
}
