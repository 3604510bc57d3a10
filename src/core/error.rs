//! Error type shared by every task.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::script::ScriptKind;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("no folder selected")]
    NoFolder,

    #[error("folder does not exist: {}", .0.display())]
    FolderMissing(PathBuf),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} interpreter not found", .0.label())]
    InterpreterNotFound(ScriptKind),

    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("script exceeded the {}s time limit", .0.as_secs())]
    Timeout(Duration),
}

impl TaskError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type TaskResult<T> = Result<T, TaskError>;
