//! External script launcher: Python and AutoHotkey.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use super::error::{TaskError, TaskResult};
use super::fs::file_name;
use super::task::Severity;

/// Fallback time limit for a script run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    Python,
    AutoHotkey,
}

impl ScriptKind {
    pub fn label(self) -> &'static str {
        match self {
            ScriptKind::Python => "Python",
            ScriptKind::AutoHotkey => "AutoHotkey",
        }
    }

    /// Extension the script picker filters on.
    pub fn extension(self) -> &'static str {
        match self {
            ScriptKind::Python => "py",
            ScriptKind::AutoHotkey => "ahk",
        }
    }

    fn path_candidates(self) -> &'static [&'static str] {
        match self {
            #[cfg(windows)]
            ScriptKind::Python => &["py", "python", "python3"],
            #[cfg(not(windows))]
            ScriptKind::Python => &["python3", "python"],
            ScriptKind::AutoHotkey => &["AutoHotkey", "AutoHotkey64", "AutoHotkey32"],
        }
    }

    fn install_candidates(self) -> &'static [&'static str] {
        match self {
            ScriptKind::Python => &[],
            ScriptKind::AutoHotkey => &[
                r"C:\Program Files\AutoHotkey\AutoHotkey.exe",
                r"C:\Program Files (x86)\AutoHotkey\AutoHotkey.exe",
            ],
        }
    }
}

/// Look `program` up in each `PATH` directory.
pub fn find_on_path(program: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&paths) {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = candidate.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
    }
    None
}

/// Pick the interpreter for `kind`. A configured override is used untouched.
pub fn resolve_interpreter(kind: ScriptKind, configured: Option<&str>) -> TaskResult<PathBuf> {
    if let Some(cmd) = configured.map(str::trim).filter(|c| !c.is_empty()) {
        return Ok(PathBuf::from(cmd));
    }
    for fixed in kind.install_candidates() {
        let p = Path::new(fixed);
        if p.is_file() {
            return Ok(p.to_path_buf());
        }
    }
    kind.path_candidates()
        .iter()
        .find_map(|name| find_on_path(name))
        .ok_or(TaskError::InterpreterNotFound(kind))
}

/// Where a script runs: the selected folder, else the script's own directory.
pub fn working_dir(folder: &str, script: &Path) -> PathBuf {
    let folder = folder.trim();
    if !folder.is_empty() && Path::new(folder).is_dir() {
        return PathBuf::from(folder);
    }
    script
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutput {
    /// `None` when the process was ended by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ScriptOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Run `interpreter script` in `cwd`, capturing output. The child is killed
/// when `limit` elapses.
pub async fn run_script(
    interpreter: &Path,
    script: &Path,
    cwd: &Path,
    limit: Duration,
) -> TaskResult<ScriptOutput> {
    let child = Command::new(interpreter)
        .arg(script)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| TaskError::Spawn {
            program: interpreter.display().to_string(),
            source,
        })?;

    match tokio::time::timeout(limit, child.wait_with_output()).await {
        Ok(Ok(out)) => Ok(ScriptOutput {
            exit_code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        }),
        Ok(Err(e)) => Err(TaskError::io(script, e)),
        Err(_) => Err(TaskError::Timeout(limit)),
    }
}

/// Whether a run got as far as starting the process. Such scripts are
/// remembered even when they fail or time out.
pub fn was_launched<T>(result: &TaskResult<T>) -> bool {
    !matches!(
        result,
        Err(TaskError::Spawn { .. } | TaskError::InterpreterNotFound(_))
    )
}

/// Resolve, run and report a script. Returns the captured output.
pub async fn execute(
    kind: ScriptKind,
    configured: Option<&str>,
    script: &Path,
    folder: &str,
    limit: Duration,
    report: impl FnMut(Severity, String),
) -> TaskResult<ScriptOutput> {
    let interpreter = resolve_interpreter(kind, configured)?;
    run_and_report(kind, &interpreter, script, folder, limit, report).await
}

/// Run a script with an already resolved interpreter and report its output
/// line by line.
pub async fn run_and_report(
    kind: ScriptKind,
    interpreter: &Path,
    script: &Path,
    folder: &str,
    limit: Duration,
    mut report: impl FnMut(Severity, String),
) -> TaskResult<ScriptOutput> {
    let cwd = working_dir(folder, script);
    report(
        Severity::Info,
        format!("Running {} script: {}", kind.label(), file_name(script)),
    );
    tracing::info!(
        interpreter = %interpreter.display(),
        script = %script.display(),
        cwd = %cwd.display(),
        "launching script"
    );

    let output = run_script(interpreter, script, &cwd, limit).await?;
    report_output(&output, &mut report);
    Ok(output)
}

fn report_output(output: &ScriptOutput, report: &mut impl FnMut(Severity, String)) {
    if !output.stdout.is_empty() {
        report(Severity::Info, "Script output:".into());
        for line in output.stdout.lines() {
            report(Severity::Info, format!("  {line}"));
        }
    }
    if !output.stderr.is_empty() {
        report(Severity::Error, "Script errors:".into());
        for line in output.stderr.lines() {
            report(Severity::Error, format!("  {line}"));
        }
    }

    match output.exit_code {
        Some(0) => report(
            Severity::Success,
            "Script finished successfully (exit code 0)".into(),
        ),
        Some(code) => report(
            Severity::Error,
            format!("Script finished with errors (exit code {code})"),
        ),
        None => report(Severity::Error, "Script was terminated by a signal".into()),
    }
}
