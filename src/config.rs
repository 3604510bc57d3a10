//! User preferences: last folder, saved scripts, key bindings.
//!
//! Stored as JSON at `$XDG_CONFIG_HOME/autotask/config.json`
//! (default `~/.config/autotask/config.json`).

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

/// How many recently used scripts are remembered.
pub const MAX_SAVED_SCRIPTS: usize = 10;

// ───────────────────────────────────────── actions ───────────

/// All configurable user commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Browse,
    EditFolder,
    Rename,
    Organize,
    Dedupe,
    CleanTemp,
    RunPython,
    RunAhk,
    OpenFolder,
    ClearLog,
    SaveLog,
    OpenGithub,
    ShowControls,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the controls popup).
    pub const ALL: &[Action] = &[
        Action::Browse,
        Action::EditFolder,
        Action::Rename,
        Action::Organize,
        Action::Dedupe,
        Action::CleanTemp,
        Action::RunPython,
        Action::RunAhk,
        Action::OpenFolder,
        Action::ClearLog,
        Action::SaveLog,
        Action::OpenGithub,
        Action::ShowControls,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::Browse => "Browse",
            Action::EditFolder => "Edit Folder",
            Action::Rename => "Rename Files",
            Action::Organize => "Organize by Type",
            Action::Dedupe => "Remove Duplicates",
            Action::CleanTemp => "Clean Temp Files",
            Action::RunPython => "Run Python Script",
            Action::RunAhk => "Run AHK Script",
            Action::OpenFolder => "Open Folder",
            Action::ClearLog => "Clear Log",
            Action::SaveLog => "Save Log",
            Action::OpenGithub => "GitHub",
            Action::ShowControls => "Controls",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    pub fn config_key(self) -> &'static str {
        match self {
            Action::Browse => "browse",
            Action::EditFolder => "edit_folder",
            Action::Rename => "rename",
            Action::Organize => "organize",
            Action::Dedupe => "dedupe",
            Action::CleanTemp => "clean_temp",
            Action::RunPython => "run_python",
            Action::RunAhk => "run_ahk",
            Action::OpenFolder => "open_folder",
            Action::ClearLog => "clear_log",
            Action::SaveLog => "save_log",
            Action::OpenGithub => "open_github",
            Action::ShowControls => "show_controls",
            Action::Quit => "quit",
        }
    }

    /// Actions that start a job and are refused while one runs.
    pub fn is_task(self) -> bool {
        matches!(
            self,
            Action::Rename
                | Action::Organize
                | Action::Dedupe
                | Action::CleanTemp
                | Action::RunPython
                | Action::RunAhk
        )
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MOD_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && (self.modifiers & MOD_MASK) == (event.modifiers & MOD_MASK)
    }

    /// User-friendly display string (e.g. `"Ctrl+s"`, `"F5"`, `"r"`).
    pub fn display(&self) -> String {
        self.render(true)
    }

    /// Config-file form (e.g. `"Ctrl+s"`, `"Up"`).
    pub fn to_config_string(&self) -> String {
        self.render(false)
    }

    fn render(&self, pretty: bool) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        let key = match (self.code, pretty) {
            (KeyCode::Char(' '), _) => "Space".into(),
            (KeyCode::Char(c), _) => c.to_string(),
            (KeyCode::Up, true) => "↑".into(),
            (KeyCode::Down, true) => "↓".into(),
            (KeyCode::Left, true) => "←".into(),
            (KeyCode::Right, true) => "→".into(),
            (KeyCode::Up, false) => "Up".into(),
            (KeyCode::Down, false) => "Down".into(),
            (KeyCode::Left, false) => "Left".into(),
            (KeyCode::Right, false) => "Right".into(),
            (KeyCode::Enter, _) => "Enter".into(),
            (KeyCode::Esc, _) => "Esc".into(),
            (KeyCode::Tab, _) => "Tab".into(),
            (KeyCode::Backspace, _) => "Backspace".into(),
            (KeyCode::Delete, _) => "Delete".into(),
            (KeyCode::Home, _) => "Home".into(),
            (KeyCode::End, _) => "End".into(),
            (KeyCode::F(n), _) => format!("F{n}"),
            (other, _) => format!("{other:?}"),
        };
        s.push_str(&key);
        s
    }

    /// Parse a key string like `"Ctrl+s"`, `"Alt+Up"`, `"q"`, `"F5"`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let (mods, key_part) = match s.rsplit_once('+') {
            // A bare "+" is the plus key itself.
            Some((m, "")) => (m.strip_suffix('+').unwrap_or(m), "+"),
            Some((m, k)) => (m, k),
            None => ("", s),
        };

        for part in mods.split('+').filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "space" => KeyCode::Char(' '),
            lower if lower.starts_with('f') && lower.len() > 1 => {
                KeyCode::F(lower[1..].parse().ok()?)
            }
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── preferences ───────

/// On-disk preference record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub last_folder: String,
    pub saved_scripts: Vec<String>,
    pub rename_prefix: String,
    pub script_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_interpreter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ahk_interpreter: Option<String>,
    /// Action config key → key strings. Missing actions use the defaults.
    pub bindings: BTreeMap<String, Vec<String>>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            last_folder: default_folder(),
            saved_scripts: Vec::new(),
            rename_prefix: "document".into(),
            script_timeout_secs: crate::core::script::DEFAULT_TIMEOUT.as_secs(),
            python_interpreter: None,
            ahk_interpreter: None,
            bindings: BTreeMap::new(),
        }
    }
}

fn default_folder() -> String {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

// ───────────────────────────────────────── config ────────────

/// Preferences plus the resolved key bindings and where they live.
pub struct AppConfig {
    pub prefs: Preferences,
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub path: PathBuf,
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        let mut m = HashMap::new();

        m.insert(Browse, vec![KeyBind::new(Char('b'), n)]);
        m.insert(EditFolder, vec![KeyBind::new(Char('e'), n), KeyBind::new(Char('l'), ctrl)]);
        m.insert(Rename, vec![KeyBind::new(Char('r'), n)]);
        m.insert(Organize, vec![KeyBind::new(Char('o'), n)]);
        m.insert(Dedupe, vec![KeyBind::new(Char('d'), n)]);
        m.insert(CleanTemp, vec![KeyBind::new(Char('t'), n)]);
        m.insert(RunPython, vec![KeyBind::new(Char('p'), n)]);
        m.insert(RunAhk, vec![KeyBind::new(Char('a'), n)]);
        m.insert(OpenFolder, vec![KeyBind::new(Char('f'), n)]);
        m.insert(ClearLog, vec![KeyBind::new(Char('c'), n)]);
        m.insert(SaveLog, vec![KeyBind::new(Char('s'), n), KeyBind::new(Char('s'), ctrl)]);
        m.insert(OpenGithub, vec![KeyBind::new(Char('g'), n)]);
        m.insert(ShowControls, vec![KeyBind::new(Char('?'), n), KeyBind::new(F(1), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Defaults, not loaded from anywhere.
    pub fn with_defaults(path: PathBuf) -> Self {
        Self {
            prefs: Preferences::default(),
            bindings: Self::default_bindings(),
            path,
        }
    }

    /// Load config from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(path: PathBuf) -> Self {
        let prefs = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Preferences>(&text) {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                    Preferences::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read config, using defaults");
                Preferences::default()
            }
        };
        Self::from_prefs(prefs, path)
    }

    fn from_prefs(mut prefs: Preferences, path: PathBuf) -> Self {
        prefs.saved_scripts.retain(|s| Path::new(s).is_file());
        prefs.saved_scripts.truncate(MAX_SAVED_SCRIPTS);

        let mut bindings = Self::default_bindings();
        for (key, values) in &prefs.bindings {
            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!(key, "unknown action in bindings");
                continue;
            };
            let parsed: Vec<KeyBind> = values.iter().filter_map(|v| KeyBind::parse(v.trim())).collect();
            if !parsed.is_empty() {
                bindings.insert(action, parsed);
            }
        }

        Self {
            prefs,
            bindings,
            path,
        }
    }

    /// Persist current preferences (including bindings) to disk.
    pub fn save(&mut self) -> anyhow::Result<()> {
        self.prefs.bindings = Action::ALL
            .iter()
            .filter_map(|&a| {
                let binds = self.bindings.get(&a)?;
                Some((
                    a.config_key().to_string(),
                    binds.iter().map(KeyBind::to_config_string).collect(),
                ))
            })
            .collect();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.prefs)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }

    pub fn set_folder(&mut self, folder: impl Into<String>) {
        self.prefs.last_folder = folder.into();
    }

    /// Put `script` at the front of the saved list.
    pub fn remember_script(&mut self, script: &Path) {
        let s = script.display().to_string();
        self.prefs.saved_scripts.retain(|existing| existing != &s);
        self.prefs.saved_scripts.insert(0, s);
        self.prefs.saved_scripts.truncate(MAX_SAVED_SCRIPTS);
    }

    pub fn script_timeout(&self) -> Duration {
        Duration::from_secs(self.prefs.script_timeout_secs.max(1))
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<(Action, u32)> = None;
        for (&action, binds) in &self.bindings {
            for bind in binds.iter().filter(|b| b.matches(event)) {
                let mc = bind.modifiers.bits().count_ones();
                if best.map_or(true, |(_, count)| mc > count) {
                    best = Some((action, mc));
                }
            }
        }
        best.map(|(a, _)| a)
    }

    /// Format the binding list for a given action (e.g. `"s/Ctrl+s"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// First binding only, for button captions.
    pub fn short_binding(&self, action: Action) -> Option<String> {
        self.bindings.get(&action)?.first().map(KeyBind::display)
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "Tab/arrows: focus | Enter: run | {}: browse | {}: edit folder | {}: controls | {}: quit",
            self.short_binding(Action::Browse).unwrap_or_default(),
            self.short_binding(Action::EditFolder).unwrap_or_default(),
            self.short_binding(Action::ShowControls).unwrap_or_default(),
            self.short_binding(Action::Quit).unwrap_or_default(),
        )
    }
}

/// Return the default config path (`$XDG_CONFIG_HOME/autotask/config.json`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .ok()
        .or_else(dirs::config_dir)
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("autotask").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parses_key_strings() {
        assert_eq!(
            KeyBind::parse("Ctrl+s"),
            Some(KeyBind::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
        );
        assert_eq!(
            KeyBind::parse("alt+shift+Up"),
            Some(KeyBind::new(KeyCode::Up, KeyModifiers::ALT | KeyModifiers::SHIFT))
        );
        assert_eq!(KeyBind::parse("F5"), Some(KeyBind::new(KeyCode::F(5), KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("f"), Some(KeyBind::new(KeyCode::Char('f'), KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("R"), Some(KeyBind::new(KeyCode::Char('R'), KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("Ctrl++"), Some(KeyBind::new(KeyCode::Char('+'), KeyModifiers::CONTROL)));
        assert_eq!(KeyBind::parse("Hyper+x"), None);
        assert_eq!(KeyBind::parse("nonsense"), None);
    }

    #[test]
    fn config_strings_parse_back() {
        for binds in AppConfig::default_bindings().values() {
            for b in binds {
                assert_eq!(KeyBind::parse(&b.to_config_string()).as_ref(), Some(b));
            }
        }
    }

    #[test]
    fn match_prefers_more_modifiers() {
        let cfg = AppConfig::with_defaults(PathBuf::from("unused.json"));
        assert_eq!(
            cfg.match_key(key(KeyCode::Char('s'), KeyModifiers::NONE)),
            Some(Action::SaveLog)
        );
        assert_eq!(
            cfg.match_key(key(KeyCode::Char('l'), KeyModifiers::CONTROL)),
            Some(Action::EditFolder)
        );
        assert_eq!(cfg.match_key(key(KeyCode::Char('z'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn save_then_load_keeps_preferences() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/config.json");
        let script = tmp.path().join("job.py");
        std::fs::write(&script, "print(1)").unwrap();

        let mut cfg = AppConfig::with_defaults(path.clone());
        cfg.set_folder("/srv/inbox");
        cfg.remember_script(&script);
        cfg.bindings
            .insert(Action::Rename, vec![KeyBind::new(KeyCode::F(2), KeyModifiers::NONE)]);
        cfg.save().unwrap();

        let loaded = AppConfig::load(path);
        assert_eq!(loaded.prefs.last_folder, "/srv/inbox");
        assert_eq!(loaded.prefs.saved_scripts, [script.display().to_string()]);
        assert_eq!(
            loaded.match_key(key(KeyCode::F(2), KeyModifiers::NONE)),
            Some(Action::Rename)
        );
        assert_eq!(loaded.match_key(key(KeyCode::Char('r'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let cfg = AppConfig::load(path);
        assert_eq!(cfg.prefs, Preferences::default());
    }

    #[test]
    fn partial_file_fills_in_defaults_and_drops_stale_scripts() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "last_folder": "/data", "saved_scripts": ["/gone/away.py"], "extra": 1 }"#,
        )
        .unwrap();
        let cfg = AppConfig::load(path);
        assert_eq!(cfg.prefs.last_folder, "/data");
        assert!(cfg.prefs.saved_scripts.is_empty());
        assert_eq!(cfg.prefs.rename_prefix, "document");
        assert_eq!(cfg.script_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn remembered_scripts_are_unique_and_capped() {
        let mut cfg = AppConfig::with_defaults(PathBuf::from("unused.json"));
        for i in 0..15 {
            cfg.remember_script(Path::new(&format!("/s/{i}.py")));
        }
        cfg.remember_script(Path::new("/s/3.py"));
        assert_eq!(cfg.prefs.saved_scripts.len(), MAX_SAVED_SCRIPTS);
        assert_eq!(cfg.prefs.saved_scripts[0], "/s/3.py");
        assert_eq!(
            cfg.prefs.saved_scripts.iter().filter(|s| *s == "/s/3.py").count(),
            1
        );
    }
}
