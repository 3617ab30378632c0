//! User configuration: tuning table, preview settings, clip list and
//! keybindings.
//!
//! Stored as TOML at `$XDG_CONFIG_HOME/wishes-reel/config.toml` (default
//! `~/.config/wishes-reel/config.toml`).  Every section is optional and
//! missing fields take their defaults.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::core::media::AutoplayPolicy;
use crate::core::page::PageConfig;
use crate::core::phase::Viewport;
use crate::core::tuning::{Tuning, TuningError};
use crate::core::video::{default_videos, VideoDescriptor};

// ───────────────────────────────────────── errors ────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid [tuning]: {0}")]
    InvalidTuning(#[from] TuningError),
    #[error(
        "[page] carousel_offset_vh = {offset_vh} is too low: the carousel must finish \
         entering by scale_up_end, which allows at most {limit_vh:.3}"
    )]
    CarouselTooLow { offset_vh: f64, limit_vh: f64 },
    #[error("[[videos]] is present but empty")]
    NoVideos,
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot serialise config: {0}")]
    Serialise(#[from] toml::ser::Error),
}

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    Top,
    Bottom,
    ToggleDevice,
    Rotate,
    ToggleMute,
    ToggleVisibility,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help line and saving).
    pub const ALL: &[Action] = &[
        Action::ScrollDown,
        Action::ScrollUp,
        Action::PageDown,
        Action::PageUp,
        Action::Top,
        Action::Bottom,
        Action::ToggleDevice,
        Action::Rotate,
        Action::ToggleMute,
        Action::ToggleVisibility,
        Action::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::ScrollDown => "Scroll Down",
            Action::ScrollUp => "Scroll Up",
            Action::PageDown => "Page Down",
            Action::PageUp => "Page Up",
            Action::Top => "Top",
            Action::Bottom => "Bottom",
            Action::ToggleDevice => "Desktop / Mobile",
            Action::Rotate => "Rotate",
            Action::ToggleMute => "Sound",
            Action::ToggleVisibility => "Hide Tab",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the `[keys]` table.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollDown => "scroll_down",
            Action::ScrollUp => "scroll_up",
            Action::PageDown => "page_down",
            Action::PageUp => "page_up",
            Action::Top => "top",
            Action::Bottom => "bottom",
            Action::ToggleDevice => "toggle_device",
            Action::Rotate => "rotate",
            Action::ToggleMute => "toggle_mute",
            Action::ToggleVisibility => "toggle_visibility",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code plus modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    const MASK: KeyModifiers = KeyModifiers::CONTROL
        .union(KeyModifiers::ALT)
        .union(KeyModifiers::SHIFT);

    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && (self.modifiers & Self::MASK) == (event.modifiers & Self::MASK)
    }

    /// User-friendly display string (e.g. `"Ctrl+c"`, `"↓"`, `"m"`).
    pub fn display(&self) -> String {
        let key = match self.code {
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            _ => key_name(self.code),
        };
        format!("{}{key}", modifier_prefix(self.modifiers))
    }

    /// Config-file form (e.g. `"Ctrl+c"`, `"PageDown"`, `"j"`).
    fn to_config_string(&self) -> String {
        format!("{}{}", modifier_prefix(self.modifiers), key_name(self.code))
    }

    /// Parse a key string like `"Ctrl+c"`, `"Shift+Down"`, `"q"`, `"Space"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let (key_part, mods) = parts.split_last()?;

        for part in mods {
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
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => KeyCode::F(s[1..].parse().ok()?),
            // Single characters keep their case ("G" differs from "g").
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

fn modifier_prefix(modifiers: KeyModifiers) -> String {
    let mut s = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        s.push_str("Ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        s.push_str("Alt+");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        s.push_str("Shift+");
    }
    s
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── sections ──────────

/// Simulated browser viewports, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub desktop_width: f64,
    pub desktop_height: f64,
    pub mobile_width: f64,
    pub mobile_height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            desktop_width: 1440.0,
            desktop_height: 900.0,
            mobile_width: 390.0,
            mobile_height: 844.0,
        }
    }
}

impl ViewportConfig {
    pub fn viewport(&self, mobile: bool) -> Viewport {
        if mobile {
            Viewport::new(self.mobile_width, self.mobile_height)
        } else {
            Viewport::new(self.desktop_width, self.desktop_height)
        }
    }
}

/// Terminal preview behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Animation frame interval.
    pub frame_interval_ms: u64,
    /// Page pixels per wheel notch or arrow key.
    pub scroll_step_px: f64,
    /// Ease wheel and key scrolling instead of jumping.
    pub smooth_scroll: bool,
    pub autoplay: AutoplayPolicy,
    /// Length of every simulated clip.
    pub clip_seconds: f64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            scroll_step_px: 80.0,
            smooth_scroll: true,
            autoplay: AutoplayPolicy::MutedOnly,
            clip_seconds: 12.0,
        }
    }
}

/// On-disk shape of the config file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    tuning: Tuning,
    viewport: ViewportConfig,
    page: PageConfig,
    preview: PreviewConfig,
    keys: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    videos: Option<Vec<VideoDescriptor>>,
}

// ───────────────────────────────────────── config ────────────

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where [`AppConfig::save`] writes.
    pub path: PathBuf,
    pub tuning: Tuning,
    pub viewport: ViewportConfig,
    pub page: PageConfig,
    pub preview: PreviewConfig,
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub videos: Vec<VideoDescriptor>,
}

impl AppConfig {
    pub fn defaults(path: PathBuf) -> Self {
        Self {
            path,
            tuning: Tuning::DEFAULT,
            viewport: ViewportConfig::default(),
            page: PageConfig::default(),
            preview: PreviewConfig::default(),
            bindings: Self::default_bindings(),
            videos: default_videos(),
        }
    }

    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        let n = KeyModifiers::NONE;
        let shift = KeyModifiers::SHIFT;
        let plain = |c| KeyBind::new(KeyCode::Char(c), n);
        let mut m = HashMap::new();

        m.insert(ScrollDown, vec![KeyBind::new(KeyCode::Down, n), plain('j')]);
        m.insert(ScrollUp, vec![KeyBind::new(KeyCode::Up, n), plain('k')]);
        m.insert(PageDown, vec![KeyBind::new(KeyCode::PageDown, n), plain(' ')]);
        m.insert(PageUp, vec![KeyBind::new(KeyCode::PageUp, n), KeyBind::new(KeyCode::Char(' '), shift)]);
        m.insert(Top, vec![KeyBind::new(KeyCode::Home, n), plain('g')]);
        m.insert(Bottom, vec![KeyBind::new(KeyCode::End, n), KeyBind::new(KeyCode::Char('G'), shift)]);
        m.insert(ToggleDevice, vec![plain('d')]);
        m.insert(Rotate, vec![plain('r')]);
        m.insert(ToggleMute, vec![plain('m')]);
        m.insert(ToggleVisibility, vec![plain('v')]);
        m.insert(Quit, vec![plain('q'), KeyBind::new(KeyCode::Esc, n)]);

        m
    }

    /// Find the action that matches a key event.  When several bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<(Action, u32)> = None;
        for (&action, binds) in &self.bindings {
            for bind in binds.iter().filter(|b| b.matches(event)) {
                let count = bind.modifiers.bits().count_ones();
                if best.is_none_or(|(_, c)| count > c) {
                    best = Some((action, count));
                }
            }
        }
        best.map(|(action, _)| action)
    }

    /// Short display of the first binding only (for the status bar).
    pub fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action).and_then(|b| b.first()) {
            Some(bind) => bind.display(),
            None => "?".into(),
        }
    }

    pub fn status_bar_hint(&self) -> String {
        [
            Action::ScrollDown,
            Action::PageDown,
            Action::ToggleDevice,
            Action::Rotate,
            Action::ToggleMute,
            Action::Quit,
        ]
        .iter()
        .map(|&a| format!("{}: {}", self.short_binding(a), a.label().to_lowercase()))
        .collect::<Vec<_>>()
        .join(" | ")
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load from `path` (or the default location), falling back to defaults
    /// with a warning when the file is unreadable or invalid.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map_or_else(config_path, Path::to_path_buf);
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!(%err, "using default configuration");
                Self::defaults(path)
            }
        }
    }

    /// Strict load.  A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::defaults(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path.to_path_buf())
    }

    fn parse(contents: &str, path: PathBuf) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        file.tuning.validate()?;
        check_page(&file.page, &file.tuning)?;

        let videos = match file.videos {
            Some(v) if v.is_empty() => return Err(ConfigError::NoVideos),
            Some(v) => v,
            None => default_videos(),
        };

        let mut bindings = Self::default_bindings();
        for (key, values) in &file.keys {
            let Some(action) = Action::from_config_key(key) else {
                warn!(key = key.as_str(), "unknown action in [keys]");
                continue;
            };
            let parsed: Vec<KeyBind> = values
                .iter()
                .filter_map(|v| {
                    let bind = KeyBind::parse(v.trim());
                    if bind.is_none() {
                        warn!(key = key.as_str(), value = v.as_str(), "unparseable key binding");
                    }
                    bind
                })
                .collect();
            if !parsed.is_empty() {
                bindings.insert(action, parsed);
            }
        }

        Ok(Self {
            path,
            tuning: file.tuning,
            viewport: file.viewport,
            page: file.page,
            preview: file.preview,
            bindings,
            videos,
        })
    }

    fn to_file(&self) -> ConfigFile {
        let keys = Action::ALL
            .iter()
            .filter_map(|&action| {
                let binds = self.bindings.get(&action)?;
                let values: Vec<String> = binds.iter().map(KeyBind::to_config_string).collect();
                Some((action.config_key().to_string(), values))
            })
            .collect();
        ConfigFile {
            tuning: self.tuning,
            viewport: self.viewport,
            page: self.page,
            preview: self.preview,
            keys,
            videos: Some(self.videos.clone()),
        }
    }

    /// Persist the current config to [`AppConfig::path`].
    pub fn save(&self) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let body = toml::to_string_pretty(&self.to_file())?;
        let contents = format!("# wishes-reel configuration\n\n{body}");
        std::fs::write(&self.path, contents).map_err(write_err)
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/wishes-reel/config.toml`).
fn check_page(page: &PageConfig, tuning: &Tuning) -> Result<(), ConfigError> {
    let offset_vh = page.carousel_offset_vh;
    match page.max_carousel_offset_vh(tuning) {
        Some(limit_vh) if !offset_vh.is_finite() || offset_vh > limit_vh => {
            Err(ConfigError::CarouselTooLow { offset_vh, limit_vh })
        }
        _ => Ok(()),
    }
}

pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("wishes-reel").join("config.toml")
}
