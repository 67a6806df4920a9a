//! Configuration file support for tv-browser.
//!
//! This module provides functionality for loading and saving user preferences
//! from a TOML configuration file.

use crate::api::DEFAULT_BASE_URL;
use crate::error::{AppError, Result};
use crate::types::ShowId;
use crate::view::DEFAULT_PLACEHOLDER_IMAGE;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Show loaded on startup when nothing else is configured (Game of Thrones).
pub const DEFAULT_SHOW_ID: ShowId = 82;

/// User configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog API endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Show loaded on startup
    #[serde(default = "default_show_id")]
    pub default_show_id: ShowId,

    /// Image used for episodes the catalog has no picture for
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,

    /// Command used to open episode links (overrides platform default)
    #[serde(default)]
    pub browser: Option<String>,

    /// Key bindings
    #[serde(default)]
    pub keybindings: Keybindings,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_show_id() -> ShowId {
    DEFAULT_SHOW_ID
}

fn default_placeholder_image() -> String {
    DEFAULT_PLACEHOLDER_IMAGE.to_string()
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self {
            base_url: default_base_url(),
            default_show_id: default_show_id(),
            placeholder_image: default_placeholder_image(),
            browser: None,
            keybindings: Keybindings::default(),
        }
    }

    /// Get the path to the config file.
    ///
    /// Returns ~/.config/tv-browser/config.toml on Linux,
    /// or a platform-appropriate location on other systems.
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Could not find config directory")
            })?
            .join("tv-browser");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::get_config_path()?;

        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    /// Parse config from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.keybindings.validate()?;
        Ok(config)
    }

    /// Save config to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = Self::get_config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Create a default config file if one doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn create_default_if_missing() -> Result<PathBuf> {
        let path = Self::get_config_path()?;

        if !path.exists() {
            let config = Self::new();
            config.save()?;
        }

        Ok(path)
    }

    /// Command that opens URLs on this platform.
    pub fn browser_command(&self) -> String {
        if let Some(browser) = &self.browser {
            return browser.clone();
        }
        match std::env::consts::OS {
            "macos" => "open",
            "windows" => "explorer",
            _ => "xdg-open",
        }
        .to_string()
    }
}

/// Keys bound to each command, by name (`"j"`, `"Down"`, `"Enter"`, `"Ctrl+r"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Keybindings {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub select: Vec<String>,
    pub back: Vec<String>,
    pub search: Vec<String>,
    pub shows: Vec<String>,
    pub episodes: Vec<String>,
    pub open: Vec<String>,
    pub help: Vec<String>,
    pub quit: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            up: keys(&["k", "Up"]),
            down: keys(&["j", "Down"]),
            select: keys(&["Enter"]),
            back: keys(&["Esc", "Backspace"]),
            search: keys(&["/"]),
            shows: keys(&["s"]),
            episodes: keys(&["e"]),
            open: keys(&["o"]),
            help: keys(&["?"]),
            quit: keys(&["q"]),
        }
    }
}

impl Keybindings {
    /// Whether `key` is one of `binding`.
    pub fn matches(&self, binding: &[String], key: &KeyEvent) -> bool {
        binding
            .iter()
            .filter_map(|name| parse_key(name))
            .any(|(code, modifiers)| {
                code == key.code && key.modifiers.contains(modifiers)
            })
    }

    /// Reject key names that can never match.
    fn validate(&self) -> Result<()> {
        let all = [
            &self.up,
            &self.down,
            &self.select,
            &self.back,
            &self.search,
            &self.shows,
            &self.episodes,
            &self.open,
            &self.help,
            &self.quit,
        ];
        for name in all.into_iter().flatten() {
            if parse_key(name).is_none() {
                return Err(AppError::Config(format!("Unknown key '{}'", name)));
            }
        }
        Ok(())
    }
}

/// Parse a key name into a key code and required modifiers.
fn parse_key(name: &str) -> Option<(KeyCode, KeyModifiers)> {
    if let Some(rest) = name.strip_prefix("Ctrl+") {
        let (code, _) = parse_key(rest)?;
        return Some((code, KeyModifiers::CONTROL));
    }

    let code = match name {
        "Enter" => KeyCode::Enter,
        "Esc" => KeyCode::Esc,
        "Backspace" => KeyCode::Backspace,
        "Tab" => KeyCode::Tab,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "Space" => KeyCode::Char(' '),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };

    Some((code, KeyModifiers::NONE))
}
