//! Configuration file handling for marvelous.

use anyhow::{Context, Result, anyhow};
use marvelous_app::{Confirm, RemoteConfig, StdinPrompt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod keybindings;

pub use keybindings::{Action, KeyBindingsConfig, ViewType};

/// Top-level configuration for marvelous.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the task store lives.
    pub remote: RemoteConfig,
    /// TUI configuration.
    pub tui: TuiConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Keybindings configuration.
    pub keybindings: KeyBindingsConfig,
}

impl Config {
    /// Check every section.
    ///
    /// # Errors
    /// Fails on unusable remote settings or conflicting/invalid keybindings.
    pub fn validate(&self) -> Result<()> {
        self.remote.validate()?;
        keybindings::validate_keybindings_config(&self.tui.keybindings)
    }
}

/// Returns the default configuration file path.
///
/// On Linux: `~/.config/marvelous/config.toml`
/// On macOS: `~/Library/Application Support/marvelous/config.toml`
/// On Windows: `%APPDATA%\marvelous\config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("marvelous").join("config.toml"))
}

/// Load and validate configuration from a TOML file.
///
/// `path` defaults to [`default_config_path`]. Returns `Ok(None)` when the file does
/// not exist.
///
/// # Errors
/// Fails when the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&Path>) -> Result<Option<Config>> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    if !config_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", config_path.display()))?;

    Ok(Some(config))
}

/// Generate default configuration as TOML string.
///
/// # Errors
/// Fails only if the defaults cannot be serialized.
pub fn generate_default_config_toml() -> Result<String> {
    let toml_str =
        toml::to_string_pretty(&Config::default()).context("Failed to serialize default configuration")?;

    let header = r#"# marvelous configuration
#
# [remote]
# base_url: root of the task store; endpoints live under {base_url}/tasks/.
#           Overridden by --base-url or MARVELOUS_BASE_URL.
# timeout_secs: optional per-request timeout. Omit to wait indefinitely.
#
# [tui.keybindings]
# Each action can have multiple key bindings.
#
# Supported key formats:
# - Single characters: "j", "k", "a", "/"
# - Special keys: "Enter", "Esc", "Tab", "Space", "Backspace", "Delete"
# - Arrow keys: "Up", "Down", "Left", "Right"
# - Navigation keys: "Home", "End", "PageUp", "PageDown"
# - Modified keys: "Ctrl+u", "Alt+k"
#
# Note: when [tui.keybindings] is present every action must be listed.

"#;

    Ok(format!("{header}{toml_str}"))
}

/// Write the default configuration file.
///
/// `output` defaults to [`default_config_path`]. An existing file is only replaced with
/// `force` or after an interactive confirmation.
///
/// # Errors
/// Fails when no path can be determined or the file cannot be written.
pub fn init_config(output: Option<&Path>, force: bool) -> Result<()> {
    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_config_path().ok_or_else(|| anyhow!("Could not determine config directory"))?,
    };

    if write_default_config(&output_path, force, &mut StdinPrompt::stdio())? {
        println!("✓ Wrote configuration file: {}", output_path.display());
        println!();
        println!("Edit this file to change the store location or keybindings.");
    } else {
        println!("Aborted.");
    }
    Ok(())
}

fn write_default_config<C: Confirm + ?Sized>(path: &Path, force: bool, confirm: &mut C) -> Result<bool> {
    if path.exists() && !force {
        let question = format!("File already exists: {}\nOverwrite?", path.display());
        if !confirm.confirm(&question) {
            return Ok(false);
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    let content = generate_default_config_toml()?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(true)
}
