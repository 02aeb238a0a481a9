use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Keymap {
    pub quit: String,
    pub toggle_tasks: String,
    pub previous_entry: String,
    pub next_entry: String,
    pub goto_today: String,
    pub remove_block: String,
    pub task_toggle: String,
    pub task_cycle_status: String,
    pub task_delete: String,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            quit: "ctrl-q".to_string(),
            toggle_tasks: "ctrl-t".to_string(),
            previous_entry: "alt-down".to_string(),
            next_entry: "alt-up".to_string(),
            goto_today: "ctrl-g".to_string(),
            remove_block: "ctrl-k".to_string(),
            task_toggle: "x".to_string(),
            task_cycle_status: "s".to_string(),
            task_delete: "d".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    /// Character that opens the slash menu
    pub slash_trigger: char,
    /// Columns per outline level
    pub indent_width: u16,
    pub tick_rate_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            slash_trigger: dayline_core::slash::TRIGGER,
            indent_width: 2,
            tick_rate_ms: 250,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub keymap: Keymap,
    pub editor: EditorConfig,
}

/// Load the config file, writing the defaults out first if it does not exist
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        let config = Config::default();
        let toml = toml::to_string(&config).context("Failed to serialize default config")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;
        log::info!("Wrote default config to {}", path.display());
        return Ok(config);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Check a key event against a binding such as `ctrl-t`, `alt-up` or `x`.
/// Unknown key names never match.
pub fn key_matches(binding: &str, key: &KeyEvent) -> bool {
    let binding = binding.trim().to_lowercase();
    let mut parts: Vec<&str> = binding.split('-').collect();
    let Some(name) = parts.pop() else {
        return false;
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in parts {
        match part {
            "ctrl" => modifiers |= KeyModifiers::CONTROL,
            "alt" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            _ => return false,
        }
    }

    let code = match name {
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "delete" => KeyCode::Delete,
        "space" => KeyCode::Char(' '),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return false,
            }
        }
    };

    let pressed = match key.code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };
    // Shift is implied by an uppercase char, so only compare it when bound.
    let mut relevant = key.modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT);
    if !modifiers.contains(KeyModifiers::SHIFT) {
        relevant.remove(KeyModifiers::SHIFT);
    }

    pressed == code && relevant == modifiers
}
