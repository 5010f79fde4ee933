use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub colors: ColorsConfig,
    pub actions: ActionsConfig,
    pub keybinds: KeybindsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    pub process_limit: usize,
    pub show_connections: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 2000,
            process_limit: 100,
            show_connections: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub theme: String,
    pub color_support: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            theme: "dark".to_string(),
            color_support: "auto".to_string(),
        }
    }
}

/// Command templates run when a row is opened. `{pid}` and `{addr}` are
/// substituted; an empty template disables the action.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    pub process_command: String,
    pub connection_command: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub help: String,
    pub switch_focus: String,
    pub open: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            help: "?".to_string(),
            switch_focus: "Tab".to_string(),
            open: "Enter".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            file: None,
            level: "info".to_string(),
        }
    }
}

pub const MIN_REFRESH_RATE_MS: u64 = 100;

impl GeneralConfig {
    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.refresh_rate_ms.max(MIN_REFRESH_RATE_MS))
    }
}

/// Parses a keybind name like `q`, `Tab`, `Enter` or `Esc`.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c)),
                _ => None,
            }
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pulsetop").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.refresh_rate_ms, 2000);
        assert_eq!(config.general.process_limit, 100);
        assert!(config.general.show_connections);
        assert_eq!(config.colors.theme, "dark");
        assert!(config.actions.process_command.is_empty());
        assert_eq!(config.keybinds.quit, "q");
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[general]
process_limit = 25
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.process_limit, 25);
        assert_eq!(config.general.refresh_rate_ms, 2000);
        assert_eq!(config.keybinds.open, "Enter");
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
refresh_rate_ms = 1000
process_limit = 40
show_connections = false

[colors]
theme = "light"
color_support = "mono"

[actions]
process_command = "witr --pid {pid}"
connection_command = "whois {addr}"

[keybinds]
quit = "x"

[logging]
file = "/tmp/pulsetop.log"
level = "debug"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.refresh_rate_ms, 1000);
        assert!(!config.general.show_connections);
        assert_eq!(config.colors.theme, "light");
        assert_eq!(config.colors.color_support, "mono");
        assert_eq!(config.actions.process_command, "witr --pid {pid}");
        assert_eq!(config.actions.connection_command, "whois {addr}");
        assert_eq!(config.keybinds.quit, "x");
        assert_eq!(
            config.logging.file.as_deref(),
            Some(Path::new("/tmp/pulsetop.log"))
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn refresh_interval_is_clamped() {
        let general = GeneralConfig {
            refresh_rate_ms: 0,
            ..GeneralConfig::default()
        };
        assert_eq!(general.refresh_interval().as_millis(), 100);
    }

    #[test]
    fn parse_key_names() {
        assert_eq!(parse_key("Tab"), Some(KeyCode::Tab));
        assert_eq!(parse_key("ENTER"), Some(KeyCode::Enter));
        assert_eq!(parse_key("x"), Some(KeyCode::Char('x')));
        assert_eq!(parse_key("?"), Some(KeyCode::Char('?')));
        assert_eq!(parse_key("xy"), None);
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.general.refresh_rate_ms, 2000);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("pulsetop_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.general.process_limit, 100);
        let _ = std::fs::remove_file(&temp);
    }
}
