use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds while idle
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Show the source location column next to each row
    #[serde(default = "default_true")]
    pub show_locations: bool,
    /// Theme name (e.g., "gruvbox-dark", "nord")
    #[serde(default = "default_theme_name")]
    pub theme: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            show_locations: default_true(),
            theme: default_theme_name(),
        }
    }
}

/// Easing curve used by smooth scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EasingType {
    /// Constant velocity
    Linear,
    /// Cubic ease-out: 1 - (1-t)^3
    #[default]
    Cubic,
    /// Quintic ease-out: 1 - (1-t)^5
    Quintic,
    /// Exponential ease-out: 1 - 2^(-10t)
    #[serde(alias = "easeout", alias = "ease_out")]
    Exponential,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Enable smooth scrolling for long jumps
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Duration of a smooth scroll in milliseconds (0 = instant)
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    /// Easing curve
    #[serde(default)]
    pub easing: EasingType,
    /// Frame rate while an animation is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Fraction of the viewport moved by PageUp/PageDown
    #[serde(default = "default_page_fraction")]
    pub page_fraction: f64,
    /// Lines scrolled per mouse wheel notch
    #[serde(default = "default_wheel_lines")]
    pub wheel_lines: u16,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            animation_fps: default_animation_fps(),
            page_fraction: default_page_fraction(),
            wheel_lines: default_wheel_lines(),
        }
    }
}

/// Where `openDocument` messages are posted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOutput {
    Stdout,
    Disabled,
    File(PathBuf),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// "stdout", "none", or a file path (messages are appended)
    #[serde(default = "default_host_output")]
    pub output: String,
    /// objdump executable used by `--binary`
    #[serde(default = "default_objdump_path")]
    pub objdump_path: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            output: default_host_output(),
            objdump_path: default_objdump_path(),
        }
    }
}

impl HostConfig {
    pub fn output(&self) -> HostOutput {
        match self.output.trim() {
            "" | "none" | "off" => HostOutput::Disabled,
            "stdout" | "-" => HostOutput::Stdout,
            path => HostOutput::File(expand_tilde(std::path::Path::new(path))),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-f>" (Ctrl+f), "<S-g>" (Shift+g), "<CR>" (Enter), "<Esc>", "<Space>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Select the next row
    #[serde(default = "default_key_move_down")]
    pub move_down: String,
    /// Select the previous row
    #[serde(default = "default_key_move_up")]
    pub move_up: String,
    /// Move selection one page down
    #[serde(default = "default_key_page_down")]
    pub page_down: String,
    /// Move selection one page up
    #[serde(default = "default_key_page_up")]
    pub page_up: String,
    /// Select the first row
    #[serde(default = "default_key_jump_to_top")]
    pub jump_to_top: String,
    /// Select the last row
    #[serde(default = "default_key_jump_to_bottom")]
    pub jump_to_bottom: String,
    /// Post the current row's location to the host again
    #[serde(default = "default_key_reveal")]
    pub reveal: String,
    /// Toggle the help overlay
    #[serde(default = "default_key_help")]
    pub help: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            move_down: default_key_move_down(),
            move_up: default_key_move_up(),
            page_down: default_key_page_down(),
            page_up: default_key_page_up(),
            jump_to_top: default_key_jump_to_top(),
            jump_to_bottom: default_key_jump_to_bottom(),
            reveal: default_key_reveal(),
            help: default_key_help(),
        }
    }
}

// Default keymap values (Vim-style notation)
fn default_key_quit() -> String { "q".to_string() }
fn default_key_move_down() -> String { "j".to_string() }
fn default_key_move_up() -> String { "k".to_string() }
fn default_key_page_down() -> String { "<C-f>".to_string() }
fn default_key_page_up() -> String { "<C-b>".to_string() }
fn default_key_jump_to_top() -> String { "gg".to_string() }
fn default_key_jump_to_bottom() -> String { "G".to_string() }
fn default_key_reveal() -> String { "<CR>".to_string() }
fn default_key_help() -> String { "?".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("objview")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tick_rate() -> u64 {
    100
}

fn default_theme_name() -> String {
    "gruvbox-dark".to_string()
}

fn default_animation_duration() -> u64 {
    135
}

fn default_animation_fps() -> u32 {
    60
}

fn default_page_fraction() -> f64 {
    0.9
}

fn default_wheel_lines() -> u16 {
    3
}

fn default_host_output() -> String {
    "stdout".to_string()
}

fn default_objdump_path() -> String {
    "objdump".to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaults when it does not exist
    pub fn load_from(config_path: &std::path::Path) -> crate::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/objview/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("objview")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("objview.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.scroll.smooth_enabled);
        assert_eq!(config.scroll.animation_duration_ms, 135);
        assert_eq!(config.scroll.easing, EasingType::Cubic);
        assert_eq!(config.scroll.animation_fps, 60);
        assert_eq!(config.host.output(), HostOutput::Stdout);
        assert_eq!(config.keymap.jump_to_top, "gg");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [scroll]
            animation_duration_ms = 200
            easing = "quintic"

            [host]
            output = "none"
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll.animation_duration_ms, 200);
        assert_eq!(config.scroll.easing, EasingType::Quintic);
        assert!(config.scroll.smooth_enabled);
        assert_eq!(config.host.output(), HostOutput::Disabled);
        assert_eq!(config.ui.tick_rate_ms, 100);
    }

    #[test]
    fn test_host_output_file() {
        let host = HostConfig {
            output: "/tmp/objview-messages.jsonl".to_string(),
            ..Default::default()
        };
        assert_eq!(
            host.output(),
            HostOutput::File(PathBuf::from("/tmp/objview-messages.jsonl"))
        );
    }

    #[test]
    fn test_invalid_toml() {
        let err = AppConfig::from_toml("[scroll]\nanimation_duration_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let text = AppConfig::default().to_toml().unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.scroll.page_fraction, 0.9);
        assert_eq!(parsed.ui.theme, "gruvbox-dark");
    }
}
