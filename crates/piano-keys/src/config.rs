//! Configuration file support for piano-keys
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/piano-keys/config.toml`
//! - macOS: `~/Library/Application Support/piano-keys/config.toml`
//! - Windows: `%APPDATA%\piano-keys\config.toml`

use crate::error::{Error, Result};
use crate::keyboard::{
    Keyboard, WidgetConfig, ACCIDENTAL_COLOR, NATURAL_COLOR, PRESSED_ACCIDENTAL_COLOR,
    PRESSED_NATURAL_COLOR,
};
use crate::theory::KeyboardSize;
use directories::ProjectDirs;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Keyboard configuration
    pub keyboard: KeyboardSettings,
    /// Key color overrides
    pub colors: ColorSettings,
    /// Player configuration
    pub player: PlayerSettings,
    /// UI/Theme configuration
    pub theme: Theme,
}

impl Config {
    /// Load configuration from the default config file location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Err(Error::Config(format!("Config file not found at {:?}", path)))
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration or return default if not found
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Using default configuration: {}", e);
                Self::default()
            }
        }
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "piano-keys") {
            Ok(proj_dirs.config_dir().join("config.toml"))
        } else {
            Err(Error::Config("Could not determine config directory".to_string()))
        }
    }

    /// Create a default config file with comments
    pub fn create_default_config_file() -> Result<PathBuf> {
        let path = Self::config_path()?;
        write_default_config(&path)?;
        Ok(path)
    }

    /// Build the keyboard described by this configuration
    pub fn to_keyboard(&self) -> Result<Keyboard> {
        let size = KeyboardSize::from_key_count(self.keyboard.size).ok_or_else(|| {
            Error::Config(format!(
                "Unsupported keyboard size {} (expected one of 12, 25, 49, 61, 76, 88)",
                self.keyboard.size
            ))
        })?;
        self.theme.validate()?;

        let mut keyboard = Keyboard::new(self.keyboard.widget_config()).with_range(size.range());

        let colors = &self.colors;
        if colors.pressed_white.is_some() || colors.pressed_black.is_some() {
            keyboard = keyboard.color_all_pressed_keys(
                color_or(colors.pressed_white.as_deref(), PRESSED_NATURAL_COLOR)?,
                color_or(colors.pressed_black.as_deref(), PRESSED_ACCIDENTAL_COLOR)?,
            );
        }
        if colors.unpressed_white.is_some() || colors.unpressed_black.is_some() {
            keyboard = keyboard.color_all_unpressed_keys(
                color_or(colors.unpressed_white.as_deref(), NATURAL_COLOR)?,
                color_or(colors.unpressed_black.as_deref(), ACCIDENTAL_COLOR)?,
            );
        }

        Ok(keyboard)
    }
}

fn color_or(value: Option<&str>, fallback: Color) -> Result<Color> {
    value.map_or(Ok(fallback), parse_color)
}

/// Write the commented default configuration to `path`
pub fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = r##"# piano-keys configuration file

[keyboard]
# Number of keys: 12, 25, 49, 61, 76 or 88
size = 25

# Clicking keys presses them (false = display only)
interactive = true

# Show the keyboard size buttons
show_size_selector = true

# Show the names of the pressed notes
debug_notes = false

[colors]
# Override key colors (named colors or "#rrggbb").
# Leave out to use the built-in colors.
# pressed_white = "light_green"
# pressed_black = "green"
# unpressed_white = "white"
# unpressed_black = "black"

[player]
# MIDI channel (0-15)
channel = 0

# Velocity (1-127)
velocity = 100

[theme]
border_color = "cyan"
label_color = "dark_gray"
"##;

    fs::write(path, content)?;
    Ok(())
}

/// Keyboard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardSettings {
    /// Number of keys
    pub size: usize,
    /// Clicking keys presses them
    pub interactive: bool,
    /// Show the size buttons
    pub show_size_selector: bool,
    /// Show pressed note names
    pub debug_notes: bool,
}

impl Default for KeyboardSettings {
    fn default() -> Self {
        Self {
            size: KeyboardSize::default().key_count(),
            interactive: true,
            show_size_selector: true,
            debug_notes: false,
        }
    }
}

impl KeyboardSettings {
    pub fn widget_config(&self) -> WidgetConfig {
        WidgetConfig {
            interactive: self.interactive,
            show_size_selector: self.show_size_selector,
            debug_notes: self.debug_notes,
        }
    }
}

/// Key color overrides, as color strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    pub pressed_white: Option<String>,
    pub pressed_black: Option<String>,
    pub unpressed_white: Option<String>,
    pub unpressed_black: Option<String>,
}

/// Player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// MIDI channel (0-15)
    pub channel: u8,
    /// Note-on velocity (1-127)
    pub velocity: u8,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            channel: 0,
            velocity: 100,
        }
    }
}

/// Theme/UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Border color
    pub border_color: String,
    /// Color of the note names on the keys
    pub label_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border_color: "cyan".to_string(),
            label_color: "dark_gray".to_string(),
        }
    }
}

impl Theme {
    /// Check that both theme colors parse
    pub fn validate(&self) -> Result<()> {
        parse_color(&self.border_color)?;
        parse_color(&self.label_color)?;
        Ok(())
    }

    /// Get border color
    pub fn border(&self) -> Color {
        theme_color(&self.border_color, Color::Cyan)
    }

    /// Get note label color
    pub fn label(&self) -> Color {
        theme_color(&self.label_color, Color::DarkGray)
    }
}

fn theme_color(value: &str, fallback: Color) -> Color {
    parse_color(value).unwrap_or_else(|e| {
        log::warn!("{}, using {:?}", e, fallback);
        fallback
    })
}

/// Parse a color string to ratatui Color
pub fn parse_color(s: &str) -> Result<Color> {
    let color = match s.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Color::DarkGray,
        "light_red" | "lightred" => Color::LightRed,
        "light_green" | "lightgreen" => Color::LightGreen,
        "light_yellow" | "lightyellow" => Color::LightYellow,
        "light_blue" | "lightblue" => Color::LightBlue,
        "light_magenta" | "lightmagenta" => Color::LightMagenta,
        "light_cyan" | "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        hex if hex.starts_with('#') && hex.len() == 7 && hex.is_ascii() => {
            match (
                u8::from_str_radix(&hex[1..3], 16),
                u8::from_str_radix(&hex[3..5], 16),
                u8::from_str_radix(&hex[5..7], 16),
            ) {
                (Ok(r), Ok(g), Ok(b)) => Color::Rgb(r, g, b),
                _ => return Err(Error::Config(format!("Invalid hex color '{}'", s))),
            }
        }
        _ => return Err(Error::Config(format!("Unknown color '{}'", s))),
    };
    Ok(color)
}
