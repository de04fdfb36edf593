use ratatui::style::Color;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use xdg::BaseDirectories;

use crate::live::replay::DEFAULT_SPEED;

pub const DEFAULT_API_URL: &str = "http://localhost:8082";
pub const DEFAULT_REPLAY_URL: &str = "ws://localhost:8083/ws/replay";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub log_file: String,
    /// Base URL of the player information service
    pub api_url: String,
    /// WebSocket endpoint of the replay server
    pub replay_url: String,
    /// Replay speed the live view starts with
    pub default_speed: u32,
    pub time_format: String,
    pub theme: ThemeConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ThemeConfig {
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_fg: Color,
    /// Color of a cell showing a fresh increment
    #[serde(deserialize_with = "deserialize_color")]
    pub flash_fg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub error_fg: Color,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            log_file: "/dev/null".to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            replay_url: DEFAULT_REPLAY_URL.to_string(),
            default_speed: DEFAULT_SPEED,
            time_format: "%H:%M:%S".to_string(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            selection_fg: Color::Rgb(255, 165, 0), // Orange
            flash_fg: Color::Green,
            error_fg: Color::Red,
        }
    }
}

impl Config {
    /// Starting speed, never zero
    pub fn initial_speed(&self) -> u32 {
        self.default_speed.max(1)
    }
}

/// Deserialize a color from a string (named, `#rrggbb`, `#rgb` or `r,g,b`)
fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color(&s).ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {}", s)))
}

/// Parse a color string into a ratatui Color
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_lowercase();

    if let Some(color) = named_color(&s) {
        return Some(color);
    }
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if s.contains(',') {
        return parse_rgb(&s);
    }
    None
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        "orange" => Color::Rgb(255, 165, 0),
        _ => return None,
    };
    Some(color)
}

fn parse_hex(hex: &str) -> Option<Color> {
    let expanded = match hex.len() {
        6 => hex.to_string(),
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn parse_rgb(s: &str) -> Option<Color> {
    let parts: Vec<u8> = s
        .split(',')
        .map(|part| part.trim().parse::<u8>().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [r, g, b] => Some(Color::Rgb(*r, *g, *b)),
        _ => None,
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    let pgm = env!("CARGO_PKG_NAME");
    let xdg_dirs = BaseDirectories::with_prefix(pgm);
    let config_home = xdg_dirs.get_config_home()?;
    Some(config_home.join("config.toml"))
}

/// Read the config file, falling back to defaults when missing or invalid
pub fn read() -> Config {
    let Some(config_path) = get_config_path() else {
        return Config::default();
    };
    if !config_path.exists() {
        return Config::default();
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => parse(&content),
        Err(_) => Config::default(),
    }
}

fn parse(content: &str) -> Config {
    toml::from_str(content).unwrap_or_else(|e| {
        tracing::warn!("Ignoring invalid config file: {}", e);
        Config::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_named() {
        assert_eq!(parse_color("red"), Some(Color::Red));
        assert_eq!(parse_color("Grey"), Some(Color::Gray));
        assert_eq!(parse_color("ORANGE"), Some(Color::Rgb(255, 165, 0)));
    }

    #[test]
    fn test_parse_color_hex() {
        assert_eq!(parse_color("#FF6600"), Some(Color::Rgb(255, 102, 0)));
        assert_eq!(parse_color("#f60"), Some(Color::Rgb(255, 102, 0)));
        assert_eq!(parse_color("#0F0"), Some(Color::Rgb(0, 255, 0)));
    }

    #[test]
    fn test_parse_color_rgb_tuple() {
        assert_eq!(parse_color("255, 102, 0"), Some(Color::Rgb(255, 102, 0)));
        assert_eq!(parse_color("0,255,0"), Some(Color::Rgb(0, 255, 0)));
    }

    #[test]
    fn test_parse_color_invalid() {
        assert_eq!(parse_color("invalid"), None);
        assert_eq!(parse_color("#ZZZ"), None);
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("256,0,0"), None);
        assert_eq!(parse_color("1,2"), None);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.replay_url, DEFAULT_REPLAY_URL);
        assert_eq!(config.default_speed, 1);
        assert_eq!(config.theme.flash_fg, Color::Green);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse(
            r##"
api_url = "http://stats.local:9000"
default_speed = 8

[theme]
flash_fg = "#00FFFF"
            "##,
        );
        assert_eq!(config.api_url, "http://stats.local:9000");
        assert_eq!(config.replay_url, DEFAULT_REPLAY_URL);
        assert_eq!(config.initial_speed(), 8);
        assert_eq!(config.theme.flash_fg, Color::Rgb(0, 255, 255));
        assert_eq!(config.theme.selection_fg, Color::Rgb(255, 165, 0));
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let config = parse("default_speed = \"fast\"");
        assert_eq!(config.default_speed, 1);

        let config = parse("[theme]\nflash_fg = \"sparkly\"");
        assert_eq!(config.theme.flash_fg, Color::Green);
    }

    #[test]
    fn test_zero_speed_bumped() {
        let config = parse("default_speed = 0");
        assert_eq!(config.initial_speed(), 1);
    }
}
