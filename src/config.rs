//! Settings and configuration
//!
//! [`Settings`] is the user-facing preference record (language, timezone,
//! theme mode) persisted under [`keys::SETTINGS`]. It is passed explicitly to
//! whatever needs it; nothing caches it globally.
//!
//! [`AppConfig`] is the optional TOML file given with `--config`. Its values
//! override stored settings for the current run and configure holiday sources.

use crate::date::DEFAULT_TIMEZONE;
use crate::storage::{Storage, keys};
use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    zh,
    en,
}

impl Language {
    /// Pick the text matching this language
    pub fn pick<'a>(self, zh: &'a str, en: &'a str) -> &'a str {
        match self {
            Language::zh => zh,
            Language::en => en,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zh" | "zh-cn" => Ok(Language::zh),
            "en" | "en-us" => Ok(Language::en),
            _ => Err(format!("Invalid language '{}'. Valid options are: zh, en", s)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Theme preference; `system` follows the OS color scheme
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeMode {
    dark,
    light,
    #[default]
    system,
}

impl ThemeMode {
    /// Concrete theme to render with
    ///
    /// # Arguments
    /// * `prefers_dark` - The platform's dark-mode preference, `None` when unknown
    pub fn resolve(self, prefers_dark: Option<bool>) -> ThemeMode {
        match self {
            ThemeMode::system => match prefers_dark {
                Some(false) => ThemeMode::light,
                _ => ThemeMode::dark,
            },
            mode => mode,
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(ThemeMode::dark),
            "light" => Ok(ThemeMode::light),
            "system" => Ok(ThemeMode::system),
            _ => Err(format!(
                "Invalid theme '{}'. Valid options are: dark, light, system",
                s
            )),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Persisted user preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub language: Language,
    /// IANA timezone name used for day keys and calendar steps
    pub timezone: String,
    pub theme: ThemeMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::zh,
            timezone: DEFAULT_TIMEZONE.name().to_string(),
            theme: ThemeMode::system,
        }
    }
}

impl Settings {
    /// Load from storage; missing or malformed settings give the defaults
    pub fn load(storage: &Storage) -> Self {
        storage.get_state(keys::SETTINGS, Settings::default())
    }

    pub fn save(&self, storage: &Storage) -> Result<()> {
        storage.set_state(keys::SETTINGS, self)
    }

    /// Parsed timezone; unknown names fall back to [`DEFAULT_TIMEZONE`]
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!(timezone = %self.timezone, "unknown timezone, using default");
            DEFAULT_TIMEZONE
        })
    }
}

/// Validate an IANA timezone name
pub fn parse_timezone(name: &str) -> Result<Tz, String> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| format!("Invalid timezone '{}'. Use an IANA name such as 'Asia/Shanghai'", name))
}

pub const DEFAULT_SYNC_TIMEOUT_MS: u64 = 12_000;
pub const DEFAULT_BUILTIN_TIMEOUT_MS: u64 = 8_000;

/// Holiday data sources
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HolidayConfig {
    /// Directory holding the built-in `cn-<year>.json` datasets
    pub builtin_dir: Option<PathBuf>,
    /// Holiday-API payload files tried in order by `sync-holidays`
    pub payload_files: Vec<PathBuf>,
    /// Per-source timeout for sync attempts
    pub timeout_ms: u64,
    /// Timeout for reading a built-in dataset
    pub builtin_timeout_ms: u64,
}

impl Default for HolidayConfig {
    fn default() -> Self {
        Self {
            builtin_dir: None,
            payload_files: Vec::new(),
            timeout_ms: DEFAULT_SYNC_TIMEOUT_MS,
            builtin_timeout_ms: DEFAULT_BUILTIN_TIMEOUT_MS,
        }
    }
}

/// Contents of the `--config` TOML file
///
/// ```toml
/// timezone = "Europe/Berlin"
/// language = "en"
///
/// [holiday]
/// builtin_dir = "data/holidays"
/// payload_files = ["mirror-a/holidayAPI.json", "mirror-b/holidayAPI.json"]
/// timeout_ms = 12000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub timezone: Option<String>,
    pub language: Option<Language>,
    pub theme: Option<ThemeMode>,
    pub holiday: HolidayConfig,
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        if let Some(ref tz) = config.timezone {
            parse_timezone(tz).map_err(anyhow::Error::msg)?;
        }
        Ok(config)
    }

    /// Overlay configured preferences on stored settings
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(ref tz) = self.timezone {
            settings.timezone = tz.clone();
        }
        if let Some(language) = self.language {
            settings.language = language;
        }
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
    }
}
