use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use ketchup_core::models::SortOrder;
use ketchup_core::timezone::validate_timezone;
use serde::Deserialize;
use std::fmt;

pub const DEFAULT_DATABASE_PATH: &str = "ketchup.db";
pub const DEFAULT_CONFIG_FILE: &str = "ketchup.toml";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub database_path: String,
    /// User to act as when `--user` is not given, as `login` or `login:name`
    pub default_user: Option<String>,
    /// IANA zone that decides what "today" is
    pub timezone: String,
    /// Ordering of the overdue table
    pub default_sort: SortOrder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            default_user: None,
            timezone: detect_system_timezone(),
            default_sort: SortOrder::default(),
        }
    }
}

impl Config {
    /// Loads `ketchup.toml` (or the file named by `KETCHUP_CONFIG`) and then
    /// `KETCHUP_*` environment variables, later sources winning.
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(Env::var_or("KETCHUP_CONFIG", DEFAULT_CONFIG_FILE)))
            .merge(Env::prefixed("KETCHUP_").ignore(&["config"]))
            .extract()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config(database={}, default_user={}, timezone={}, sort={})",
            self.database_path,
            self.default_user.as_deref().unwrap_or("none"),
            self.timezone,
            self.default_sort
        )
    }
}

/// Detects the system timezone, falling back to UTC if detection fails
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if !tz.is_empty() && validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    if let Ok(tz) = iana_time_zone::get_timezone() {
        if validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    "UTC".to_string()
}
