//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `plannerd.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use planner_adapter_home_assistant::HomeAssistantConfig;
use planner_app::sync_loop::SyncSettings;
use planner_domain::error::{PlannerError, ValidationError};
use planner_domain::holiday::{HolidayCalendar, STANDARD_HOLIDAYS};
use planner_domain::vocabulary::Vocabulary;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Where the schedule is persisted.
    pub storage: StorageConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Sync loop settings.
    pub sync: SyncConfig,
    /// Home Assistant connection.
    pub home_assistant: HomeAssistantConfig,
    /// Vocabulary, holidays and seeding.
    pub schedule: ScheduleSettings,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Schedule store backend.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Json,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// `SQLite` connection URL, used by the `sqlite` backend.
    pub database_url: String,
    /// Document path, used by the `json` backend.
    pub json_path: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Run the sync loop at all.
    pub enabled: bool,
    /// Seconds between two ticks.
    pub interval_secs: u64,
    /// Upper bound of a single push, in seconds.
    pub push_timeout_secs: u64,
    /// `input_select` entity receiving the mode.
    pub mode_entity: String,
    /// `input_select` entity receiving the phase.
    pub phase_entity: String,
}

/// Vocabulary overrides, holiday list and seeding toggle.
///
/// Unset vocabulary fields keep the built-in names.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Write the stock phase tables when the store is empty.
    pub seed_default_phases: bool,
    /// `MM-DD` days resolving to the holiday mode.
    pub holidays: Vec<String>,
    pub modes: Option<Vec<String>>,
    pub phases: Option<Vec<String>>,
    pub at_work_mode: Option<String>,
    pub at_home_mode: Option<String>,
    pub holiday_mode: Option<String>,
    pub default_phase: Option<String>,
}

impl Config {
    /// Load configuration from `plannerd.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("plannerd.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("PLANNER_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("PLANNER_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("PLANNER_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("PLANNER_DATABASE_URL") {
            self.storage.database_url = val;
        }
        if let Some(val) = var("PLANNER_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("PLANNER_HA_URL") {
            self.home_assistant.base_url = val;
        }
        if let Some(val) = var("PLANNER_HA_TOKEN") {
            self.home_assistant.token = Some(val);
        } else if self.home_assistant.token.is_none() {
            self.home_assistant.token = var("SUPERVISOR_TOKEN");
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.sync.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "sync interval must be non-zero".to_string(),
            ));
        }
        if self.sync.push_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "push timeout must be non-zero".to_string(),
            ));
        }
        if self.sync.mode_entity.is_empty() || self.sync.phase_entity.is_empty() {
            return Err(ConfigError::Validation(
                "mode and phase entities must be set".to_string(),
            ));
        }
        self.vocabulary()?;
        self.holidays()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Build the vocabulary from the `[schedule]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Vocabulary`] if the names are inconsistent.
    pub fn vocabulary(&self) -> Result<Vocabulary, ConfigError> {
        let schedule = &self.schedule;
        let mut builder = Vocabulary::builder();
        if let Some(modes) = &schedule.modes {
            builder = builder.modes(modes.iter().cloned());
        }
        if let Some(phases) = &schedule.phases {
            builder = builder.phases(phases.iter().cloned());
        }
        if let Some(name) = &schedule.at_work_mode {
            builder = builder.at_work_mode(name.clone());
        }
        if let Some(name) = &schedule.at_home_mode {
            builder = builder.at_home_mode(name.clone());
        }
        if let Some(name) = &schedule.holiday_mode {
            builder = builder.holiday_mode(name.clone());
        }
        if let Some(name) = &schedule.default_phase {
            builder = builder.default_phase(name.clone());
        }
        builder.build().map_err(ConfigError::Vocabulary)
    }

    /// Parse the configured holiday list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Holidays`] for an entry that is not a valid `MM-DD`.
    pub fn holidays(&self) -> Result<HolidayCalendar, ConfigError> {
        HolidayCalendar::parse(&self.schedule.holidays).map_err(ConfigError::Holidays)
    }
}

impl SyncConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    #[must_use]
    pub fn settings(&self) -> SyncSettings {
        SyncSettings {
            mode_entity: self.mode_entity.clone(),
            phase_entity: self.phase_entity.clone(),
            push_timeout: Duration::from_secs(self.push_timeout_secs),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8099,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: "sqlite:planner.db?mode=rwc".to_string(),
            json_path: "planner.json".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,tower_http=debug".to_string(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        let settings = SyncSettings::default();
        Self {
            enabled: true,
            interval_secs: 60,
            push_timeout_secs: settings.push_timeout.as_secs(),
            mode_entity: settings.mode_entity,
            phase_entity: settings.phase_entity,
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            seed_default_phases: true,
            holidays: STANDARD_HOLIDAYS.iter().map(ToString::to_string).collect(),
            modes: None,
            phases: None,
            at_work_mode: None,
            at_home_mode: None,
            holiday_mode: None,
            default_phase: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
    #[error("invalid vocabulary in [schedule]")]
    Vocabulary(#[source] PlannerError),
    #[error("invalid holiday in [schedule]")]
    Holidays(#[source] ValidationError),
}
