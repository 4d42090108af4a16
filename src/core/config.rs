use crate::booking::interval::{Interval, TimeOfDay};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub unix_socket: Option<PathBuf>,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    #[serde(default = "default_rooms")]
    pub rooms: Vec<u32>,
    #[serde(default = "default_open_time")]
    pub open_time: TimeOfDay,
    #[serde(default = "default_close_time")]
    pub close_time: TimeOfDay,
    /// Bucket size of the main timetable, in minutes
    #[serde(default = "default_grid_granularity")]
    pub grid_granularity: u16,
    /// Bucket size of the per-hour detail view, in minutes
    #[serde(default = "default_detail_granularity")]
    pub detail_granularity: u16,
    #[serde(default = "default_max_student_name_len")]
    pub max_student_name_len: usize,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    /// Reservation journal; reservations live only in memory when unset
    pub journal_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScheduleConfig {
    /// CSV of weekly class blocks (`weekday,room,start,end`)
    pub class_blocks_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_console")]
    pub console: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            rooms: default_rooms(),
            open_time: default_open_time(),
            close_time: default_close_time(),
            grid_granularity: default_grid_granularity(),
            detail_granularity: default_detail_granularity(),
            max_student_name_len: default_max_student_name_len(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            console: default_console(),
        }
    }
}

impl BookingConfig {
    /// Opening hours as an interval. Only valid after `Config::validate`.
    pub fn opening_window(&self) -> Result<Interval> {
        Interval::new(self.open_time, self.close_time).context("Invalid opening hours")
    }
}

// Default value functions
fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_rooms() -> Vec<u32> {
    vec![1, 2, 3, 4, 5]
}

fn default_open_time() -> TimeOfDay {
    TimeOfDay::from_hm(9, 0).unwrap_or(TimeOfDay::MIDNIGHT)
}

fn default_close_time() -> TimeOfDay {
    TimeOfDay::from_hm(22, 0).unwrap_or(TimeOfDay::END_OF_DAY)
}

fn default_grid_granularity() -> u16 {
    60
}

fn default_detail_granularity() -> u16 {
    10
}

fn default_max_student_name_len() -> usize {
    64
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_console() -> bool {
    false
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse and validate TOML configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate server config
        if self.server.port.is_none() && self.server.unix_socket.is_none() {
            bail!("Either port or unix_socket must be specified in server config");
        }

        if self.server.port == Some(0) {
            bail!("Server port must be greater than 0");
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        // Validate booking config
        if self.booking.rooms.is_empty() {
            bail!("At least one room must be configured");
        }

        if self.booking.rooms.contains(&0) {
            bail!("Room numbers must be positive integers");
        }

        let unique: HashSet<u32> = self.booking.rooms.iter().copied().collect();
        if unique.len() != self.booking.rooms.len() {
            bail!("Room numbers must be unique");
        }

        let window = self.booking.opening_window().context(format!(
            "open_time ({}) must be earlier than close_time ({})",
            self.booking.open_time, self.booking.close_time
        ))?;

        for (name, granularity) in [
            ("grid_granularity", self.booking.grid_granularity),
            ("detail_granularity", self.booking.detail_granularity),
        ] {
            if granularity == 0 {
                bail!("{} must be greater than 0", name);
            }
            if granularity > window.duration_minutes() {
                bail!(
                    "{} ({}) must not exceed the opening window ({} minutes)",
                    name,
                    granularity,
                    window.duration_minutes()
                );
            }
        }

        if self.booking.max_student_name_len == 0 {
            bail!("max_student_name_len must be greater than 0");
        }

        // Validate admin config
        if self.admin.tokens.is_empty() {
            bail!("At least one admin token must be configured");
        }

        if self.admin.tokens.iter().any(|t| t.is_empty()) {
            bail!("Admin tokens must not be empty");
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}
