//! Shared configuration for the airscout CLI.
//!
//! TOML profiles layered with `AIRSCOUT_` environment overrides, and
//! translation to `airscout_core::ScanConfig`. The CLI applies its own
//! flag overrides on top of what this crate resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use airscout_core::{GpsLocation, RetryPolicy, ScanConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' is not defined")]
    UnknownProfile {
        profile: String,
        /// Defined profile names, sorted.
        available: Vec<String>,
    },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub scan: ScanSettings,

    /// Named scan profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            scan: ScanSettings::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// External tools and busy-retry timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScanSettings {
    #[serde(default = "default_iw_path")]
    pub iw_path: String,

    #[serde(default = "default_iwconfig_path")]
    pub iwconfig_path: String,

    /// Attempts per request while the device reports busy.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_full_scan_retry_ms")]
    pub full_scan_retry_ms: u64,

    #[serde(default = "default_hunt_retry_ms")]
    pub hunt_retry_ms: u64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            iw_path: default_iw_path(),
            iwconfig_path: default_iwconfig_path(),
            max_attempts: default_max_attempts(),
            full_scan_retry_ms: default_full_scan_retry_ms(),
            hunt_retry_ms: default_hunt_retry_ms(),
        }
    }
}

fn default_iw_path() -> String {
    "iw".into()
}
fn default_iwconfig_path() -> String {
    "iwconfig".into()
}
fn default_max_attempts() -> u32 {
    3
}
fn default_full_scan_retry_ms() -> u64 {
    400
}
fn default_hunt_retry_ms() -> u64 {
    200
}

/// A named scan profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Wireless interface to scan (e.g. "wlan0").
    pub interface: Option<String>,

    /// Frequencies in MHz to hunt one at a time. Empty means a full scan.
    #[serde(default)]
    pub hunt_frequencies: Vec<u32>,

    /// Fixed position stamped onto results, for a stationary sensor.
    pub location: Option<FixedLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct FixedLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: f64,
    #[serde(default)]
    pub speed: f64,
}

impl From<FixedLocation> for GpsLocation {
    fn from(loc: FixedLocation) -> Self {
        Self::new(loc.latitude, loc.longitude, loc.altitude, loc.speed)
    }
}

impl Config {
    /// Look up a profile by name, falling back to `default_profile`.
    ///
    /// A missing *default* profile yields an empty one so a bare install
    /// works; an explicitly named profile must exist.
    pub fn profile(&self, name: Option<&str>) -> Result<Profile, ConfigError> {
        if let Some(name) = name {
            return self
                .profiles
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownProfile {
                    profile: name.into(),
                    available: self.profile_names(),
                });
        }
        Ok(self
            .default_profile
            .as_deref()
            .and_then(|name| self.profiles.get(name))
            .cloned()
            .unwrap_or_default())
    }

    /// Names of the defined profiles, sorted.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "airscout", "airscout").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("airscout");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still layering the environment on top.
///
/// Nested keys use a double underscore: `AIRSCOUT_SCAN__IW_PATH`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("AIRSCOUT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Scan config resolution ──────────────────────────────────────────

/// Translate the `[scan]` table into the core's runtime settings.
pub fn resolve_scan_config(cfg: &Config) -> Result<ScanConfig, ConfigError> {
    let scan = &cfg.scan;
    if scan.max_attempts == 0 {
        return Err(ConfigError::Validation {
            field: "scan.max_attempts".into(),
            reason: "must be at least 1".into(),
        });
    }
    for (field, value) in [("scan.iw_path", &scan.iw_path), ("scan.iwconfig_path", &scan.iwconfig_path)] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: field.into(),
                reason: "must not be empty".into(),
            });
        }
    }

    Ok(ScanConfig {
        iw_path: scan.iw_path.clone(),
        iwconfig_path: scan.iwconfig_path.clone(),
        retry: RetryPolicy {
            max_attempts: scan.max_attempts,
            full_scan_delay: Duration::from_millis(scan.full_scan_retry_ms),
            hunt_delay: Duration::from_millis(scan.hunt_retry_ms),
        },
    })
}
