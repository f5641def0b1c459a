//! CLI configuration: thin wrapper around `airscout_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides.

use clap::ValueEnum;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use airscout_config::{
    Config, Defaults, FixedLocation, Profile, config_path, load_config, load_config_or_default,
    resolve_scan_config, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// The profile selected by `--profile`, or the default one (possibly empty).
pub fn resolve_profile(global: &GlobalOpts, config: &Config) -> Result<Profile, CliError> {
    Ok(config.profile(global.profile.as_deref())?)
}

/// `--output` flag, else `[defaults] output`, else table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}

/// `--color` flag, else `[defaults] color`, else auto.
pub fn color_mode(global: &GlobalOpts, config: &Config) -> ColorMode {
    global.color.unwrap_or_else(|| {
        ColorMode::from_str(&config.defaults.color, true).unwrap_or(ColorMode::Auto)
    })
}
