//! Config subcommand handlers.

use dialoguer::{Input, Select};

use airscout_core::{InterfaceLister, parse_interfaces};

use crate::cli::{ConfigArgs, ConfigCommand};
use crate::config::{self, Config, Defaults, FixedLocation, Profile};
use crate::error::CliError;
use crate::output::{self, OutputOpts};

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config as TOML-ish text for the table view.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);

    let _ = writeln!(out);
    let _ = writeln!(out, "[scan]");
    let _ = writeln!(out, "iw_path = \"{}\"", cfg.scan.iw_path);
    let _ = writeln!(out, "iwconfig_path = \"{}\"", cfg.scan.iwconfig_path);
    let _ = writeln!(out, "max_attempts = {}", cfg.scan.max_attempts);
    let _ = writeln!(out, "full_scan_retry_ms = {}", cfg.scan.full_scan_retry_ms);
    let _ = writeln!(out, "hunt_retry_ms = {}", cfg.scan.hunt_retry_ms);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        if let Some(ref iface) = p.interface {
            let _ = writeln!(out, "interface = \"{iface}\"");
        }
        if !p.hunt_frequencies.is_empty() {
            let freqs: Vec<String> = p.hunt_frequencies.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "hunt_frequencies = [{}]", freqs.join(", "));
        }
        if let Some(loc) = p.location {
            let _ = writeln!(
                out,
                "location = {{ latitude = {}, longitude = {}, altitude = {}, speed = {} }}",
                loc.latitude, loc.longitude, loc.altitude, loc.speed
            );
        }
    }

    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Parse a comma separated MHz list; blank means a full scan.
fn parse_frequencies(raw: &str) -> Result<Vec<u32>, CliError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>().map_err(|_| CliError::Validation {
                field: "hunt_frequencies".into(),
                reason: format!("'{s}' is not a frequency in MHz"),
            })
        })
        .collect()
}

fn prompt_location() -> Result<Option<FixedLocation>, CliError> {
    let choices = &["No fixed location", "Enter coordinates for this sensor"];
    let selection = Select::new()
        .with_prompt("Stamp a fixed location onto results?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    if selection == 0 {
        return Ok(None);
    }

    let latitude: f64 = Input::new()
        .with_prompt("Latitude")
        .interact_text()
        .map_err(prompt_err)?;
    let longitude: f64 = Input::new()
        .with_prompt("Longitude")
        .interact_text()
        .map_err(prompt_err)?;
    let altitude: f64 = Input::new()
        .with_prompt("Altitude (m)")
        .default(0.0)
        .interact_text()
        .map_err(prompt_err)?;

    Ok(Some(FixedLocation {
        latitude,
        longitude,
        altitude,
        speed: 0.0,
    }))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, cfg: &Config, out: OutputOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("airscout configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Interface, suggesting the first one iwconfig reports
            let suggested = InterfaceLister::new(cfg.scan.iwconfig_path.clone())
                .run()
                .ok()
                .and_then(|text| parse_interfaces(&text).into_iter().next())
                .unwrap_or_else(|| "wlan0".into());
            let interface: String = Input::new()
                .with_prompt("Wireless interface")
                .default(suggested)
                .interact_text()
                .map_err(prompt_err)?;

            // 3. Hunt list
            let raw_freqs: String = Input::new()
                .with_prompt("Hunt frequencies in MHz (comma separated, blank for full scan)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;
            let hunt_frequencies = parse_frequencies(&raw_freqs)?;

            // 4. Fixed location
            let location = prompt_location()?;

            // 5. Output format
            let formats = &["table", "json", "json-compact", "yaml", "plain"];
            let format = Select::new()
                .with_prompt("Default output format")
                .items(formats)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            // 6. Merge into the existing config and write
            let mut new_cfg = cfg.clone();
            new_cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    interface: Some(interface),
                    hunt_frequencies,
                    location,
                },
            );
            new_cfg.default_profile = Some(profile_name.clone());
            new_cfg.defaults = Defaults {
                output: formats[format].into(),
                ..new_cfg.defaults
            };
            config::save_config(&new_cfg)?;

            output::print_status(
                &format!("Configuration written to {}", config_path.display()),
                out.color,
            );
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: sudo airscout scan");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let rendered = output::render_single(out.format, cfg, format_config, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&rendered, out.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), out.quiet);
            Ok(())
        }
    }
}
