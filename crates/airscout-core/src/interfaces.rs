// ── Wireless interface discovery via `iwconfig` ──

use std::process::{Command, Stdio};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::CoreError;

static WIRELESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(.*?) IEEE").expect("valid interface regex"));

static MONITOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(.*?) IEEE.*?Mode:Monitor").expect("valid monitor interface regex")
});

/// Interface names from `iwconfig` output. Only wireless interfaces print an
/// `IEEE 802.11` banner; the name column is space padded.
pub fn parse_interfaces(output: &str) -> Vec<String> {
    collect_names(&WIRELESS, output)
}

/// Interfaces whose banner line reports `Mode:Monitor`.
pub fn parse_monitor_interfaces(output: &str) -> Vec<String> {
    collect_names(&MONITOR, output)
}

fn collect_names(pattern: &Regex, output: &str) -> Vec<String> {
    pattern
        .captures_iter(output)
        .map(|caps| caps[1].replace(' ', ""))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Runs `iwconfig` and lists interfaces. Diagnostics on stderr (one line per
/// non-wireless interface) are discarded.
#[derive(Debug, Clone)]
pub struct InterfaceLister {
    program: String,
}

impl Default for InterfaceLister {
    fn default() -> Self {
        Self::new("iwconfig")
    }
}

impl InterfaceLister {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Raw `iwconfig` stdout, for [`parse_interfaces`] and
    /// [`parse_monitor_interfaces`].
    pub fn run(&self) -> Result<String, CoreError> {
        let output = Command::new(&self.program)
            .stderr(Stdio::null())
            .output()
            .map_err(|e| CoreError::Spawn {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;
        debug!(program = %self.program, status = ?output.status.code(), "listed interfaces");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
