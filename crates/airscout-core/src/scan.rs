//! Scan orchestration on top of `iw dev <iface> scan`.
//!
//! A [`Scanner`] issues one scan request (or one per frequency when hunting
//! a fixed channel list), retries while the device reports busy, merges the
//! parsed records and stamps the caller's position onto them. The result is
//! a [`ScanReport`], which carries the `iw` exit status rather than failing:
//! a down interface or missing privileges is a normal outcome to report.
//!
//! Process execution sits behind [`ScanCommand`] so the retry and merge
//! rules can be driven by scripted output.

use std::process::Command;
use std::thread;
use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::codec::{GpsFix, ScanDocument};
use crate::error::CoreError;
use crate::model::GpsLocation;
use crate::parser::{NetworkMap, ScanParser};

/// Exit statuses `iw` reports for a scan request.
pub mod status {
    pub const SUCCESS: i32 = 0;
    /// Interface is down (radio switched off or link not up).
    pub const NET_DOWN: i32 = 156;
    pub const OP_NOT_SUPPORTED: i32 = 161;
    /// Device or resource busy, usually from scanning too soon after the last request.
    pub const DEVICE_BUSY: i32 = 240;
    pub const OP_NOT_PERMITTED: i32 = 255;
}

// ── Command seam ────────────────────────────────────────────────────

/// Exit status plus merged stdout/stderr of one scan request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: i32,
    pub text: String,
}

/// Runs a single scan request.
pub trait ScanCommand {
    fn run(&self, interface: &str, frequency: Option<u32>) -> Result<CommandOutput, CoreError>;
}

impl<T: ScanCommand + ?Sized> ScanCommand for &T {
    fn run(&self, interface: &str, frequency: Option<u32>) -> Result<CommandOutput, CoreError> {
        (**self).run(interface, frequency)
    }
}

/// Shells out to `iw dev <interface> scan [freq <mhz>]`.
#[derive(Debug, Clone)]
pub struct IwScanCommand {
    program: String,
}

impl Default for IwScanCommand {
    fn default() -> Self {
        Self::new("iw")
    }
}

impl IwScanCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(interface: &str, frequency: Option<u32>) -> Vec<String> {
        let mut args = vec!["dev".to_owned(), interface.to_owned(), "scan".to_owned()];
        if let Some(mhz) = frequency {
            args.push("freq".to_owned());
            args.push(mhz.to_string());
        }
        args
    }
}

impl ScanCommand for IwScanCommand {
    fn run(&self, interface: &str, frequency: Option<u32>) -> Result<CommandOutput, CoreError> {
        let output = Command::new(&self.program)
            .args(Self::args(interface, frequency))
            .output()
            .map_err(|e| CoreError::Spawn {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            // Killed by a signal: no exit code.
            status: output.status.code().unwrap_or(-1),
            text,
        })
    }
}

// ── Configuration ───────────────────────────────────────────────────

/// Busy-retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first.
    pub max_attempts: u32,
    pub full_scan_delay: Duration,
    pub hunt_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            full_scan_delay: Duration::from_millis(400),
            hunt_delay: Duration::from_millis(200),
        }
    }
}

/// Resolved settings for the scanning layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub iw_path: String,
    pub iwconfig_path: String,
    pub retry: RetryPolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            iw_path: "iw".into(),
            iwconfig_path: "iwconfig".into(),
            retry: RetryPolicy::default(),
        }
    }
}

// ── Results ─────────────────────────────────────────────────────────

/// Outcome of one scan request after status interpretation.
#[derive(Debug, Clone)]
pub struct ScanAttempt {
    pub status: i32,
    pub error: String,
    pub networks: NetworkMap,
}

impl ScanAttempt {
    pub fn is_success(&self) -> bool {
        self.status == status::SUCCESS
    }

    fn failed(status: i32, error: String) -> Self {
        Self {
            status,
            error,
            networks: IndexMap::new(),
        }
    }
}

/// Final result of [`Scanner::scan_networks`].
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub err_code: i32,
    pub err_string: String,
    pub gps: GpsLocation,
    pub networks: NetworkMap,
}

impl ScanReport {
    pub fn is_success(&self) -> bool {
        self.err_code == status::SUCCESS
    }

    pub fn to_document(&self) -> ScanDocument {
        ScanDocument {
            err_code: self.err_code,
            err_string: self.err_string.clone(),
            gps: GpsFix::from(&self.gps),
            networks: self.networks.values().map(|n| n.to_document()).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(&self.to_document())?)
    }
}

/// Error text for a failed request. Busy and down get fixed messages;
/// anything else passes the tool's own output through on one line.
pub fn describe_status(code: i32, output: &str) -> String {
    match code {
        status::NET_DOWN => "Interface appears down".to_owned(),
        status::DEVICE_BUSY => "Device is busy".to_owned(),
        status::OP_NOT_PERMITTED => format!("{}. Did you run as root?", output.replace('\n', "")),
        _ => output.replace('\n', ""),
    }
}

// ── Scanner ─────────────────────────────────────────────────────────

pub struct Scanner<C> {
    command: C,
    config: ScanConfig,
}

impl<C: ScanCommand> Scanner<C> {
    pub fn new(command: C, config: ScanConfig) -> Self {
        Self { command, config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Run a single request and interpret its status.
    pub fn scan_once(&self, interface: &str, frequency: Option<u32>) -> Result<ScanAttempt, CoreError> {
        debug!(interface, ?frequency, "issuing scan request");
        let output = self.command.run(interface, frequency)?;

        if output.status == status::SUCCESS {
            let networks = ScanParser::new().parse_str(&output.text);
            debug!(interface, ?frequency, count = networks.len(), "scan parsed");
            return Ok(ScanAttempt {
                status: output.status,
                error: String::new(),
                networks,
            });
        }

        debug!(interface, status = output.status, "scan request failed");
        Ok(ScanAttempt::failed(
            output.status,
            describe_status(output.status, &output.text),
        ))
    }

    /// Run a request, retrying while the device is busy. The last attempt's
    /// result is returned once the attempt ceiling is reached.
    pub fn scan_with_retry(
        &self,
        interface: &str,
        frequency: Option<u32>,
        delay: Duration,
    ) -> Result<ScanAttempt, CoreError> {
        let max_attempts = self.config.retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let result = self.scan_once(interface, frequency)?;
            if result.status != status::DEVICE_BUSY || attempt >= max_attempts {
                return Ok(result);
            }
            warn!(
                interface,
                ?frequency,
                attempt,
                max_attempts,
                "device busy, retrying in {}ms",
                delay.as_millis()
            );
            thread::sleep(delay);
            attempt += 1;
        }
    }

    /// Full scan (empty `hunt`) or one request per hunt frequency, merged.
    pub fn scan_networks(
        &self,
        interface: &str,
        location: Option<&GpsLocation>,
        hunt: &[u32],
    ) -> Result<ScanReport, CoreError> {
        let gps = location.copied().unwrap_or_default();

        let mut attempt = if hunt.is_empty() {
            self.scan_with_retry(interface, None, self.config.retry.full_scan_delay)?
        } else {
            self.hunt(interface, hunt)?
        };

        if !attempt.is_success() {
            return Ok(ScanReport {
                err_code: attempt.status,
                err_string: attempt.error,
                gps,
                networks: IndexMap::new(),
            });
        }

        if let Some(loc) = location {
            for net in attempt.networks.values_mut() {
                net.location = *loc;
            }
        }

        Ok(ScanReport {
            err_code: status::SUCCESS,
            err_string: String::new(),
            gps,
            networks: attempt.networks,
        })
    }

    /// Sequential per-frequency requests. Later results replace earlier ones
    /// on key collision; the first failed frequency ends the hunt.
    fn hunt(&self, interface: &str, frequencies: &[u32]) -> Result<ScanAttempt, CoreError> {
        let mut merged = NetworkMap::new();
        for &mhz in frequencies {
            let sub = self.scan_with_retry(interface, Some(mhz), self.config.retry.hunt_delay)?;
            if !sub.is_success() {
                debug!(interface, frequency = mhz, status = sub.status, "hunt stopped");
                return Ok(sub);
            }
            merged.extend(sub.networks);
        }
        Ok(ScanAttempt {
            status: status::SUCCESS,
            error: String::new(),
            networks: merged,
        })
    }
}
