//! Shared helpers for command handlers.

use std::io::{self, IsTerminal, Read};
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Serialize, Serializer};
use tabled::Tabled;

use airscout_core::{NetworkRecord, quality_bucket, quality_percent, signal_bars};

use crate::error::CliError;
use crate::output::{self, OutputOpts};

/// Read a file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| CliError::ReadFailed {
                path: "stdin".into(),
                source,
            })?;
        return Ok(text);
    }
    std::fs::read_to_string(path).map_err(|source| CliError::ReadFailed {
        path: path.display().to_string(),
        source,
    })
}

/// Spinner on stderr, only for interactive, non-quiet runs.
pub fn spinner(message: &str, out: OutputOpts) -> Option<ProgressBar> {
    if out.quiet || !io::stderr().is_terminal() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

// ── Network listing ─────────────────────────────────────────────────

/// A record serialized in its wire form.
pub struct Listed<'a>(pub &'a NetworkRecord);

impl Serialize for Listed<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.to_document().serialize(serializer)
    }
}

#[derive(Tabled)]
pub struct NetworkRow {
    #[tabled(rename = "BSSID")]
    bssid: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Freq")]
    frequency: u32,
    #[tabled(rename = "Width")]
    bandwidth: String,
    #[tabled(rename = "Signal")]
    signal: String,
    #[tabled(rename = "Quality")]
    quality: String,
    #[tabled(rename = "Security")]
    security: String,
    #[tabled(rename = "Privacy")]
    privacy: String,
}

impl NetworkRow {
    pub fn new(n: &NetworkRecord, color: bool) -> Self {
        let quality = format!("{:>3}% {}", quality_percent(n.signal), signal_bars(n.signal));
        Self {
            bssid: n.mac_addr.clone(),
            ssid: n.ssid.clone(),
            mode: n.mode.to_string(),
            channel: n.channel_label(),
            frequency: n.frequency,
            bandwidth: format!("{} MHz", n.bandwidth),
            signal: format!("{} dBm", n.signal),
            quality: output::paint_quality(&quality, quality_bucket(n.signal), color),
            security: n.security.clone(),
            privacy: n.privacy.clone(),
        }
    }
}

/// Render records as a table, wire documents, or one BSSID per line.
pub fn render_networks<'a>(records: impl IntoIterator<Item = &'a NetworkRecord>, out: OutputOpts) -> String {
    let listed: Vec<Listed<'_>> = records.into_iter().map(Listed).collect();
    output::render_list(
        out.format,
        &listed,
        |l| NetworkRow::new(l.0, out.color),
        |l| l.0.mac_addr.clone(),
    )
}
