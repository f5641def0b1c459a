// ── Client (station) record ──

use std::fmt;

use chrono::{DateTime, Utc};

use super::location::GpsLocation;
use super::network::NO_SIGNAL_DBM;

/// `ap_mac_addr` value some tools print for a station with no AP.
pub const NOT_ASSOCIATED: &str = "(not associated)";

/// One discovered station.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRecord {
    pub mac_addr: String,
    pub ap_mac_addr: String,
    pub ssid: String,
    pub channel: u32,
    pub signal: i32,
    pub strongest_signal: i32,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub location: GpsLocation,
    pub strongest_location: GpsLocation,
    /// SSIDs this station probed for, in the order they were observed.
    pub probed_ssids: Vec<String>,
    pub seen_in_scan: bool,
}

impl ClientRecord {
    pub fn new(seen_at: DateTime<Utc>) -> Self {
        Self {
            mac_addr: String::new(),
            ap_mac_addr: String::new(),
            ssid: String::new(),
            channel: 0,
            signal: NO_SIGNAL_DBM,
            strongest_signal: NO_SIGNAL_DBM,
            first_seen: seen_at,
            last_seen: seen_at,
            location: GpsLocation::default(),
            strongest_location: GpsLocation::default(),
            probed_ssids: Vec::new(),
            seen_in_scan: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.mac_addr
    }

    pub fn is_associated(&self) -> bool {
        !self.ap_mac_addr.is_empty() && self.ap_mac_addr != NOT_ASSOCIATED
    }
}

impl fmt::Display for ClientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MAC Address: {}", self.mac_addr)?;
        writeln!(
            f,
            "Associated Access Point Mac Address: {}",
            self.ap_mac_addr
        )?;
        writeln!(f, "SSID: {}", self.ssid)?;
        writeln!(f, "Channel: {}", self.channel)?;
        writeln!(f, "Signal: {} dBm", self.signal)?;
        writeln!(f, "Strongest Signal: {} dBm", self.strongest_signal)?;
        writeln!(f, "First Seen: {}", self.first_seen)?;
        writeln!(f, "Last Seen: {}", self.last_seen)?;
        if self.probed_ssids.is_empty() {
            writeln!(f, "Probed SSIDs: No probes observed")?;
        } else {
            writeln!(f, "Probed SSIDs: {}", self.probed_ssids.join(" "))?;
        }
        writeln!(f, "Last GPS:")?;
        write!(f, "{}", self.location)?;
        writeln!(f, "Strongest GPS:")?;
        write!(f, "{}", self.strongest_location)
    }
}
