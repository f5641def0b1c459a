// ── Network (BSS) record ──

use std::fmt;

use chrono::{DateTime, Utc};

use super::location::GpsLocation;

/// Signal value for a record that has not been heard yet.
pub const NO_SIGNAL_DBM: i32 = -1000;

/// Default channel width before any capability line raises it.
pub const DEFAULT_BANDWIDTH_MHZ: u32 = 20;

/// Operating mode advertised in the capability line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
pub enum NetworkMode {
    #[strum(to_string = "AP")]
    AccessPoint,
    #[strum(to_string = "Ad Hoc")]
    AdHoc,
    #[default]
    #[strum(to_string = "")]
    Unknown,
}

/// Position of the secondary 20 MHz channel relative to the primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
pub enum SecondaryChannelLocation {
    #[strum(to_string = "above")]
    Above,
    #[strum(to_string = "below")]
    Below,
    #[default]
    #[strum(to_string = "")]
    None,
}

/// One discovered cell (access point or ad-hoc BSS).
#[derive(Debug, Clone)]
pub struct NetworkRecord {
    pub mac_addr: String,
    pub ssid: String,
    pub mode: NetworkMode,
    /// Authentication suites (e.g. "PSK").
    pub security: String,
    /// Pairwise ciphers, slash-separated.
    pub privacy: String,
    /// Pairwise ciphers as printed by `iw`.
    pub cipher: String,
    /// Primary channel. 0 until a channel line is seen.
    pub channel: u32,
    pub frequency: u32,
    pub bandwidth: u32,
    pub secondary_channel: u32,
    pub secondary_channel_location: SecondaryChannelLocation,
    pub third_channel: u32,
    pub signal: i32,
    pub strongest_signal: i32,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub location: GpsLocation,
    pub strongest_location: GpsLocation,
    /// Scratch flag for diffing against an earlier table; never serialized.
    pub seen_in_scan: bool,
}

impl NetworkRecord {
    /// A blank record first seen at `seen_at`.
    pub fn new(seen_at: DateTime<Utc>) -> Self {
        Self {
            mac_addr: String::new(),
            ssid: String::new(),
            mode: NetworkMode::Unknown,
            security: "Open".into(),
            privacy: "None".into(),
            cipher: String::new(),
            channel: 0,
            frequency: 0,
            bandwidth: DEFAULT_BANDWIDTH_MHZ,
            secondary_channel: 0,
            secondary_channel_location: SecondaryChannelLocation::None,
            third_channel: 0,
            signal: NO_SIGNAL_DBM,
            strongest_signal: NO_SIGNAL_DBM,
            first_seen: seen_at,
            last_seen: seen_at,
            location: GpsLocation::default(),
            strongest_location: GpsLocation::default(),
            seen_in_scan: false,
        }
    }

    /// Composite key: BSSID, SSID and channel. One BSSID can broadcast
    /// several SSIDs, so the BSSID alone is not unique.
    pub fn key(&self) -> String {
        format!("{}{}{}", self.mac_addr, self.ssid, self.channel)
    }

    /// `"40+44"` for a 40 MHz cell with a known secondary, else the channel.
    pub fn channel_label(&self) -> String {
        if self.bandwidth == 40 && self.secondary_channel > 0 {
            format!("{}+{}", self.channel, self.secondary_channel)
        } else {
            self.channel.to_string()
        }
    }

    /// Take a fresh signal reading. Within one parse pass the latest
    /// reading is also the strongest one for this record.
    pub fn set_signal(&mut self, dbm: i32) {
        self.signal = dbm;
        self.strongest_signal = dbm;
    }

    /// Raise the bandwidth for an HT20/HT40 capable cell. Never lowers it.
    pub fn mark_ht40_capable(&mut self) {
        if self.bandwidth == DEFAULT_BANDWIDTH_MHZ {
            self.bandwidth = 40;
        }
    }

    /// Apply a secondary channel offset token from an HT operation block.
    pub fn set_secondary_offset(&mut self, token: &str) {
        self.secondary_channel_location = token.parse().unwrap_or_default();
        match self.secondary_channel_location {
            SecondaryChannelLocation::Above => {
                self.secondary_channel = self.channel.saturating_add(4);
            }
            SecondaryChannelLocation::Below => {
                self.secondary_channel = self.channel.saturating_sub(4);
            }
            SecondaryChannelLocation::None => {}
        }
    }
}

/// Identity equality: two records describe the same cell configuration.
/// Signal, timestamps and location are observations, not identity.
impl PartialEq for NetworkRecord {
    fn eq(&self, other: &Self) -> bool {
        self.mac_addr == other.mac_addr
            && self.ssid == other.ssid
            && self.mode == other.mode
            && self.security == other.security
            && self.channel == other.channel
    }
}

impl Eq for NetworkRecord {}

impl fmt::Display for NetworkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MAC Address: {}", self.mac_addr)?;
        writeln!(f, "SSID: {}", self.ssid)?;
        writeln!(f, "Mode: {}", self.mode)?;
        writeln!(f, "Security: {}", self.security)?;
        writeln!(f, "Privacy: {}", self.privacy)?;
        writeln!(f, "Cipher: {}", self.cipher)?;
        writeln!(f, "Frequency: {} MHz", self.frequency)?;
        writeln!(f, "Channel: {}", self.channel)?;
        writeln!(f, "Secondary Channel: {}", self.secondary_channel)?;
        writeln!(
            f,
            "Secondary Channel Location: {}",
            self.secondary_channel_location
        )?;
        writeln!(f, "Third Channel: {}", self.third_channel)?;
        writeln!(f, "Signal: {} dBm", self.signal)?;
        writeln!(f, "Strongest Signal: {} dBm", self.strongest_signal)?;
        writeln!(f, "Bandwidth: {}", self.bandwidth)?;
        writeln!(f, "First Seen: {}", self.first_seen)?;
        writeln!(f, "Last Seen: {}", self.last_seen)?;
        writeln!(f, "Last GPS:")?;
        write!(f, "{}", self.location)?;
        writeln!(f, "Strongest GPS:")?;
        write!(f, "{}", self.strongest_location)
    }
}
