//! Wireless scan parsing and orchestration for airscout.
//!
//! This crate turns the text output of `iw dev <iface> scan` into typed
//! records and back out as the JSON document remote callers consume:
//!
//! - **[`ScanParser`]** is a line-oriented accumulator that builds
//!   [`NetworkRecord`]s from BSS stanzas, keyed by BSSID, SSID and channel.
//!
//! - **[`Scanner`]** issues scan requests through a [`ScanCommand`], retries
//!   while the device reports busy, merges per-frequency hunt results and
//!   stamps the caller's [`GpsLocation`].
//!
//! - **[`codec`]** maps records to and from the wire document, with
//!   per-field decode failures collected in [`Decoded`].
//!
//! - **[`FrequencyTable`]** and [`signal`] are the static channel plan and
//!   the dBm quality conversions.

pub mod codec;
pub mod error;
pub mod frequency;
pub mod interfaces;
pub mod model;
pub mod parser;
pub mod scan;
pub mod signal;

// ── Primary re-exports ──────────────────────────────────────────────
pub use codec::{
    ClientDocument, Decoded, FieldFailure, GpsFix, NetworkDocument, RawScanDocument, ScanDocument,
};
pub use error::CoreError;
pub use frequency::{FrequencyTable, frequency_for_channel};
pub use interfaces::{InterfaceLister, parse_interfaces, parse_monitor_interfaces};
pub use model::{
    ClientRecord, GpsLocation, NetworkMode, NetworkRecord, SecondaryChannelLocation,
};
pub use parser::{NetworkMap, ScanParser, parse_iw_output};
pub use scan::{
    CommandOutput, IwScanCommand, RetryPolicy, ScanAttempt, ScanCommand, ScanConfig, ScanReport,
    Scanner, status,
};
pub use signal::{quality_bucket, quality_percent, signal_bars};
