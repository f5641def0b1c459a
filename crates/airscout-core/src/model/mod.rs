// ── Domain model ──
//
// Records built from scan output. Both kinds are created fresh per parse;
// identity across scans is by key only.

pub mod client;
pub mod location;
pub mod network;

pub use client::{ClientRecord, NOT_ASSOCIATED};
pub use location::GpsLocation;
pub use network::{
    DEFAULT_BANDWIDTH_MHZ, NO_SIGNAL_DBM, NetworkMode, NetworkRecord, SecondaryChannelLocation,
};
