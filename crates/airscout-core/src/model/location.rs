// ── Position value supplied by an external positioning source ──

use serde::{Deserialize, Serialize};

/// A position fix. The core never produces one; it only carries and
/// stamps fixes handed in by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub speed: f64,
    #[serde(default)]
    pub is_valid: bool,
}

impl GpsLocation {
    /// A valid fix at the given coordinates.
    pub fn new(latitude: f64, longitude: f64, altitude: f64, speed: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            speed,
            is_valid: true,
        }
    }
}

impl std::fmt::Display for GpsLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  Valid:     {}", self.is_valid)?;
        writeln!(f, "  Latitude:  {}", self.latitude)?;
        writeln!(f, "  Longitude: {}", self.longitude)?;
        writeln!(f, "  Altitude:  {}", self.altitude)?;
        writeln!(f, "  Speed:     {}", self.speed)
    }
}
