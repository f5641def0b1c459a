//! dBm → signal quality conversions.
//!
//! Linear across the −100..−50 dBm window: −100 dBm and below is 0%,
//! −50 dBm and above is 100%.

/// Signal quality as a 0–100 percentage.
pub fn quality_percent(dbm: i32) -> i32 {
    if dbm <= -100 {
        0
    } else if dbm >= -50 {
        100
    } else {
        2 * (dbm + 100)
    }
}

/// Signal quality bucket in `0..=4`.
pub fn quality_bucket(dbm: i32) -> i32 {
    4 * quality_percent(dbm) / 100
}

/// Four-glyph signal bar string for the quality bucket.
///
/// | Bucket | Bars   |
/// |--------|--------|
/// | 4      | `▂▄▆█` |
/// | 3      | `▂▄▆ ` |
/// | 2      | `▂▄  ` |
/// | 1      | `▂   ` |
/// | 0      | `·   ` |
pub fn signal_bars(dbm: i32) -> &'static str {
    match quality_bucket(dbm) {
        4 => "▂▄▆█",
        3 => "▂▄▆ ",
        2 => "▂▄  ",
        1 => "▂   ",
        _ => "·   ",
    }
}
