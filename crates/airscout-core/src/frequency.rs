// ── Channel → center frequency table ──
//
// Immutable lookup built once on first use. Covers 2.4 GHz, 5 GHz, and
// the 4.9 GHz public-safety channels. The parser uses it to back-fill
// `frequency` when `iw` reports a channel but no `freq:` line.

use std::collections::BTreeMap;
use std::sync::LazyLock;

const STANDARD_CHANNELS: &[(u32, &str)] = &[
    // 2.4 GHz
    (1, "2412"),
    (2, "2417"),
    (3, "2422"),
    (4, "2427"),
    (5, "2432"),
    (6, "2437"),
    (7, "2442"),
    (8, "2447"),
    (9, "2452"),
    (10, "2457"),
    (11, "2462"),
    (12, "2467"),
    (13, "2472"),
    (14, "2484"),
    // 5 GHz
    (16, "5080"),
    (34, "5170"),
    (36, "5180"),
    (38, "5190"),
    (40, "5200"),
    (42, "5210"),
    (44, "5220"),
    (46, "5230"),
    (48, "5240"),
    (50, "5250"),
    (52, "5260"),
    (54, "5270"),
    (56, "5280"),
    (58, "5290"),
    (60, "5300"),
    (62, "5310"),
    (64, "5320"),
    (100, "5500"),
    (102, "5510"),
    (104, "5520"),
    (106, "5530"),
    (108, "5540"),
    (110, "5550"),
    (112, "5560"),
    (114, "5570"),
    (116, "5580"),
    (118, "5590"),
    (120, "5600"),
    (122, "5610"),
    (124, "5620"),
    (126, "5630"),
    (128, "5640"),
    (132, "5660"),
    (134, "5670"),
    (136, "5680"),
    (138, "5690"),
    (140, "5700"),
    (142, "5710"),
    (144, "5720"),
    (149, "5745"),
    (151, "5755"),
    (153, "5765"),
    (155, "5775"),
    (157, "5785"),
    (159, "5795"),
    (161, "5805"),
    (165, "5825"),
    (169, "5845"),
    (173, "5865"),
    // 4.9 GHz public safety
    (183, "4915"),
    (184, "4920"),
    (185, "4925"),
    (187, "4935"),
    (188, "4940"),
    (189, "4945"),
    (192, "4960"),
    (196, "4980"),
];

static STANDARD: LazyLock<FrequencyTable> =
    LazyLock::new(|| FrequencyTable::from_entries(STANDARD_CHANNELS));

/// Read-only channel → frequency (MHz) mapping.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    entries: BTreeMap<u32, &'static str>,
}

impl FrequencyTable {
    /// The shared regulatory table.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    fn from_entries(entries: &[(u32, &'static str)]) -> Self {
        Self {
            entries: entries.iter().copied().collect(),
        }
    }

    /// Center frequency for `channel`, or `None` if the channel is unmapped.
    pub fn frequency_for_channel(&self, channel: u32) -> Option<&'static str> {
        self.entries.get(&channel).copied()
    }

    /// Same lookup, parsed to MHz.
    pub fn frequency_mhz(&self, channel: u32) -> Option<u32> {
        self.frequency_for_channel(channel)
            .and_then(|f| f.parse().ok())
    }

    /// All entries in ascending channel order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &'static str)> + '_ {
        self.entries.iter().map(|(ch, f)| (*ch, *f))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lookup against the standard table.
pub fn frequency_for_channel(channel: u32) -> Option<&'static str> {
    FrequencyTable::standard().frequency_for_channel(channel)
}
