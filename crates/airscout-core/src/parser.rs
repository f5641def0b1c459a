// ── `iw dev <iface> scan` output parser ──
//
// The output is a sequence of stanzas, each opened by a `BSS <mac>(on ...)`
// header and followed by indented attribute lines. Lines are fed one at a
// time into an accumulator; a header or end of input flushes the current
// record into the result map.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use regex::{Captures, Regex};
use tracing::debug;

use crate::frequency::FrequencyTable;
use crate::model::{NetworkMode, NetworkRecord};

/// Parsed networks keyed by [`NetworkRecord::key`], in first-seen order.
pub type NetworkMap = IndexMap<String, NetworkRecord>;

const NULL_ESCAPE: &str = r"\x00";

static BSS_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^BSS (.*?)\(").expect("valid BSS header regex"));

/// A line pattern plus the mutation it applies. `apply` returns `false`
/// when the captured value is rejected, letting later matchers try the line.
struct FieldMatcher {
    pattern: Regex,
    apply: fn(&mut NetworkRecord, &Captures<'_>) -> bool,
}

impl FieldMatcher {
    fn new(pattern: &str, apply: fn(&mut NetworkRecord, &Captures<'_>) -> bool) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid field matcher regex"),
            apply,
        }
    }
}

/// Ordered; the first matcher that accepts a line wins.
static FIELD_MATCHERS: LazyLock<Vec<FieldMatcher>> = LazyLock::new(|| {
    vec![
        FieldMatcher::new(r"^.+?SSID: +(.*)", |rec, caps| {
            let raw = &caps[1];
            if raw.is_empty() {
                return false;
            }
            rec.ssid = normalize_ssid(raw);
            true
        }),
        FieldMatcher::new(r"^\tcapability:.*ESS", |rec, _| {
            rec.mode = NetworkMode::AccessPoint;
            true
        }),
        FieldMatcher::new(r"^\tcapability:.*IBSS", |rec, _| {
            rec.mode = NetworkMode::AdHoc;
            true
        }),
        FieldMatcher::new(r"Authentication suites: *(.*)", |rec, caps| {
            non_empty(caps).is_some_and(|suites| {
                rec.security = suites.to_owned();
                true
            })
        }),
        FieldMatcher::new(r"Pairwise ciphers: *(.*)", |rec, caps| {
            non_empty(caps).is_some_and(|ciphers| {
                rec.privacy = ciphers.replace(' ', "/");
                rec.cipher = ciphers.to_owned();
                true
            })
        }),
        FieldMatcher::new(r"primary channel: +([0-9]+)", |rec, caps| {
            positive(caps).is_some_and(|channel| {
                rec.channel = channel;
                true
            })
        }),
        // 2.4 GHz beacons without an HT operation element only carry this.
        FieldMatcher::new(r"DS Parameter set: channel ([0-9]+)", |rec, caps| {
            positive(caps).is_some_and(|channel| {
                if rec.channel == 0 {
                    rec.channel = channel;
                }
                true
            })
        }),
        FieldMatcher::new(r"freq:.*?([0-9]+)", |rec, caps| {
            positive(caps).is_some_and(|mhz| {
                rec.frequency = mhz;
                true
            })
        }),
        // A reading of 10 dBm or more is not a plausible received signal.
        FieldMatcher::new(r"signal:.*?([-0-9]+).*?dBm", |rec, caps| {
            capture::<i32>(caps)
                .filter(|dbm| *dbm < 10)
                .is_some_and(|dbm| {
                    rec.set_signal(dbm);
                    true
                })
        }),
        FieldMatcher::new(r"HT20/HT40", |rec, _| {
            rec.mark_ht40_capable();
            true
        }),
        FieldMatcher::new(r"\* channel width:.*?([0-9]+) MHz", |rec, caps| {
            positive(caps).is_some_and(|mhz| {
                rec.bandwidth = mhz;
                true
            })
        }),
        FieldMatcher::new(r"secondary channel offset: *([^ \t]+)", |rec, caps| {
            rec.set_secondary_offset(&caps[1]);
            true
        }),
        FieldMatcher::new(r"center freq segment 1: *([^ \t]+)", |rec, caps| {
            positive(caps).is_some_and(|channel| {
                rec.third_channel = channel;
                true
            })
        }),
    ]
});

fn capture<T: FromStr>(caps: &Captures<'_>) -> Option<T> {
    caps.get(1).and_then(|m| m.as_str().parse().ok())
}

fn positive(caps: &Captures<'_>) -> Option<u32> {
    capture::<u32>(caps).filter(|v| *v > 0)
}

fn non_empty<'h>(caps: &Captures<'h>) -> Option<&'h str> {
    caps.get(1).map(|m| m.as_str()).filter(|s| !s.is_empty())
}

/// Hidden networks show up as a run of literal `\x00` escapes. Those become
/// `unknown (<count>)`; names with real text keep the text minus the escapes.
pub fn normalize_ssid(raw: &str) -> String {
    if !raw.contains(NULL_ESCAPE) {
        return raw.to_owned();
    }
    let cleaned = raw.replace(NULL_ESCAPE, "");
    if cleaned.is_empty() {
        match raw.matches(NULL_ESCAPE).count() {
            0 => "unknown".to_owned(),
            n => format!("unknown ({n})"),
        }
    } else {
        cleaned
    }
}

/// Line-oriented parser holding the record currently being built.
#[derive(Debug)]
pub struct ScanParser {
    parsed_at: DateTime<Utc>,
    current: Option<NetworkRecord>,
    networks: NetworkMap,
}

impl Default for ScanParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanParser {
    /// A parser stamping records with the current time.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// A parser stamping every record with `parsed_at`.
    pub fn at(parsed_at: DateTime<Utc>) -> Self {
        Self {
            parsed_at,
            current: None,
            networks: IndexMap::new(),
        }
    }

    pub fn parse_str(self, text: &str) -> NetworkMap {
        self.parse_lines(text.lines())
    }

    pub fn parse_lines<I, S>(mut self, lines: I) -> NetworkMap
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.feed_line(line.as_ref());
        }
        self.finish()
    }

    /// Consume one line of output.
    pub fn feed_line(&mut self, line: &str) {
        // Lines read from a file may still carry their terminator.
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(bssid) = BSS_HEADER
            .captures(line)
            .and_then(|caps| non_empty(&caps).map(str::to_owned))
        {
            self.flush();
            let mut rec = NetworkRecord::new(self.parsed_at);
            rec.mac_addr = bssid;
            self.current = Some(rec);
            return;
        }

        let Some(rec) = self.current.as_mut() else {
            return;
        };

        for matcher in FIELD_MATCHERS.iter() {
            if let Some(caps) = matcher.pattern.captures(line) {
                if (matcher.apply)(rec, &caps) {
                    return;
                }
            }
        }
    }

    /// Flush the last record and return everything parsed.
    pub fn finish(mut self) -> NetworkMap {
        self.flush();
        self.networks
    }

    fn flush(&mut self) {
        let Some(mut rec) = self.current.take() else {
            return;
        };
        if rec.channel == 0 {
            debug!(bssid = %rec.mac_addr, "dropping BSS stanza without a channel");
            return;
        }
        if rec.frequency == 0 {
            if let Some(mhz) = FrequencyTable::standard().frequency_mhz(rec.channel) {
                rec.frequency = mhz;
            }
        }
        self.networks.insert(rec.key(), rec);
    }
}

/// Parse a complete `iw` scan dump.
pub fn parse_iw_output(text: &str) -> NetworkMap {
    ScanParser::new().parse_str(text)
}
