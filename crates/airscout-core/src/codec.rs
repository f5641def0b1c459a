// ── Record ↔ JSON document codec ──
//
// Encoding is total: every record field lands under its wire key, with
// timestamps and location values rendered as text and booleans as the
// literals "True"/"False". Decoding is per-field: a field that fails to
// decode keeps its default and is reported in `Decoded::failures`, and the
// remaining fields are still read.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::model::{ClientRecord, GpsLocation, NetworkRecord};

// ── Wire documents ──────────────────────────────────────────────────

/// The `gps` block of the outer document. Validity is not on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub speed: f64,
}

impl From<&GpsLocation> for GpsFix {
    fn from(loc: &GpsLocation) -> Self {
        Self {
            latitude: loc.latitude,
            longitude: loc.longitude,
            altitude: loc.altitude,
            speed: loc.speed,
        }
    }
}

/// Outer document returned to remote callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanDocument {
    pub err_code: i32,
    pub err_string: String,
    pub gps: GpsFix,
    pub networks: Vec<NetworkDocument>,
}

/// A saved outer document read back in. Networks stay raw so each one can
/// be decoded field by field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScanDocument {
    pub err_code: i32,
    #[serde(default)]
    pub err_string: String,
    #[serde(default)]
    pub gps: GpsFix,
    #[serde(default)]
    pub networks: Vec<Map<String, Value>>,
}

impl RawScanDocument {
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn decode_networks(&self) -> Vec<Decoded<NetworkRecord>> {
        self.networks
            .iter()
            .map(NetworkRecord::from_document)
            .collect()
    }
}

/// Wire form of a [`NetworkRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkDocument {
    #[serde(rename = "macAddr")]
    pub mac_addr: String,
    pub ssid: String,
    pub mode: String,
    pub security: String,
    pub privacy: String,
    pub cipher: String,
    pub frequency: u32,
    pub channel: u32,
    #[serde(rename = "secondaryChannel")]
    pub secondary_channel: u32,
    #[serde(rename = "secondaryChannelLocation")]
    pub secondary_channel_location: String,
    #[serde(rename = "thirdChannel")]
    pub third_channel: u32,
    pub signal: i32,
    #[serde(rename = "strongestsignal")]
    pub strongest_signal: i32,
    pub bandwidth: u32,
    #[serde(rename = "firstseen")]
    pub first_seen: String,
    #[serde(rename = "lastseen")]
    pub last_seen: String,
    #[serde(flatten)]
    pub location: LocationFields,
}

/// Wire form of a [`ClientRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientDocument {
    #[serde(rename = "macAddr")]
    pub mac_addr: String,
    #[serde(rename = "apMacAddr")]
    pub ap_mac_addr: String,
    pub ssid: String,
    pub channel: u32,
    pub signal: i32,
    #[serde(rename = "strongestsignal")]
    pub strongest_signal: i32,
    #[serde(rename = "firstseen")]
    pub first_seen: String,
    #[serde(rename = "lastseen")]
    pub last_seen: String,
    #[serde(rename = "probedssids")]
    pub probed_ssids: Vec<String>,
    #[serde(flatten)]
    pub location: LocationFields,
}

/// The ten location keys shared by both record documents, all as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationFields {
    pub lat: String,
    pub lon: String,
    pub alt: String,
    pub speed: String,
    pub gpsvalid: String,
    pub strongestlat: String,
    pub strongestlon: String,
    pub strongestalt: String,
    pub strongestspeed: String,
    pub strongestgpsvalid: String,
}

impl LocationFields {
    fn new(current: &GpsLocation, strongest: &GpsLocation) -> Self {
        Self {
            lat: float_text(current.latitude),
            lon: float_text(current.longitude),
            alt: float_text(current.altitude),
            speed: float_text(current.speed),
            gpsvalid: bool_text(current.is_valid),
            strongestlat: float_text(strongest.latitude),
            strongestlon: float_text(strongest.longitude),
            strongestalt: float_text(strongest.altitude),
            strongestspeed: float_text(strongest.speed),
            strongestgpsvalid: bool_text(strongest.is_valid),
        }
    }
}

// ── Decode results ──────────────────────────────────────────────────

/// One field that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub field: &'static str,
    pub reason: String,
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// A decoded value plus every field that failed along the way.
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    pub value: T,
    pub failures: Vec<FieldFailure>,
}

impl<T> Decoded<T> {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

// ── NetworkRecord codec ─────────────────────────────────────────────

impl NetworkRecord {
    pub fn to_document(&self) -> NetworkDocument {
        NetworkDocument {
            mac_addr: self.mac_addr.clone(),
            ssid: self.ssid.clone(),
            mode: self.mode.to_string(),
            security: self.security.clone(),
            privacy: self.privacy.clone(),
            cipher: self.cipher.clone(),
            frequency: self.frequency,
            channel: self.channel,
            secondary_channel: self.secondary_channel,
            secondary_channel_location: self.secondary_channel_location.to_string(),
            third_channel: self.third_channel,
            signal: self.signal,
            strongest_signal: self.strongest_signal,
            bandwidth: self.bandwidth,
            first_seen: timestamp_text(&self.first_seen),
            last_seen: timestamp_text(&self.last_seen),
            location: LocationFields::new(&self.location, &self.strongest_location),
        }
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(&self.to_document())?)
    }

    pub fn from_document(doc: &Map<String, Value>) -> Decoded<Self> {
        let mut r = FieldReader::new(doc);
        let mut rec = Self::new(Utc::now());

        r.string("macAddr", &mut rec.mac_addr);
        r.string("ssid", &mut rec.ssid);
        r.parsed("mode", &mut rec.mode);
        r.string("security", &mut rec.security);
        r.string("privacy", &mut rec.privacy);
        r.string("cipher", &mut rec.cipher);
        r.int("frequency", &mut rec.frequency);
        r.int("channel", &mut rec.channel);
        r.int("secondaryChannel", &mut rec.secondary_channel);
        // Any token other than "above"/"below" means no secondary channel.
        let mut location = String::new();
        r.string("secondaryChannelLocation", &mut location);
        rec.secondary_channel_location = location.parse().unwrap_or_default();
        r.int("thirdChannel", &mut rec.third_channel);
        r.int("signal", &mut rec.signal);
        r.int("strongestsignal", &mut rec.strongest_signal);
        r.int("bandwidth", &mut rec.bandwidth);
        r.timestamp("firstseen", &mut rec.first_seen);
        r.timestamp("lastseen", &mut rec.last_seen);
        r.locations(&mut rec.location, &mut rec.strongest_location);

        r.finish(rec)
    }

    pub fn from_json(text: &str) -> Result<Decoded<Self>, CoreError> {
        Ok(Self::from_document(&object_from_json(text)?))
    }
}

// ── ClientRecord codec ──────────────────────────────────────────────

impl ClientRecord {
    pub fn to_document(&self) -> ClientDocument {
        ClientDocument {
            mac_addr: self.mac_addr.clone(),
            ap_mac_addr: self.ap_mac_addr.clone(),
            ssid: self.ssid.clone(),
            channel: self.channel,
            signal: self.signal,
            strongest_signal: self.strongest_signal,
            first_seen: timestamp_text(&self.first_seen),
            last_seen: timestamp_text(&self.last_seen),
            probed_ssids: self.probed_ssids.clone(),
            location: LocationFields::new(&self.location, &self.strongest_location),
        }
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(&self.to_document())?)
    }

    pub fn from_document(doc: &Map<String, Value>) -> Decoded<Self> {
        let mut r = FieldReader::new(doc);
        let mut rec = Self::new(Utc::now());

        r.string("macAddr", &mut rec.mac_addr);
        r.string("apMacAddr", &mut rec.ap_mac_addr);
        r.string("ssid", &mut rec.ssid);
        r.int("channel", &mut rec.channel);
        r.int("signal", &mut rec.signal);
        r.int("strongestsignal", &mut rec.strongest_signal);
        r.timestamp("firstseen", &mut rec.first_seen);
        r.timestamp("lastseen", &mut rec.last_seen);
        r.strings("probedssids", &mut rec.probed_ssids);
        r.locations(&mut rec.location, &mut rec.strongest_location);

        r.finish(rec)
    }

    pub fn from_json(text: &str) -> Result<Decoded<Self>, CoreError> {
        Ok(Self::from_document(&object_from_json(text)?))
    }
}

// ── Text renderers ──────────────────────────────────────────────────

/// Float as text, keeping a trailing `.0` on whole numbers (`0.0`, `12.0`).
fn float_text(v: f64) -> String {
    format!("{v:?}")
}

fn bool_text(v: bool) -> String {
    if v { "True" } else { "False" }.to_owned()
}

fn timestamp_text(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Accepts RFC 3339 or a naive `YYYY-MM-DD HH:MM:SS[.ffffff]` (read as UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// `"True"` / `"true"` are true; any other value is false.
fn parse_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "True" || s == "true",
        _ => false,
    }
}

fn object_from_json(text: &str) -> Result<Map<String, Value>, CoreError> {
    match serde_json::from_str(text)? {
        Value::Object(map) => Ok(map),
        other => Err(CoreError::InvalidInput {
            message: format!("expected a JSON object, got {}", value_kind(&other)),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Field reader ────────────────────────────────────────────────────

/// Reads wire keys into record fields, collecting failures instead of
/// stopping at the first one.
struct FieldReader<'a> {
    doc: &'a Map<String, Value>,
    failures: Vec<FieldFailure>,
}

impl<'a> FieldReader<'a> {
    fn new(doc: &'a Map<String, Value>) -> Self {
        Self {
            doc,
            failures: Vec::new(),
        }
    }

    fn finish<T>(self, value: T) -> Decoded<T> {
        Decoded {
            value,
            failures: self.failures,
        }
    }

    fn fail(&mut self, field: &'static str, reason: impl Into<String>) {
        self.failures.push(FieldFailure {
            field,
            reason: reason.into(),
        });
    }

    fn get(&mut self, field: &'static str) -> Option<&'a Value> {
        let value = self.doc.get(field);
        if value.is_none() {
            self.fail(field, "missing");
        }
        value
    }

    fn string(&mut self, field: &'static str, out: &mut String) {
        match self.get(field) {
            Some(Value::String(s)) => out.clone_from(s),
            Some(other) => self.fail(field, format!("expected a string, got {}", value_kind(other))),
            None => {}
        }
    }

    fn parsed<T: FromStr>(&mut self, field: &'static str, out: &mut T) {
        match self.get(field) {
            Some(Value::String(s)) => match s.parse() {
                Ok(v) => *out = v,
                Err(_) => self.fail(field, format!("unrecognized value {s:?}")),
            },
            Some(other) => self.fail(field, format!("expected a string, got {}", value_kind(other))),
            None => {}
        }
    }

    /// Integers arrive as JSON numbers or as numeric strings.
    fn int<T: TryFrom<i64>>(&mut self, field: &'static str, out: &mut T) {
        let Some(value) = self.get(field) else {
            return;
        };
        let wide = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        match wide.map(T::try_from) {
            Some(Ok(v)) => *out = v,
            Some(Err(_)) => self.fail(field, format!("{value} is out of range")),
            None => self.fail(field, format!("{value} is not an integer")),
        }
    }

    fn float(&mut self, field: &'static str, out: &mut f64) {
        let Some(value) = self.get(field) else {
            return;
        };
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(v) => *out = v,
            None => self.fail(field, format!("{value} is not a number")),
        }
    }

    fn boolean(&mut self, field: &'static str, out: &mut bool) {
        if let Some(value) = self.get(field) {
            *out = parse_bool(value);
        }
    }

    fn timestamp(&mut self, field: &'static str, out: &mut DateTime<Utc>) {
        match self.get(field) {
            Some(Value::String(s)) => match parse_timestamp(s) {
                Some(ts) => *out = ts,
                None => self.fail(field, format!("unrecognized timestamp {s:?}")),
            },
            Some(other) => self.fail(field, format!("expected a string, got {}", value_kind(other))),
            None => {}
        }
    }

    fn strings(&mut self, field: &'static str, out: &mut Vec<String>) {
        match self.get(field) {
            Some(Value::Array(items)) => {
                let texts: Option<Vec<String>> = items
                    .iter()
                    .map(|v| v.as_str().map(str::to_owned))
                    .collect();
                match texts {
                    Some(texts) => *out = texts,
                    None => self.fail(field, "expected an array of strings"),
                }
            }
            Some(other) => {
                self.fail(field, format!("expected an array, got {}", value_kind(other)));
            }
            None => {}
        }
    }

    fn locations(&mut self, current: &mut GpsLocation, strongest: &mut GpsLocation) {
        self.float("lat", &mut current.latitude);
        self.float("lon", &mut current.longitude);
        self.float("alt", &mut current.altitude);
        self.float("speed", &mut current.speed);
        self.boolean("gpsvalid", &mut current.is_valid);
        self.float("strongestlat", &mut strongest.latitude);
        self.float("strongestlon", &mut strongest.longitude);
        self.float("strongestalt", &mut strongest.altitude);
        self.float("strongestspeed", &mut strongest.speed);
        self.boolean("strongestgpsvalid", &mut strongest.is_valid);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{NetworkMode, SecondaryChannelLocation};

    fn sample_network() -> NetworkRecord {
        let seen = Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 5).unwrap();
        let mut rec = NetworkRecord::new(seen);
        rec.mac_addr = "aa:bb:cc:dd:ee:ff".into();
        rec.ssid = "HomeNet".into();
        rec.mode = NetworkMode::AccessPoint;
        rec.security = "PSK".into();
        rec.privacy = "CCMP/TKIP".into();
        rec.cipher = "CCMP TKIP".into();
        rec.channel = 36;
        rec.frequency = 5180;
        rec.bandwidth = 80;
        rec.secondary_channel = 40;
        rec.secondary_channel_location = SecondaryChannelLocation::Above;
        rec.third_channel = 42;
        rec.signal = -61;
        rec.strongest_signal = -55;
        rec.location = GpsLocation::new(47.5, -122.25, 30.0, 1.5);
        rec.strongest_location = GpsLocation::new(47.75, -122.0, 31.0, 0.0);
        rec
    }

    #[test]
    fn network_document_uses_wire_keys() {
        let value = serde_json::to_value(sample_network().to_document()).unwrap();
        let obj = value.as_object().unwrap();
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "macAddr",
                "ssid",
                "mode",
                "security",
                "privacy",
                "cipher",
                "frequency",
                "channel",
                "secondaryChannel",
                "secondaryChannelLocation",
                "thirdChannel",
                "signal",
                "strongestsignal",
                "bandwidth",
                "firstseen",
                "lastseen",
                "lat",
                "lon",
                "alt",
                "speed",
                "gpsvalid",
                "strongestlat",
                "strongestlon",
                "strongestalt",
                "strongestspeed",
                "strongestgpsvalid",
            ]
        );
        assert_eq!(obj["mode"], json!("AP"));
        assert_eq!(obj["secondaryChannelLocation"], json!("above"));
        assert_eq!(obj["lat"], json!("47.5"));
        assert_eq!(obj["alt"], json!("30.0"));
        assert_eq!(obj["gpsvalid"], json!("True"));
        assert_eq!(obj["firstseen"], json!("2024-03-09T14:30:05.000000Z"));
    }

    #[test]
    fn network_decode_restores_every_field() {
        let original = sample_network();
        let value = serde_json::to_value(original.to_document()).unwrap();
        let decoded = NetworkRecord::from_document(value.as_object().unwrap());

        assert!(decoded.is_clean(), "failures: {:?}", decoded.failures);
        let rec = decoded.value;
        assert_eq!(rec, original);
        assert_eq!(rec.to_document(), original.to_document());
    }

    #[test]
    fn strongest_signal_decodes_into_its_own_field() {
        let value = serde_json::to_value(sample_network().to_document()).unwrap();
        let rec = NetworkRecord::from_document(value.as_object().unwrap()).value;
        assert_eq!(rec.signal, -61);
        assert_eq!(rec.strongest_signal, -55);
        assert!((rec.location.latitude - 47.5).abs() < f64::EPSILON);
        assert!((rec.strongest_location.latitude - 47.75).abs() < f64::EPSILON);
    }

    #[test]
    fn decode_reports_bad_fields_and_keeps_going() {
        let mut value = serde_json::to_value(sample_network().to_document()).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.insert("channel".into(), json!("six"));
        obj.remove("cipher");

        let decoded = NetworkRecord::from_document(obj);
        let failed: Vec<&str> = decoded.failures.iter().map(|f| f.field).collect();
        assert_eq!(failed, vec!["cipher", "channel"]);

        // Fields after the failures still decode.
        assert_eq!(decoded.value.bandwidth, 80);
        assert_eq!(decoded.value.channel, 0);
        assert_eq!(decoded.value.cipher, "");
    }

    #[test]
    fn numeric_strings_and_legacy_timestamps_are_accepted() {
        let mut value = serde_json::to_value(sample_network().to_document()).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.insert("frequency".into(), json!("2437"));
        obj.insert("firstseen".into(), json!("2017-06-01 09:15:42.123456"));

        let decoded = NetworkRecord::from_document(obj);
        assert!(decoded.is_clean(), "failures: {:?}", decoded.failures);
        assert_eq!(decoded.value.frequency, 2437);
        assert_eq!(
            decoded.value.first_seen.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2017-06-01 09:15:42"
        );
    }

    #[test]
    fn unknown_secondary_location_tokens_decode_as_none() {
        let mut value = serde_json::to_value(sample_network().to_document()).unwrap();
        let obj = value.as_object_mut().unwrap();

        obj.insert("secondaryChannelLocation".into(), json!("no"));
        let decoded = NetworkRecord::from_document(obj);
        assert!(decoded.is_clean(), "failures: {:?}", decoded.failures);
        assert_eq!(decoded.value.secondary_channel_location, SecondaryChannelLocation::None);

        obj.insert("secondaryChannelLocation".into(), json!("Above"));
        let decoded = NetworkRecord::from_document(obj);
        assert_eq!(decoded.value.secondary_channel_location, SecondaryChannelLocation::None);

        obj.insert("secondaryChannelLocation".into(), json!("below"));
        let decoded = NetworkRecord::from_document(obj);
        assert_eq!(decoded.value.secondary_channel_location, SecondaryChannelLocation::Below);
    }

    #[test]
    fn bool_literals() {
        assert!(parse_bool(&json!("True")));
        assert!(parse_bool(&json!("true")));
        assert!(parse_bool(&json!(true)));
        assert!(!parse_bool(&json!("TRUE")));
        assert!(!parse_bool(&json!("False")));
        assert!(!parse_bool(&json!("yes")));
        assert!(!parse_bool(&json!(1)));
    }

    #[test]
    fn from_json_rejects_non_objects() {
        let err = NetworkRecord::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { .. }));
        assert!(NetworkRecord::from_json("{not json").is_err());
    }

    #[test]
    fn client_document_round_trip() {
        let seen = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let mut client = ClientRecord::new(seen);
        client.mac_addr = "11:22:33:44:55:66".into();
        client.ap_mac_addr = "aa:bb:cc:dd:ee:ff".into();
        client.ssid = "HomeNet".into();
        client.channel = 6;
        client.signal = -70;
        client.strongest_signal = -64;
        client.probed_ssids = vec!["Cafe".into(), "Airport".into()];

        let text = client.to_json().unwrap();
        let decoded = ClientRecord::from_json(&text).unwrap();
        assert!(decoded.is_clean(), "failures: {:?}", decoded.failures);
        assert_eq!(decoded.value, client);
        assert!(text.contains(r#""probedssids":["Cafe","Airport"]"#));
    }

    #[test]
    fn client_probes_must_be_strings() {
        let seen = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let mut value = serde_json::to_value(ClientRecord::new(seen).to_document()).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.insert("probedssids".into(), json!(["ok", 3]));

        let decoded = ClientRecord::from_document(obj);
        assert_eq!(decoded.failures.len(), 1);
        assert_eq!(decoded.failures[0].field, "probedssids");
        assert!(decoded.value.probed_ssids.is_empty());
    }

    #[test]
    fn raw_document_decodes_networks() {
        let doc = json!({
            "errCode": 0,
            "errString": "",
            "gps": {"latitude": 1.0, "longitude": 2.0, "altitude": 3.0, "speed": 0.0},
            "networks": [serde_json::to_value(sample_network().to_document()).unwrap()],
        });
        let raw = RawScanDocument::from_json(&doc.to_string()).unwrap();
        assert_eq!(raw.err_code, 0);
        assert!((raw.gps.altitude - 3.0).abs() < f64::EPSILON);

        let nets = raw.decode_networks();
        assert_eq!(nets.len(), 1);
        assert_eq!(nets[0].value.ssid, "HomeNet");
    }
}
