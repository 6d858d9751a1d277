//! Detection verdicts and their history.

use crate::codec::{instant, int_range, record, Codec, CodecExt, MapCodecExt, BOOL};
use chrono::{DateTime, Utc};

/// Verdicts for a single address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detections {
    pub proxy: bool,
    pub vpn: bool,
    pub compromised: bool,
    pub scraper: bool,
    pub tor: bool,
    pub hosting: bool,
    pub anonymous: bool,
    /// Risk score in `0..=100`. Absent on the wire means 0.
    pub risk: i32,
    /// Confidence in the verdicts, `0..=100`.
    pub confidence: i32,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl Detections {
    pub fn codec() -> impl Codec<Detections> {
        record(
            (
                BOOL.field_of("proxy").for_getter(|d: &Detections| &d.proxy),
                BOOL.field_of("vpn").for_getter(|d: &Detections| &d.vpn),
                BOOL.field_of("compromised").for_getter(|d: &Detections| &d.compromised),
                BOOL.field_of("scraper").for_getter(|d: &Detections| &d.scraper),
                BOOL.field_of("tor").for_getter(|d: &Detections| &d.tor),
                BOOL.field_of("hosting").for_getter(|d: &Detections| &d.hosting),
                BOOL.field_of("anonymous").for_getter(|d: &Detections| &d.anonymous),
                int_range(0, 100)
                    .optional_field_of_or("risk", 0)
                    .for_getter(|d: &Detections| &d.risk),
                int_range(0, 100)
                    .field_of("confidence")
                    .for_getter(|d: &Detections| &d.confidence),
                instant()
                    .optional_field_of("first_seen")
                    .for_getter(|d: &Detections| &d.first_seen),
                instant()
                    .optional_field_of("last_seen")
                    .for_getter(|d: &Detections| &d.last_seen),
            ),
            |(
                proxy,
                vpn,
                compromised,
                scraper,
                tor,
                hosting,
                anonymous,
                risk,
                confidence,
                first_seen,
                last_seen,
            )| Detections {
                proxy,
                vpn,
                compromised,
                scraper,
                tor,
                hosting,
                anonymous,
                risk,
                confidence,
                first_seen,
                last_seen,
            },
        )
    }

    /// Whether any of the boolean verdicts is set.
    pub fn is_flagged(&self) -> bool {
        self.proxy
            || self.vpn
            || self.compromised
            || self.scraper
            || self.tor
            || self.hosting
            || self.anonymous
    }
}

/// Whether and when an address was removed from the detection lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionHistory {
    pub delisted: bool,
    pub delist_datetime: DateTime<Utc>,
}

impl DetectionHistory {
    pub fn codec() -> impl Codec<DetectionHistory> {
        record(
            (
                BOOL.field_of("delisted")
                    .for_getter(|h: &DetectionHistory| &h.delisted),
                instant()
                    .field_of("delist_datetime")
                    .for_getter(|h: &DetectionHistory| &h.delist_datetime),
            ),
            |(delisted, delist_datetime)| DetectionHistory {
                delisted,
                delist_datetime,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::json::JsonOps;
    use chrono::TimeZone;
    use serde_json::json;

    fn clean() -> serde_json::Value {
        json!({
            "proxy": false,
            "vpn": false,
            "compromised": false,
            "scraper": false,
            "tor": false,
            "hosting": false,
            "anonymous": false,
            "confidence": 100
        })
    }

    #[test]
    fn test_risk_defaults_to_zero() {
        let detections = Detections::codec().decode(&JsonOps, &clean()).unwrap();
        assert_eq!(detections.risk, 0);
        assert_eq!(detections.first_seen, None);
        assert!(!detections.is_flagged());

        // defaults are written back out
        let encoded = Detections::codec().encode_start(&JsonOps, &detections).unwrap();
        assert_eq!(encoded["risk"], json!(0));
    }

    #[test]
    fn test_risk_out_of_range() {
        let mut value = clean();
        value["risk"] = json!(101);

        let error = Detections::codec().decode(&JsonOps, &value).unwrap_err();
        assert_eq!(error.path_string(), ".risk");
        assert!(matches!(
            error.root_cause(),
            CodecError::RangeViolation { min: 0, max: 100, .. }
        ));
    }

    #[test]
    fn test_seen_timestamps() {
        let mut value = clean();
        value["vpn"] = json!(true);
        value["risk"] = json!(66);
        value["last_seen"] = json!("2025-08-10T08:00:00Z");

        let detections = Detections::codec().decode(&JsonOps, &value).unwrap();
        assert!(detections.is_flagged());
        assert_eq!(
            detections.last_seen,
            Some(Utc.with_ymd_and_hms(2025, 8, 10, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_detection_history() {
        let history = DetectionHistory::codec()
            .decode(
                &JsonOps,
                &json!({"delisted": true, "delist_datetime": "2025-07-01T00:00:00Z"}),
            )
            .unwrap();
        assert!(history.delisted);

        assert!(DetectionHistory::codec()
            .decode(&JsonOps, &json!({"delisted": true}))
            .is_err());
    }
}
