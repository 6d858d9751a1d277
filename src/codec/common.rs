//! Textual formats shared by the response model.

use super::{Codec, CodecExt, STRING};
use crate::ip::InetAddress;
use chrono::{DateTime, SecondsFormat, Utc};

/// Strictly parsed IPv4 or IPv6 address string.
pub fn inet_address() -> impl Codec<InetAddress> {
    STRING.flat_xmap(
        |s: String| s.parse::<InetAddress>(),
        |address: &InetAddress| Ok(address.to_string()),
    )
}

/// Autonomous system number carried as `AS<digits>`; the prefix is optional on decode.
pub fn asn() -> impl Codec<i32> {
    STRING.comap_flat_map(
        |s: String| s.strip_prefix("AS").unwrap_or(&s).parse::<i32>(),
        |asn: &i32| format!("AS{}", asn),
    )
}

/// RFC 3339 / ISO 8601 timestamp, normalized to UTC.
pub fn instant() -> impl Codec<DateTime<Utc>> {
    STRING.comap_flat_map(
        |s: String| DateTime::parse_from_rfc3339(&s).map(|t| t.with_timezone(&Utc)),
        |t: &DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::AutoSi, true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::json::JsonOps;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_asn() {
        let codec = asn();
        assert_eq!(codec.decode(&JsonOps, &json!("AS64496")).unwrap(), 64496);
        assert_eq!(codec.decode(&JsonOps, &json!("64496")).unwrap(), 64496);
        assert_eq!(codec.encode_start(&JsonOps, &64496).unwrap(), json!("AS64496"));

        match codec.decode(&JsonOps, &json!("ASX")) {
            Err(CodecError::ParseFailure { input, .. }) => assert_eq!(input, "ASX"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_instant() {
        let codec = instant();
        let expected = Utc.with_ymd_and_hms(2025, 8, 12, 10, 30, 0).unwrap();

        assert_eq!(
            codec.decode(&JsonOps, &json!("2025-08-12T10:30:00Z")).unwrap(),
            expected
        );
        assert_eq!(
            codec.decode(&JsonOps, &json!("2025-08-12T13:30:00+03:00")).unwrap(),
            expected
        );
        assert_eq!(
            codec.encode_start(&JsonOps, &expected).unwrap(),
            json!("2025-08-12T10:30:00Z")
        );
        assert!(matches!(
            codec.decode(&JsonOps, &json!("yesterday")),
            Err(CodecError::ParseFailure { .. })
        ));
    }

    #[test]
    fn test_inet_address() {
        let codec = inet_address();
        let address = codec.decode(&JsonOps, &json!("2001:0db8::0001")).unwrap();
        assert_eq!(codec.encode_start(&JsonOps, &address).unwrap(), json!("2001:db8::1"));
        assert!(codec.decode(&JsonOps, &json!("198.51.100")).is_err());
    }
}
