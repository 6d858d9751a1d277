//! Geolocation of an address.

use crate::codec::{record, Codec, CodecExt, MapCodecExt, DOUBLE, STRING};

/// Local currency of a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    /// ISO 4217 code.
    pub code: String,
    pub name: String,
    pub symbol: String,
}

impl Currency {
    pub fn codec() -> impl Codec<Currency> {
        record(
            (
                STRING.field_of("code").for_getter(|c: &Currency| &c.code),
                STRING.field_of("name").for_getter(|c: &Currency| &c.name),
                STRING.field_of("symbol").for_getter(|c: &Currency| &c.symbol),
            ),
            |(code, name, symbol)| Currency { code, name, symbol },
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub continent_name: String,
    pub continent_code: String,
    pub country_name: String,
    /// ISO 3166-1 alpha-2 code.
    pub country_code: String,
    pub region_name: Option<String>,
    pub region_code: Option<String>,
    pub city_name: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA time zone name.
    pub timezone: Option<String>,
    pub currency: Currency,
}

impl Location {
    pub fn codec() -> impl Codec<Location> {
        record(
            (
                STRING
                    .field_of("continent_name")
                    .for_getter(|l: &Location| &l.continent_name),
                STRING
                    .field_of("continent_code")
                    .for_getter(|l: &Location| &l.continent_code),
                STRING
                    .field_of("country_name")
                    .for_getter(|l: &Location| &l.country_name),
                STRING
                    .field_of("country_code")
                    .for_getter(|l: &Location| &l.country_code),
                STRING
                    .optional_field_of("region_name")
                    .for_getter(|l: &Location| &l.region_name),
                STRING
                    .optional_field_of("region_code")
                    .for_getter(|l: &Location| &l.region_code),
                STRING
                    .optional_field_of("city_name")
                    .for_getter(|l: &Location| &l.city_name),
                STRING
                    .optional_field_of("postal_code")
                    .for_getter(|l: &Location| &l.postal_code),
                DOUBLE.field_of("latitude").for_getter(|l: &Location| &l.latitude),
                DOUBLE.field_of("longitude").for_getter(|l: &Location| &l.longitude),
                STRING
                    .optional_field_of("timezone")
                    .for_getter(|l: &Location| &l.timezone),
                Currency::codec()
                    .field_of("currency")
                    .for_getter(|l: &Location| &l.currency),
            ),
            |(
                continent_name,
                continent_code,
                country_name,
                country_code,
                region_name,
                region_code,
                city_name,
                postal_code,
                latitude,
                longitude,
                timezone,
                currency,
            )| Location {
                continent_name,
                continent_code,
                country_name,
                country_code,
                region_name,
                region_code,
                city_name,
                postal_code,
                latitude,
                longitude,
                timezone,
                currency,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonOps;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "continent_name": "Europe",
            "continent_code": "EU",
            "country_name": "Netherlands",
            "country_code": "NL",
            "region_name": "North Holland",
            "region_code": "NH",
            "city_name": "Amsterdam",
            "postal_code": "1012",
            "latitude": 52.3759,
            "longitude": 4.8975,
            "timezone": "Europe/Amsterdam",
            "currency": {"code": "EUR", "name": "Euro", "symbol": "€"}
        })
    }

    #[test]
    fn test_location_round_trip() {
        let codec = Location::codec();
        let location = codec.decode(&JsonOps, &sample()).unwrap();

        assert_eq!(location.city_name.as_deref(), Some("Amsterdam"));
        assert_eq!(location.currency.code, "EUR");
        assert_eq!(location.latitude, 52.3759);

        let encoded = codec.encode_start(&JsonOps, &location).unwrap();
        assert_eq!(encoded, sample());
    }

    #[test]
    fn test_nested_failure_is_attributed() {
        let mut value = sample();
        value["currency"]
            .as_object_mut()
            .unwrap()
            .remove("symbol");

        let error = Location::codec().decode(&JsonOps, &value).unwrap_err();
        assert_eq!(error.path_string(), ".currency");
        assert_eq!(
            error.root_cause(),
            &crate::error::CodecError::MissingField("symbol".to_string())
        );
    }
}
