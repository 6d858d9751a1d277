//! Anonymity operators (VPN and proxy vendors) behind an address.

use super::identifiers::{OperatorProtocol, OperatorService};
use crate::codec::{record, Codec, CodecExt, MapCodecExt, BOOL, STRING};
use crate::error::CodecError;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Coarse rating used by the operator `anonymity` and `popularity` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperatorRating {
    Low,
    Medium,
    High,
}

impl OperatorRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorRating::Low => "low",
            OperatorRating::Medium => "medium",
            OperatorRating::High => "high",
        }
    }

    pub fn codec() -> impl Codec<OperatorRating> {
        STRING.flat_xmap(
            |s: String| s.parse::<OperatorRating>(),
            |rating: &OperatorRating| Ok(rating.as_str().to_string()),
        )
    }
}

impl FromStr for OperatorRating {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(OperatorRating::Low),
            "medium" => Ok(OperatorRating::Medium),
            "high" => Ok(OperatorRating::High),
            _ => Err(CodecError::parse(s, "unknown operator rating")),
        }
    }
}

impl fmt::Display for OperatorRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Published policies of an operator. `None` means the policy is not known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OperatorPolicies {
    pub ad_filtering: Option<bool>,
    pub free_access: Option<bool>,
    pub paid_access: Option<bool>,
    pub port_forwarding: Option<bool>,
    pub logging: Option<bool>,
    pub anonymous_payments: Option<bool>,
    pub crypto_payments: Option<bool>,
    pub traceable_ownership: Option<bool>,
}

impl OperatorPolicies {
    /// No policy known.
    pub const UNKNOWN: OperatorPolicies = OperatorPolicies {
        ad_filtering: None,
        free_access: None,
        paid_access: None,
        port_forwarding: None,
        logging: None,
        anonymous_payments: None,
        crypto_payments: None,
        traceable_ownership: None,
    };

    pub fn codec() -> impl Codec<OperatorPolicies> {
        record(
            (
                BOOL.optional_field_of("ad_filtering")
                    .for_getter(|p: &OperatorPolicies| &p.ad_filtering),
                BOOL.optional_field_of("free_access")
                    .for_getter(|p: &OperatorPolicies| &p.free_access),
                BOOL.optional_field_of("paid_access")
                    .for_getter(|p: &OperatorPolicies| &p.paid_access),
                BOOL.optional_field_of("port_forwarding")
                    .for_getter(|p: &OperatorPolicies| &p.port_forwarding),
                BOOL.optional_field_of("logging")
                    .for_getter(|p: &OperatorPolicies| &p.logging),
                BOOL.optional_field_of("anonymous_payments")
                    .for_getter(|p: &OperatorPolicies| &p.anonymous_payments),
                BOOL.optional_field_of("crypto_payments")
                    .for_getter(|p: &OperatorPolicies| &p.crypto_payments),
                BOOL.optional_field_of("traceable_ownership")
                    .for_getter(|p: &OperatorPolicies| &p.traceable_ownership),
            ),
            |(
                ad_filtering,
                free_access,
                paid_access,
                port_forwarding,
                logging,
                anonymous_payments,
                crypto_payments,
                traceable_ownership,
            )| OperatorPolicies {
                ad_filtering,
                free_access,
                paid_access,
                port_forwarding,
                logging,
                anonymous_payments,
                crypto_payments,
                traceable_ownership,
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub name: String,
    pub url: String,
    pub anonymity: Option<String>,
    pub popularity: Option<String>,
    pub services: Option<BTreeSet<OperatorService>>,
    pub protocols: BTreeSet<OperatorProtocol>,
    pub policies: OperatorPolicies,
    pub additional_operators: Option<BTreeSet<String>>,
}

impl Operator {
    pub fn codec() -> impl Codec<Operator> {
        record(
            (
                STRING.field_of("name").for_getter(|o: &Operator| &o.name),
                STRING.field_of("url").for_getter(|o: &Operator| &o.url),
                STRING
                    .optional_field_of("anonymity")
                    .for_getter(|o: &Operator| &o.anonymity),
                STRING
                    .optional_field_of("popularity")
                    .for_getter(|o: &Operator| &o.popularity),
                OperatorService::codec()
                    .set_of()
                    .optional_field_of("services")
                    .for_getter(|o: &Operator| &o.services),
                OperatorProtocol::codec()
                    .set_of()
                    .field_of("protocols")
                    .for_getter(|o: &Operator| &o.protocols),
                OperatorPolicies::codec()
                    .optional_field_of_or("policies", OperatorPolicies::UNKNOWN)
                    .for_getter(|o: &Operator| &o.policies),
                STRING
                    .set_of()
                    .optional_field_of("additional_operators")
                    .for_getter(|o: &Operator| &o.additional_operators),
            ),
            |(name, url, anonymity, popularity, services, protocols, policies, additional_operators)| {
                Operator {
                    name,
                    url,
                    anonymity,
                    popularity,
                    services,
                    protocols,
                    policies,
                    additional_operators,
                }
            },
        )
    }

    /// `anonymity` as a rating, if it is one of the known levels.
    pub fn anonymity_rating(&self) -> Option<OperatorRating> {
        self.anonymity.as_deref().and_then(|s| s.parse().ok())
    }

    /// `popularity` as a rating, if it is one of the known levels.
    pub fn popularity_rating(&self) -> Option<OperatorRating> {
        self.popularity.as_deref().and_then(|s| s.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonOps;
    use serde_json::json;

    #[test]
    fn test_operator_rating_codec() {
        let codec = OperatorRating::codec();
        assert_eq!(codec.decode(&JsonOps, &json!("medium")).unwrap(), OperatorRating::Medium);
        assert_eq!(codec.encode_start(&JsonOps, &OperatorRating::High).unwrap(), json!("high"));
        assert!(matches!(
            codec.decode(&JsonOps, &json!("extreme")),
            Err(CodecError::ParseFailure { .. })
        ));
    }

    #[test]
    fn test_operator_defaults_policies() {
        let operator = Operator::codec()
            .decode(
                &JsonOps,
                &json!({
                    "name": "Example VPN",
                    "url": "https://vpn.example",
                    "anonymity": "high",
                    "popularity": "unrated",
                    "protocols": ["WireGuard", "OpenVPN", "Wireguard", "OpenVPN"]
                }),
            )
            .unwrap();

        assert_eq!(operator.policies, OperatorPolicies::UNKNOWN);
        assert_eq!(operator.services, None);
        assert_eq!(operator.protocols.len(), 3);
        assert!(operator.protocols.contains(&OperatorProtocol::OPENVPN));
        assert!(operator.protocols.contains(&OperatorProtocol::WIREGUARD));
        assert_eq!(operator.anonymity_rating(), Some(OperatorRating::High));
        assert_eq!(operator.popularity_rating(), None);
    }

    #[test]
    fn test_operator_round_trip() {
        let operator = Operator {
            name: "Example Proxies".to_string(),
            url: "https://proxies.example".to_string(),
            anonymity: None,
            popularity: Some("low".to_string()),
            services: Some(
                [OperatorService::WEB_SCRAPING, OperatorService::RESIDENTIAL_PROXIES]
                    .into_iter()
                    .collect(),
            ),
            protocols: [OperatorProtocol::SOCKS5, OperatorProtocol::HTTPS]
                .into_iter()
                .collect(),
            policies: OperatorPolicies {
                logging: Some(false),
                crypto_payments: Some(true),
                ..OperatorPolicies::UNKNOWN
            },
            additional_operators: None,
        };

        let codec = Operator::codec();
        let encoded = codec.encode_start(&JsonOps, &operator).unwrap();
        assert_eq!(
            encoded["services"],
            json!(["residential_proxies", "web_scraping"])
        );
        assert_eq!(
            encoded["policies"],
            json!({"logging": false, "crypto_payments": true})
        );
        assert_eq!(codec.decode(&JsonOps, &encoded).unwrap(), operator);
    }
}
