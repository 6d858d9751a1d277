//! Typed response model and its codecs.

mod address_result;
mod detections;
mod identifiers;
mod location;
mod network;
mod operator;
mod response;
mod status;

pub use address_result::AddressResult;
pub use detections::{DetectionHistory, Detections};
pub use identifiers::{AttackType, OperatorProtocol, OperatorService};
pub use location::{Currency, Location};
pub use network::{DeviceEstimate, Network};
pub use operator::{Operator, OperatorPolicies, OperatorRating};
pub use response::{Failure, Response, Success, UnsuccessfulResponse};
pub use status::ResponseStatus;

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    /// A complete per-address result as returned by the service.
    pub(crate) fn address_result_json() -> Value {
        json!({
            "network": {
                "asn": "AS64496",
                "range": "198.51.100.0/24",
                "hostname": null,
                "provider": "Example Networks",
                "organisation": "Example Networks B.V.",
                "type": "Hosting"
            },
            "location": {
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
            },
            "device_estimate": {"address": 2, "subnet": 12},
            "detections": {
                "proxy": false,
                "vpn": true,
                "compromised": false,
                "scraper": false,
                "tor": false,
                "hosting": true,
                "anonymous": true,
                "risk": 66,
                "confidence": 100,
                "first_seen": "2025-06-01T12:00:00Z",
                "last_seen": "2025-08-11T23:59:59Z"
            },
            "detection_history": {
                "delisted": false,
                "delist_datetime": "2025-09-11T23:59:59Z"
            },
            "attack_history": {"login_attempt": 4, "new_kind": 1},
            "operator": {
                "name": "Example VPN",
                "url": "https://vpn.example",
                "anonymity": "high",
                "popularity": "medium",
                "services": ["datacenter_vpns"],
                "protocols": ["WireGuard", "OpenVPN"],
                "policies": {"logging": false, "free_access": false},
                "additional_operators": null
            },
            "last_updated": "2025-08-12T08:00:00Z"
        })
    }
}
