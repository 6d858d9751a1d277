//! Network ownership of an address.

use crate::cidr::CidrIpRange;
use crate::codec::{asn, record, Codec, CodecExt, MapCodecExt, LONG, STRING};

/// Autonomous system and provider details.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    /// Autonomous system number, `AS` prefix stripped.
    pub asn: Option<i32>,
    /// Announced block containing the address.
    pub range: Option<CidrIpRange>,
    pub hostname: Option<String>,
    pub provider: Option<String>,
    pub organisation: Option<String>,
    /// Connection type, e.g. `Residential`, `Business`, `Hosting`.
    pub network_type: String,
}

impl Network {
    pub fn codec() -> impl Codec<Network> {
        record(
            (
                asn().optional_field_of("asn").for_getter(|n: &Network| &n.asn),
                CidrIpRange::string_codec()
                    .optional_field_of("range")
                    .for_getter(|n: &Network| &n.range),
                STRING
                    .optional_field_of("hostname")
                    .for_getter(|n: &Network| &n.hostname),
                STRING
                    .optional_field_of("provider")
                    .for_getter(|n: &Network| &n.provider),
                STRING
                    .optional_field_of("organisation")
                    .for_getter(|n: &Network| &n.organisation),
                STRING.field_of("type").for_getter(|n: &Network| &n.network_type),
            ),
            |(asn, range, hostname, provider, organisation, network_type)| Network {
                asn,
                range,
                hostname,
                provider,
                organisation,
                network_type,
            },
        )
    }
}

/// Estimated number of devices seen behind the address and its subnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceEstimate {
    pub address: i64,
    pub subnet: i64,
}

impl DeviceEstimate {
    pub fn codec() -> impl Codec<DeviceEstimate> {
        record(
            (
                LONG.field_of("address").for_getter(|d: &DeviceEstimate| &d.address),
                LONG.field_of("subnet").for_getter(|d: &DeviceEstimate| &d.subnet),
            ),
            |(address, subnet)| DeviceEstimate { address, subnet },
        )
    }
}
