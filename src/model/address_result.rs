//! Per-address lookup result.

use super::detections::{DetectionHistory, Detections};
use super::identifiers::AttackType;
use super::location::Location;
use super::network::{DeviceEstimate, Network};
use super::operator::Operator;
use crate::codec::{
    inet_address, instant, record, Codec, CodecExt, MapCodecExt, UnboundedMapCodec, INT,
};
use crate::ip::InetAddress;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct AddressResult {
    pub network: Network,
    pub location: Location,
    pub device_estimate: DeviceEstimate,
    pub detections: Detections,
    pub detection_history: Option<DetectionHistory>,
    /// Reported attacks by kind.
    pub attack_history: Option<BTreeMap<AttackType, i32>>,
    pub operator: Option<Operator>,
    pub last_updated: DateTime<Utc>,
}

impl AddressResult {
    pub fn codec() -> impl Codec<AddressResult> {
        record(
            (
                Network::codec()
                    .field_of("network")
                    .for_getter(|r: &AddressResult| &r.network),
                Location::codec()
                    .field_of("location")
                    .for_getter(|r: &AddressResult| &r.location),
                DeviceEstimate::codec()
                    .field_of("device_estimate")
                    .for_getter(|r: &AddressResult| &r.device_estimate),
                Detections::codec()
                    .field_of("detections")
                    .for_getter(|r: &AddressResult| &r.detections),
                DetectionHistory::codec()
                    .optional_field_of("detection_history")
                    .for_getter(|r: &AddressResult| &r.detection_history),
                INT.unbounded_map_of::<AttackType, _>(AttackType::codec())
                    .optional_field_of("attack_history")
                    .for_getter(|r: &AddressResult| &r.attack_history),
                Operator::codec()
                    .optional_field_of("operator")
                    .for_getter(|r: &AddressResult| &r.operator),
                instant()
                    .field_of("last_updated")
                    .for_getter(|r: &AddressResult| &r.last_updated),
            ),
            |(
                network,
                location,
                device_estimate,
                detections,
                detection_history,
                attack_history,
                operator,
                last_updated,
            )| AddressResult {
                network,
                location,
                device_estimate,
                detections,
                detection_history,
                attack_history,
                operator,
                last_updated,
            },
        )
    }

    /// Results keyed by address string, as found at the top level of a response.
    pub fn by_address_codec(
    ) -> UnboundedMapCodec<impl Codec<InetAddress>, impl Codec<AddressResult>> {
        AddressResult::codec().unbounded_map_of::<InetAddress, _>(inet_address())
    }
}
