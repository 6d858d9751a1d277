//! CIDR address ranges.
//!
//! A range is a base address plus a prefix length. Its first and last
//! addresses are derived byte-wise from the base and cached on first use.

use crate::codec::{either, inet_address, Codec, CodecExt, STRING};
use crate::error::{CodecError, CodecResult};
use crate::ip::{bits_match, compare_bytes, ComparableAddress, InetAddress, ANY_V4, ANY_V6};
use ::either::Either;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

/// A block of addresses sharing their first `net_mask_bits` bits.
#[derive(Debug, Clone)]
pub struct CidrIpRange {
    address: InetAddress,
    net_mask_bits: u32,
    start: OnceLock<InetAddress>,
    end: OnceLock<InetAddress>,
}

impl CidrIpRange {
    /// Fails with [`CodecError::InvalidMask`] unless `net_mask_bits` fits the
    /// address family (32 for IPv4, 128 for IPv6).
    pub fn new(address: InetAddress, net_mask_bits: u32) -> CodecResult<Self> {
        if net_mask_bits > address.bit_width() {
            return Err(CodecError::InvalidMask {
                address: address.to_string(),
                bits: net_mask_bits,
            });
        }
        Ok(Self {
            address,
            net_mask_bits,
            start: OnceLock::new(),
            end: OnceLock::new(),
        })
    }

    /// Range holding exactly `address`.
    pub fn single(address: InetAddress) -> Self {
        Self {
            address,
            net_mask_bits: address.bit_width(),
            start: OnceLock::new(),
            end: OnceLock::new(),
        }
    }

    /// `0.0.0.0/0`
    pub fn any_v4() -> Self {
        Self {
            address: ANY_V4,
            net_mask_bits: 0,
            start: OnceLock::new(),
            end: OnceLock::new(),
        }
    }

    /// `::/0`
    pub fn any_v6() -> Self {
        Self {
            address: ANY_V6,
            net_mask_bits: 0,
            start: OnceLock::new(),
            end: OnceLock::new(),
        }
    }

    pub fn address(&self) -> &InetAddress {
        &self.address
    }

    pub fn net_mask_bits(&self) -> u32 {
        self.net_mask_bits
    }

    /// First address of the range, inclusive.
    pub fn range_start(&self) -> &InetAddress {
        self.start.get_or_init(|| self.boundary(0x00, |byte, mask| byte & mask))
    }

    /// Last address of the range, inclusive.
    pub fn range_end(&self) -> &InetAddress {
        self.end.get_or_init(|| self.boundary(0xFF, |byte, mask| byte | !mask))
    }

    /// Copy of the base address with every host bit replaced. `fill` is written
    /// to whole host bytes, `partial` combines the boundary byte with its prefix mask.
    fn boundary(&self, fill: u8, partial: fn(u8, u8) -> u8) -> InetAddress {
        let bits = self.net_mask_bits;
        match self.address {
            InetAddress::V4(octets) => InetAddress::V4(mask_host_bits(octets, bits, fill, partial)),
            InetAddress::V6 { octets, scope_id } => InetAddress::V6 {
                octets: mask_host_bits(octets, bits, fill, partial),
                scope_id,
            },
        }
    }

    /// Whether `address` is inside this range.
    ///
    /// Families must match. A range without a scope id matches every IPv6
    /// scope; a scoped range only matches the same scope.
    pub fn contains(&self, address: &InetAddress) -> bool {
        if self.address.family() != address.family() {
            return false;
        }
        if !bits_match(self.address.octets(), address.octets(), self.net_mask_bits) {
            return false;
        }
        match self.address.scope_id() {
            None => true,
            Some(scope_id) => address.scope_id() == Some(scope_id),
        }
    }

    /// Number of addresses in the range, saturating at `u128::MAX`.
    pub fn size(&self) -> u128 {
        let host_bits = self.address.bit_width() - self.net_mask_bits;
        1u128.checked_shl(host_bits).unwrap_or(u128::MAX)
    }

    /// Parse strict `address/bits` notation.
    pub fn parse_full(input: &str) -> CodecResult<Self> {
        let parts: Vec<&str> = input.split('/').collect();
        if parts.len() != 2 {
            return Err(CodecError::parse(
                input,
                format!("expected 2 parts separated by a slash, got {}", parts.len()),
            ));
        }

        let address: InetAddress = parts[0].parse()?;
        if parts[1].is_empty() || !parts[1].bytes().all(|b| b.is_ascii_digit()) {
            return Err(CodecError::parse(
                input,
                format!("invalid net mask bits '{}'", parts[1]),
            ));
        }
        let net_mask_bits: u32 = parts[1]
            .parse()
            .map_err(|e| CodecError::parse(input, format!("invalid net mask bits '{}': {}", parts[1], e)))?;

        Self::new(address, net_mask_bits)
    }

    /// Codec for strict `address/bits` strings.
    pub fn string_codec_full() -> impl Codec<CidrIpRange> {
        STRING.flat_xmap(
            |s: String| CidrIpRange::parse_full(&s),
            |range: &CidrIpRange| Ok(range.to_string()),
        )
    }

    /// Codec accepting a bare address (a single-address range) or `address/bits`.
    ///
    /// Always encodes the full notation.
    pub fn string_codec() -> impl Codec<CidrIpRange> {
        either(
            inet_address(),
            Self::string_codec_full(),
            CidrIpRange::single,
            |range| range,
            |range: &CidrIpRange| Either::Right(range),
        )
    }
}

fn mask_host_bits<const N: usize>(
    mut octets: [u8; N],
    net_mask_bits: u32,
    fill: u8,
    partial: fn(u8, u8) -> u8,
) -> [u8; N] {
    let full_bytes = (net_mask_bits / 8) as usize;
    let partial_bits = net_mask_bits % 8;

    let mut host = octets.iter_mut().skip(full_bytes);
    if partial_bits > 0 {
        if let Some(byte) = host.next() {
            *byte = partial(*byte, 0xFFu8 << (8 - partial_bits));
        }
    }
    for byte in host {
        *byte = fill;
    }
    octets
}

impl PartialEq for CidrIpRange {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address && self.net_mask_bits == other.net_mask_bits
    }
}

impl Eq for CidrIpRange {}

impl Hash for CidrIpRange {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
        self.net_mask_bits.hash(state);
    }
}

/// Ordered by first address, then by size with larger ranges first.
impl Ord for CidrIpRange {
    fn cmp(&self, other: &Self) -> Ordering {
        ComparableAddress(*self.range_start())
            .cmp(&ComparableAddress(*other.range_start()))
            .then_with(|| self.net_mask_bits.cmp(&other.net_mask_bits))
            .then_with(|| compare_bytes(self.address.octets(), other.address.octets()))
            .then_with(|| self.address.scope_id().cmp(&other.address.scope_id()))
    }
}

impl PartialOrd for CidrIpRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CidrIpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.net_mask_bits)
    }
}

/// Accepts a bare address or `address/bits`.
impl FromStr for CidrIpRange {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = match s.parse::<InetAddress>() {
            Ok(address) => return Ok(CidrIpRange::single(address)),
            Err(error) => error,
        };
        Self::parse_full(s).map_err(|full| CodecError::UnionExhausted {
            first: Box::new(bare),
            second: Box::new(full),
        })
    }
}

impl From<InetAddress> for CidrIpRange {
    fn from(address: InetAddress) -> Self {
        CidrIpRange::single(address)
    }
}
