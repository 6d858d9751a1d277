//! IP addresses as raw big-endian bytes, with strict textual parsing.
//!
//! Accepted IPv4 form: exactly four dot-separated decimal octets.
//! Accepted IPv6 form: eight colon-separated groups of 1-4 hex digits, or
//! fewer groups around a single `::`, optionally followed by `%<scope id>`.
//! Embedded dotted IPv4 tails are not accepted.

use crate::error::{CodecError, CodecResult};
use std::cmp::Ordering;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

pub const V4_BYTES: usize = 4;
pub const V4_BITS: u32 = 32;
pub const V6_BYTES: usize = 16;
pub const V6_BITS: u32 = 128;

const V6_GROUPS: usize = 8;

/// Address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    pub fn byte_len(self) -> usize {
        match self {
            AddressFamily::V4 => V4_BYTES,
            AddressFamily::V6 => V6_BYTES,
        }
    }

    pub fn bit_width(self) -> u32 {
        match self {
            AddressFamily::V4 => V4_BITS,
            AddressFamily::V6 => V6_BITS,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => write!(f, "IPv4"),
            AddressFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// An IPv4 or IPv6 address. IPv6 addresses may carry a numeric scope id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InetAddress {
    V4([u8; V4_BYTES]),
    V6 {
        octets: [u8; V6_BYTES],
        scope_id: Option<u32>,
    },
}

/// `0.0.0.0`
pub const ANY_V4: InetAddress = InetAddress::V4([0; V4_BYTES]);

/// `::`
pub const ANY_V6: InetAddress = InetAddress::V6 {
    octets: [0; V6_BYTES],
    scope_id: None,
};

impl InetAddress {
    pub fn v6(octets: [u8; V6_BYTES]) -> Self {
        InetAddress::V6 {
            octets,
            scope_id: None,
        }
    }

    pub fn family(&self) -> AddressFamily {
        match self {
            InetAddress::V4(_) => AddressFamily::V4,
            InetAddress::V6 { .. } => AddressFamily::V6,
        }
    }

    /// Raw big-endian bytes: 4 for IPv4, 16 for IPv6.
    pub fn octets(&self) -> &[u8] {
        match self {
            InetAddress::V4(octets) => octets,
            InetAddress::V6 { octets, .. } => octets,
        }
    }

    pub fn bit_width(&self) -> u32 {
        self.family().bit_width()
    }

    pub fn scope_id(&self) -> Option<u32> {
        match self {
            InetAddress::V4(_) => None,
            InetAddress::V6 { scope_id, .. } => *scope_id,
        }
    }

    /// Same address with `scope_id`; IPv4 addresses are returned unchanged.
    pub fn with_scope_id(self, scope_id: Option<u32>) -> Self {
        match self {
            InetAddress::V6 { octets, .. } => InetAddress::V6 { octets, scope_id },
            v4 => v4,
        }
    }

    /// Strict IPv4 parse.
    pub fn parse_v4(input: &str) -> CodecResult<Self> {
        v4_octets(input)
            .map(InetAddress::V4)
            .map_err(|reason| CodecError::parse(input, reason))
    }

    /// Strict IPv6 parse, with optional `%scope`.
    pub fn parse_v6(input: &str) -> CodecResult<Self> {
        v6_octets(input)
            .map(|(octets, scope_id)| InetAddress::V6 { octets, scope_id })
            .map_err(|reason| CodecError::parse(input, reason))
    }
}

fn v4_octets(input: &str) -> Result<[u8; V4_BYTES], String> {
    let parts: Vec<&str> = input.split('.').collect();
    if parts.len() != V4_BYTES {
        return Err(format!("expected 4 octets, found {}", parts.len()));
    }

    let mut octets = [0u8; V4_BYTES];
    for (octet, part) in octets.iter_mut().zip(parts) {
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("invalid octet '{}'", part));
        }
        *octet = part
            .parse::<u8>()
            .map_err(|_| format!("octet '{}' out of range", part))?;
    }
    Ok(octets)
}

fn v6_octets(input: &str) -> Result<([u8; V6_BYTES], Option<u32>), String> {
    let (address, scope_id) = match input.split_once('%') {
        Some((address, scope)) => {
            if scope.is_empty() || !scope.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format!("invalid scope id '{}'", scope));
            }
            let scope_id = scope
                .parse::<u32>()
                .map_err(|_| format!("scope id '{}' out of range", scope))?;
            (address, Some(scope_id))
        }
        None => (input, None),
    };

    if address.matches("::").count() > 1 {
        return Err("more than one '::'".to_string());
    }

    let mut octets = [0u8; V6_BYTES];
    match address.split_once("::") {
        None => {
            let groups = v6_groups(address)?;
            if groups.len() != V6_GROUPS {
                return Err(format!("expected 8 groups, found {}", groups.len()));
            }
            for (chunk, group) in octets.chunks_exact_mut(2).zip(groups) {
                chunk.copy_from_slice(&group);
            }
        }
        Some((head, tail)) => {
            let head = v6_groups(head)?;
            let tail = v6_groups(tail)?;
            // `::` elides at least one group.
            if head.len() + tail.len() >= V6_GROUPS {
                return Err(format!(
                    "too many groups around '::': {}",
                    head.len() + tail.len()
                ));
            }
            for (chunk, group) in octets.chunks_exact_mut(2).zip(head) {
                chunk.copy_from_slice(&group);
            }
            // Right-align the tail so the elided zeros fill the gap.
            let offset = V6_GROUPS - tail.len();
            for (chunk, group) in octets.chunks_exact_mut(2).skip(offset).zip(tail) {
                chunk.copy_from_slice(&group);
            }
        }
    }
    Ok((octets, scope_id))
}

/// Colon-separated hex groups; an empty string is zero groups.
fn v6_groups(input: &str) -> Result<Vec<[u8; 2]>, String> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    input
        .split(':')
        .map(|group| {
            if group.is_empty() || group.len() > 4 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(format!("invalid group '{}'", group));
            }
            u16::from_str_radix(group, 16)
                .map(u16::to_be_bytes)
                .map_err(|e| format!("invalid group '{}': {}", group, e))
        })
        .collect()
}

impl FromStr for InetAddress {
    type Err = CodecError;

    /// Try IPv4 first, then IPv6.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v4 = match v4_octets(s) {
            Ok(octets) => return Ok(InetAddress::V4(octets)),
            Err(reason) => reason,
        };
        match v6_octets(s) {
            Ok((octets, scope_id)) => Ok(InetAddress::V6 { octets, scope_id }),
            Err(v6) => Err(CodecError::parse(s, format!("[v4: {}], [v6: {}]", v4, v6))),
        }
    }
}

impl fmt::Display for InetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InetAddress::V4(octets) => write!(f, "{}", Ipv4Addr::from(*octets)),
            InetAddress::V6 { octets, scope_id } => {
                write_v6(f, octets)?;
                if let Some(scope_id) = scope_id {
                    write!(f, "%{}", scope_id)?;
                }
                Ok(())
            }
        }
    }
}

/// Lowercase hex groups with the longest run of two or more zero groups
/// collapsed to `::` (leftmost run on ties). Never emits a dotted IPv4 tail.
fn write_v6(f: &mut fmt::Formatter<'_>, octets: &[u8; V6_BYTES]) -> fmt::Result {
    let mut groups = [0u16; V6_GROUPS];
    for (group, chunk) in groups.iter_mut().zip(octets.chunks_exact(2)) {
        *group = u16::from_be_bytes([chunk[0], chunk[1]]);
    }

    let (mut run_start, mut run_len) = (0, 0);
    let mut i = 0;
    while i < V6_GROUPS {
        if groups[i] == 0 {
            let start = i;
            while i < V6_GROUPS && groups[i] == 0 {
                i += 1;
            }
            if i - start > run_len {
                run_start = start;
                run_len = i - start;
            }
        } else {
            i += 1;
        }
    }

    if run_len < 2 {
        return write_groups(f, &groups);
    }
    write_groups(f, &groups[..run_start])?;
    f.write_str("::")?;
    write_groups(f, &groups[run_start + run_len..])
}

fn write_groups(f: &mut fmt::Formatter<'_>, groups: &[u16]) -> fmt::Result {
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            f.write_str(":")?;
        }
        write!(f, "{:x}", group)?;
    }
    Ok(())
}

impl From<IpAddr> for InetAddress {
    fn from(address: IpAddr) -> Self {
        match address {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl From<Ipv4Addr> for InetAddress {
    fn from(address: Ipv4Addr) -> Self {
        InetAddress::V4(address.octets())
    }
}

impl From<Ipv6Addr> for InetAddress {
    fn from(address: Ipv6Addr) -> Self {
        InetAddress::v6(address.octets())
    }
}

/// Drops the scope id.
impl From<InetAddress> for IpAddr {
    fn from(address: InetAddress) -> Self {
        match address {
            InetAddress::V4(octets) => IpAddr::V4(Ipv4Addr::from(octets)),
            InetAddress::V6 { octets, .. } => IpAddr::V6(Ipv6Addr::from(octets)),
        }
    }
}

/// Byte-lexicographic order: the first differing byte decides (unsigned),
/// then the shorter array sorts first.
pub fn compare_bytes(a: &[u8], b: &[u8]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Whether the first `bits` bits of `a` and `b` agree.
///
/// Returns `false` when either slice is shorter than `bits`.
pub fn bits_match(a: &[u8], b: &[u8], bits: u32) -> bool {
    let full_bytes = (bits / 8) as usize;
    let partial_bits = bits % 8;
    let needed = full_bytes + usize::from(partial_bits > 0);
    if a.len() < needed || b.len() < needed {
        return false;
    }
    if a[..full_bytes] != b[..full_bytes] {
        return false;
    }
    if partial_bits == 0 {
        return true;
    }
    let mask = 0xFFu8 << (8 - partial_bits);
    (a[full_bytes] & mask) == (b[full_bytes] & mask)
}

/// An address ordered by its raw bytes alone, ignoring family tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComparableAddress(pub InetAddress);

impl Ord for ComparableAddress {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_bytes(self.0.octets(), other.0.octets())
            .then_with(|| self.0.scope_id().cmp(&other.0.scope_id()))
    }
}

impl PartialOrd for ComparableAddress {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<InetAddress> for ComparableAddress {
    fn from(address: InetAddress) -> Self {
        ComparableAddress(address)
    }
}
