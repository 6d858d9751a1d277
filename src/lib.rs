//! Client for the proxycheck.io v3 IP reputation API.
//!
//! The core is a format-agnostic codec layer: domain types are encoded to and
//! decoded from any tree-shaped value through [`ValueOps`], with
//! [`JsonOps`] as the wire backend. On top of it sit the typed response
//! model, a CIDR range engine and a thin HTTP client.
//!
//! # Features
//!
//! - **Codecs** - Composable, bidirectional [`Codec`]s with path-attributed errors
//! - **Response model** - [`Response`] decodes the mixed metadata/address object of the v3 API
//! - **CIDR ranges** - [`CidrIpRange`] with exact membership tests for IPv4 and IPv6
//! - **Client** - [`ProxyCheckClient`] over `reqwest`, configured from YAML
//!
//! # Example Configuration
//!
//! ```yaml
//! api_key: "${PROXYCHECK_API_KEY}"
//!
//! timeout:
//!   connect_timeout_ms: 10000
//!   read_timeout_ms: 10000
//!
//! request:
//!   max_days: 7
//!   return_node: false
//! ```

pub mod cidr;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod ip;
pub mod json;
pub mod model;
pub mod ops;
pub mod request;
pub mod tree;

pub use cidr::CidrIpRange;
pub use client::{ApiError, ProxyCheckApi, ProxyCheckClient, RawResponse};
pub use codec::{Codec, CodecExt, MapCodec, MapCodecExt};
pub use config::Config;
pub use error::{CodecError, CodecResult};
pub use ip::InetAddress;
pub use json::JsonOps;
pub use model::{AddressResult, Failure, Response, ResponseStatus, Success};
pub use ops::ValueOps;
pub use request::RequestConfiguration;
pub use tree::TreeOps;
