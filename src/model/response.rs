//! Top-level API response: a union of [`Success`] and [`Failure`].
//!
//! A successful response keeps its metadata and its per-address results in
//! the same JSON object:
//!
//! ```text
//! {"status": "ok", "query_time": 12, "198.51.100.1": {...}, "2001:db8::1": {...}}
//! ```
//!
//! [`Success::codec`] decodes the metadata fields first, then decodes every
//! remaining key as an address.

use super::address_result::AddressResult;
use super::status::ResponseStatus;
use crate::codec::{
    either, encode_via_map, try_record, Codec, CodecExt, MapCodec, MapCodecExt, LONG, STRING,
};
use crate::error::{CodecError, CodecResult};
use crate::ip::InetAddress;
use crate::json::JsonOps;
use crate::ops::ValueOps;
use ::either::Either;
use std::collections::BTreeMap;
use thiserror::Error;

/// Response carrying per-address results.
#[derive(Debug, Clone, PartialEq)]
pub struct Success {
    status: ResponseStatus,
    message: Option<String>,
    api_version: Option<String>,
    results: BTreeMap<InetAddress, AddressResult>,
    node: Option<String>,
    query_time: Option<i64>,
}

impl Success {
    /// Fails with [`CodecError::InvariantViolation`] unless `status` is successful
    /// and `message` is present exactly when the status carries one.
    pub fn new(
        status: ResponseStatus,
        message: Option<String>,
        api_version: Option<String>,
        results: BTreeMap<InetAddress, AddressResult>,
        node: Option<String>,
        query_time: Option<i64>,
    ) -> CodecResult<Self> {
        if !status.is_successful() {
            return Err(CodecError::InvariantViolation(format!(
                "status '{}' cannot be used for a successful response",
                status
            )));
        }
        check_message(status, message.as_deref())?;
        Ok(Self {
            status,
            message,
            api_version,
            results,
            node,
            query_time,
        })
    }

    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    pub fn results(&self) -> &BTreeMap<InetAddress, AddressResult> {
        &self.results
    }

    pub fn result(&self, address: &InetAddress) -> Option<&AddressResult> {
        self.results.get(address)
    }

    /// Node that served the request; only returned when asked for.
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    /// Server-side processing time in milliseconds.
    pub fn query_time(&self) -> Option<i64> {
        self.query_time
    }

    pub fn into_results(self) -> BTreeMap<InetAddress, AddressResult> {
        self.results
    }

    /// Replace the results, keeping the metadata.
    pub fn with_results(self, results: BTreeMap<InetAddress, AddressResult>) -> Self {
        Self { results, ..self }
    }

    /// Metadata fields only; decodes to a `Success` with no results.
    pub fn metadata_codec() -> impl MapCodec<Success> {
        try_record(
            (
                ResponseStatus::successful_codec()
                    .field_of("status")
                    .for_getter(|s: &Success| &s.status),
                STRING
                    .optional_field_of("message")
                    .for_getter(|s: &Success| &s.message),
                STRING
                    .optional_field_of("node")
                    .for_getter(|s: &Success| &s.node),
                LONG.optional_field_of("query_time")
                    .for_getter(|s: &Success| &s.query_time),
                STRING
                    .optional_field_of("version")
                    .for_getter(|s: &Success| &s.api_version),
            ),
            |(status, message, node, query_time, api_version)| {
                Success::new(status, message, api_version, BTreeMap::new(), node, query_time)
            },
        )
    }

    pub fn codec() -> impl Codec<Success> {
        SuccessCodec {
            metadata: Success::metadata_codec(),
            results: AddressResult::by_address_codec(),
        }
    }
}

/// Splits one object between the metadata codec and the address map.
struct SuccessCodec<M, R> {
    metadata: M,
    results: R,
}

impl<M, R> Codec<Success> for SuccessCodec<M, R>
where
    M: MapCodec<Success>,
    R: Codec<BTreeMap<InetAddress, AddressResult>>,
{
    fn encode<O: ValueOps>(
        &self,
        ops: &O,
        input: &Success,
        prefix: O::Value,
    ) -> CodecResult<O::Value> {
        let metadata = encode_via_map(&self.metadata, ops, input, prefix)?;
        self.results.encode(ops, &input.results, metadata)
    }

    fn decode<O: ValueOps>(&self, ops: &O, input: &O::Value) -> CodecResult<Success> {
        let map = ops.get_map(input)?;
        let metadata = self.metadata.decode_map(ops, &map)?;

        let metadata_keys = self.metadata.keys();
        let residual = ops.create_map(
            ops.get_map_entries(input)?
                .into_iter()
                .filter(|(key, _)| !metadata_keys.iter().any(|known| known == key))
                .map(|(key, value)| (key.to_string(), value.clone())),
        );
        let results = self.results.decode(ops, &residual)?;

        Ok(metadata.with_results(results))
    }
}

/// Response without results: the request was denied or failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    status: ResponseStatus,
    message: Option<String>,
    api_version: Option<String>,
}

impl Failure {
    pub fn new(
        status: ResponseStatus,
        message: Option<String>,
        api_version: Option<String>,
    ) -> CodecResult<Self> {
        if status.is_successful() {
            return Err(CodecError::InvariantViolation(format!(
                "status '{}' cannot be used for an unsuccessful response",
                status
            )));
        }
        check_message(status, message.as_deref())?;
        Ok(Self {
            status,
            message,
            api_version,
        })
    }

    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    pub fn codec() -> impl Codec<Failure> {
        try_record(
            (
                ResponseStatus::unsuccessful_codec()
                    .field_of("status")
                    .for_getter(|f: &Failure| &f.status),
                STRING
                    .optional_field_of("message")
                    .for_getter(|f: &Failure| &f.message),
                STRING
                    .optional_field_of("version")
                    .for_getter(|f: &Failure| &f.api_version),
            ),
            |(status, message, api_version)| Failure::new(status, message, api_version),
        )
    }
}

fn check_message(status: ResponseStatus, message: Option<&str>) -> CodecResult<()> {
    match (status.has_message(), message) {
        (true, None) => Err(CodecError::InvariantViolation(format!(
            "status '{}' requires a message",
            status
        ))),
        (false, Some(message)) => Err(CodecError::InvariantViolation(format!(
            "status '{}' does not carry a message, got {:?}",
            status, message
        ))),
        _ => Ok(()),
    }
}

/// A response that was not [`Success`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("received an unsuccessful response with status '{status}'{}", message_suffix(.message))]
pub struct UnsuccessfulResponse {
    pub status: ResponseStatus,
    pub message: Option<String>,
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {}", message),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Success(Success),
    Failure(Failure),
}

impl Response {
    /// Success shape first, then Failure; both diagnostics are kept if neither matches.
    pub fn codec() -> impl Codec<Response> {
        either(
            Success::codec(),
            Failure::codec(),
            Response::Success,
            Response::Failure,
            |response: &Response| match response {
                Response::Success(success) => Either::Left(success),
                Response::Failure(failure) => Either::Right(failure),
            },
        )
    }

    pub fn status(&self) -> ResponseStatus {
        match self {
            Response::Success(success) => success.status(),
            Response::Failure(failure) => failure.status(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Response::Success(success) => success.message(),
            Response::Failure(failure) => failure.message(),
        }
    }

    pub fn api_version(&self) -> Option<&str> {
        match self {
            Response::Success(success) => success.api_version(),
            Response::Failure(failure) => failure.api_version(),
        }
    }

    pub fn is_successful(&self) -> bool {
        self.status().is_successful()
    }

    pub fn success_or_err(&self) -> Result<&Success, UnsuccessfulResponse> {
        match self {
            Response::Success(success) => Ok(success),
            Response::Failure(failure) => Err(UnsuccessfulResponse {
                status: failure.status(),
                message: failure.message.clone(),
            }),
        }
    }

    pub fn into_success(self) -> Result<Success, UnsuccessfulResponse> {
        match self {
            Response::Success(success) => Ok(success),
            Response::Failure(failure) => Err(UnsuccessfulResponse {
                status: failure.status,
                message: failure.message,
            }),
        }
    }

    pub fn decode_json(value: &serde_json::Value) -> CodecResult<Response> {
        Response::codec().decode(&JsonOps, value)
    }

    pub fn to_json(&self) -> CodecResult<serde_json::Value> {
        Response::codec().encode_start(&JsonOps, self)
    }
}

impl From<Success> for Response {
    fn from(success: Success) -> Self {
        Response::Success(success)
    }
}

impl From<Failure> for Response {
    fn from(failure: Failure) -> Self {
        Response::Failure(failure)
    }
}
