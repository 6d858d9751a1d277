//! Logical response status, independent of the HTTP status code.

use crate::codec::{Codec, CodecExt, STRING};
use crate::error::{CodecError, CodecResult};
use std::fmt;
use std::str::FromStr;

/// Value of the top-level `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    /// Results present, no message.
    Ok,
    /// Results present, with a message.
    Warning,
    /// No results; the request was refused.
    Denied,
    /// No results; the request failed.
    Error,
}

impl ResponseStatus {
    pub const ALL: [ResponseStatus; 4] = [
        ResponseStatus::Ok,
        ResponseStatus::Warning,
        ResponseStatus::Denied,
        ResponseStatus::Error,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Ok => "ok",
            ResponseStatus::Warning => "warning",
            ResponseStatus::Denied => "denied",
            ResponseStatus::Error => "error",
        }
    }

    /// Whether a response with this status carries per-address results.
    pub fn is_successful(&self) -> bool {
        matches!(self, ResponseStatus::Ok | ResponseStatus::Warning)
    }

    /// Whether a response with this status carries a message.
    pub fn has_message(&self) -> bool {
        !matches!(self, ResponseStatus::Ok)
    }

    /// Any status.
    pub fn codec() -> impl Codec<ResponseStatus> {
        STRING.flat_xmap(
            |s: String| s.parse::<ResponseStatus>(),
            |status: &ResponseStatus| Ok(status.as_str().to_string()),
        )
    }

    /// Only [`ResponseStatus::is_successful`] statuses, in both directions.
    pub fn successful_codec() -> impl Codec<ResponseStatus> {
        Self::codec().flat_xmap(successful, |status: &ResponseStatus| successful(*status))
    }

    /// Only statuses that are not [`ResponseStatus::is_successful`], in both directions.
    pub fn unsuccessful_codec() -> impl Codec<ResponseStatus> {
        Self::codec().flat_xmap(unsuccessful, |status: &ResponseStatus| unsuccessful(*status))
    }
}

fn successful(status: ResponseStatus) -> CodecResult<ResponseStatus> {
    if status.is_successful() {
        Ok(status)
    } else {
        Err(CodecError::parse(status.as_str(), "unsuccessful response status"))
    }
}

fn unsuccessful(status: ResponseStatus) -> CodecResult<ResponseStatus> {
    if status.is_successful() {
        Err(CodecError::parse(status.as_str(), "successful response status"))
    } else {
        Ok(status)
    }
}

impl FromStr for ResponseStatus {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CodecError::parse(s, "unknown response status"))
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
