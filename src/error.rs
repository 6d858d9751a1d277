//! Error taxonomy for value codecs and address parsing.

use std::fmt;
use thiserror::Error;

/// Where inside a value tree a failure happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A named record field.
    Field(String),
    /// A list element.
    Index(usize),
    /// An entry of a dynamically keyed map.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, ".{}", name),
            PathSegment::Index(index) => write!(f, "[{}]", index),
            PathSegment::Key(key) => write!(f, "[{:?}]", key),
        }
    }
}

/// Failure produced while encoding or decoding a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// A decode site found the wrong kind of value.
    #[error("expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// A map operation was applied to something that is not a map.
    #[error("not a map: {0}")]
    NotAMap(String),

    /// A list operation was applied to something that is not a list.
    #[error("not a list: {0}")]
    NotAList(String),

    /// A required field is absent.
    #[error("missing field `{0}`")]
    MissingField(String),

    /// A number is outside of the codec's accepted bounds.
    #[error("value {value} outside of range [{min}, {max}]")]
    RangeViolation { value: i64, min: i64, max: i64 },

    /// A textual format (address, CIDR, timestamp, ASN, enum name) did not parse.
    #[error("failed to parse '{input}': {reason}")]
    ParseFailure { input: String, reason: String },

    /// Net mask bit count outside `0..=family width`.
    #[error("invalid net mask bits {bits} for address {address}")]
    InvalidMask { address: String, bits: u32 },

    /// A dynamic map key was rejected by its key codec.
    #[error("invalid map key \"{key}\": {source}")]
    KeyDecodeFailure {
        key: String,
        source: Box<CodecError>,
    },

    /// Structurally valid but logically inconsistent data.
    #[error("{0}")]
    InvariantViolation(String),

    /// Neither alternative of a union codec matched.
    #[error("no alternative matched: [{first}], [{second}]")]
    UnionExhausted {
        first: Box<CodecError>,
        second: Box<CodecError>,
    },

    /// A failure attributed to a sub-path.
    #[error("at {segment}: {source}")]
    At {
        segment: PathSegment,
        source: Box<CodecError>,
    },

    /// Several independent failures (record fields decode independently).
    #[error("{}", join_errors(.0))]
    Multiple(Vec<CodecError>),
}

fn join_errors(errors: &[CodecError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias used throughout the codec layer.
pub type CodecResult<T> = Result<T, CodecError>;

impl CodecError {
    pub fn type_mismatch(expected: &'static str, found: impl fmt::Display) -> Self {
        CodecError::TypeMismatch {
            expected,
            found: found.to_string(),
        }
    }

    pub fn parse(input: impl Into<String>, reason: impl fmt::Display) -> Self {
        CodecError::ParseFailure {
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    /// Attribute this error to `segment`.
    pub fn at(self, segment: PathSegment) -> Self {
        CodecError::At {
            segment,
            source: Box::new(self),
        }
    }

    pub fn at_field(self, name: &str) -> Self {
        self.at(PathSegment::Field(name.to_string()))
    }

    pub fn at_index(self, index: usize) -> Self {
        self.at(PathSegment::Index(index))
    }

    pub fn at_key(self, key: &str) -> Self {
        self.at(PathSegment::Key(key.to_string()))
    }

    /// Collapse a non-empty list of failures into one error.
    pub fn accumulate(mut errors: Vec<CodecError>) -> Self {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            CodecError::Multiple(errors)
        }
    }

    /// The innermost error, with every path attribution stripped.
    pub fn root_cause(&self) -> &CodecError {
        match self {
            CodecError::At { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Path of the failure, outermost segment first.
    pub fn path(&self) -> Vec<&PathSegment> {
        let mut segments = Vec::new();
        let mut current = self;
        while let CodecError::At { segment, source } = current {
            segments.push(segment);
            current = source;
        }
        segments
    }

    /// Rendered path, e.g. `["198.51.100.1"].network.asn`.
    pub fn path_string(&self) -> String {
        self.path().iter().map(|s| s.to_string()).collect()
    }
}
