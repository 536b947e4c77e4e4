//! Error types for NGSIv2 encoding/decoding, model access, queries and requests.

use http::StatusCode;
use serde_json::error::Category;
use thiserror::Error;

use crate::model::AttributeType;

/// Boxed error returned by a [`Transport`](crate::client::Transport) implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error during JSON decoding of wire payloads.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("malformed JSON at line {line}, column {column}: {message}")]
    MalformedJson {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("expected a JSON array, found {found}")]
    NotAnArray { found: &'static str },

    #[error("invalid entity envelope: {message}")]
    InvalidEnvelope { message: String },

    #[error("invalid payload: {message}")]
    InvalidData { message: String },
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => DecodeError::InvalidData {
                message: err.to_string(),
            },
            _ => DecodeError::MalformedJson {
                line: err.line(),
                column: err.column(),
                message: err.to_string(),
            },
        }
    }
}

/// Error during JSON encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("JSON encoding failed: {message}")]
    Json { message: String },
}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        EncodeError::Json {
            message: err.to_string(),
        }
    }
}

/// Error when reading typed data out of entities and attributes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("attribute is not {expected}, but {found}")]
    TypeMismatch {
        expected: AttributeType,
        found: String,
    },

    #[error("{expected} attribute holds a value of the wrong shape: {found}")]
    InvalidValue {
        expected: AttributeType,
        found: String,
    },

    #[error("entity has no attribute '{name}'")]
    MissingAttribute { name: String },
}

/// Error when constructing a query statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid query statement: {reason}")]
    InvalidQueryStatement { reason: &'static str },
}

/// Error during NGSIv2 field-syntax validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("entity id is empty")]
    EmptyId,

    #[error("{field} is empty")]
    EmptyName { field: &'static str },

    #[error("{field} length {len} exceeds maximum {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{field} {value:?} contains forbidden character {char:?}")]
    ForbiddenCharacter {
        field: &'static str,
        value: String,
        char: char,
    },

    #[error("attribute name '{name}' is reserved for the entity envelope")]
    ReservedAttributeName { name: String },
}

/// Error from a client operation.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("base URL {url} cannot carry a path")]
    UnsupportedBaseUrl { url: String },

    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),

    #[error("transport failed: {0}")]
    Transport(#[source] TransportError),

    #[error("server returned {status}: {error}: {description}")]
    Server {
        status: StatusCode,
        error: String,
        description: String,
    },

    #[error("unexpected response status {status}")]
    UnexpectedStatus { status: StatusCode },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// Returns the HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Server { status, .. } | ClientError::UnexpectedStatus { status } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Returns true if the broker reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}
