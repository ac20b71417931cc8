//! Error types for the API binding.
//!
//! # Design
//! Two failure families reach the caller through one `Error` channel:
//! `TransportError` when the request or response never made sense at the
//! HTTP/JSON level, and `Error::Api` when the service answered with a
//! structured error body. [`relevant_error`] decides which one wins when
//! both are present; a non-2xx status typically produces both. Errors built
//! from a response keep that response, so headers such as
//! `x-rate-limit-reset` stay reachable through [`Error::response`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::HttpResponse;

/// One entry of a service error body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Structured error body returned by the service:
/// `{"errors":[{"code":50,"message":"User not found."}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

impl ApiError {
    /// True when the body carried no error detail at all.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first reported error code, if any.
    pub fn code(&self) -> Option<i64> {
        self.errors.first().map(|detail| detail.code)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.first() {
            Some(detail) => write!(f, "twitter: {} {}", detail.code, detail.message),
            None => write!(f, "twitter: empty error response"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Failures below the level of the service's own error reporting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Send(String),

    /// The request parameters could not be encoded into a query string.
    #[error("failed to encode parameters: {0}")]
    Encode(String),

    /// A 2xx body could not be decoded into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// A non-2xx response whose body held no structured error.
    #[error("HTTP {status}: {}", .response.body)]
    Status {
        status: u16,
        response: Box<HttpResponse>,
    },
}

/// The single error channel of every service operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{error} (HTTP {status})")]
    Api {
        status: u16,
        error: ApiError,
        response: Box<HttpResponse>,
    },
}

impl Error {
    /// The structured service error, when this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api { error, .. } => Some(error),
            Error::Transport(_) => None,
        }
    }

    /// The raw response behind this error, when the service answered at all.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Error::Api { response, .. } | Error::Transport(TransportError::Status { response, .. }) => {
                Some(&**response)
            }
            Error::Transport(_) => None,
        }
    }
}

/// Pick the error to surface for one response.
///
/// A non-empty `api` error takes precedence over any transport error,
/// then the transport error, and `None` means the call succeeded.
pub fn relevant_error(
    transport: Option<TransportError>,
    api: ApiError,
    response: &HttpResponse,
) -> Option<Error> {
    if !api.is_empty() {
        return Some(Error::Api {
            status: response.status,
            error: api,
            response: Box::new(response.clone()),
        });
    }
    transport.map(Error::Transport)
}
