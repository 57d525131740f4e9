//! Error types and HTTP mapping for the gateway

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration-related errors, only raised at startup
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The provider could not be reached (DNS, connect, timeout)
    #[error("{provider} unreachable: {message}")]
    Transport {
        provider: &'static str,
        message: String,
        timed_out: bool,
    },

    /// The provider answered with a non-success status
    #[error("{provider} answered with status {status}")]
    UpstreamStatus { provider: &'static str, status: u16 },

    /// The provider answered 200 but reported a failure in the body
    #[error("{provider} rejected the request: {message}")]
    UpstreamRejected {
        provider: &'static str,
        message: String,
    },

    /// The provider body was not the JSON we expected
    #[error("Invalid response from {provider}: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    /// The inbound request body could not be read
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

/// Machine-readable error codes sent to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Configuration,
    UpstreamUnreachable,
    UpstreamTimeout,
    UpstreamStatus,
    UpstreamRejected,
    UpstreamInvalidResponse,
    InvalidRequest,
}

impl GatewayError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid request error
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Classify a reqwest failure raised while sending a provider request
    pub fn transport(provider: &'static str, err: &reqwest::Error) -> Self {
        Self::Transport {
            provider,
            message: err.to_string(),
            timed_out: err.is_timeout(),
        }
    }

    /// Create a decode error for a provider body
    pub fn decode<S: Into<String>>(provider: &'static str, message: S) -> Self {
        Self::Decode {
            provider,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::Config { .. } => ErrorCode::Configuration,
            GatewayError::Transport {
                timed_out: true, ..
            } => ErrorCode::UpstreamTimeout,
            GatewayError::Transport { .. } => ErrorCode::UpstreamUnreachable,
            GatewayError::UpstreamStatus { .. } => ErrorCode::UpstreamStatus,
            GatewayError::UpstreamRejected { .. } => ErrorCode::UpstreamRejected,
            GatewayError::Decode { .. } => ErrorCode::UpstreamInvalidResponse,
            GatewayError::InvalidRequest { .. } => ErrorCode::InvalidRequest,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Transport {
                timed_out: true, ..
            } => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Transport { .. }
            | GatewayError::UpstreamStatus { .. }
            | GatewayError::UpstreamRejected { .. }
            | GatewayError::Decode { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Name of the provider involved, if any
    #[must_use]
    pub fn provider(&self) -> Option<&'static str> {
        match self {
            GatewayError::Transport { provider, .. }
            | GatewayError::UpstreamStatus { provider, .. }
            | GatewayError::UpstreamRejected { provider, .. }
            | GatewayError::Decode { provider, .. } => Some(*provider),
            GatewayError::Config { .. } | GatewayError::InvalidRequest { .. } => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    code: ErrorCode,
    message: String,
    provider: Option<&'a str>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = ?self.code(), "{self}");
        } else {
            tracing::warn!(code = ?self.code(), "{self}");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code(),
                message: self.to_string(),
                provider: self.provider(),
            },
        };
        (status, Json(body)).into_response()
    }
}
