// Error taxonomy and post-dispatch normalization.
//
// Transport failures are captured as a `RawFailure` at the reqwest
// boundary, then `normalize` maps them onto the closed `ErrorKind` set.
// The mapping is a pure function so every operation shares one table.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use thiserror::Error;

// ── Kinds ────────────────────────────────────────────────────────────

/// The closed set of error kinds surfaced by the client.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Guarded operation called without an active session.
    Unauthorized,
    /// Remote side answered HTTP 401.
    InvalidCredentials,
    /// Remote side answered HTTP 400.
    InvalidRequest,
    /// Remote side answered HTTP 404.
    NotFound,
    /// Any other non-2xx answer.
    ServerError,
    /// Timeout, connection refused, DNS failure, etc.
    NetworkError,
    /// Structured GraphQL errors, or a payload with an unexpected shape.
    ProtocolError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

// ── Normalized error ─────────────────────────────────────────────────

/// The uniform error shape every failed operation resolves to.
///
/// `code` is normally the kind's name. For protocol errors whose payload
/// carries `extensions.code`, `code` is that remote code and `kind` stays
/// [`ErrorKind::ProtocolError`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{code}: {message}")]
pub struct NormalizedError {
    kind: ErrorKind,
    code: String,
    message: String,
    #[serde(rename = "statusCode")]
    status_code: u16,
}

impl NormalizedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            kind,
            code: kind.as_str().to_owned(),
            message: message.into(),
            status_code,
        }
    }

    /// Override the exposed code while keeping the kind.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// The guard failure raised by every session-bound operation.
    pub fn unauthorized() -> Self {
        Self::new(
            ErrorKind::Unauthorized,
            "Not authenticated. Please authenticate first.",
            401,
        )
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }
}

// ── Raw failures ─────────────────────────────────────────────────────

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct RemoteError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

impl RemoteError {
    /// The `extensions.code` value, when the remote side supplies one.
    pub fn code(&self) -> Option<&str> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(serde_json::Value::as_str)
            .filter(|code| !code.is_empty())
    }
}

/// A transport or protocol failure, before normalization.
///
/// Built once at the transport boundary so the normalizer never has to
/// probe an error for optional fields.
#[derive(Debug, Clone, PartialEq)]
pub enum RawFailure {
    /// The payload carried a structured list of remote errors.
    Protocol {
        status: Option<u16>,
        errors: Vec<RemoteError>,
    },
    /// The remote side answered with an HTTP status.
    Status { status: u16, message: Option<String> },
    /// The bounded transport timeout elapsed.
    Timeout,
    /// Any other transport failure.
    Transport { message: String },
}

impl RawFailure {
    /// Classify a reqwest error.
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        if let Some(status) = err.status() {
            return Self::Status {
                status: status.as_u16(),
                message: Some(err.to_string()),
            };
        }
        Self::Transport {
            message: err.to_string(),
        }
    }

    /// Classify a non-2xx response from its status and raw body.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

        if let Some(errors) = parsed.as_ref().and_then(protocol_errors) {
            return Self::Protocol {
                status: Some(status),
                errors,
            };
        }

        let remote_message = parsed
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(serde_json::Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_owned);

        Self::Status {
            status,
            message: remote_message
                .or_else(|| Some(format!("Request failed with status code {status}"))),
        }
    }
}

/// Extract a GraphQL `errors` array from a payload, if it has one.
pub(crate) fn protocol_errors(payload: &serde_json::Value) -> Option<Vec<RemoteError>> {
    let list = payload.get("errors")?.as_array()?;
    Some(
        list.iter()
            .map(|entry| serde_json::from_value(entry.clone()).unwrap_or_default())
            .collect(),
    )
}

impl fmt::Display for RawFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protocol { status, errors } => {
                write!(f, "{} remote error(s)", errors.len())?;
                if let Some(status) = status {
                    write!(f, " (HTTP {status})")?;
                }
                Ok(())
            }
            Self::Status { status, message } => match message {
                Some(message) => write!(f, "HTTP {status}: {message}"),
                None => write!(f, "HTTP {status}"),
            },
            Self::Timeout => f.write_str("timeout"),
            Self::Transport { message } if message.is_empty() => {
                f.write_str("transport failure without detail")
            }
            Self::Transport { message } => f.write_str(message),
        }
    }
}

// ── Normalizer ───────────────────────────────────────────────────────

/// Map a raw failure onto a [`NormalizedError`]. First matching rule wins:
///
/// 1. remote error list → `PROTOCOL_ERROR`
/// 2. non-2xx status → 401/400/404 specific kinds, else `SERVER_ERROR`
/// 3. timeout → `NETWORK_ERROR` "Request timeout"
/// 4. anything else with a message → `NETWORK_ERROR`
///
/// A failure matching none of these is handed back unchanged.
pub fn normalize(failure: RawFailure) -> Result<NormalizedError, RawFailure> {
    match failure {
        RawFailure::Protocol { status, errors } => {
            let first = errors.first();
            let message = first
                .and_then(|e| e.message.as_deref())
                .filter(|m| !m.is_empty())
                .unwrap_or("GraphQL error occurred");
            let err = NormalizedError::new(ErrorKind::ProtocolError, message, status.unwrap_or(0));
            Ok(match first.and_then(RemoteError::code) {
                Some(code) => err.with_code(code),
                None => err,
            })
        }

        RawFailure::Status { status, message } if !(200..300).contains(&status) => {
            let kind = match status {
                401 => ErrorKind::InvalidCredentials,
                400 => ErrorKind::InvalidRequest,
                404 => ErrorKind::NotFound,
                _ => ErrorKind::ServerError,
            };
            let message = message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Unknown error".into());
            Ok(NormalizedError::new(kind, message, status))
        }

        RawFailure::Timeout => Ok(NormalizedError::new(
            ErrorKind::NetworkError,
            "Request timeout",
            0,
        )),

        RawFailure::Status {
            message: Some(message),
            ..
        }
        | RawFailure::Transport { message }
            if !message.is_empty() =>
        {
            Ok(NormalizedError::new(ErrorKind::NetworkError, message, 0))
        }

        other => Err(other),
    }
}

// ── Crate error ──────────────────────────────────────────────────────

/// Top-level error type for the `securitas-api` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A normalized transport, protocol, or guard failure.
    #[error(transparent)]
    Api(#[from] NormalizedError),

    /// A transport failure the normalizer did not recognize.
    #[error("Unrecognized transport failure: {0}")]
    Unrecognized(RawFailure),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {message}")]
    Client { message: String },
}

impl Error {
    /// Run a raw failure through the normalizer.
    pub(crate) fn from_failure(failure: RawFailure) -> Self {
        match normalize(failure) {
            Ok(err) => Self::Api(err),
            Err(raw) => Self::Unrecognized(raw),
        }
    }

    pub fn normalized(&self) -> Option<&NormalizedError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.normalized().map(NormalizedError::kind)
    }

    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self.kind(),
            Some(ErrorKind::Unauthorized | ErrorKind::InvalidCredentials)
        )
    }

    /// Returns `true` if this is a network-level failure worth retrying.
    pub fn is_transient(&self) -> bool {
        self.kind() == Some(ErrorKind::NetworkError)
    }
}
