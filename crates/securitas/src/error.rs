//! CLI error types with miette diagnostics.
//!
//! Maps `securitas_api::Error` kinds into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use securitas_api::ErrorKind;
use securitas_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

/// Message the normalizer attaches to timeouts.
const TIMEOUT_MESSAGE: &str = "Request timeout";

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the alarm service: {message}")]
    #[diagnostic(
        code(securitas::connection_failed),
        help(
            "Check your network connection and the --endpoint value.\n\
             Try: securitas -vv installations"
        )
    )]
    ConnectionFailed { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(securitas::timeout),
        help("Increase timeout with --timeout or retry later.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(securitas::auth_failed),
        help(
            "Verify your username and password.\n\
             Run: securitas login"
        )
    )]
    AuthFailed { message: String },

    #[error("No {missing} configured")]
    #[diagnostic(
        code(securitas::no_credentials),
        help(
            "Store credentials with: securitas login\n\
             Or set SECURITAS_USERNAME and SECURITAS_PASSWORD."
        )
    )]
    NoCredentials { missing: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(securitas::not_found),
        help("Run: securitas {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Not found: {message}")]
    #[diagnostic(
        code(securitas::remote_not_found),
        help("Run: securitas installations to see valid installation numbers")
    )]
    RemoteNotFound { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error ({code}, HTTP {status}): {message}")]
    #[diagnostic(code(securitas::api_error))]
    ApiError {
        code: String,
        message: String,
        status: u16,
    },

    #[error("Panel refused to {action}: {message}")]
    #[diagnostic(
        code(securitas::refused),
        help("Check the panel state with: securitas status")
    )]
    Refused { action: String, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(securitas::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(securitas::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(securitas::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. }
            | Self::NoCredentials { .. }
            | Self::Config(ConfigError::NoCredentials { .. }) => exit_code::AUTH,
            Self::NotFound { .. } | Self::RemoteNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── securitas_api::Error → CliError mapping ──────────────────────────

impl From<securitas_api::Error> for CliError {
    fn from(err: securitas_api::Error) -> Self {
        match err {
            securitas_api::Error::Api(normalized) => {
                let message = normalized.message().to_owned();
                match normalized.kind() {
                    ErrorKind::Unauthorized | ErrorKind::InvalidCredentials => {
                        CliError::AuthFailed { message }
                    }
                    ErrorKind::NotFound => CliError::RemoteNotFound { message },
                    ErrorKind::NetworkError if message == TIMEOUT_MESSAGE => CliError::Timeout,
                    ErrorKind::NetworkError => CliError::ConnectionFailed { message },
                    ErrorKind::InvalidRequest | ErrorKind::ServerError | ErrorKind::ProtocolError => {
                        CliError::ApiError {
                            code: normalized.code().to_owned(),
                            message,
                            status: normalized.status_code(),
                        }
                    }
                }
            }

            securitas_api::Error::Unrecognized(raw) => CliError::ApiError {
                code: "unrecognized".into(),
                message: raw.to_string(),
                status: 0,
            },

            securitas_api::Error::InvalidUrl(e) => CliError::Validation {
                field: "endpoint".into(),
                reason: e.to_string(),
            },

            securitas_api::Error::Client { message } => CliError::ConnectionFailed { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use securitas_api::NormalizedError;

    use super::*;

    fn api(kind: ErrorKind, message: &str, status: u16) -> CliError {
        securitas_api::Error::from(NormalizedError::new(kind, message, status)).into()
    }

    #[test]
    fn auth_kinds_exit_with_auth_code() {
        assert_eq!(
            CliError::from(securitas_api::Error::from(NormalizedError::unauthorized())).exit_code(),
            exit_code::AUTH
        );
        assert_eq!(
            api(ErrorKind::InvalidCredentials, "denied", 401).exit_code(),
            exit_code::AUTH
        );
    }

    #[test]
    fn network_errors_split_on_timeout() {
        assert!(matches!(
            api(ErrorKind::NetworkError, "Request timeout", 0),
            CliError::Timeout
        ));
        let err = api(ErrorKind::NetworkError, "connection refused", 0);
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn remote_failures_keep_code_and_status() {
        let err = api(ErrorKind::ServerError, "maintenance", 503);
        match &err {
            CliError::ApiError {
                code,
                message,
                status,
            } => {
                assert_eq!(code, "SERVER_ERROR");
                assert_eq!(message, "maintenance");
                assert_eq!(*status, 503);
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
        assert_eq!(err.exit_code(), exit_code::GENERAL);
        assert_eq!(
            api(ErrorKind::NotFound, "gone", 404).exit_code(),
            exit_code::NOT_FOUND
        );
    }
}
