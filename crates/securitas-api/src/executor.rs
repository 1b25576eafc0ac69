// Request executor
//
// Composes an `Operation` into the configured wire shape, attaches the
// per-request `auth` header when a session is installed, dispatches it,
// and routes every failure through the normalizer. Successful payloads are
// returned untouched; decoding is left to the caller.

use std::fmt;

use chrono::{DateTime, Local, TimeZone};
use reqwest::header::HeaderValue;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::ApiFlavor;
use crate::error::{Error, ErrorKind, NormalizedError, RawFailure, protocol_errors};
use crate::operations::{Operation, Verb};
use crate::session::{Session, SessionStore};
use crate::transport::TransportConfig;

/// Name of the header carrying the session object.
pub const AUTH_HEADER: &str = "auth";

/// Header naming the GraphQL operation.
pub const OPERATION_HEADER: &str = "X-APOLLO-OPERATION-NAME";

/// Fixed caller identifier expected by the remote side.
pub const CALLER_ID: &str = "OWA_10";

pub const LANGUAGE: &str = "en";

const REQUEST_ID_PREFIX: &str = "OWA_______________";
const REQUEST_ID_SEPARATOR: &str = "_______________";

/// Per-request identifier: prefix, username, separator, `YYYYMMDDHHmmss`.
pub fn request_id<Tz>(username: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!(
        "{REQUEST_ID_PREFIX}{username}{REQUEST_ID_SEPARATOR}{}",
        at.format("%Y%m%d%H%M%S")
    )
}

/// The JSON object sent in the `auth` header of authenticated calls.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthHeader<'a> {
    pub login_timestamp: i64,
    pub user: &'a str,
    pub id: String,
    pub country: &'a str,
    pub lang: &'a str,
    pub callby: &'a str,
    pub hash: &'a str,
}

impl<'a> AuthHeader<'a> {
    pub fn for_session<Tz>(session: &'a Session, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            login_timestamp: session.issued_at_epoch_millis,
            user: &session.username,
            id: request_id(&session.username, now),
            country: &session.country,
            lang: LANGUAGE,
            callby: CALLER_ID,
            hash: session.auth_token.expose_secret(),
        }
    }

    fn to_header_value(&self) -> Result<HeaderValue, Error> {
        let json = serde_json::to_string(self).map_err(|e| Error::Client {
            message: format!("failed to encode auth header: {e}"),
        })?;
        let mut value = HeaderValue::from_str(&json).map_err(|e| Error::Client {
            message: format!("auth header is not a valid header value: {e}"),
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a> {
    operation_name: &'a str,
    variables: &'a Value,
    query: &'a str,
}

/// Builds and dispatches calls against one base endpoint.
pub struct RequestExecutor {
    http: reqwest::Client,
    base_url: Url,
    flavor: ApiFlavor,
}

impl RequestExecutor {
    pub fn new(base_url: Url, flavor: ApiFlavor, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, flavor))
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, flavor: ApiFlavor) -> Self {
        Self {
            http,
            base_url,
            flavor,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn flavor(&self) -> ApiFlavor {
        self.flavor
    }

    /// Dispatch `op`, authenticating with whatever session `store` holds.
    pub async fn execute(&self, op: &Operation, store: &SessionStore) -> Result<Value, Error> {
        let session = store.current();
        self.dispatch(op, session.as_deref()).await
    }

    /// Dispatch `op` without an `auth` header, regardless of any session.
    pub async fn execute_anonymous(&self, op: &Operation) -> Result<Value, Error> {
        self.dispatch(op, None).await
    }

    /// `{base}{path}` for the REST shape.
    fn rest_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    fn compose(&self, op: &Operation) -> Result<reqwest::RequestBuilder, Error> {
        let builder = match self.flavor {
            ApiFlavor::GraphQl => {
                let body = GraphQlRequest {
                    operation_name: op.name(),
                    variables: op.variables(),
                    query: op.spec().query,
                };
                self.http
                    .post(self.base_url.clone())
                    .header(OPERATION_HEADER, op.name())
                    .json(&body)
            }
            ApiFlavor::Rest => {
                let url = self.rest_url(op.spec().path)?;
                match op.spec().verb {
                    Verb::Get => self.http.get(url),
                    Verb::Post => self.http.post(url).json(op.variables()),
                }
            }
        };
        Ok(builder)
    }

    async fn dispatch(&self, op: &Operation, session: Option<&Session>) -> Result<Value, Error> {
        let mut builder = self.compose(op)?;

        if let Some(session) = session {
            let now = Local::now();
            let header = AuthHeader::for_session(session, &now);
            trace!(id = %header.id, "attaching auth header");
            builder = builder.header(AUTH_HEADER, header.to_header_value()?);
        }

        debug!(
            operation = op.name(),
            flavor = %self.flavor,
            authenticated = session.is_some(),
            "dispatching"
        );

        let resp = builder
            .send()
            .await
            .map_err(|e| Error::from_failure(RawFailure::from_reqwest(&e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::from_failure(RawFailure::from_reqwest(&e)))?;

        if !(200..300).contains(&status) {
            debug!(operation = op.name(), status, "remote returned error status");
            return Err(Error::from_failure(RawFailure::from_response(status, &body)));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        let payload: Value = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            NormalizedError::new(
                ErrorKind::ProtocolError,
                format!("invalid JSON payload: {e} (body preview: {preview:?})"),
                status,
            )
        })?;

        if let Some(errors) = protocol_errors(&payload).filter(|errors| !errors.is_empty()) {
            return Err(Error::from_failure(RawFailure::Protocol {
                status: Some(status),
                errors,
            }));
        }

        Ok(payload)
    }
}
