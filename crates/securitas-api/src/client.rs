// Alarm client façade
//
// Composes the executor, session store, and device identity into the
// public operations. Every operation except `authenticate` requires an
// installed session and fails with UNAUTHORIZED before dispatch otherwise.
//
// Business outcomes (login rejected, command refused by the panel) come
// back as `Ok` values with `success == false`; only transport, protocol,
// and guard failures are `Err`.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::Local;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, warn};
use url::Url;

use crate::auth::{ApiFlavor, Credentials};
use crate::error::{Error, ErrorKind, NormalizedError};
use crate::executor::{CALLER_ID, LANGUAGE, RequestExecutor, request_id};
use crate::identity::{DEFAULT_COUNTRY, DeviceIdentity};
use crate::models::{
    AlarmStatus, ArmMode, AuthOutcome, CommandAck, CommandResult, DisarmMode, Installation,
    InstallationList, LoginToken,
};
use crate::operations::{
    ARM_PANEL, DISARM_PANEL, LIST_INSTALLATIONS, LOGIN, Operation, OperationSpec, STATUS,
};
use crate::session::{Session, SessionStore};
use crate::transport::TransportConfig;

/// Default remote endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.securitasdirect.es/api";

/// Settings for constructing an [`AlarmClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Default country tag; a login may override it per call.
    pub country: String,
    pub flavor: ApiFlavor,
    pub transport: TransportConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            country: DEFAULT_COUNTRY.into(),
            flavor: ApiFlavor::default(),
            transport: TransportConfig::default(),
        }
    }
}

/// Client for one account against one endpoint.
///
/// Owns its session and device identity; independent instances never
/// share state.
pub struct AlarmClient {
    executor: RequestExecutor,
    session: SessionStore,
    credentials: ArcSwapOption<Credentials>,
    selected_installation: ArcSwapOption<String>,
    device: DeviceIdentity,
    country: String,
}

impl AlarmClient {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&config.base_url)?;
        let executor = RequestExecutor::new(base_url, config.flavor, &config.transport)?;
        Ok(Self::with_executor(executor, config.country))
    }

    /// Build around an existing executor (e.g. one wrapping a custom client).
    pub fn with_executor(executor: RequestExecutor, country: impl Into<String>) -> Self {
        let country = country.into();
        Self {
            executor,
            session: SessionStore::new(),
            credentials: ArcSwapOption::empty(),
            selected_installation: ArcSwapOption::empty(),
            device: DeviceIdentity::generate(Some(&country)),
            country,
        }
    }

    pub fn device(&self) -> &DeviceIdentity {
        &self.device
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Log in and install a fresh session.
    ///
    /// Whatever session existed before is discarded: replaced on success,
    /// cleared on any failure. A rejected login is `Ok` with
    /// `success == false`; transport and protocol failures are `Err`.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AuthOutcome, Error> {
        self.credentials.store(Some(Arc::new(credentials.clone())));

        let country = credentials
            .country
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(self.country.as_str())
            .to_owned();

        let op = Operation::new(&LOGIN, self.login_variables(credentials, &country));
        debug!(user = %credentials.username, %country, "authenticating");

        let payload = match self.executor.execute_anonymous(&op).await {
            Ok(payload) => payload,
            Err(err) => {
                self.session.clear();
                warn!(error = %err, "login request failed");
                return Err(err);
            }
        };

        let token = result_field(&payload, self.executor.flavor(), &LOGIN)
            .and_then(|v| serde_json::from_value::<LoginToken>(v.clone()).ok());

        let Some(token) = token else {
            self.session.clear();
            warn!("login response missing {}", LOGIN.field);
            return Ok(AuthOutcome::rejected(format!(
                "Invalid response from server. Response: {payload}"
            )));
        };

        let Some(hash) = token.hash.filter(|h| !h.is_empty()) else {
            self.session.clear();
            let message = token
                .msg
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Authentication failed".into());
            debug!(res = ?token.res, "login rejected");
            return Ok(AuthOutcome::rejected(message));
        };

        let refresh_token = token.refresh_token;
        self.session.install(Session::issue(
            credentials.username.clone(),
            country,
            hash.clone(),
            refresh_token.clone(),
        ));

        Ok(AuthOutcome {
            success: true,
            message: token
                .msg
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Authentication successful".into()),
            hash: Some(hash),
            refresh_token,
        })
    }

    fn login_variables(&self, credentials: &Credentials, country: &str) -> Value {
        let device = &self.device;
        json!({
            "user": credentials.username,
            "password": credentials.password.expose_secret(),
            "id": request_id(&credentials.username, &Local::now()),
            "country": country,
            "lang": LANGUAGE,
            "callby": CALLER_ID,
            "idDevice": device.device_id,
            "idDeviceIndigitall": device.push_id,
            "deviceType": device.device_type,
            "deviceVersion": device.version,
            "deviceResolution": device.resolution,
            "deviceName": device.name,
            "deviceBrand": device.brand,
            "deviceOsVersion": device.os_version,
            "uuid": device.installation_uuid,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Option<Arc<Session>> {
        self.session.current()
    }

    /// Log in again with the credentials from the last `authenticate`.
    ///
    /// Returns `false` without any remote call if none were stored.
    pub async fn refresh_session(&self) -> bool {
        let Some(credentials) = self.credentials.load_full() else {
            debug!("no stored credentials, skipping refresh");
            return false;
        };

        match self.authenticate(&credentials).await {
            Ok(outcome) => outcome.success,
            Err(err) => {
                debug!(error = %err, "session refresh failed");
                false
            }
        }
    }

    /// Drop the session, stored credentials, and selected installation.
    pub fn logout(&self) {
        self.session.clear();
        self.credentials.store(None);
        self.selected_installation.store(None);
        info!("logged out");
    }

    // ── Installation selection ───────────────────────────────────────

    /// Remember one installation id for later calls.
    pub fn select_installation(&self, numinst: impl Into<String>) {
        self.selected_installation
            .store(Some(Arc::new(numinst.into())));
    }

    pub fn selected_installation(&self) -> Option<String> {
        self.selected_installation
            .load_full()
            .map(|id| id.as_ref().clone())
    }

    // ── Guarded operations ───────────────────────────────────────────

    fn require_session(&self) -> Result<(), Error> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(NormalizedError::unauthorized().into())
        }
    }

    /// List every installation on the account.
    pub async fn installations(&self) -> Result<Vec<Installation>, Error> {
        self.require_session()?;
        let op = Operation::bare(&LIST_INSTALLATIONS);
        let payload = self.executor.execute(&op, &self.session).await?;
        let list: InstallationList = self.decode(&LIST_INSTALLATIONS, &payload)?;
        Ok(list.installations)
    }

    /// Current alarm status of one installation.
    pub async fn status(&self, numinst: &str) -> Result<AlarmStatus, Error> {
        self.require_session()?;
        let op = Operation::new(&STATUS, json!({ "numinst": numinst }));
        let payload = self.executor.execute(&op, &self.session).await?;
        self.decode(&STATUS, &payload)
    }

    /// Arm the panel. `success` is true only on an exact `"OK"` ack.
    pub async fn arm(
        &self,
        numinst: &str,
        panel: &str,
        mode: ArmMode,
        current_status: &str,
    ) -> Result<CommandResult, Error> {
        self.require_session()?;
        let op = Operation::new(
            &ARM_PANEL,
            json!({
                "numinst": numinst,
                "request": mode.as_request(),
                "panel": panel,
                "currentStatus": current_status,
            }),
        );
        let payload = self.executor.execute(&op, &self.session).await?;
        Ok(self.acknowledgement(&ARM_PANEL, &payload))
    }

    /// Disarm the panel. Same success contract as [`arm`](Self::arm).
    pub async fn disarm(
        &self,
        numinst: &str,
        panel: &str,
        mode: DisarmMode,
    ) -> Result<CommandResult, Error> {
        self.require_session()?;
        let op = Operation::new(
            &DISARM_PANEL,
            json!({
                "numinst": numinst,
                "request": mode.as_request(),
                "panel": panel,
            }),
        );
        let payload = self.executor.execute(&op, &self.session).await?;
        Ok(self.acknowledgement(&DISARM_PANEL, &payload))
    }

    // ── Decoding ─────────────────────────────────────────────────────

    fn decode<T: DeserializeOwned>(
        &self,
        spec: &OperationSpec,
        payload: &Value,
    ) -> Result<T, Error> {
        let field = result_field(payload, self.executor.flavor(), spec)
            .ok_or_else(|| malformed(format!("response is missing `{}`", spec.field)))?;
        serde_json::from_value(field.clone())
            .map_err(|e| malformed(format!("unexpected `{}` shape: {e}", spec.field)).into())
    }

    /// A missing or unreadable ack is a refused command, not an error.
    fn acknowledgement(&self, spec: &OperationSpec, payload: &Value) -> CommandResult {
        let ack = result_field(payload, self.executor.flavor(), spec)
            .and_then(|v| serde_json::from_value::<CommandAck>(v.clone()).ok())
            .unwrap_or_default();
        let result = CommandResult::from(ack);
        debug!(
            operation = spec.name,
            success = result.success,
            reference_id = ?result.reference_id,
            "command acknowledged"
        );
        result
    }
}

/// Locate an operation's result inside a payload: `data.<field>` for
/// GraphQL; `<field>` for REST, or the payload itself when it carries one
/// of the operation's result keys.
fn result_field<'a>(
    payload: &'a Value,
    flavor: ApiFlavor,
    spec: &OperationSpec,
) -> Option<&'a Value> {
    let found = match flavor {
        ApiFlavor::GraphQl => payload.get("data").and_then(|data| data.get(spec.field)),
        ApiFlavor::Rest => payload.get(spec.field).or_else(|| {
            spec.keys
                .iter()
                .any(|key| payload.get(key).is_some())
                .then_some(payload)
        }),
    };
    found.filter(|v| !v.is_null())
}

fn malformed(message: String) -> NormalizedError {
    NormalizedError::new(ErrorKind::ProtocolError, message, 0)
}
