// Remote data shapes and operation results.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// A registered alarm site belonging to the account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Installation {
    /// Installation number, used as the external id in every call.
    #[serde(deserialize_with = "nullable")]
    pub numinst: String,
    #[serde(deserialize_with = "nullable")]
    pub alias: String,
    /// Panel identifier required by arm/disarm.
    #[serde(deserialize_with = "nullable")]
    pub panel: String,
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub installation_type: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub surname: String,
    #[serde(deserialize_with = "nullable")]
    pub address: String,
    #[serde(deserialize_with = "nullable")]
    pub city: String,
    #[serde(deserialize_with = "nullable")]
    pub postcode: String,
    #[serde(deserialize_with = "nullable")]
    pub province: String,
    #[serde(deserialize_with = "nullable")]
    pub email: String,
    #[serde(deserialize_with = "nullable")]
    pub phone: String,
}

impl Installation {
    /// Alias if set, otherwise the owner name.
    pub fn display_name(&self) -> &str {
        if self.alias.is_empty() {
            &self.name
        } else {
            &self.alias
        }
    }
}

/// A device reported as deviating from the panel state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusException {
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(deserialize_with = "nullable")]
    pub device_type: String,
    #[serde(deserialize_with = "nullable")]
    pub alias: String,
}

/// Current alarm status of an installation, uninterpreted.
///
/// `status` is mandatory; a payload without it is not a status.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmStatus {
    pub status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub timestamp_update: String,
    #[serde(default, deserialize_with = "nullable")]
    pub exceptions: Vec<StatusException>,
}

/// Outcome of an arm/disarm command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    /// Handle for correlating the asynchronous command outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
}

/// Outcome of a login attempt. A rejected login is a normal result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: String,
    pub hash: Option<String>,
    pub refresh_token: Option<String>,
}

impl AuthOutcome {
    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            hash: None,
            refresh_token: None,
        }
    }
}

/// Arm request tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
pub enum ArmMode {
    #[default]
    #[strum(to_string = "ARM1", serialize = "FULL")]
    Full,
    #[strum(to_string = "ARMNIGHT", serialize = "NIGHT")]
    Night,
    #[strum(to_string = "ARMDAY", serialize = "PARTIAL")]
    Partial,
}

impl ArmMode {
    /// The token sent to the remote side.
    pub fn as_request(self) -> &'static str {
        self.into()
    }
}

/// Disarm request tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
pub enum DisarmMode {
    #[default]
    #[strum(to_string = "DARM1", serialize = "FULL")]
    Full,
}

impl DisarmMode {
    pub fn as_request(self) -> &'static str {
        self.into()
    }
}

// ── Wire payloads ────────────────────────────────────────────────────

/// Treat an explicit `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct LoginToken {
    pub res: Option<String>,
    pub msg: Option<String>,
    pub hash: Option<String>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InstallationList {
    pub installations: Vec<Installation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct CommandAck {
    pub res: Option<String>,
    pub msg: Option<String>,
    pub reference_id: Option<String>,
}

impl From<CommandAck> for CommandResult {
    fn from(ack: CommandAck) -> Self {
        Self {
            success: ack.res.as_deref() == Some("OK"),
            message: ack.msg.unwrap_or_default(),
            reference_id: ack.reference_id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn arm_mode_tokens() {
        assert_eq!(ArmMode::Full.as_request(), "ARM1");
        assert_eq!(ArmMode::Night.as_request(), "ARMNIGHT");
        assert_eq!(ArmMode::Partial.as_request(), "ARMDAY");
        assert_eq!("full".parse::<ArmMode>().unwrap(), ArmMode::Full);
        assert_eq!("ARMNIGHT".parse::<ArmMode>().unwrap(), ArmMode::Night);
        assert_eq!(DisarmMode::default().as_request(), "DARM1");
    }

    #[test]
    fn ack_requires_exact_ok() {
        let ok: CommandAck =
            serde_json::from_value(json!({"res": "OK", "msg": "Armed", "referenceId": "R1"}))
                .unwrap();
        let result = CommandResult::from(ok);
        assert!(result.success);
        assert_eq!(result.reference_id.as_deref(), Some("R1"));

        let lower: CommandAck = serde_json::from_value(json!({"res": "ok"})).unwrap();
        let result = CommandResult::from(lower);
        assert!(!result.success);
        assert_eq!(result.message, "");
    }

    #[test]
    fn installation_tolerates_missing_fields() {
        let inst: Installation =
            serde_json::from_value(json!({"numinst": "123", "panel": "SDVFAST"})).unwrap();
        assert_eq!(inst.numinst, "123");
        assert_eq!(inst.alias, "");
        assert_eq!(inst.display_name(), "");

        let nulls: Installation =
            serde_json::from_value(json!({"numinst": "9", "alias": null, "name": "Home"}))
                .unwrap();
        assert_eq!(nulls.display_name(), "Home");
    }

    #[test]
    fn status_decodes_exceptions() {
        let status: AlarmStatus = serde_json::from_value(json!({
            "status": "0",
            "timestampUpdate": "2024-01-01T10:00:00",
            "exceptions": [{"status": "OPEN", "deviceType": "MG", "alias": "Front door"}]
        }))
        .unwrap();
        assert_eq!(status.exceptions.len(), 1);
        assert_eq!(status.exceptions[0].device_type, "MG");

        let bare: AlarmStatus = serde_json::from_value(json!({"status": "1"})).unwrap();
        assert_eq!(bare.timestamp_update, "");
        assert!(bare.exceptions.is_empty());
    }

    #[test]
    fn status_without_status_is_rejected() {
        assert!(serde_json::from_value::<AlarmStatus>(json!({"error": "session gone"})).is_err());
        assert!(serde_json::from_value::<AlarmStatus>(json!({"status": null})).is_err());
    }

    #[test]
    fn installation_list_requires_installations() {
        assert!(serde_json::from_value::<InstallationList>(json!({"unexpected": 1})).is_err());
        let empty: InstallationList =
            serde_json::from_value(json!({"installations": []})).unwrap();
        assert!(empty.installations.is_empty());
    }
}
