//! Persisted configuration for Securitas Direct tools.
//!
//! A single JSON file holding the username, password, and last selected
//! installation, merged with `SECURITAS_*` environment overrides, and
//! translation to `securitas_api::Credentials`.

use std::fmt;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use securitas_api::Credentials;

/// File name under the home directory.
pub const CONFIG_FILE_NAME: &str = ".securitas-config.json";

/// Prefix for environment overrides (`SECURITAS_USERNAME`, ...).
pub const ENV_PREFIX: &str = "SECURITAS_";

/// Environment suffix and the file key it overrides.
const ENV_OVERRIDES: [(&str, &str); 3] = [
    ("USERNAME", "username"),
    ("PASSWORD", "password"),
    ("INSTALLATION_ID", "installationId"),
];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no {missing} configured")]
    NoCredentials { missing: &'static str },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config struct ───────────────────────────────────────────────────

/// On-disk shape: `{username?, password?, installationId?}`.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(
        default,
        deserialize_with = "text",
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,

    /// Stored in plaintext; `SECURITAS_PASSWORD` takes precedence.
    #[serde(
        default,
        deserialize_with = "text",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<String>,

    #[serde(
        default,
        rename = "installationId",
        deserialize_with = "text",
        skip_serializing_if = "Option::is_none"
    )]
    pub installation_id: Option<String>,
}

/// Accept numbers where a string is expected, e.g. `"installationId": 1234567`.
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    Ok(
        Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
            Scalar::Text(s) => s,
            Scalar::Unsigned(n) => n.to_string(),
            Scalar::Signed(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
        }),
    )
}

impl Config {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none() && self.installation_id.is_none()
    }

    pub fn has_credentials(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
            && self.password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("installation_id", &self.installation_id)
            .finish()
    }
}

// ── Config file path ────────────────────────────────────────────────

/// `$HOME/.securitas-config.json`.
pub fn config_path() -> PathBuf {
    BaseDirs::new().map_or_else(
        || home_fallback().join(CONFIG_FILE_NAME),
        |dirs| dirs.home_dir().join(CONFIG_FILE_NAME),
    )
}

fn home_fallback() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()))
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path`, then apply `SECURITAS_*` overrides.
///
/// A missing file yields the defaults. Override values are taken verbatim,
/// so a numeric password keeps its exact digits.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Json::file(path));
    let figment = ENV_OVERRIDES
        .iter()
        .fold(figment, |figment, &(suffix, key)| {
            match Env::var(&format!("{ENV_PREFIX}{suffix}")) {
                Some(value) => figment.merge(Serialized::default(key, value)),
                None => figment,
            }
        });

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|err| {
        warn!(error = %err, "ignoring unreadable config");
        Config::default()
    })
}

// ── Config saving ───────────────────────────────────────────────────

/// Write `cfg` as pretty JSON to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(path, json)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

/// Reset the canonical config file to `{}`.
pub fn clear_config() -> Result<(), ConfigError> {
    clear_config_at(&config_path())
}

pub fn clear_config_at(path: &Path) -> Result<(), ConfigError> {
    save_config_to(path, &Config::default())
}

// ── Credential resolution ───────────────────────────────────────────

/// Build login credentials from a loaded config.
///
/// Environment overrides were already merged by [`load_config_from`].
pub fn resolve_credentials(cfg: &Config) -> Result<Credentials, ConfigError> {
    let username = cfg
        .username
        .clone()
        .filter(|u| !u.is_empty())
        .ok_or(ConfigError::NoCredentials {
            missing: "username",
        })?;

    let password = cfg
        .password
        .clone()
        .filter(|p| !p.is_empty())
        .map(SecretString::from)
        .ok_or(ConfigError::NoCredentials {
            missing: "password",
        })?;

    Ok(Credentials {
        username,
        password,
        country: None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn sample() -> Config {
        Config {
            username: Some("alice".into()),
            password: Some("s3cret".into()),
            installation_id: Some("1234567".into()),
        }
    }

    /// Tests that read the environment run inside a `Jail`, which holds a
    /// global lock and restores variables afterwards.
    fn load(path: &Path) -> figment::error::Result<Config> {
        load_config_from(path).map_err(|e| e.to_string().into())
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_| {
            let cfg = load(Path::new("absent.json"))?;
            assert_eq!(cfg.installation_id, None);
            assert!(cfg.is_empty());
            Ok(())
        });
    }

    #[test]
    fn save_then_load() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join(CONFIG_FILE_NAME);

            save_config_to(&path, &sample()).unwrap();
            let raw = std::fs::read_to_string(&path).unwrap();
            assert!(raw.contains("\"installationId\": \"1234567\""));

            let loaded = load(&path)?;
            assert_eq!(loaded, sample());
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file_values() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE_NAME,
                r#"{"username": "alice", "password": "s3cret", "installationId": "1234567"}"#,
            )?;
            jail.set_env("SECURITAS_INSTALLATION_ID", "7654321");
            jail.set_env("SECURITAS_USERNAME", "bob");

            let cfg = load(Path::new(CONFIG_FILE_NAME))?;
            assert_eq!(cfg.username.as_deref(), Some("bob"));
            assert_eq!(cfg.password.as_deref(), Some("s3cret"));
            assert_eq!(cfg.installation_id.as_deref(), Some("7654321"));
            Ok(())
        });
    }

    #[test]
    fn numeric_values_stay_text() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE_NAME, r#"{"installationId": 1234567}"#)?;
            jail.set_env("SECURITAS_PASSWORD", "0123456");
            jail.set_env("SECURITAS_USERNAME", "12.50");

            let cfg = load(Path::new(CONFIG_FILE_NAME))?;
            assert_eq!(cfg.installation_id.as_deref(), Some("1234567"));
            assert_eq!(cfg.password.as_deref(), Some("0123456"));
            assert_eq!(cfg.username.as_deref(), Some("12.50"));
            assert!(cfg.has_credentials());
            Ok(())
        });
    }

    #[test]
    fn clear_writes_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        save_config_to(&path, &sample()).unwrap();
        clear_config_at(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn resolve_requires_both_fields() {
        let creds = resolve_credentials(&sample()).unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password.expose_secret(), "s3cret");

        let no_password = Config {
            password: Some(String::new()),
            ..sample()
        };
        assert!(matches!(
            resolve_credentials(&no_password),
            Err(ConfigError::NoCredentials {
                missing: "password"
            })
        ));
        assert!(!no_password.has_credentials());
        assert!(matches!(
            resolve_credentials(&Config::default()),
            Err(ConfigError::NoCredentials {
                missing: "username"
            })
        ));
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn default_is_empty() {
        assert!(Config::default().is_empty());
        assert!(!sample().is_empty());
        assert!(sample().has_credentials());
    }
}
