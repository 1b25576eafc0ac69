//! Shared helpers for command handlers.

use std::io::IsTerminal;

use dialoguer::Select;
use tracing::debug;

use securitas_api::{AlarmClient, Credentials, Installation};
use securitas_config::{self as config, Config};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Whether prompts can be shown.
pub fn interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, global: &GlobalOpts, action: &str) -> Result<bool, CliError> {
    if global.yes {
        return Ok(true);
    }
    if !interactive() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Flags win over the config file (which already carries env overrides).
pub fn merge_flags(global: &GlobalOpts, mut cfg: Config) -> Config {
    if let Some(ref username) = global.username {
        cfg.username = Some(username.clone());
    }
    if let Some(ref password) = global.password {
        cfg.password = Some(password.clone());
    }
    cfg
}

/// Log in with flag/env/file credentials. Returns the loaded config.
pub async fn sign_in(client: &AlarmClient, global: &GlobalOpts) -> Result<Config, CliError> {
    let cfg = merge_flags(global, config::load_config_or_default());
    let credentials: Credentials = config::resolve_credentials(&cfg)?;

    debug!(user = %credentials.username, "signing in");
    let outcome = client.authenticate(&credentials).await?;
    if !outcome.success {
        return Err(CliError::AuthFailed {
            message: outcome.message,
        });
    }
    Ok(cfg)
}

/// Pick the installation to act on: explicit argument, stored selection,
/// the only installation, or an interactive choice (which is persisted).
pub async fn resolve_installation_id(
    client: &AlarmClient,
    cfg: &mut Config,
    explicit: Option<String>,
) -> Result<String, CliError> {
    let id = if let Some(id) = explicit.or_else(|| cfg.installation_id.clone()) {
        id
    } else {
        let installations = client.installations().await?;
        let id = choose_installation(&installations)?;
        cfg.installation_id = Some(id.clone());
        config::save_config(&persistable(cfg))?;
        id
    };

    client.select_installation(id.clone());
    Ok(id)
}

fn choose_installation(installations: &[Installation]) -> Result<String, CliError> {
    match installations {
        [] => Err(CliError::NotFound {
            resource_type: "installation".into(),
            identifier: "(any)".into(),
            list_command: "installations".into(),
        }),
        [only] => Ok(only.numinst.clone()),
        many => {
            if !interactive() {
                return Err(CliError::Validation {
                    field: "installation".into(),
                    reason: format!(
                        "{} installations on this account; pass one explicitly",
                        many.len()
                    ),
                });
            }
            let labels: Vec<String> = many
                .iter()
                .map(|i| format!("{} ({})", i.display_name(), i.numinst))
                .collect();
            let index = Select::new()
                .with_prompt("Select installation")
                .items(&labels)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            many.get(index)
                .map(|i| i.numinst.clone())
                .ok_or_else(|| prompt_err("selection out of range"))
        }
    }
}

/// Look up an installation (for its panel id) by number.
pub async fn find_installation(
    client: &AlarmClient,
    numinst: &str,
) -> Result<Installation, CliError> {
    client
        .installations()
        .await?
        .into_iter()
        .find(|i| i.numinst == numinst)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "installation".into(),
            identifier: numinst.into(),
            list_command: "installations".into(),
        })
}

/// The config as it should be written back: flag-supplied credentials are
/// not persisted unless the file already held them.
pub fn persistable(cfg: &Config) -> Config {
    let stored = config::load_config_or_default();
    Config {
        username: stored.username,
        password: stored.password,
        installation_id: cfg.installation_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["securitas"];
        argv.extend_from_slice(args);
        argv.push("installations");
        Cli::parse_from(argv).global
    }

    #[test]
    fn flags_override_file_values() {
        let cfg = Config {
            username: Some("file-user".into()),
            password: Some("file-pass".into()),
            installation_id: Some("1".into()),
        };
        let merged = merge_flags(&global(&["--username", "flag-user"]), cfg);
        assert_eq!(merged.username.as_deref(), Some("flag-user"));
        assert_eq!(merged.password.as_deref(), Some("file-pass"));
        assert_eq!(merged.installation_id.as_deref(), Some("1"));
    }

    #[test]
    fn single_installation_is_chosen_without_prompt() {
        let only = Installation {
            numinst: "42".into(),
            ..Installation::default()
        };
        assert_eq!(choose_installation(&[only]).ok().as_deref(), Some("42"));
        assert!(matches!(
            choose_installation(&[]),
            Err(CliError::NotFound { .. })
        ));
    }
}
