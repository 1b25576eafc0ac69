//! Login / logout handlers.

use dialoguer::{Input, Password};

use securitas_api::{AlarmClient, Credentials};
use securitas_config::{self as config, Config};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::Printer;

use super::util;

// ── Prompts ─────────────────────────────────────────────────────────

fn prompt_username() -> Result<String, CliError> {
    if !util::interactive() {
        return Err(CliError::NoCredentials {
            missing: "username".into(),
        });
    }
    Input::new()
        .with_prompt("Username")
        .interact_text()
        .map_err(util::prompt_err)
}

fn prompt_password() -> Result<String, CliError> {
    if !util::interactive() {
        return Err(CliError::NoCredentials {
            missing: "password".into(),
        });
    }
    Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(util::prompt_err)
}

// ── Handlers ────────────────────────────────────────────────────────

/// Authenticate, prompting for anything missing, and store the
/// credentials on success.
pub async fn login(client: &AlarmClient, global: &GlobalOpts) -> Result<(), CliError> {
    let stored = config::load_config_or_default();
    let cfg = util::merge_flags(global, stored.clone());

    let username = match cfg.username.filter(|u| !u.is_empty()) {
        Some(username) => username,
        None => prompt_username()?,
    };
    let password = match cfg.password.filter(|p| !p.is_empty()) {
        Some(password) => password,
        None => prompt_password()?,
    };

    let credentials = Credentials::new(username.clone(), password.clone());
    let outcome = client.authenticate(&credentials).await?;
    if !outcome.success {
        return Err(CliError::AuthFailed {
            message: outcome.message,
        });
    }

    config::save_config(&Config {
        username: Some(username),
        password: Some(password),
        installation_id: stored.installation_id,
    })?;

    Printer::new(global).notice(&outcome.message, true);
    Ok(())
}

/// Drop the session and wipe the config file.
pub fn logout(client: &AlarmClient, global: &GlobalOpts) -> Result<(), CliError> {
    client.logout();
    config::clear_config()?;
    Printer::new(global).notice("Logged out", true);
    Ok(())
}
