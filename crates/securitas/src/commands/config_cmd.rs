//! Config subcommand handlers.

use serde::Serialize;

use securitas_config::{self as config, Config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::Printer;

use super::util;

/// What `config show` prints. The password itself never leaves the file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigView {
    path: String,
    username: Option<String>,
    password_stored: bool,
    installation_id: Option<String>,
}

impl ConfigView {
    fn new(path: String, cfg: &Config) -> Self {
        Self {
            path,
            username: cfg.username.clone(),
            password_stored: cfg.password.as_deref().is_some_and(|p| !p.is_empty()),
            installation_id: cfg.installation_id.clone(),
        }
    }
}

fn detail(view: &ConfigView) -> String {
    let not_set = || "Not set".to_owned();
    format!(
        "Config:          {}\nUsername:        {}\nPassword:        {}\nInstallation ID: {}",
        view.path,
        view.username.clone().unwrap_or_else(not_set),
        if view.password_stored { "stored" } else { "Not set" },
        view.installation_id.clone().unwrap_or_else(not_set),
    )
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path();

    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let view = ConfigView::new(path.display().to_string(), &cfg);
            Printer::new(global).item(&view, |v, _| detail(v), |v| v.path.clone());
            Ok(())
        }

        ConfigCommand::Clear => {
            if !util::confirm("Clear stored credentials and selection?", global, "config clear")? {
                return Ok(());
            }
            config::clear_config()?;
            Printer::new(global).notice("Config cleared", true);
            Ok(())
        }

        ConfigCommand::Path => {
            Printer::new(global).value(&path.display().to_string());
            Ok(())
        }
    }
}
