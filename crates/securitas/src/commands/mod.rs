//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod installations;
pub mod panel;
pub mod status;
pub mod util;

use securitas_api::AlarmClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a remote-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &AlarmClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login => auth::login(client, global).await,
        Command::Logout => auth::logout(client, global),
        Command::Installations => installations::handle(client, global).await,
        Command::Status(args) => status::handle(client, args, global).await,
        Command::Arm(args) => panel::arm(client, args, global).await,
        Command::Disarm(args) => panel::disarm(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
