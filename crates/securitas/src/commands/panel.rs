//! Arm / disarm handlers.

use securitas_api::{AlarmClient, ArmMode, CommandResult, DisarmMode};

use crate::cli::{ArmArgs, GlobalOpts, TargetArgs};
use crate::error::CliError;
use crate::output::{self, Printer};

use super::util;

fn report(result: CommandResult, action: &str, global: &GlobalOpts) -> Result<(), CliError> {
    if !result.success {
        return Err(CliError::Refused {
            action: action.into(),
            message: result.message,
        });
    }

    Printer::new(global).item(&result, acknowledged, |r| {
        r.reference_id.clone().unwrap_or_default()
    });
    Ok(())
}

fn acknowledged(result: &CommandResult, color: bool) -> String {
    let message = output::paint(&result.message, true, color);
    match result.reference_id {
        Some(ref reference) => format!("{message}\nReference ID: {reference}"),
        None => message,
    }
}

pub async fn arm(client: &AlarmClient, args: ArmArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = util::sign_in(client, global).await?;
    let numinst = util::resolve_installation_id(client, &mut cfg, args.installation).await?;
    let installation = util::find_installation(client, &numinst).await?;

    let mode = ArmMode::from(args.mode);
    tracing::info!(%numinst, mode = %mode, "arming");
    let result = client
        .arm(&numinst, &installation.panel, mode, &args.current_status)
        .await?;
    report(result, "arm", global)
}

pub async fn disarm(
    client: &AlarmClient,
    args: TargetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut cfg = util::sign_in(client, global).await?;
    let numinst = util::resolve_installation_id(client, &mut cfg, args.installation).await?;
    let installation = util::find_installation(client, &numinst).await?;

    let prompt = format!("Disarm {} ({numinst})?", installation.display_name());
    if !util::confirm(&prompt, global, "disarm")? {
        Printer::new(global).notice("Cancelled.", false);
        return Ok(());
    }

    tracing::info!(%numinst, "disarming");
    let result = client
        .disarm(&numinst, &installation.panel, DisarmMode::default())
        .await?;
    report(result, "disarm", global)
}
