//! Alarm status handler.

use std::fmt::Write as _;

use tabled::Tabled;

use securitas_api::{AlarmClient, AlarmStatus, StatusException};

use crate::cli::{GlobalOpts, TargetArgs};
use crate::error::CliError;
use crate::output::{self, Printer};

use super::util;

#[derive(Tabled)]
struct ExceptionRow {
    #[tabled(rename = "Device")]
    alias: String,
    #[tabled(rename = "Type")]
    device_type: String,
    #[tabled(rename = "State")]
    status: String,
}

impl From<&StatusException> for ExceptionRow {
    fn from(e: &StatusException) -> Self {
        Self {
            alias: e.alias.clone(),
            device_type: e.device_type.clone(),
            status: e.status.clone(),
        }
    }
}

fn detail(numinst: &str, status: &AlarmStatus) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Installation: {numinst}");
    let _ = writeln!(out, "Status:       {}", status.status);
    let _ = write!(out, "Last update:  {}", status.timestamp_update);
    if !status.exceptions.is_empty() {
        let _ = write!(
            out,
            "\n\nExceptions ({}):\n{}",
            status.exceptions.len(),
            output::table(status.exceptions.iter().map(ExceptionRow::from))
        );
    }
    out
}

pub async fn handle(
    client: &AlarmClient,
    args: TargetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut cfg = util::sign_in(client, global).await?;
    let numinst = util::resolve_installation_id(client, &mut cfg, args.installation).await?;

    let status = client.status(&numinst).await?;
    Printer::new(global).item(
        &status,
        |s, _| detail(&numinst, s),
        |s| s.status.clone(),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_lists_exceptions() {
        let status = AlarmStatus {
            status: "E".into(),
            timestamp_update: "2024-05-01 10:00".into(),
            exceptions: vec![StatusException {
                status: "OPEN".into(),
                device_type: "MG".into(),
                alias: "Back door".into(),
            }],
        };
        let text = detail("1234567", &status);
        assert!(text.contains("Installation: 1234567"));
        assert!(text.contains("Exceptions (1)"));
        assert!(text.contains("Back door"));
    }

    #[test]
    fn detail_without_exceptions_is_short() {
        let text = detail("1", &AlarmStatus::default());
        assert_eq!(text.lines().count(), 3);
    }
}
