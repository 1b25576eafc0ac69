//! Installation listing.

use tabled::Tabled;

use securitas_api::{AlarmClient, Installation};
use securitas_config as config;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::Printer;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct InstallationRow {
    #[tabled(rename = "Number")]
    numinst: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Panel")]
    panel: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Address")]
    address: String,
}

impl From<&Installation> for InstallationRow {
    fn from(i: &Installation) -> Self {
        let address = [i.address.as_str(), i.city.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            numinst: i.numinst.clone(),
            name: i.display_name().to_owned(),
            panel: i.panel.clone(),
            kind: i.installation_type.clone(),
            address,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(client: &AlarmClient, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = util::sign_in(client, global).await?;
    let installations = client.installations().await?;

    // Remember the first installation when nothing is selected yet.
    if cfg.installation_id.is_none() {
        if let Some(first) = installations.first() {
            cfg.installation_id = Some(first.numinst.clone());
            config::save_config(&util::persistable(&cfg))?;
        }
    }

    Printer::new(global).list(
        &installations,
        |i| InstallationRow::from(i),
        |i| i.numinst.clone(),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_joins_address_parts() {
        let inst = Installation {
            numinst: "1".into(),
            name: "Alice".into(),
            address: "1 High Street".into(),
            ..Installation::default()
        };
        let row = InstallationRow::from(&inst);
        assert_eq!(row.address, "1 High Street");
        assert_eq!(row.name, "Alice");
    }
}
