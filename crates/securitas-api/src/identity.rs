// Synthetic device identity
//
// The remote side expects every client to present itself as a mobile
// device. One identity is generated per client instance and reused for
// every call, so the account sees a single stable device per session.

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

/// Region tag used when the caller gives no country hint.
pub const DEFAULT_COUNTRY: &str = "GB";

pub const DEVICE_BRAND: &str = "samsung";
pub const DEVICE_NAME: &str = "SM-S901U";
pub const DEVICE_OS_VERSION: &str = "12";
pub const DEVICE_TYPE: &str = "";
pub const DEVICE_VERSION: &str = "10.102.0";
pub const DEVICE_RESOLUTION: &str = "";

/// Identifiers presented to the remote side on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceIdentity {
    /// `{COUNTRY}_{epoch millis}_{16 hex}`.
    pub device_id: String,
    /// 16 lowercase hex characters.
    pub installation_uuid: String,
    /// 32 lowercase hex characters (push notification id).
    pub push_id: String,
    pub brand: String,
    pub name: String,
    pub os_version: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub version: String,
    pub resolution: String,
}

impl DeviceIdentity {
    /// Generate a fresh identity. The country hint only affects the
    /// region tag embedded in `device_id`.
    pub fn generate(country: Option<&str>) -> Self {
        let region = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COUNTRY);

        Self {
            device_id: format!(
                "{}_{}_{}",
                region.to_ascii_uppercase(),
                Utc::now().timestamp_millis(),
                random_hex(16)
            ),
            installation_uuid: random_hex(16),
            push_id: random_hex(32),
            brand: DEVICE_BRAND.into(),
            name: DEVICE_NAME.into(),
            os_version: DEVICE_OS_VERSION.into(),
            device_type: DEVICE_TYPE.into(),
            version: DEVICE_VERSION.into(),
            resolution: DEVICE_RESOLUTION.into(),
        }
    }
}

/// `len` lowercase hex characters drawn from v4 UUIDs (at most 32 per UUID).
fn random_hex(len: usize) -> String {
    let mut out = String::with_capacity(len);
    while out.len() < len {
        let chunk = Uuid::new_v4().simple().to_string();
        let take = (len - out.len()).min(chunk.len());
        out.push_str(&chunk[..take]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_lower_hex(s: &str) -> bool {
        s.chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    }

    #[test]
    fn device_id_format() {
        let id = DeviceIdentity::generate(Some("es"));
        let parts: Vec<&str> = id.device_id.split('_').collect();
        assert_eq!(parts.len(), 3, "unexpected device id: {}", id.device_id);
        assert_eq!(parts[0], "ES");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 16);
        assert!(is_lower_hex(parts[2]));
    }

    #[test]
    fn default_region_tag() {
        let id = DeviceIdentity::generate(None);
        assert!(id.device_id.starts_with("GB_"));
        let blank = DeviceIdentity::generate(Some("  "));
        assert!(blank.device_id.starts_with("GB_"));
    }

    #[test]
    fn identifier_lengths_and_charset() {
        let id = DeviceIdentity::generate(None);
        assert_eq!(id.installation_uuid.len(), 16);
        assert!(is_lower_hex(&id.installation_uuid));
        assert_eq!(id.push_id.len(), 32);
        assert!(is_lower_hex(&id.push_id));
        assert_ne!(id.installation_uuid, "0000000000000000");
    }

    #[test]
    fn identities_do_not_collide() {
        let a = DeviceIdentity::generate(None);
        let b = DeviceIdentity::generate(None);
        assert_ne!(a.device_id, b.device_id);
        assert_ne!(a.installation_uuid, b.installation_uuid);
        assert_ne!(a.push_id, b.push_id);
    }

    #[test]
    fn random_hex_spans_multiple_uuids() {
        let hex = random_hex(40);
        assert_eq!(hex.len(), 40);
        assert!(is_lower_hex(&hex));
    }
}
