// Common-settings reconciler
//
// Group-scoped settings (DNS, DHCP, NTP, ...) live under
// `api/v1/commonsetting/global/{group}`. Reconciling reads the stored entry
// once, compares it to the desired one, and writes at most once. The
// controller treats the POST as an upsert, so there is no separate update.
//
// Comparison is deep equality of the whole `value` JSON: object key order is
// ignored, array order is significant, and `1` differs from `1.0`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};
use tracing::info;
use url::Url;

use crate::client::{DnacClient, resource_url};
use crate::error::Error;
use crate::outcome::Outcome;
use crate::task::TaskNamespace;

/// The common settings a hierarchy group can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum SettingKind {
    Dns,
    Dhcp,
    Ntp,
    Syslog,
    SnmpTrap,
    Banner,
    Timezone,
    Netflow,
}

impl SettingKind {
    /// The controller's setting key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Dns => "dns.server",
            Self::Dhcp => "dhcp.server",
            Self::Ntp => "ntp.server",
            Self::Syslog => "syslog.server",
            Self::SnmpTrap => "snmp.trap.receiver",
            Self::Banner => "device.banner",
            Self::Timezone => "timezone.site",
            Self::Netflow => "netflow.collector",
        }
    }

    pub fn instance_type(self) -> &'static str {
        match self {
            Self::Dns => "dns",
            Self::Dhcp | Self::Ntp | Self::Syslog | Self::SnmpTrap => "ip",
            Self::Banner => "banner",
            Self::Timezone => "timezone",
            Self::Netflow => "netflow",
        }
    }

    pub fn setting_type(self) -> &'static str {
        match self {
            Self::Dns => "dns.setting",
            Self::Dhcp | Self::Ntp | Self::Syslog | Self::SnmpTrap => "ip.address",
            Self::Banner => "banner.setting",
            Self::Timezone => "timezone.setting",
            Self::Netflow => "netflow.setting",
        }
    }
}

/// One common-setting entry in the controller's envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonSetting {
    pub instance_type: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub setting_type: String,
    pub key: String,
    pub value: Value,
    pub group_uuid: String,
}

impl CommonSetting {
    /// A setting of a catalogued kind, scoped to the global group until
    /// reconciled against a specific one.
    pub fn new(kind: SettingKind, value: Value) -> Self {
        Self {
            instance_type: kind.instance_type().to_owned(),
            namespace: "global".to_owned(),
            setting_type: kind.setting_type().to_owned(),
            key: kind.key().to_owned(),
            value,
            group_uuid: crate::groups::GLOBAL_GROUP_ID.to_owned(),
        }
    }
}

/// Whether the setting should hold its value or be cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettingState {
    #[default]
    Present,
    Absent,
}

const SETTINGS_ROOT: &str = "api/v1/commonsetting/global";

/// Read URL for one setting key at a group scope.
pub fn settings_url(base: &Url, group_id: &str, key: &str) -> Result<Url, Error> {
    let mut url = settings_write_url(base, group_id)?;
    url.query_pairs_mut().append_pair("key", key);
    Ok(url)
}

/// Write URL for a group scope.
fn settings_write_url(base: &Url, group_id: &str) -> Result<Url, Error> {
    resource_url(base, SETTINGS_ROOT, Some(group_id))
}

/// Stored entries for `key` from a commonsetting GET body.
///
/// Accepts both the `{"response": [...]}` envelope and the bare `[]` that
/// `fetch` returns for "no data".
pub fn stored_entries(current: &Value, key: &str) -> Vec<Value> {
    let entries = current.get("response").unwrap_or(current);
    entries
        .as_array()
        .map(|list| {
            list.iter()
                .filter(|e| e.get("key").and_then(Value::as_str) == Some(key))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// `true` when exactly one entry is stored and its value equals the desired one.
pub fn is_in_desired_state(stored: &[Value], desired: &CommonSetting) -> bool {
    match stored {
        [only] => only.get("value") == Some(&desired.value),
        _ => false,
    }
}

impl DnacClient {
    /// Bring one common setting at `group_id` to the desired state.
    ///
    /// Reads once, compares once, and issues at most one write.
    pub async fn reconcile(
        &self,
        mut setting: CommonSetting,
        group_id: &str,
        state: SettingState,
    ) -> Result<Outcome, Error> {
        if group_id.is_empty() {
            return Err(Error::GroupNotFound {
                name: group_id.to_owned(),
            });
        }

        setting.group_uuid = group_id.to_owned();
        if state == SettingState::Absent {
            setting.value = Value::Array(Vec::new());
        }

        let base = self.session().base_url();
        let current = self
            .fetch_url(settings_url(base, group_id, &setting.key)?)
            .await?;
        let stored = stored_entries(&current, &setting.key);
        let proposed = serde_json::to_value([&setting]).map_err(Error::Payload)?;
        let previous = Value::Array(stored.clone());

        if is_in_desired_state(&stored, &setting) {
            info!(key = %setting.key, group = group_id, "setting already in desired state");
            return Ok(Outcome::unchanged("Already in desired state.").with_diff(previous, proposed));
        }

        info!(
            key = %setting.key,
            group = group_id,
            stored = stored.len(),
            "setting differs from desired state; submitting"
        );
        let outcome = self
            .create_at(
                settings_write_url(base, group_id)?,
                TaskNamespace::for_path(SETTINGS_ROOT),
                &[&setting],
            )
            .await?;
        Ok(outcome.with_diff(previous, proposed))
    }
}
