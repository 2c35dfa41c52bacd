//! Common-setting reconciliation.

use serde_json::Value;

use dnac_api::{CommonSetting, DnacClient, SettingKind, SettingState};

use crate::cli::{GlobalOpts, OutputFormat, SettingArgs, SettingKindArg};
use crate::error::CliError;

use super::{resource, util};

fn setting_kind(arg: SettingKindArg) -> SettingKind {
    match arg {
        SettingKindArg::Dns => SettingKind::Dns,
        SettingKindArg::Dhcp => SettingKind::Dhcp,
        SettingKindArg::Ntp => SettingKind::Ntp,
        SettingKindArg::Syslog => SettingKind::Syslog,
        SettingKindArg::SnmpTrap => SettingKind::SnmpTrap,
        SettingKindArg::Banner => SettingKind::Banner,
        SettingKindArg::Timezone => SettingKind::Timezone,
        SettingKindArg::Netflow => SettingKind::Netflow,
    }
}

pub async fn handle(
    client: &DnacClient,
    args: SettingArgs,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    let kind = setting_kind(args.kind);
    let value = match args.value {
        Some(ref raw) => util::read_payload(raw, "value")?,
        None => Value::Array(Vec::new()),
    };
    let state = if args.absent {
        SettingState::Absent
    } else {
        SettingState::Present
    };

    let group_id = client.group_id(&args.group).await?;
    tracing::debug!(%kind, group = %args.group, %group_id, "reconciling setting");

    let bar = util::spinner(&format!("Reconciling {kind}"), global.quiet);
    let outcome = client
        .reconcile(CommonSetting::new(kind, value), &group_id, state)
        .await;
    bar.finish_and_clear();
    resource::report(&outcome?, global, format)
}
