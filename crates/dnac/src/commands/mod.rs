//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod config_cmd;
pub mod geocode;
pub mod group;
pub mod resource;
pub mod setting;
pub mod util;

use dnac_api::DnacClient;

use crate::cli::{ControllerCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: ControllerCommand,
    client: &DnacClient,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    match cmd {
        ControllerCommand::Get { path } => resource::get(client, &path, global, format).await,
        ControllerCommand::Create(args) => resource::create(client, args, global, format).await,
        ControllerCommand::Update(args) => resource::update(client, args, global, format).await,
        ControllerCommand::Delete { path, id } => {
            resource::delete(client, &path, &id, global, format).await
        }
        ControllerCommand::Setting(args) => setting::handle(client, args, global, format).await,
        ControllerCommand::Group { name } => group::handle(client, &name, global, format).await,
    }
}
