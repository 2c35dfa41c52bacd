//! Group name → id lookup.

use serde_json::json;

use dnac_api::DnacClient;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: &DnacClient,
    name: &str,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    let id = client.group_id(name).await?;
    output::print_output(
        &output::render(format, &json!({ "name": name, "id": id }))?,
        global.quiet,
    );
    Ok(())
}
