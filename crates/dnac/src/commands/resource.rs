//! Generic resource verbs: get, create, update, delete.

use dnac_api::{DnacClient, Outcome};

use crate::cli::{GlobalOpts, OutputFormat, WriteArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn get(
    client: &DnacClient,
    path: &str,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    let body = client.fetch(path).await?;
    output::print_output(&output::render(format, &body)?, global.quiet);
    Ok(())
}

pub async fn create(
    client: &DnacClient,
    args: WriteArgs,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    let payload = util::read_payload(&args.data, "data")?;
    let bar = util::spinner(&format!("POST {}", args.path), global.quiet);
    let outcome = client.create(&args.path, &payload).await;
    bar.finish_and_clear();
    report(&outcome?, global, format)
}

pub async fn update(
    client: &DnacClient,
    args: WriteArgs,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    let payload = util::read_payload(&args.data, "data")?;
    let bar = util::spinner(&format!("PUT {}", args.path), global.quiet);
    let outcome = client.update(&args.path, &payload).await;
    bar.finish_and_clear();
    report(&outcome?, global, format)
}

pub async fn delete(
    client: &DnacClient,
    path: &str,
    id: &str,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    // Check mode never sends the request, so there is nothing to confirm.
    let skip_prompt = global.yes || client.check_mode();
    if !util::confirm(&format!("Delete {id} from {path}?"), skip_prompt, "delete")? {
        eprintln!("Aborted.");
        return Ok(());
    }

    let bar = util::spinner(&format!("DELETE {path}/{id}"), global.quiet);
    let outcome = client.delete(path, id).await;
    bar.finish_and_clear();
    report(&outcome?, global, format)
}

/// Print the status line and the rendered outcome.
pub(super) fn report(
    outcome: &Outcome,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    output::print_status(outcome, global.quiet);
    output::print_output(&output::render(format, outcome)?, global.quiet);
    Ok(())
}
