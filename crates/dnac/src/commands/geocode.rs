//! Address geocoding. Talks to the geocoding service, not the controller.

use std::time::Duration;

use url::Url;

use dnac_api::{Geocoder, NominatimGeocoder, TlsMode, TransportConfig};

use crate::cli::{GeocodeArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    args: GeocodeArgs,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    let transport = TransportConfig {
        tls: if global.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        },
        timeout: Duration::from_secs(global.timeout.unwrap_or(30)),
        use_proxy: !global.no_proxy,
    };

    let geocoder = match args.geocoder_url {
        Some(ref raw) => {
            let base = Url::parse(raw).map_err(|e| CliError::Validation {
                field: "geocoder-url".into(),
                reason: e.to_string(),
            })?;
            NominatimGeocoder::with_base_url(transport.build_client()?, base)
        }
        None => NominatimGeocoder::new(&transport)?,
    };

    let location = geocoder.geocode(&args.address).await?;
    output::print_output(&output::render(format, &location)?, global.quiet);
    Ok(())
}
