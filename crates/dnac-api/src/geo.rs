// Geocoding collaborator
//
// Address → latitude/longitude via a Nominatim-compatible service, used by
// callers that build site payloads. Fail-fast: one request, no retry.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/";

/// A resolved physical address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    /// Full display address as returned by the service.
    pub address: String,
    /// Last comma-separated component of the address.
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Resolves free-text addresses to coordinates.
pub trait Geocoder {
    fn geocode(&self, address: &str) -> impl Future<Output = Result<Location, Error>> + Send;
}

#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: String,
}

/// Geocoder backed by the Nominatim search API.
pub struct NominatimGeocoder {
    http: reqwest::Client,
    base_url: Url,
}

impl NominatimGeocoder {
    /// Use the public OpenStreetMap instance.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Url::parse(NOMINATIM_URL)?,
        })
    }

    /// Use a self-hosted instance (or a mock).
    pub fn with_base_url(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Location, Error> {
        let url = self.base_url.join("search")?;
        debug!(%url, address, "geocoding address");

        let resp = self
            .http
            .get(url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let places: Vec<Place> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        let place = places.into_iter().next().ok_or_else(|| Error::Geocode {
            address: address.to_owned(),
        })?;

        to_location(place)
    }
}

fn to_location(place: Place) -> Result<Location, Error> {
    let coordinate = |raw: &str| {
        raw.parse::<f64>().map_err(|e| Error::Deserialization {
            message: format!("invalid coordinate {raw:?}: {e}"),
            body: String::new(),
        })
    };
    let latitude = coordinate(&place.lat)?;
    let longitude = coordinate(&place.lon)?;

    let country = place
        .display_name
        .rsplit(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_owned();

    Ok(Location {
        address: place.display_name,
        country,
        latitude,
        longitude,
    })
}
