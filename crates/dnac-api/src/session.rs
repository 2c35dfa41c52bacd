// Session manager
//
// Exchanges HTTP Basic credentials for the controller's credential artifact
// (bearer token or session cookie) and pins it, together with the JSON
// content type, as default headers on a single long-lived reqwest client.
// The session is never refreshed; a 401 on a later call surfaces as
// `Error::Api { status: 401 }` and the caller decides whether to log in again.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, SET_COOKIE};
use secrecy::ExposeSecret;
use tracing::debug;
use url::Url;

use crate::auth::AuthFlow;
use crate::config::ControllerConfig;
use crate::error::Error;

#[derive(serde::Deserialize)]
struct TokenResponse {
    #[serde(rename = "Token")]
    token: Option<String>,
}

/// An authenticated transport handle, owned by exactly one client.
#[derive(Debug, Clone)]
pub struct Session {
    http: reqwest::Client,
    base_url: Url,
    headers: HeaderMap,
}

impl Session {
    /// Log in to the controller and build the authenticated session.
    pub async fn login(config: &ControllerConfig) -> Result<Self, Error> {
        let base_url = config.base_url()?;
        let transport = config.transport();
        let flow = config.auth_flow;

        let url = base_url.join(flow.login_path())?;
        debug!(%url, %flow, "logging in");

        let resp = transport
            .build_client()?
            .request(flow.login_method(), url)
            .basic_auth(&config.username, Some(config.password.expose_secret()))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("failed to establish session (HTTP {status})"),
                body,
            });
        }

        let credential = match flow {
            AuthFlow::Token => token_from_body(resp).await?,
            AuthFlow::Cookie => cookie_from_headers(resp.headers())?,
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static(flow.credential_header()), credential);

        let http = transport.build_client_with_headers(headers.clone())?;

        debug!("login successful");
        Ok(Self {
            http,
            base_url,
            headers,
        })
    }

    /// Wrap a pre-built client that already carries its credential headers.
    pub fn from_parts(http: reqwest::Client, base_url: Url, headers: HeaderMap) -> Self {
        Self {
            http,
            base_url,
            headers,
        }
    }

    /// The headers attached to every request on this session.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The controller root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

async fn token_from_body(resp: reqwest::Response) -> Result<HeaderValue, Error> {
    let body = resp.text().await?;

    let token = serde_json::from_str::<TokenResponse>(&body)
        .ok()
        .and_then(|t| t.token)
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        return Err(Error::Authentication {
            message: "login response did not contain a Token field".into(),
            body,
        });
    };

    let mut value = HeaderValue::from_str(&token).map_err(|e| Error::Authentication {
        message: format!("invalid token header value: {e}"),
        body: String::new(),
    })?;
    value.set_sensitive(true);
    Ok(value)
}

fn cookie_from_headers(headers: &HeaderMap) -> Result<HeaderValue, Error> {
    let cookie = headers
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|raw| raw.split(';').next())
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let Some(cookie) = cookie else {
        return Err(Error::Authentication {
            message: "login response did not set a session cookie".into(),
            body: String::new(),
        });
    };

    let mut value = HeaderValue::from_str(cookie).map_err(|e| Error::Authentication {
        message: format!("invalid cookie header value: {e}"),
        body: String::new(),
    })?;
    value.set_sensitive(true);
    Ok(value)
}
