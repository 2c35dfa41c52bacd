use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How a session obtains its credential artifact from the controller.
///
/// Controller releases have used two login schemes. Both exchange HTTP
/// Basic credentials for something that is then attached to every request
/// as a default header.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuthFlow {
    /// `POST /dna/system/api/v1/auth/token`, JSON body `{"Token": "..."}`,
    /// sent back as `X-Auth-Token`.
    #[default]
    Token,
    /// `GET /api/system/v1/auth/login`, session cookie in `Set-Cookie`,
    /// sent back as `Cookie`.
    Cookie,
}

impl AuthFlow {
    /// The login endpoint, relative to the controller root.
    pub fn login_path(self) -> &'static str {
        match self {
            Self::Token => "dna/system/api/v1/auth/token",
            Self::Cookie => "api/system/v1/auth/login",
        }
    }

    /// The HTTP method the login endpoint expects.
    pub fn login_method(self) -> reqwest::Method {
        match self {
            Self::Token => reqwest::Method::POST,
            Self::Cookie => reqwest::Method::GET,
        }
    }

    /// The request header that carries the credential after login
    /// (lowercase, as `HeaderName::from_static` requires).
    pub fn credential_header(self) -> &'static str {
        match self {
            Self::Token => "x-auth-token",
            Self::Cookie => "cookie",
        }
    }
}
