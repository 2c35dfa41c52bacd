// Generic resource client
//
// Verb-generic GET/POST/PUT/DELETE against caller-supplied resource paths.
// Every operation takes its path explicitly; the client carries no
// per-call cursor. Mutating calls that enqueue an asynchronous job are
// driven to completion through the task poller before returning.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::{ParseError, Url};

use crate::config::ControllerConfig;
use crate::error::Error;
use crate::outcome::Outcome;
use crate::session::Session;
use crate::task::{PollConfig, TaskNamespace};

/// Non-2xx responses the controller uses to say "nothing here".
const BENIGN_NOT_FOUND: &[(StatusCode, &str)] =
    &[(StatusCode::INTERNAL_SERVER_ERROR, "Profile Not Found")];

/// Async client for the controller's REST API.
pub struct DnacClient {
    session: Session,
    poll: PollConfig,
    check_mode: bool,
}

impl DnacClient {
    /// Log in and build a client from a full controller config.
    pub async fn connect(config: &ControllerConfig) -> Result<Self, Error> {
        let session = Session::login(config).await?;
        Ok(Self::new(session)
            .with_poll(config.poll.clone())
            .with_check_mode(config.check_mode))
    }

    /// Wrap an established session with default polling.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            poll: PollConfig::default(),
            check_mode: false,
        }
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// In check mode mutating calls are reported, never sent.
    pub fn with_check_mode(mut self, check_mode: bool) -> Self {
        self.check_mode = check_mode;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    pub fn check_mode(&self) -> bool {
        self.check_mode
    }

    // ── Operations ───────────────────────────────────────────────────

    /// GET a resource.
    ///
    /// A 2xx body that is not JSON reads as "no data" (`[]`), as does a
    /// known benign not-found error. Any other non-2xx is an `Error::Api`.
    pub async fn fetch(&self, path: &str) -> Result<Value, Error> {
        let url = resource_url(self.session.base_url(), path, None)?;
        self.fetch_url(url).await
    }

    pub(crate) async fn fetch_url(&self, url: Url) -> Result<Value, Error> {
        debug!("GET {url}");
        let path = url.path().to_owned();

        let resp = self.session.http().get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body).unwrap_or_else(|_| empty()));
        }

        if is_benign_not_found(status, &body) {
            warn!(%status, %path, "controller reported not found; treating as empty");
            return Ok(empty());
        }

        Err(Error::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// POST a JSON payload.
    pub async fn create<P: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &P,
    ) -> Result<Outcome, Error> {
        let url = resource_url(self.session.base_url(), path, None)?;
        self.create_at(url, TaskNamespace::for_path(path), payload)
            .await
    }

    pub(crate) async fn create_at<P: Serialize + ?Sized>(
        &self,
        url: Url,
        namespace: TaskNamespace,
        payload: &P,
    ) -> Result<Outcome, Error> {
        let body = serde_json::to_string(payload).map_err(Error::Payload)?;
        self.mutate(Method::POST, url, namespace, Some(body)).await
    }

    /// PUT a JSON payload.
    pub async fn update<P: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &P,
    ) -> Result<Outcome, Error> {
        let body = serde_json::to_string(payload).map_err(Error::Payload)?;
        let url = resource_url(self.session.base_url(), path, None)?;
        self.mutate(Method::PUT, url, TaskNamespace::for_path(path), Some(body))
            .await
    }

    /// DELETE `path/id`.
    pub async fn delete(&self, path: &str, id: &str) -> Result<Outcome, Error> {
        let url = resource_url(self.session.base_url(), path, Some(id))?;
        self.mutate(Method::DELETE, url, TaskNamespace::for_path(path), None)
            .await
    }

    async fn mutate(
        &self,
        method: Method,
        url: Url,
        namespace: TaskNamespace,
        body: Option<String>,
    ) -> Result<Outcome, Error> {
        if self.check_mode {
            debug!("check mode: skipping {method} {url}");
            return Ok(Outcome::changed(
                "In check mode. Changes would be required.",
            ));
        }

        debug!("{method} {url}");

        let mut builder = self.session.http().request(method, url);
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed = parse_lenient(&text);

        match namespace.task_id(&parsed) {
            Some(task_id) => {
                debug!(%task_id, ?namespace, "awaiting controller task");
                let terminal = self.wait_for_task(namespace, &task_id).await?;
                Ok(Outcome::changed("Task completed successfully.").with_response(terminal))
            }
            None => Ok(Outcome::changed("Request completed.").with_response(parsed)),
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn empty() -> Value {
    Value::Array(Vec::new())
}

fn is_benign_not_found(status: StatusCode, body: &str) -> bool {
    BENIGN_NOT_FOUND
        .iter()
        .any(|(code, marker)| *code == status && body.contains(marker))
}

/// Parse a synchronous 2xx body; non-JSON text is kept verbatim.
fn parse_lenient(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

/// Build `{base}/{path}[/{id}][?{query}]`.
///
/// Surrounding slashes on `path` are ignored; a query string on `path`
/// stays at the end of the URL when an id is appended. The id is one
/// percent-encoded path segment, so `#`, `?` and `/` inside it stay part
/// of the id.
pub(crate) fn resource_url(base: &Url, path: &str, id: Option<&str>) -> Result<Url, Error> {
    let (route, query) = match path.split_once('?') {
        Some((route, query)) => (route, Some(query)),
        None => (path, None),
    };

    let mut url = Url::parse(&format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        route.trim_matches('/')
    ))?;
    if let Some(id) = id {
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(id.trim_matches('/'));
    }
    url.set_query(query.filter(|q| !q.is_empty()));

    Ok(url)
}
