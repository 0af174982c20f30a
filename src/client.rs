//! Blocking transport client for the backend services.
//!
//! `YakHttpClient` is the low-level, stateless engine [`Session`](crate::Session)
//! is built on. It owns the blocking reqwest client, the parsed endpoint URLs,
//! and the request-signing scheme the main API expects:
//!
//! - every main-API request carries a `version` parameter, a Unix-time `salt`,
//!   and a `hash` computed as `base64(HMAC-SHA1(api_key, "/api/<op>?<query><salt>"))`
//!   over the unencoded query string;
//! - a device `token` derived as `hex(MD5(user_agent))` identifies the caller's
//!   "device" (the session attaches it per operation);
//! - `POST` bodies are form encoded with the query parameters merged in and
//!   the pairs sorted, which the backend requires for its own hash check.
//!
//! The notification and install services take plain unsigned requests.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use reqwest::blocking::Response;
use reqwest::header::{ACCEPT_ENCODING, USER_AGENT};
use sha1::Sha1;
use url::Url;

use crate::config::Config;
use crate::errors::{BuildError, Result};

type HmacSha1 = Hmac<Sha1>;

/// Configures a [`YakHttpClient`] before construction.
///
/// Most code obtains this via [`YakHttpClient::builder()`], overrides the
/// [`Config`] and/or the request timeout, and calls [`Self::build`].
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use yakkit::{Config, YakHttpClient};
///
/// let client = YakHttpClient::builder()
///     .config(Config::default())
///     .request_timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok::<_, yakkit::BuildError>(())
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct YakHttpClientBuilder {
    config: Config,
    request_timeout: Option<Duration>,
    user_agent_extra: Option<String>,
}

impl YakHttpClientBuilder {
    /// Replace the full backend configuration (endpoints, credentials, sentinels).
    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    /// Set the per-request HTTP timeout.
    pub fn request_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Append an extra segment to the outgoing user agent.
    ///
    /// Affects only the header; the device token keeps its version-less
    /// basis, so the session identity does not change.
    pub fn user_agent_extra(&mut self, extra: impl Into<String>) -> &mut Self {
        self.user_agent_extra = Some(extra.into());
        self
    }

    /// Build a [`YakHttpClient`], validating every configured endpoint URL.
    pub fn build(&self) -> std::result::Result<YakHttpClient, BuildError> {
        let main = Url::parse(&self.config.main_url)?;
        let basecamp = Url::parse(&self.config.basecamp_url)?;
        let notify = Url::parse(&self.config.notify_url)?;
        let install = Url::parse(&self.config.install_url)?;

        let mut http_builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = self.request_timeout {
            http_builder = http_builder.timeout(timeout);
        }

        Ok(YakHttpClient {
            http: http_builder.build()?,
            config: self.config.clone(),
            user_agent_extra: self.user_agent_extra.clone(),
            main,
            basecamp,
            notify,
            install,
        })
    }
}

/// Stateless transport for the main, basecamp, notification, and install
/// services.
///
/// Cheap to clone; clones share nothing mutable. All identity/session state
/// lives in [`Session`](crate::Session).
#[derive(Debug, Clone)]
pub struct YakHttpClient {
    pub(crate) http: reqwest::blocking::Client,
    pub(crate) config: Config,
    user_agent_extra: Option<String>,
    pub(crate) main: Url,
    pub(crate) basecamp: Url,
    pub(crate) notify: Url,
    pub(crate) install: Url,
}

impl YakHttpClient {
    /// Client with the default live-service configuration.
    pub fn new() -> std::result::Result<Self, BuildError> {
        Self::builder().build()
    }

    /// Returns a builder to edit settings before creating a [`YakHttpClient`].
    pub fn builder() -> YakHttpClientBuilder {
        YakHttpClientBuilder::default()
    }

    /// The backend configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Device token for request parameters: `hex(MD5(user_agent))`, where the
    /// user agent is the version-less form.
    pub(crate) fn device_token(&self) -> String {
        let agent = self.config.device.user_agent(None);
        hex::encode(Md5::digest(agent.as_bytes()))
    }

    /// Signature over one operation: `base64(HMAC-SHA1(key, "/api/<op>?<query><salt>"))`.
    ///
    /// `query` is the *unencoded* `k=v&k=v` rendering of the parameters, in
    /// the order they will be sent.
    pub(crate) fn sign(&self, op: &str, query: &str, salt: &str) -> String {
        let msg = format!("/api/{op}?{query}{salt}");
        let mut mac = HmacSha1::new_from_slice(self.config.api_key.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(msg.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Signed `GET` against a main-API-protocol endpoint (`main` or `basecamp`).
    pub(crate) fn signed_get(
        &self,
        base: &Url,
        op: &str,
        params: Vec<(String, String)>,
    ) -> Result<Response> {
        let (url, params) = self.prepare(base, op, params)?;
        let response = self
            .http
            .get(url)
            .query(&params)
            .header(USER_AGENT, self.versioned_user_agent())
            .header(ACCEPT_ENCODING, "gzip")
            .send()?;
        Ok(response)
    }

    /// Signed `POST` against a main-API-protocol endpoint.
    ///
    /// The signed parameters stay in the query string; the form body is the
    /// caller's fields merged with those parameters and sorted.
    pub(crate) fn signed_post(
        &self,
        base: &Url,
        op: &str,
        params: Vec<(String, String)>,
        form: Vec<(String, String)>,
    ) -> Result<Response> {
        let (url, params) = self.prepare(base, op, params)?;
        let mut body: Vec<(String, String)> = form;
        body.extend(params.iter().cloned());
        body.sort();
        let response = self
            .http
            .post(url)
            .query(&params)
            .form(&body)
            .header(USER_AGENT, self.versioned_user_agent())
            .header(ACCEPT_ENCODING, "gzip")
            .send()?;
        Ok(response)
    }

    /// Unsigned `GET` (notification service).
    pub(crate) fn get(&self, url: Url) -> Result<Response> {
        Ok(self.http.get(url).send()?)
    }

    /// Unsigned JSON `POST` (notification and install services).
    pub(crate) fn post_json(&self, url: Url, body: &serde_json::Value) -> Result<Response> {
        Ok(self.http.post(url).json(body).send()?)
    }

    fn versioned_user_agent(&self) -> String {
        let agent = self
            .config
            .device
            .user_agent(Some(&self.config.version_string()));
        match &self.user_agent_extra {
            Some(extra) => format!("{agent} {extra}"),
            None => agent,
        }
    }

    /// Append version/salt/hash to the parameter list and resolve the full URL.
    fn prepare(
        &self,
        base: &Url,
        op: &str,
        mut params: Vec<(String, String)>,
    ) -> Result<(Url, Vec<(String, String)>)> {
        params.push(("version".into(), self.config.version_string()));

        let salt = unix_seconds().to_string();
        let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        let hash = self.sign(op, &query.join("&"), &salt);

        params.push(("salt".into(), salt));
        params.push(("hash".into(), hash));

        let url = base.join(op)?;
        Ok((url, params))
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
