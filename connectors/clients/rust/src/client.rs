// SPDX-License-Identifier: PMPL-1.0-or-later

//! λORM client configuration and HTTP transport layer.
//!
//! [`OrmClient`] is the entry point for all SDK operations. It owns the base
//! URL, the pooled HTTP client and the default [`MethodOptions`]. The service
//! operations themselves (general, schema, expression, stage) are defined as
//! `impl OrmClient` blocks in their respective modules.

use std::env;
use std::time::{Duration, Instant};

use lambdaorm_domain::{Decode, Format, MethodOptions};
use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{OrmError, Result};

/// Environment variable holding the service base URL.
pub const ENV_URL: &str = "LAMBDAORM_URL";
/// Environment variable holding the per-call timeout in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "LAMBDAORM_TIMEOUT_SECS";
/// Environment variable holding the response format.
pub const ENV_FORMAT: &str = "LAMBDAORM_FORMAT";

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Connection settings for an [`OrmClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the service, e.g. `http://localhost:9291`.
    pub base_url: String,
    /// Default per-call timeout.
    pub timeout: Duration,
    /// Default response format.
    pub format: Format,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9291".to_owned(),
            timeout: MethodOptions::DEFAULT_TIMEOUT,
            format: Format::Default,
        }
    }
}

impl ClientConfig {
    /// Build a configuration from `LAMBDAORM_URL`, `LAMBDAORM_TIMEOUT_SECS`
    /// and `LAMBDAORM_FORMAT`. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::Validation`] if a variable is set to a value that
    /// cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_URL) {
            config.base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                OrmError::Validation(format!("{ENV_TIMEOUT_SECS} must be whole seconds, got '{secs}'"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(format) = lookup(ENV_FORMAT) {
            config.format = format.parse().map_err(OrmError::Validation)?;
        }

        Ok(config)
    }

    /// The per-call options this configuration implies.
    pub fn method_options(&self) -> MethodOptions {
        MethodOptions {
            format: self.format,
            timeout: self.timeout,
        }
    }
}

// ---------------------------------------------------------------------------
// OrmClient
// ---------------------------------------------------------------------------

/// Client for a λORM query service.
///
/// Holds no mutable state: clones share the underlying connection pool and
/// calls may be awaited concurrently from any task.
///
/// # Examples
///
/// ```rust,no_run
/// use lambdaorm_client::OrmClient;
///
/// # #[tokio::main]
/// # async fn main() -> lambdaorm_client::Result<()> {
/// let client = OrmClient::new("http://localhost:9291")?;
/// let version = client.version().await?;
/// println!("λORM {}", version.version);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OrmClient {
    base_url: Url,
    http: reqwest::Client,
    options: MethodOptions,
}

impl OrmClient {
    /// Create a client pointing at `base_url` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::Validation`] if `base_url` cannot be parsed.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::from_config(ClientConfig {
            base_url: base_url.to_owned(),
            ..ClientConfig::default()
        })
    }

    /// Create a client from a full [`ClientConfig`].
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| OrmError::Validation(format!("Invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(OrmError::Validation(format!(
                "Invalid base URL: '{base_url}' cannot carry a path"
            )));
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| OrmError::Validation(format!("Cannot build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            http,
            options: config.method_options(),
        })
    }

    /// A client sharing this one's connection pool but issuing calls with
    /// different format and timeout.
    pub fn with_method_options(&self, options: MethodOptions) -> Self {
        Self {
            options,
            ..self.clone()
        }
    }

    /// Base URL all paths are appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Options applied to every call made through this client.
    pub fn method_options(&self) -> MethodOptions {
        self.options
    }

    // -- Internal HTTP helpers ----------------------------------------------

    /// Append percent-encoded `segments` to the base URL path.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| OrmError::Validation(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `segments` and decode a single record.
    pub(crate) async fn get<T: Decode>(&self, segments: &[&str]) -> Result<T> {
        let value = self.get_value(segments).await?;
        Ok(T::decode(&value)?)
    }

    /// GET `segments` and decode a list of records.
    pub(crate) async fn get_many<T: Decode>(&self, segments: &[&str]) -> Result<Vec<T>> {
        let value = self.get_value(segments).await?;
        Ok(T::decode_many(&value)?)
    }

    /// GET `segments` and return the parsed JSON body.
    pub(crate) async fn get_value(&self, segments: &[&str]) -> Result<Value> {
        let url = self.url(segments)?;
        let response = self.send(self.http.get(url.clone()), "GET", &url).await?;
        self.handle_response(response).await
    }

    /// POST `body` as JSON to `segments` and decode a single record.
    pub(crate) async fn post<B: Serialize, T: Decode>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T> {
        let value = self.post_value(segments, body).await?;
        Ok(T::decode(&value)?)
    }

    /// POST `body` as JSON to `segments` and decode a list of records.
    pub(crate) async fn post_many<B: Serialize, T: Decode>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Vec<T>> {
        let value = self.post_value(segments, body).await?;
        Ok(T::decode_many(&value)?)
    }

    /// POST `body` as JSON to `segments` and return the parsed JSON body.
    pub(crate) async fn post_value<B: Serialize>(&self, segments: &[&str], body: &B) -> Result<Value> {
        let url = self.url(segments)?;
        let response = self
            .send(self.http.post(url.clone()).json(body), "POST", &url)
            .await?;
        self.handle_response(response).await
    }

    /// POST `body` as JSON to `segments`, discarding any response body.
    pub(crate) async fn post_discard<B: Serialize>(&self, segments: &[&str], body: &B) -> Result<()> {
        let url = self.url(segments)?;
        let response = self
            .send(self.http.post(url.clone()).json(body), "POST", &url)
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Attach the format and timeout, then dispatch.
    async fn send(&self, builder: RequestBuilder, method: &str, url: &Url) -> Result<Response> {
        let format = self.options.format.as_str();
        debug!(method, url = %url, format, "Dispatching request");

        let started = Instant::now();
        let response = builder
            .query(&[("format", format)])
            .timeout(self.options.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        debug!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Response received"
        );
        Ok(response)
    }

    fn transport_error(&self, err: reqwest::Error) -> OrmError {
        if err.is_timeout() {
            OrmError::Timeout(self.options.timeout.as_millis() as u64)
        } else {
            OrmError::Network(err)
        }
    }

    // -- Response handling --------------------------------------------------

    /// Parse a successful response body or extract an error from it.
    async fn handle_response(&self, response: Response) -> Result<Value> {
        if response.status().is_success() {
            let body = response.text().await.map_err(|e| self.transport_error(e))?;
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Turn a non-2xx response into the appropriate [`OrmError`] variant.
    async fn extract_error(&self, response: Response) -> OrmError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);

        match status {
            404 => OrmError::NotFound(message),
            _ => OrmError::Server { status, message },
        }
    }
}

/// Pick the most useful message out of an error body.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(message)) = fields.get(key) {
                return message.clone();
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:9291");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.format, Format::Default);
    }

    #[test]
    fn test_config_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_URL, "http://orm.internal:8080/api"),
            (ENV_TIMEOUT_SECS, "3"),
            (ENV_FORMAT, "light"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://orm.internal:8080/api");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.format, Format::Light);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, OrmError::Validation(_)));

        let err = ClientConfig::from_lookup(lookup(&[(ENV_FORMAT, "verbose")])).unwrap_err();
        assert!(matches!(err, OrmError::Validation(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(OrmClient::new("not a url"), Err(OrmError::Validation(_))));
        assert!(matches!(
            OrmClient::new("mailto:orm@example.com"),
            Err(OrmError::Validation(_))
        ));
    }

    #[test]
    fn test_url_appends_encoded_segments() {
        let client = OrmClient::new("http://localhost:9291/api/").unwrap();
        let url = client.url(&["mappings", "default", "Order Details"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9291/api/mappings/default/Order%20Details"
        );

        let client = OrmClient::new("http://localhost:9291").unwrap();
        assert_eq!(
            client.url(&["entities"]).unwrap().as_str(),
            "http://localhost:9291/entities"
        );
    }

    #[test]
    fn test_with_method_options_leaves_original() {
        let client = OrmClient::new("http://localhost:9291").unwrap();
        let light = client.with_method_options(
            MethodOptions::default()
                .with_format(Format::Light)
                .with_timeout(Duration::from_secs(2)),
        );

        assert_eq!(light.method_options().format, Format::Light);
        assert_eq!(client.method_options(), MethodOptions::default());
        assert_eq!(light.base_url(), client.base_url());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(500, r#"{"message":"boom"}"#), "boom");
        assert_eq!(error_message(400, r#"{"error":"bad expression"}"#), "bad expression");
        assert_eq!(error_message(502, "Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(503, ""), "HTTP 503");
        assert_eq!(error_message(500, r#"{"code":7}"#), r#"{"code":7}"#);
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<OrmClient>();
    }
}
