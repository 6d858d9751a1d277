//! HTTP transport for the proxycheck.io v3 API.
//!
//! The transport only moves bytes: the logical outcome of a query is the
//! decoded [`Response`], never the HTTP status code.

use crate::config::Config;
use crate::error::CodecError;
use crate::ip::InetAddress;
use crate::model::Response;
use crate::request::{request_body, RequestConfiguration};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};
use url::{Position, Url};

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!(
    "proxycheck-rs/",
    env!("CARGO_PKG_VERSION"),
    " (+",
    env!("CARGO_PKG_REPOSITORY"),
    ")"
);

const REDACTED: &str = "<redacted>";

/// Status code and body exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status_code: u16,
    pub body: String,
}

/// Failure to obtain a decoded [`Response`].
///
/// URLs carried here have the API key redacted, and transport errors are
/// stripped of the request URL.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("received an unexpected status code ({status}) from {url}", status = .raw.status_code)]
    UnexpectedStatus { url: String, raw: RawResponse },

    #[error("failed to parse response body as a JSON object (status code {status}) from {url}: {reason}", status = .raw.status_code)]
    MalformedBody {
        url: String,
        raw: RawResponse,
        reason: String,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        raw: RawResponse,
        #[source]
        source: CodecError,
    },
}

impl ApiError {
    /// The response that caused the error, if one was received.
    pub fn raw_response(&self) -> Option<&RawResponse> {
        match self {
            ApiError::Http { .. } | ApiError::Timeout { .. } => None,
            ApiError::UnexpectedStatus { raw, .. }
            | ApiError::MalformedBody { raw, .. }
            | ApiError::Decode { raw, .. } => Some(raw),
        }
    }

    fn transport(url: String, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            ApiError::Timeout { url }
        } else {
            ApiError::Http {
                url,
                source: source.without_url(),
            }
        }
    }
}

/// A proxycheck.io lookup service.
#[async_trait]
pub trait ProxyCheckApi: Send + Sync {
    /// Look up every address in one request.
    async fn check(
        &self,
        addresses: &[InetAddress],
        configuration: &RequestConfiguration,
    ) -> Result<Response, ApiError>;
}

/// [`ProxyCheckApi`] over HTTPS.
pub struct ProxyCheckClient {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    api_version: Option<String>,
}

impl ProxyCheckClient {
    /// Create a client from validated configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let endpoint = config.endpoint()?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.timeout.connect_timeout())
            .timeout(config.timeout.read_timeout())
            .build()?;

        debug!(endpoint = %endpoint, "Created proxycheck client");

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key().map(str::to_string),
            api_version: config.api_version().map(str::to_string),
        })
    }

    /// Endpoint with the query string for `configuration`.
    pub fn request_url(&self, configuration: &RequestConfiguration) -> Url {
        let query = configuration
            .to_raw(self.api_key.as_deref(), self.api_version.as_deref())
            .to_query_string();
        let mut url = self.endpoint.clone();
        if !query.is_empty() {
            url.set_query(Some(&query));
        }
        url
    }

    /// `url` with the API key removed, for logs and errors.
    pub fn mask(&self, url: &Url) -> String {
        mask_key(url)
    }
}

/// Replace the value of every `key` query pair; the rest of the URL is kept verbatim.
fn mask_key(url: &Url) -> String {
    let Some(query) = url.query() else {
        return url.to_string();
    };
    let query = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some(("key", _)) => format!("key={}", REDACTED),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}?{}{}",
        &url[..Position::AfterPath],
        query,
        &url[Position::AfterQuery..]
    )
}

#[async_trait]
impl ProxyCheckApi for ProxyCheckClient {
    async fn check(
        &self,
        addresses: &[InetAddress],
        configuration: &RequestConfiguration,
    ) -> Result<Response, ApiError> {
        let url = self.request_url(configuration);
        let masked = self.mask(&url);

        debug!(addresses = addresses.len(), url = %masked, "Querying proxycheck");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(request_body(addresses))
            .send()
            .await
            .map_err(|e| ApiError::transport(masked.clone(), e))?;

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(masked.clone(), e))?;

        let raw = RawResponse { status_code, body };
        let decoded = decode_response(raw, &masked)?;

        let results = match &decoded {
            Response::Success(success) => success.results().len(),
            Response::Failure(_) => 0,
        };
        debug!(status = %decoded.status(), results, "proxycheck lookup complete");

        Ok(decoded)
    }
}

/// Turn a received response into a [`Response`].
///
/// Statuses other than 2xx and 400 are rejected; a 400 carries a regular
/// error payload.
pub fn decode_response(raw: RawResponse, url: &str) -> Result<Response, ApiError> {
    if !(200..=299).contains(&raw.status_code) && raw.status_code != 400 {
        warn!(status = raw.status_code, url = %url, "Unexpected HTTP status from proxycheck");
        return Err(ApiError::UnexpectedStatus {
            url: url.to_string(),
            raw,
        });
    }

    let json = match serde_json::from_str::<serde_json::Value>(&raw.body) {
        Ok(json) if json.is_object() => json,
        Ok(other) => {
            let reason = format!("expected an object, found {}", json_kind(&other));
            return Err(ApiError::MalformedBody {
                url: url.to_string(),
                raw,
                reason,
            });
        }
        Err(e) => {
            return Err(ApiError::MalformedBody {
                url: url.to_string(),
                raw,
                reason: e.to_string(),
            })
        }
    };

    Response::decode_json(&json).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        raw,
        source,
    })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResponseStatus;

    const URL: &str = "https://proxycheck.io/v3/?key=<redacted>";

    fn raw(status_code: u16, body: &str) -> RawResponse {
        RawResponse {
            status_code,
            body: body.to_string(),
        }
    }

    fn client(api_key: Option<&str>) -> ProxyCheckClient {
        let config = Config {
            api_key: api_key.map(str::to_string),
            ..Config::default()
        };
        ProxyCheckClient::new(&config).unwrap()
    }

    #[test]
    fn test_user_agent() {
        assert!(USER_AGENT.starts_with(concat!("proxycheck-rs/", env!("CARGO_PKG_VERSION"))));
        assert!(USER_AGENT.ends_with(")"));
    }

    #[test]
    fn test_request_url() {
        let client = client(Some("s3cr3t"));
        let url = client.request_url(&RequestConfiguration::default());
        assert_eq!(
            url.as_str(),
            "https://proxycheck.io/v3/?key=s3cr3t&ver=12-August-2025&node=0&p=0&days=7"
        );
        assert_eq!(
            client.mask(&url),
            "https://proxycheck.io/v3/?key=<redacted>&ver=12-August-2025&node=0&p=0&days=7"
        );
    }

    #[test]
    fn test_mask_encoded_key() {
        let url = Url::parse("https://h/?key=a%2Bb&tag=x").unwrap();
        assert_eq!(mask_key(&url), "https://h/?key=<redacted>&tag=x");

        let url = Url::parse("https://h/v3/").unwrap();
        assert_eq!(mask_key(&url), "https://h/v3/");
    }

    #[test]
    fn test_mask_short_key_leaves_other_pairs() {
        for key in ["1", "h", "p"] {
            let client = client(Some(key));
            let url = client.request_url(&RequestConfiguration {
                return_node: true,
                ..RequestConfiguration::default()
            });
            assert_eq!(
                client.mask(&url),
                "https://proxycheck.io/v3/?key=<redacted>&ver=12-August-2025&node=1&p=0&days=7",
                "key {key:?}"
            );
        }
    }

    #[test]
    fn test_mask_without_key_pair() {
        let client = client(None);
        let url = client.request_url(&RequestConfiguration::default());
        assert_eq!(
            client.mask(&url),
            "https://proxycheck.io/v3/?ver=12-August-2025&node=0&p=0&days=7"
        );
    }

    #[test]
    fn test_decode_success_body() {
        let response = decode_response(raw(200, r#"{"status":"ok","query_time":3}"#), URL).unwrap();
        assert_eq!(response.status(), ResponseStatus::Ok);
    }

    #[test]
    fn test_bad_request_is_decoded() {
        let response = decode_response(
            raw(400, r#"{"status":"denied","message":"Invalid API key"}"#),
            URL,
        )
        .unwrap();
        assert_eq!(response.status(), ResponseStatus::Denied);
    }

    #[test]
    fn test_http_status_does_not_pick_variant() {
        let response = decode_response(raw(400, r#"{"status":"ok"}"#), URL).unwrap();
        assert!(response.is_successful());
    }

    #[test]
    fn test_unexpected_status() {
        let error = decode_response(raw(503, "Service Unavailable"), URL).unwrap_err();
        assert!(matches!(error, ApiError::UnexpectedStatus { .. }));
        assert_eq!(error.raw_response().map(|r| r.status_code), Some(503));
        assert!(error.to_string().contains("(503)"));
    }

    #[test]
    fn test_malformed_body() {
        let error = decode_response(raw(200, "<html>"), URL).unwrap_err();
        assert!(matches!(error, ApiError::MalformedBody { .. }));

        match decode_response(raw(200, "[1, 2]"), URL) {
            Err(ApiError::MalformedBody { reason, .. }) => {
                assert_eq!(reason, "expected an object, found an array")
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_decode_failure() {
        let error = decode_response(raw(200, "{}"), URL).unwrap_err();
        match &error {
            ApiError::Decode { source, raw, .. } => {
                assert!(matches!(source, CodecError::UnionExhausted { .. }));
                assert_eq!(raw.body, "{}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_redacts_key() {
        let config = Config {
            api_key: Some("s3cr3t".to_string()),
            connection: crate::config::ConnectionConfig {
                endpoint: "http://127.0.0.1:9/v3/".to_string(),
            },
            timeout: crate::config::TimeoutConfig {
                connect_timeout_ms: 500,
                read_timeout_ms: 1000,
            },
            ..Config::default()
        };
        let client = ProxyCheckClient::new(&config).unwrap();
        let addresses = vec!["198.51.100.1".parse().unwrap()];

        let error = client
            .check(&addresses, &RequestConfiguration::default())
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            ApiError::Http { .. } | ApiError::Timeout { .. }
        ));
        assert!(error.raw_response().is_none());
        let message = error.to_string();
        assert!(message.contains(REDACTED));
        assert!(!message.contains("s3cr3t"));
    }
}
