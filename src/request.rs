//! Request parameters and the POST body sent to the lookup endpoint.

use crate::ip::InetAddress;
use serde::{Deserialize, Serialize};
use url::form_urlencoded::byte_serialize;

/// Per-request options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestConfiguration {
    /// Ask the service to pretty-print its JSON.
    #[serde(default)]
    pub pretty_print: bool,

    /// Only consider detections from the last `max_days` days.
    #[serde(default = "default_max_days")]
    pub max_days: u32,

    /// Include the serving node in the response.
    #[serde(default)]
    pub return_node: bool,

    /// Free-form tag shown in the dashboard for this query.
    #[serde(default)]
    pub tag: Option<String>,
}

fn default_max_days() -> u32 {
    7
}

impl Default for RequestConfiguration {
    fn default() -> Self {
        Self {
            pretty_print: false,
            max_days: default_max_days(),
            return_node: false,
            tag: None,
        }
    }
}

impl RequestConfiguration {
    /// Wire parameters for this configuration.
    pub fn to_raw(&self, key: Option<&str>, ver: Option<&str>) -> RawRequestConfiguration {
        RawRequestConfiguration {
            key: key.map(str::to_string),
            ver: ver.map(str::to_string),
            node: Some(u8::from(self.return_node)),
            p: Some(u8::from(self.pretty_print)),
            days: Some(self.max_days),
            tag: self.tag.clone(),
        }
    }
}

/// Query parameters as the service names them. `None` parameters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRequestConfiguration {
    pub key: Option<String>,
    pub ver: Option<String>,
    pub node: Option<u8>,
    pub p: Option<u8>,
    pub days: Option<u32>,
    pub tag: Option<String>,
}

impl RawRequestConfiguration {
    /// Present parameters, in the order `key, ver, node, p, days, tag`.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("key", self.key.clone()),
            ("ver", self.ver.clone()),
            ("node", self.node.map(|v| v.to_string())),
            ("p", self.p.map(|v| v.to_string())),
            ("days", self.days.map(|v| v.to_string())),
            ("tag", self.tag.clone()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect()
    }

    /// `k=v` pairs joined with `&`; empty when nothing is present.
    pub fn to_query_string(&self) -> String {
        self.to_pairs()
            .iter()
            .map(|(name, value)| format!("{}={}", url_encode(name), url_encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// `application/x-www-form-urlencoded` encoding of one component.
pub fn url_encode(input: &str) -> String {
    byte_serialize(input.as_bytes()).collect()
}

/// POST body listing the addresses to check.
pub fn request_body<'a>(addresses: impl IntoIterator<Item = &'a InetAddress>) -> String {
    let joined = addresses
        .into_iter()
        .map(|address| address.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("ips={}", url_encode(&joined))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let raw = RequestConfiguration::default().to_raw(None, None);
        assert_eq!(
            raw,
            RawRequestConfiguration {
                key: None,
                ver: None,
                node: Some(0),
                p: Some(0),
                days: Some(7),
                tag: None,
            }
        );
        assert_eq!(raw.to_query_string(), "node=0&p=0&days=7");
    }

    #[test]
    fn test_query_string_order_and_encoding() {
        let configuration = RequestConfiguration {
            pretty_print: true,
            max_days: 30,
            return_node: true,
            tag: Some("signup form/v2".to_string()),
        };
        let raw = configuration.to_raw(Some("k3y&x"), Some("12-August-2025"));

        assert_eq!(
            raw.to_pairs().iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            vec!["key", "ver", "node", "p", "days", "tag"]
        );
        assert_eq!(
            raw.to_query_string(),
            "key=k3y%26x&ver=12-August-2025&node=1&p=1&days=30&tag=signup+form%2Fv2"
        );
    }

    #[test]
    fn test_empty_query_string() {
        assert_eq!(RawRequestConfiguration::default().to_query_string(), "");
    }

    #[test]
    fn test_request_body() {
        let addresses: Vec<InetAddress> = vec![
            "198.51.100.1".parse().unwrap(),
            "2001:db8::1".parse().unwrap(),
        ];
        assert_eq!(
            request_body(&addresses),
            "ips=198.51.100.1%2C2001%3Adb8%3A%3A1"
        );
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let configuration: RequestConfiguration =
            serde_yaml::from_str("return_node: true\ntag: batch").unwrap();
        assert!(configuration.return_node);
        assert_eq!(configuration.max_days, 7);
        assert_eq!(configuration.tag.as_deref(), Some("batch"));
    }
}
