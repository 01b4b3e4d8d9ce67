// SPDX-License-Identifier: PMPL-1.0-or-later
//! Request-shaping options.
//!
//! These values only shape requests; the client never interprets them.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Options forwarded to the service with a plan or execute request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryOptions {
    /// Stage whose sources serve the query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    /// Paging chunk size for bulk operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub try_all_can: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<(String, serde_json::Value)>>,
}

impl QueryOptions {
    /// Options targeting a single stage.
    pub fn stage(stage: impl Into<String>) -> Self {
        Self {
            stage: Some(stage.into()),
            ..Default::default()
        }
    }
}

/// Response format requested from the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Default,
    Beautiful,
    Light,
}

impl Format {
    /// Value of the `format` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Default => "default",
            Format::Beautiful => "beautiful",
            Format::Light => "light",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(Format::Default),
            "beautiful" => Ok(Format::Beautiful),
            "light" => Ok(Format::Light),
            other => Err(format!(
                "Unknown format '{other}'. Valid formats: default, beautiful, light"
            )),
        }
    }
}

/// Per-call transport options: response format and timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodOptions {
    pub format: Format,
    pub timeout: Duration,
}

impl MethodOptions {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn with_format(self, format: Format) -> Self {
        Self { format, ..self }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }
}

impl Default for MethodOptions {
    fn default() -> Self {
        Self {
            format: Format::Default,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_options_omit_unset_fields() {
        let value = serde_json::to_value(QueryOptions::stage("default")).unwrap();
        assert_eq!(value, json!({"stage": "default"}));

        let value = serde_json::to_value(QueryOptions {
            chunk_size: Some(1000),
            try_all_can: Some(true),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(value, json!({"chunkSize": 1000, "tryAllCan": true}));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("Beautiful".parse::<Format>().unwrap(), Format::Beautiful);
        assert_eq!("light".parse::<Format>().unwrap(), Format::Light);
        assert!("pretty".parse::<Format>().is_err());
        assert_eq!(Format::default().as_str(), "default");
    }

    #[test]
    fn test_format_serde_literals() {
        assert_eq!(serde_json::to_value(Format::Beautiful).unwrap(), json!("beautiful"));
        assert!(serde_json::from_value::<Format>(json!("ugly")).is_err());
    }

    #[test]
    fn test_method_options_defaults() {
        let options = MethodOptions::default();
        assert_eq!(options.format, Format::Default);
        assert_eq!(options.timeout, Duration::from_secs(10));

        let options = options
            .with_format(Format::Light)
            .with_timeout(Duration::from_millis(250));
        assert_eq!(options.format, Format::Light);
        assert_eq!(options.timeout, Duration::from_millis(250));
    }
}
