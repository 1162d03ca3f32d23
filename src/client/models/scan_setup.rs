//! Dynamic scan setup models

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error text FoD returns for releases whose application cannot be DAST scanned
const NOT_WEB_APPLICATION: &str = "not a web / thick-client";

/// Dynamic scan configuration of a release.
///
/// FoD leaves fields it has no value for as `null`; those become empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicScanConfig {
    #[serde(rename = "dynamicSiteURL", default, deserialize_with = "lenient_string")]
    pub site_url: Option<String>,

    /// INTERNAL or EXTERNAL
    #[serde(
        rename = "dynamicScanEnvironmentFacingType",
        default,
        deserialize_with = "lenient_string"
    )]
    pub environment_facing_type: Option<String>,

    #[serde(
        rename = "dynamicScanAuthenticationType",
        default,
        deserialize_with = "lenient_string"
    )]
    pub authentication_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub primary_user_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub secondary_user_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub other_user_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub time_zone: Option<String>,

    /// SingleScan or Subscription
    #[serde(default, deserialize_with = "lenient_string")]
    pub entitlement_frequency_type: Option<String>,
}

impl DynamicScanConfig {
    /// Site URL when it is set and non-empty
    pub fn site_url(&self) -> Option<&str> {
        self.site_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Accept scalar JSON values as text; FoD is not consistent about enum encodings.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::de::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
        Float(f64),
        Flag(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(s) => s,
        Scalar::Integer(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Flag(b) => b.to_string(),
    }))
}

/// Classified response of the scan-setup endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanSetup {
    /// The release has a dynamic scan configuration
    Configured(DynamicScanConfig),

    /// The release's application is not a web / thick-client application
    NotApplicable,

    /// Anything else the endpoint returned, with the reason it was rejected
    Malformed(String),
}

impl ScanSetup {
    /// Classify a raw scan-setup response body.
    ///
    /// The FoD error envelope (`{"success": false, "errors": [...]}`) is checked
    /// before the configuration shape, since every configuration field is optional
    /// and the envelope would otherwise decode as an empty configuration.
    pub fn from_body(body: &str) -> Self {
        let value: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => return ScanSetup::Malformed(format!("response is not JSON: {}", e)),
        };

        let Some(object) = value.as_object() else {
            return ScanSetup::Malformed("response is not a JSON object".to_string());
        };

        let failed = object.get("success").and_then(Value::as_bool) == Some(false);
        let has_errors = object
            .get("errors")
            .and_then(Value::as_array)
            .is_some_and(|errors| !errors.is_empty());
        if failed || has_errors {
            let messages = error_messages(object.get("errors"));
            if messages
                .iter()
                .any(|m| m.to_lowercase().contains(NOT_WEB_APPLICATION))
            {
                return ScanSetup::NotApplicable;
            }
            return ScanSetup::Malformed(if messages.is_empty() {
                "request was not successful".to_string()
            } else {
                messages.join("; ")
            });
        }

        match serde_json::from_value::<DynamicScanConfig>(value) {
            Ok(config) => ScanSetup::Configured(config),
            Err(e) => ScanSetup::Malformed(format!("unexpected configuration shape: {}", e)),
        }
    }

    /// The configuration, when there is one
    #[cfg(test)]
    pub fn config(&self) -> Option<&DynamicScanConfig> {
        match self {
            ScanSetup::Configured(config) => Some(config),
            _ => None,
        }
    }
}

/// Error entries are plain strings on most endpoints and `{"message": ...}` objects on others
fn error_messages(errors: Option<&Value>) -> Vec<String> {
    errors
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(o) => o.get("message").and_then(Value::as_str).map(String::from),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}
