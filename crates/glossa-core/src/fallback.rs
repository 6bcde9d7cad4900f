//! **External language-detection fallback.**
//!
//! When the on-device detector is unavailable, the detect facade falls
//! through to this collaborator. It is a plain request/response boundary:
//! text in, language code out. The wire format is opaque to the core;
//! transport faults surface as [`FallbackError`] for the facade to fold
//! into its own taxonomy.

use crate::config::FallbackConfig;
use async_trait::async_trait;
use thiserror::Error;

/// Transport-level fault from the fallback service.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct FallbackError(pub String);

/// Request/response language detection.
#[async_trait]
pub trait DetectionFallback: Send + Sync {
    /// Detect the language of `text`, returning a code such as `"fr"`.
    async fn detect(&self, text: &str) -> Result<String, FallbackError>;
}

/// HTTP detection client (LibreTranslate-style `POST {endpoint}` with a
/// `q` field). Accepts both `{"language": ...}` objects and
/// `[{"language": ...}]` candidate arrays in the response.
pub struct HttpDetectionFallback {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpDetectionFallback {
    pub fn new(config: &FallbackConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            client,
        }
    }
}

#[async_trait]
impl DetectionFallback for HttpDetectionFallback {
    async fn detect(&self, text: &str) -> Result<String, FallbackError> {
        let mut body = serde_json::json!({ "q": text });
        if let Some(ref key) = self.api_key {
            body["api_key"] = serde_json::Value::String(key.clone());
        }
        let res = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| FallbackError(format!("detection request failed: {}", e)))?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(FallbackError(format!(
                "detection API error {}: {}",
                status, body
            )));
        }
        let parsed: serde_json::Value = res
            .json()
            .await
            .map_err(|e| FallbackError(format!("detection response parse failed: {}", e)))?;
        extract_language(&parsed)
            .ok_or_else(|| FallbackError("detection response carried no language code".to_string()))
    }
}

fn extract_language(value: &serde_json::Value) -> Option<String> {
    let candidate = match value {
        serde_json::Value::Array(items) => items.first()?,
        other => other,
    };
    candidate
        .get("language")
        .and_then(|v| v.as_str())
        .map(|code| code.to_string())
}
