//! Language-detection facade with the two-tier fallback rule: prefer the
//! on-device detector; when the capability is absent on this host, fall
//! through to the external detection service.

use crate::config::SessionConfig;
use crate::error::{CapabilityError, CapabilityResult};
use crate::fallback::DetectionFallback;
use crate::host::CapabilityHost;
use crate::session::SessionPool;
use std::sync::Arc;
use tracing::warn;

pub struct LanguageDetector {
    sessions: SessionPool,
    fallback: Arc<dyn DetectionFallback>,
}

impl LanguageDetector {
    pub fn new(host: Arc<dyn CapabilityHost>, fallback: Arc<dyn DetectionFallback>) -> Self {
        Self {
            sessions: SessionPool::new(host),
            fallback,
        }
    }

    /// Detect the language of `input`, returning a code such as `"fr"`.
    ///
    /// Fallback applies only to capability absence: a ready on-device
    /// session that faults at call time reports the fault instead of
    /// silently switching services.
    pub async fn detect(&self, input: &str) -> CapabilityResult<String> {
        let text = input.trim();
        if text.is_empty() {
            return Err(CapabilityError::InvalidInput("input text is empty".to_string()));
        }
        match self.sessions.obtain(&SessionConfig::DetectLanguage).await {
            Ok(session) => session
                .invoke(text)
                .await
                .map_err(|e| CapabilityError::Invocation(e.to_string())),
            Err(CapabilityError::Unavailable(_)) => {
                warn!("on-device language detection unavailable; using fallback service");
                self.fallback
                    .detect(text)
                    .await
                    .map_err(|e| CapabilityError::Detection(e.to_string()))
            }
            Err(other) => Err(other),
        }
    }
}
