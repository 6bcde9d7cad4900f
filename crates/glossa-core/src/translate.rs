//! Translation facade: validation, memoized per-language-pair sessions,
//! and uniform failure mapping around the host translator.

use crate::config::{GlossaConfig, SessionConfig, TranslateOptions};
use crate::error::{CapabilityError, CapabilityResult};
use crate::host::CapabilityHost;
use crate::session::SessionPool;
use std::sync::Arc;
use tracing::debug;

pub struct Translator {
    sessions: SessionPool,
    source_language: String,
    supported: Vec<String>,
}

impl Translator {
    pub fn new(host: Arc<dyn CapabilityHost>, config: &GlossaConfig) -> Self {
        Self {
            sessions: SessionPool::new(host),
            source_language: config.source_language.clone(),
            supported: config.supported_languages.clone(),
        }
    }

    /// Translate `input` from the configured source language into `target`.
    ///
    /// Every outcome is data: the translated text or a typed
    /// [`CapabilityError`]. Invalid requests never reach the host.
    pub async fn translate(&self, input: &str, target: &str) -> CapabilityResult<String> {
        let text = input.trim();
        if text.is_empty() {
            return Err(CapabilityError::InvalidInput("input text is empty".to_string()));
        }
        let target = target.trim();
        if target.is_empty() {
            return Err(CapabilityError::InvalidParams(
                "target language must be a non-empty language code".to_string(),
            ));
        }
        if !self.supported.iter().any(|code| code == target) {
            return Err(CapabilityError::InvalidParams(format!(
                "unsupported target language: {}",
                target
            )));
        }

        let config = SessionConfig::Translate(TranslateOptions {
            source: self.source_language.clone(),
            target: target.to_string(),
        });
        let session = self.sessions.obtain(&config).await?;
        debug!(%config, "invoking translator");
        session
            .invoke(text)
            .await
            .map_err(|e| CapabilityError::Invocation(e.to_string()))
    }
}
