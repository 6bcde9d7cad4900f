//! Tagged request dispatch: one entry point over the three capability
//! facades, plus the availability report the UI uses to grey out actions.

use crate::config::{GlossaConfig, SessionConfig, TranslateOptions};
use crate::detect::LanguageDetector;
use crate::error::CapabilityResult;
use crate::fallback::DetectionFallback;
use crate::host::{Availability, CapabilityHost, CapabilityKind};
use crate::session::probe;
use crate::summarize::Summarizer;
use crate::translate::Translator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One UI-originated capability request, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CapabilityRequest {
    Translate {
        input: String,
        target: String,
    },
    Summarize {
        input: String,
        /// Select the streamed-then-reconciled path instead of the direct call.
        #[serde(default)]
        stream: bool,
    },
    DetectLanguage {
        input: String,
    },
}

/// Availability of one capability kind, as last probed.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CapabilityReport {
    pub kind: CapabilityKind,
    pub availability: Availability,
}

/// One facade per capability kind behind a single dispatch surface. Each
/// facade owns its sessions; nothing is shared across them.
pub struct CapabilityService {
    host: Arc<dyn CapabilityHost>,
    config: GlossaConfig,
    translator: Translator,
    summarizer: Summarizer,
    detector: LanguageDetector,
}

impl CapabilityService {
    pub fn new(
        host: Arc<dyn CapabilityHost>,
        fallback: Arc<dyn DetectionFallback>,
        config: GlossaConfig,
    ) -> Self {
        let translator = Translator::new(host.clone(), &config);
        let summarizer = Summarizer::new(host.clone(), &config);
        let detector = LanguageDetector::new(host.clone(), fallback);
        Self {
            host,
            config,
            translator,
            summarizer,
            detector,
        }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    pub fn detector(&self) -> &LanguageDetector {
        &self.detector
    }

    pub fn config(&self) -> &GlossaConfig {
        &self.config
    }

    /// Dispatch a tagged request to its facade. Every outcome is data:
    /// a result string or a typed [`crate::CapabilityError`].
    pub async fn request(&self, request: CapabilityRequest) -> CapabilityResult<String> {
        match request {
            CapabilityRequest::Translate { input, target } => {
                self.translator.translate(&input, &target).await
            }
            CapabilityRequest::Summarize { input, stream } => {
                if stream {
                    self.summarizer.summarize_reconciled(&input).await
                } else {
                    self.summarizer.summarize(&input).await
                }
            }
            CapabilityRequest::DetectLanguage { input } => self.detector.detect(&input).await,
        }
    }

    /// Probe every kind with a representative configuration. Advisory: the
    /// host stays the source of truth and may answer differently later.
    pub async fn availability_report(&self) -> Vec<CapabilityReport> {
        let mut reports = Vec::with_capacity(CapabilityKind::ALL.len());
        for kind in CapabilityKind::ALL {
            let config = self.representative_config(kind);
            let availability = probe(self.host.as_ref(), &config).await;
            reports.push(CapabilityReport { kind, availability });
        }
        reports
    }

    fn representative_config(&self, kind: CapabilityKind) -> SessionConfig {
        match kind {
            CapabilityKind::Translate => {
                let target = self
                    .config
                    .supported_languages
                    .iter()
                    .find(|code| **code != self.config.source_language)
                    .unwrap_or(&self.config.source_language)
                    .clone();
                SessionConfig::Translate(TranslateOptions {
                    source: self.config.source_language.clone(),
                    target,
                })
            }
            CapabilityKind::Summarize => SessionConfig::Summarize(self.config.summarizer.clone()),
            CapabilityKind::DetectLanguage => SessionConfig::DetectLanguage,
        }
    }
}
