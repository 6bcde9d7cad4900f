//! Runtime configuration: per-kind session options and the stack-wide
//! knobs (supported languages, fallback endpoint). Defaults mirror the
//! shipped UI; `from_env` applies `GLOSSA_*` overrides.

use crate::host::CapabilityKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Target languages offered by default (the UI's language picker).
pub const DEFAULT_SUPPORTED_LANGUAGES: &[&str] = &["en", "pt", "es", "ru", "tr", "fr"];

const DEFAULT_SOURCE_LANGUAGE: &str = "en";
const DEFAULT_FALLBACK_ENDPOINT: &str = "https://libretranslate.com/detect";
const DEFAULT_FALLBACK_TIMEOUT_SECS: u64 = 15;

/// Summary shape requested from the host summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryType {
    KeyPoints,
    #[serde(rename = "tl;dr")]
    Tldr,
    Teaser,
    Headline,
}

impl SummaryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryType::KeyPoints => "key-points",
            SummaryType::Tldr => "tl;dr",
            SummaryType::Teaser => "teaser",
            SummaryType::Headline => "headline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryFormat {
    Markdown,
    PlainText,
}

impl SummaryFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryFormat::Markdown => "markdown",
            SummaryFormat::PlainText => "plain-text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryLength {
    Short,
    Medium,
    Long,
}

impl SummaryLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
        }
    }
}

/// Configuration a translation session is bound to. A session created for
/// one language pair never serves another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslateOptions {
    pub source: String,
    pub target: String,
}

/// Configuration a summarizer session is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SummarizeOptions {
    /// Background the host may use to steer the summary (may be empty).
    pub shared_context: String,
    pub summary_type: SummaryType,
    pub format: SummaryFormat,
    pub length: SummaryLength,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        Self {
            shared_context: String::new(),
            summary_type: SummaryType::KeyPoints,
            format: SummaryFormat::Markdown,
            length: SummaryLength::Medium,
        }
    }
}

/// One session-binding configuration, tagged by capability kind. Doubles
/// as the memoization key in the session pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionConfig {
    Translate(TranslateOptions),
    Summarize(SummarizeOptions),
    DetectLanguage,
}

impl SessionConfig {
    pub fn kind(&self) -> CapabilityKind {
        match self {
            SessionConfig::Translate(_) => CapabilityKind::Translate,
            SessionConfig::Summarize(_) => CapabilityKind::Summarize,
            SessionConfig::DetectLanguage => CapabilityKind::DetectLanguage,
        }
    }
}

impl fmt::Display for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionConfig::Translate(opts) => {
                write!(f, "translate {}->{}", opts.source, opts.target)
            }
            SessionConfig::Summarize(opts) => write!(
                f,
                "summarize {}/{}/{}",
                opts.summary_type.as_str(),
                opts.format.as_str(),
                opts.length.as_str()
            ),
            SessionConfig::DetectLanguage => write!(f, "detect-language"),
        }
    }
}

/// External detection service settings. The wire format is opaque to this
/// core; only the endpoint, key, and deadline are configurable.
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_FALLBACK_ENDPOINT.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_FALLBACK_TIMEOUT_SECS),
        }
    }
}

/// Stack-wide configuration shared by the facades.
#[derive(Debug, Clone)]
pub struct GlossaConfig {
    /// Language codes accepted as translation targets.
    pub supported_languages: Vec<String>,
    /// Source language assumed for translation requests.
    pub source_language: String,
    /// Options every summarizer session is bound to.
    pub summarizer: SummarizeOptions,
    pub fallback: FallbackConfig,
}

impl Default for GlossaConfig {
    fn default() -> Self {
        Self {
            supported_languages: DEFAULT_SUPPORTED_LANGUAGES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            summarizer: SummarizeOptions::default(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl GlossaConfig {
    /// Defaults with `GLOSSA_*` environment overrides applied:
    /// `GLOSSA_SUPPORTED_LANGUAGES` (comma-separated codes),
    /// `GLOSSA_SOURCE_LANGUAGE`, `GLOSSA_SUMMARY_CONTEXT`,
    /// `GLOSSA_DETECT_URL`, `GLOSSA_DETECT_API_KEY`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(langs) = std::env::var("GLOSSA_SUPPORTED_LANGUAGES") {
            let parsed: Vec<String> = langs
                .split(',')
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty())
                .collect();
            if !parsed.is_empty() {
                config.supported_languages = parsed;
            }
        }
        if let Ok(source) = std::env::var("GLOSSA_SOURCE_LANGUAGE") {
            let source = source.trim();
            if !source.is_empty() {
                config.source_language = source.to_string();
            }
        }
        if let Ok(context) = std::env::var("GLOSSA_SUMMARY_CONTEXT") {
            config.summarizer.shared_context = context;
        }
        if let Ok(url) = std::env::var("GLOSSA_DETECT_URL") {
            let url = url.trim();
            if !url.is_empty() {
                config.fallback.endpoint = url.to_string();
            }
        }
        if let Ok(key) = std::env::var("GLOSSA_DETECT_API_KEY") {
            let key = key.trim();
            if !key.is_empty() {
                config.fallback.api_key = Some(key.to_string());
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_ui() {
        let config = GlossaConfig::default();
        assert_eq!(
            config.supported_languages,
            vec!["en", "pt", "es", "ru", "tr", "fr"]
        );
        assert_eq!(config.source_language, "en");
        assert_eq!(config.summarizer.summary_type.as_str(), "key-points");
        assert_eq!(config.summarizer.format.as_str(), "markdown");
        assert_eq!(config.summarizer.length.as_str(), "medium");
    }

    #[test]
    fn session_config_reports_its_kind() {
        let translate = SessionConfig::Translate(TranslateOptions {
            source: "en".to_string(),
            target: "fr".to_string(),
        });
        assert_eq!(translate.kind(), CapabilityKind::Translate);
        assert_eq!(translate.to_string(), "translate en->fr");
        assert_eq!(SessionConfig::DetectLanguage.kind(), CapabilityKind::DetectLanguage);
    }

    #[test]
    fn distinct_targets_are_distinct_keys() {
        let fr = SessionConfig::Translate(TranslateOptions {
            source: "en".to_string(),
            target: "fr".to_string(),
        });
        let es = SessionConfig::Translate(TranslateOptions {
            source: "en".to_string(),
            target: "es".to_string(),
        });
        assert_ne!(fr, es);
    }
}
