//! glossa-core: on-device AI text capabilities behind an injected host
//! provider.
//!
//! The stack covers the model session lifecycle end to end: availability
//! probing, asynchronous session bootstrap with download-progress
//! observation, per-configuration single-flight memoization, guarded
//! capability facades (translate, summarize, detect-language) with a
//! uniform error taxonomy, and streaming delta reconciliation of
//! cumulative snapshots. The host runtime and the external detection
//! fallback are both trait-injected so every layer runs against doubles.

mod config;
mod detect;
mod error;
mod fallback;
mod host;
mod reconcile;
mod service;
mod session;
mod summarize;
mod translate;

pub use config::{
    FallbackConfig, GlossaConfig, SessionConfig, SummarizeOptions, SummaryFormat, SummaryLength,
    SummaryType, TranslateOptions, DEFAULT_SUPPORTED_LANGUAGES,
};
pub use detect::LanguageDetector;
pub use error::{CapabilityError, CapabilityResult};
pub use fallback::{DetectionFallback, FallbackError, HttpDetectionFallback};
pub use host::{
    Availability, CapabilityHost, CapabilityKind, DownloadProgress, HostError, HostSession,
    ProgressMonitor, SimulatedHost, SnapshotStream,
};
pub use reconcile::{reconcile, DeltaReconciler};
pub use service::{CapabilityReport, CapabilityRequest, CapabilityService};
pub use session::{bootstrap, probe, SessionPool, SharedSession};
pub use summarize::{DeltaStream, Summarizer};
pub use translate::Translator;
