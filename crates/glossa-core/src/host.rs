//! **Host provider boundary**: the on-device model runtime behind the
//! capability stack.
//!
//! The runtime is injected through [`CapabilityHost`] so every component
//! can run against a real provider or a test double. [`SimulatedHost`] is
//! the in-process stand-in: scripted availability, synthetic download
//! progress, and cumulative snapshot streaming, for running the full
//! lifecycle without a model runtime on the machine.

use crate::config::SessionConfig;
use async_stream::stream;
use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;

/// The closed set of on-device text capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityKind {
    Translate,
    Summarize,
    DetectLanguage,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 3] = [
        CapabilityKind::Translate,
        CapabilityKind::Summarize,
        CapabilityKind::DetectLanguage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::Translate => "translate",
            CapabilityKind::Summarize => "summarize",
            CapabilityKind::DetectLanguage => "detect-language",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host's classification of whether a capability can be used right now.
///
/// One probe call yields one answer; the host may answer differently on a
/// later call (e.g. after a model was downloaded out of band).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    /// The capability cannot be used on this host.
    Unavailable,
    /// Usable immediately, no download needed.
    Readily,
    /// Usable once the model download completes.
    AfterDownload,
}

/// One model-download progress event. Observational only; never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DownloadProgress {
    pub loaded: u64,
    pub total: u64,
}

/// Observer attached to a session while its model downloads.
pub type ProgressMonitor = Box<dyn Fn(DownloadProgress) + Send + Sync>;

/// Opaque fault reported by the host runtime. The facades fold these into
/// the [`crate::CapabilityError`] taxonomy; callers never see this type.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HostError(pub String);

/// Cumulative snapshot stream from a streaming invocation. Each item is
/// the entire result-so-far, not an increment.
pub type SnapshotStream = BoxStream<'static, Result<String, HostError>>;

/// A bound, configured handle to one capability.
///
/// Created in a pending state; [`ready`](HostSession::ready) resolves once
/// the underlying model is usable and the session never goes back. A
/// session serves exactly the configuration it was created with.
#[async_trait]
pub trait HostSession: Send + Sync {
    /// Resolves when the host signals readiness. Must complete before any
    /// invocation on a session created under [`Availability::AfterDownload`].
    async fn ready(&self) -> Result<(), HostError>;

    /// Single-value invocation.
    async fn invoke(&self, input: &str) -> Result<String, HostError>;

    /// Streaming invocation: cumulative snapshots of the result-so-far.
    async fn invoke_streaming(&self, input: &str) -> Result<SnapshotStream, HostError>;
}

/// Host-provided capability provider.
#[async_trait]
pub trait CapabilityHost: Send + Sync {
    /// Availability probe. Absence of the capability is a normal answer,
    /// never an error; safe to call repeatedly.
    async fn availability(&self, kind: CapabilityKind, config: &SessionConfig) -> Availability;

    /// Create a session for `kind` bound to `config`. When `monitor` is
    /// given it receives download progress while the model is fetched.
    async fn create(
        &self,
        kind: CapabilityKind,
        config: &SessionConfig,
        monitor: Option<ProgressMonitor>,
    ) -> Result<Box<dyn HostSession>, HostError>;
}

// -----------------------------------------------------------------------------
// Simulated host: placeholder runtime for tests, demos, and the gateway
// when no real on-device provider is wired in.
// -----------------------------------------------------------------------------

const SIM_MODEL_BYTES: u64 = 64 * 1024 * 1024;

/// In-process placeholder host. Availability is scriptable per kind
/// (default: everything readily available); results are deterministic
/// canned transforms; streaming yields word-by-word cumulative snapshots.
pub struct SimulatedHost {
    availability: DashMap<CapabilityKind, Availability>,
    download_delay: Duration,
    stream_delay: Duration,
    created: AtomicUsize,
    probes: AtomicUsize,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self {
            availability: DashMap::new(),
            download_delay: Duration::ZERO,
            stream_delay: Duration::ZERO,
            created: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
        }
    }

    /// Script the probe answer for one kind.
    pub fn with_availability(self, kind: CapabilityKind, availability: Availability) -> Self {
        self.availability.insert(kind, availability);
        self
    }

    /// Pause inserted while an `AfterDownload` session becomes ready.
    pub fn with_download_delay(mut self, delay: Duration) -> Self {
        self.download_delay = delay;
        self
    }

    /// Pause between streamed snapshots.
    pub fn with_stream_delay(mut self, delay: Duration) -> Self {
        self.stream_delay = delay;
        self
    }

    /// Sessions created so far.
    pub fn sessions_created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Availability probes answered so far.
    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CapabilityHost for SimulatedHost {
    async fn availability(&self, kind: CapabilityKind, _config: &SessionConfig) -> Availability {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.availability
            .get(&kind)
            .map(|entry| *entry.value())
            .unwrap_or(Availability::Readily)
    }

    async fn create(
        &self,
        kind: CapabilityKind,
        config: &SessionConfig,
        monitor: Option<ProgressMonitor>,
    ) -> Result<Box<dyn HostSession>, HostError> {
        let scripted = self
            .availability
            .get(&kind)
            .map(|entry| *entry.value())
            .unwrap_or(Availability::Readily);
        if scripted == Availability::Unavailable {
            return Err(HostError(format!("{} model is not installed", kind)));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SimulatedSession {
            config: config.clone(),
            monitor,
            download_delay: self.download_delay,
            stream_delay: self.stream_delay,
        }))
    }
}

struct SimulatedSession {
    config: SessionConfig,
    monitor: Option<ProgressMonitor>,
    download_delay: Duration,
    stream_delay: Duration,
}

impl SimulatedSession {
    fn render(&self, input: &str) -> String {
        match &self.config {
            SessionConfig::Translate(opts) => {
                format!("[{}->{}] {}", opts.source, opts.target, input)
            }
            SessionConfig::Summarize(opts) => {
                let gist = gist_of(input);
                match opts.format {
                    crate::config::SummaryFormat::Markdown => format!("- {}", gist),
                    crate::config::SummaryFormat::PlainText => gist,
                }
            }
            SessionConfig::DetectLanguage => guess_language(input).to_string(),
        }
    }
}

#[async_trait]
impl HostSession for SimulatedSession {
    async fn ready(&self) -> Result<(), HostError> {
        let step = self.download_delay / 3;
        for loaded in [0, SIM_MODEL_BYTES / 2, SIM_MODEL_BYTES] {
            if let Some(monitor) = &self.monitor {
                monitor(DownloadProgress {
                    loaded,
                    total: SIM_MODEL_BYTES,
                });
            }
            if !step.is_zero() {
                tokio::time::sleep(step).await;
            }
        }
        Ok(())
    }

    async fn invoke(&self, input: &str) -> Result<String, HostError> {
        Ok(self.render(input))
    }

    async fn invoke_streaming(&self, input: &str) -> Result<SnapshotStream, HostError> {
        let full = self.render(input);
        let mut snapshots = Vec::new();
        let mut upto = 0;
        for word in full.split_inclusive(' ') {
            upto += word.len();
            snapshots.push(full[..upto].to_string());
        }
        let delay = self.stream_delay;
        let stream = stream! {
            for snapshot in snapshots {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                yield Ok(snapshot);
            }
        };
        Ok(stream.boxed())
    }
}

/// First dozen words of the input, the way a key-points pass would open.
fn gist_of(input: &str) -> String {
    let words: Vec<&str> = input.split_whitespace().collect();
    if words.len() <= 12 {
        words.join(" ")
    } else {
        format!("{}...", words[..12].join(" "))
    }
}

/// Marker-word language guess. Crude on purpose: the simulated detector
/// only needs plausible answers for demo text, not real coverage.
fn guess_language(text: &str) -> &'static str {
    if text.chars().any(|c| ('\u{0400}'..='\u{04FF}').contains(&c)) {
        return "ru";
    }
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .collect();
    let markers: [(&str, &[&str]); 4] = [
        ("fr", &["bonjour", "merci", "je", "le", "la", "est", "vous"]),
        ("es", &["hola", "gracias", "el", "los", "una", "es", "usted"]),
        ("pt", &["olá", "obrigado", "não", "uma", "você", "bem"]),
        ("tr", &["merhaba", "teşekkür", "bir", "ve", "için", "evet"]),
    ];
    let mut best = ("en", 0usize);
    for (code, lexicon) in markers {
        let hits = words.iter().filter(|w| lexicon.contains(w)).count();
        if hits > best.1 {
            best = (code, hits);
        }
    }
    best.0
}
