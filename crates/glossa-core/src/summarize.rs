//! Summarization facade. Two caller-selectable modes over one session:
//! a direct single-value call, and a streamed mode whose cumulative
//! snapshots are reconciled into non-overlapping deltas.

use crate::config::{GlossaConfig, SessionConfig, SummarizeOptions};
use crate::error::{CapabilityError, CapabilityResult};
use crate::host::CapabilityHost;
use crate::reconcile::{reconcile, DeltaReconciler};
use crate::session::SessionPool;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use std::sync::Arc;
use tracing::debug;

/// Lazy stream of reconciled summary increments.
pub type DeltaStream = BoxStream<'static, CapabilityResult<String>>;

pub struct Summarizer {
    sessions: SessionPool,
    options: SummarizeOptions,
}

impl Summarizer {
    pub fn new(host: Arc<dyn CapabilityHost>, config: &GlossaConfig) -> Self {
        Self::with_options(host, config.summarizer.clone())
    }

    pub fn with_options(host: Arc<dyn CapabilityHost>, options: SummarizeOptions) -> Self {
        Self {
            sessions: SessionPool::new(host),
            options,
        }
    }

    fn session_config(&self) -> SessionConfig {
        SessionConfig::Summarize(self.options.clone())
    }

    fn validate(input: &str) -> CapabilityResult<&str> {
        let text = input.trim();
        if text.is_empty() {
            return Err(CapabilityError::InvalidInput("input text is empty".to_string()));
        }
        Ok(text)
    }

    /// Direct mode: one call, the full summary.
    pub async fn summarize(&self, input: &str) -> CapabilityResult<String> {
        let text = Self::validate(input)?;
        let session = self.sessions.obtain(&self.session_config()).await?;
        session
            .invoke(text)
            .await
            .map_err(|e| CapabilityError::Invocation(e.to_string()))
    }

    /// Streaming mode for streaming-aware callers: lazy reconciled deltas.
    /// Concatenating the deltas reproduces the full summary (snapshot
    /// resets restart the accumulation, see [`DeltaReconciler`]).
    pub async fn summarize_stream(&self, input: &str) -> CapabilityResult<DeltaStream> {
        let text = Self::validate(input)?;
        let session = self.sessions.obtain(&self.session_config()).await?;
        let snapshots = session
            .invoke_streaming(text)
            .await
            .map_err(|e| CapabilityError::Invocation(e.to_string()))?;
        let deltas = reconcile(snapshots)
            .map(|item| item.map_err(|e| CapabilityError::Invocation(e.to_string())));
        Ok(deltas.boxed())
    }

    /// Streamed-then-reconciled mode for non-streaming callers: drives the
    /// snapshot stream to completion and returns the accumulated result.
    pub async fn summarize_reconciled(&self, input: &str) -> CapabilityResult<String> {
        let text = Self::validate(input)?;
        let session = self.sessions.obtain(&self.session_config()).await?;
        let mut snapshots = session
            .invoke_streaming(text)
            .await
            .map_err(|e| CapabilityError::Invocation(e.to_string()))?;
        let mut reconciler = DeltaReconciler::new();
        while let Some(snapshot) = snapshots.next().await {
            let snapshot = snapshot.map_err(|e| CapabilityError::Invocation(e.to_string()))?;
            let delta = reconciler.push(&snapshot);
            debug!(delta_len = delta.len(), "summary snapshot reconciled");
        }
        Ok(reconciler.into_result())
    }
}
