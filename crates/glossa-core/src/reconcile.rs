//! **Streaming delta reconciliation.**
//!
//! Streaming capabilities emit cumulative snapshots: every item is the
//! entire result-so-far, and consecutive items usually overlap. The
//! reconciler turns that sequence into non-overlapping increments so an
//! accumulating consumer never duplicates text it already has.

use futures_util::{Stream, StreamExt};

/// Single-pass reconciliation state. Stateful across pushes and not
/// restartable; one instance serves exactly one stream.
#[derive(Debug, Default)]
pub struct DeltaReconciler {
    previous: String,
}

impl DeltaReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next cumulative snapshot and get back the increment.
    ///
    /// A snapshot that does not extend its predecessor is treated as a
    /// hard reset: the full snapshot becomes the delta and accumulation
    /// restarts from it. The stream is never failed over this.
    pub fn push(&mut self, snapshot: &str) -> String {
        let delta = match snapshot.strip_prefix(self.previous.as_str()) {
            Some(suffix) => suffix.to_string(),
            None => snapshot.to_string(),
        };
        self.previous = snapshot.to_string();
        delta
    }

    /// The result accumulated so far: the last snapshot seen.
    pub fn result(&self) -> &str {
        &self.previous
    }

    pub fn into_result(self) -> String {
        self.previous
    }
}

/// Adapt a cumulative snapshot stream into a lazy stream of increments.
/// Errors pass through untouched; reconciliation state only advances on
/// successful items.
pub fn reconcile<S, E>(snapshots: S) -> impl Stream<Item = Result<String, E>>
where
    S: Stream<Item = Result<String, E>>,
{
    let mut reconciler = DeltaReconciler::new();
    snapshots.map(move |item| item.map(|snapshot| reconciler.push(&snapshot)))
}
