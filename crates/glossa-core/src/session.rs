//! **Session lifecycle**: from an availability answer to a ready,
//! memoized capability session.
//!
//! `probe` asks the host how a capability can be used right now;
//! `bootstrap` turns that answer into a ready session (attaching a
//! download-progress observer when the model has to be fetched);
//! [`SessionPool`] memoizes ready sessions per configuration with an
//! at-most-once bootstrap guard.

use crate::config::SessionConfig;
use crate::error::{CapabilityError, CapabilityResult};
use crate::host::{Availability, CapabilityHost, DownloadProgress, HostSession, ProgressMonitor};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// A ready session shared by the requests of one configuration.
pub type SharedSession = Arc<dyn HostSession>;

/// Ask the host how `config`'s capability can be used right now. Absence
/// is an answer, not an error; the host remains the source of truth and
/// may answer differently on a later call.
pub async fn probe(host: &dyn CapabilityHost, config: &SessionConfig) -> Availability {
    host.availability(config.kind(), config).await
}

/// Turn an availability answer into a ready session.
///
/// One creation attempt, no internal retries, no internal timeout: if the
/// host never signals readiness the caller's future stays pending until it
/// applies its own deadline or drops the request.
pub async fn bootstrap(
    host: &dyn CapabilityHost,
    availability: Availability,
    config: &SessionConfig,
) -> CapabilityResult<SharedSession> {
    let kind = config.kind();
    match availability {
        Availability::Unavailable => {
            warn!(%kind, "capability unavailable on this host");
            Err(CapabilityError::Unavailable(kind))
        }
        Availability::Readily => {
            debug!(%kind, "capability ready immediately");
            let session = host
                .create(kind, config, None)
                .await
                .map_err(|e| CapabilityError::SessionCreation(e.to_string()))?;
            Ok(Arc::from(session))
        }
        Availability::AfterDownload => {
            info!(%kind, "model download required; awaiting readiness");
            let monitor: ProgressMonitor = Box::new(move |progress: DownloadProgress| {
                debug!(
                    %kind,
                    loaded = progress.loaded,
                    total = progress.total,
                    "downloading model"
                );
            });
            let session = host
                .create(kind, config, Some(monitor))
                .await
                .map_err(|e| CapabilityError::SessionCreation(e.to_string()))?;
            session
                .ready()
                .await
                .map_err(|e| CapabilityError::SessionCreation(e.to_string()))?;
            Ok(Arc::from(session))
        }
    }
}

/// Per-configuration session cache with single-flight bootstrap.
///
/// Concurrent requests against the same not-yet-ready configuration await
/// the one in-flight bootstrap instead of creating duplicate sessions. A
/// failed or abandoned bootstrap leaves the slot empty, so the next
/// request re-probes and retries. Ready sessions stay valid for the life
/// of the pool even if the host's availability answer later changes.
pub struct SessionPool {
    host: Arc<dyn CapabilityHost>,
    sessions: DashMap<SessionConfig, Arc<OnceCell<SharedSession>>>,
}

impl SessionPool {
    pub fn new(host: Arc<dyn CapabilityHost>) -> Self {
        Self {
            host,
            sessions: DashMap::new(),
        }
    }

    /// The ready session for `config`, bootstrapping on first use.
    pub async fn obtain(&self, config: &SessionConfig) -> CapabilityResult<SharedSession> {
        let cell = self
            .sessions
            .entry(config.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();
        let session = cell
            .get_or_try_init(|| async {
                let availability = probe(self.host.as_ref(), config).await;
                bootstrap(self.host.as_ref(), availability, config).await
            })
            .await?;
        Ok(session.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslateOptions;
    use crate::host::{CapabilityKind, HostError, SimulatedHost, SnapshotStream};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn translate_config(target: &str) -> SessionConfig {
        SessionConfig::Translate(TranslateOptions {
            source: "en".to_string(),
            target: target.to_string(),
        })
    }

    #[tokio::test]
    async fn bootstrap_unavailable_never_constructs_a_session() {
        let host = SimulatedHost::new();
        let config = translate_config("fr");
        let result = bootstrap(&host, Availability::Unavailable, &config).await;
        assert!(matches!(result, Err(CapabilityError::Unavailable(_))));
        assert_eq!(host.sessions_created(), 0);
    }

    #[tokio::test]
    async fn bootstrap_after_download_awaits_readiness() {
        let host = SimulatedHost::new().with_download_delay(Duration::from_millis(9));
        let config = translate_config("fr");
        let session = bootstrap(&host, Availability::AfterDownload, &config)
            .await
            .unwrap();
        assert_eq!(session.invoke("hello").await.unwrap(), "[en->fr] hello");
    }

    struct FailingHost;

    #[async_trait]
    impl CapabilityHost for FailingHost {
        async fn availability(
            &self,
            _kind: CapabilityKind,
            _config: &SessionConfig,
        ) -> Availability {
            Availability::Readily
        }

        async fn create(
            &self,
            _kind: CapabilityKind,
            _config: &SessionConfig,
            _monitor: Option<ProgressMonitor>,
        ) -> Result<Box<dyn HostSession>, HostError> {
            Err(HostError("model runtime refused the configuration".to_string()))
        }
    }

    #[tokio::test]
    async fn creation_fault_maps_to_session_creation_failed() {
        let config = translate_config("fr");
        let result = bootstrap(&FailingHost, Availability::Readily, &config).await;
        match result {
            Err(CapabilityError::SessionCreation(reason)) => {
                assert!(reason.contains("refused"));
            }
            other => panic!("expected SessionCreation, got {:?}", other.map(|_| ())),
        }
    }

    /// Host whose `create` is slow enough that concurrent callers overlap.
    struct CountingHost {
        created: AtomicUsize,
    }

    struct CountingSession;

    #[async_trait]
    impl HostSession for CountingSession {
        async fn ready(&self) -> Result<(), HostError> {
            Ok(())
        }

        async fn invoke(&self, input: &str) -> Result<String, HostError> {
            Ok(input.to_string())
        }

        async fn invoke_streaming(&self, _input: &str) -> Result<SnapshotStream, HostError> {
            Err(HostError("not streamed in this test".to_string()))
        }
    }

    #[async_trait]
    impl CapabilityHost for CountingHost {
        async fn availability(
            &self,
            _kind: CapabilityKind,
            _config: &SessionConfig,
        ) -> Availability {
            Availability::Readily
        }

        async fn create(
            &self,
            _kind: CapabilityKind,
            _config: &SessionConfig,
            _monitor: Option<ProgressMonitor>,
        ) -> Result<Box<dyn HostSession>, HostError> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingSession))
        }
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_bootstrap() {
        let host = Arc::new(CountingHost {
            created: AtomicUsize::new(0),
        });
        let pool = Arc::new(SessionPool::new(host.clone()));
        let config = translate_config("es");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = pool.clone();
            let config = config.clone();
            handles.push(tokio::spawn(
                async move { pool.obtain(&config).await.is_ok() },
            ));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }
        assert_eq!(host.created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sequential_requests_reuse_the_session() {
        let host = Arc::new(SimulatedHost::new());
        let pool = SessionPool::new(host.clone());
        let config = translate_config("pt");

        pool.obtain(&config).await.unwrap();
        pool.obtain(&config).await.unwrap();
        assert_eq!(host.sessions_created(), 1);
        assert_eq!(host.probes(), 1);
    }

    #[tokio::test]
    async fn distinct_configurations_get_distinct_sessions() {
        let host = Arc::new(SimulatedHost::new());
        let pool = SessionPool::new(host.clone());

        pool.obtain(&translate_config("fr")).await.unwrap();
        pool.obtain(&translate_config("es")).await.unwrap();
        assert_eq!(host.sessions_created(), 2);
    }

    #[tokio::test]
    async fn failed_bootstrap_leaves_the_slot_retryable() {
        let host = Arc::new(
            SimulatedHost::new()
                .with_availability(CapabilityKind::Translate, Availability::Unavailable),
        );
        let pool = SessionPool::new(host.clone());
        let config = translate_config("fr");

        let first = pool.obtain(&config).await;
        assert!(matches!(first, Err(CapabilityError::Unavailable(_))));
        let second = pool.obtain(&config).await;
        assert!(matches!(second, Err(CapabilityError::Unavailable(_))));
        assert_eq!(host.probes(), 2, "each attempt re-probes the host");
    }
}
