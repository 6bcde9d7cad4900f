//! End-to-end lifecycle tests: probe, download-gated bootstrap, facade
//! dispatch, and streaming reconciliation through the public surface.

use async_trait::async_trait;
use futures_util::StreamExt;
use glossa_core::{
    reconcile, Availability, CapabilityKind, CapabilityRequest, CapabilityService, DetectionFallback,
    FallbackError, GlossaConfig, SimulatedHost,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::ReceiverStream;

struct StaticFallback(&'static str);

#[async_trait]
impl DetectionFallback for StaticFallback {
    async fn detect(&self, _text: &str) -> Result<String, FallbackError> {
        Ok(self.0.to_string())
    }
}

fn downloading_host() -> Arc<SimulatedHost> {
    Arc::new(
        SimulatedHost::new()
            .with_availability(CapabilityKind::Translate, Availability::AfterDownload)
            .with_availability(CapabilityKind::Summarize, Availability::AfterDownload)
            .with_download_delay(Duration::from_millis(12)),
    )
}

#[tokio::test]
async fn download_gated_capabilities_become_usable() {
    let host = downloading_host();
    let service = CapabilityService::new(
        host.clone(),
        Arc::new(StaticFallback("en")),
        GlossaConfig::default(),
    );

    let report = service.availability_report().await;
    let translate = report
        .iter()
        .find(|r| r.kind == CapabilityKind::Translate)
        .expect("translate kind reported");
    assert_eq!(translate.availability, Availability::AfterDownload);

    // First request drives create + download + readiness; the second reuses
    // the now-ready session.
    let translated = service
        .request(CapabilityRequest::Translate {
            input: "hello".to_string(),
            target: "tr".to_string(),
        })
        .await
        .expect("translate after download");
    assert_eq!(translated, "[en->tr] hello");

    service
        .request(CapabilityRequest::Translate {
            input: "again".to_string(),
            target: "tr".to_string(),
        })
        .await
        .expect("second translate");
    assert_eq!(host.sessions_created(), 1);
}

#[tokio::test]
async fn streamed_summary_matches_the_direct_call() {
    let host = downloading_host();
    let service = CapabilityService::new(
        host,
        Arc::new(StaticFallback("en")),
        GlossaConfig::default(),
    );
    let input = "Researchers catalogued the retreat of mountain glaciers over forty years.";

    let direct = service
        .summarizer()
        .summarize(input)
        .await
        .expect("direct summary");
    let mut deltas = service
        .summarizer()
        .summarize_stream(input)
        .await
        .expect("delta stream");
    let mut accumulated = String::new();
    while let Some(delta) = deltas.next().await {
        accumulated.push_str(&delta.expect("delta"));
    }
    assert_eq!(accumulated, direct);
}

#[tokio::test]
async fn detection_falls_back_when_the_host_lacks_the_capability() {
    let host = Arc::new(
        SimulatedHost::new()
            .with_availability(CapabilityKind::DetectLanguage, Availability::Unavailable),
    );
    let service = CapabilityService::new(
        host,
        Arc::new(StaticFallback("fr")),
        GlossaConfig::default(),
    );
    let code = service
        .request(CapabilityRequest::DetectLanguage {
            input: "Bonjour".to_string(),
        })
        .await
        .expect("fallback detection");
    assert_eq!(code, "fr");
}

#[tokio::test]
async fn reconciliation_keeps_up_with_a_push_style_stream() {
    // Hosts that push snapshots over a channel reconcile the same as
    // pull-style streams.
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<String, FallbackError>>(4);
    let producer = tokio::spawn(async move {
        for snapshot in ["Key", "Key points", "Key points follow"] {
            tx.send(Ok(snapshot.to_string())).await.expect("send snapshot");
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    });

    let deltas: Vec<String> = reconcile(ReceiverStream::new(rx))
        .map(|item| item.expect("snapshot"))
        .collect()
        .await;
    producer.await.expect("producer");
    assert_eq!(deltas, vec!["Key", " points", " follow"]);
    assert_eq!(deltas.concat(), "Key points follow");
}
