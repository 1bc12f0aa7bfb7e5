// Tests for the extraction cascade

use async_trait::async_trait;
use jobharvest_core::{
    ExtractionError, ExtractionOrchestrator, ExtractionRequest, OrchestratorConfig,
    SyntheticFallbackGenerator,
};
use jobharvest_scanner::{CrawlConfig, Extractor, JobRecord, RemoteRenderConfig, Tier};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// Stub tiers
// ============================================================================

struct StubTier {
    tier: Tier,
    titles: Vec<&'static str>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl StubTier {
    fn new(tier: Tier, titles: Vec<&'static str>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let stub = Self {
            tier,
            titles,
            delay: Duration::ZERO,
            calls: calls.clone(),
        };
        (stub, calls)
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Extractor for StubTier {
    fn tier(&self) -> Tier {
        self.tier
    }

    async fn extract(&self, url: &Url, _keyword: Option<&str>) -> Vec<JobRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.titles
            .iter()
            .map(|title| JobRecord::new(*title, url.to_string(), format!("Stub ({})", self.tier)))
            .collect()
    }
}

fn request() -> ExtractionRequest {
    ExtractionRequest::parse("https://in.indeed.com/jobs?q=Rust").unwrap()
}

// ============================================================================
// Tier ordering
// ============================================================================

#[tokio::test]
async fn test_remote_success_skips_local() {
    let (remote, remote_calls) = StubTier::new(Tier::Remote, vec!["Remote Job"]);
    let (local, local_calls) = StubTier::new(Tier::Local, vec!["Local Job"]);

    let orchestrator = ExtractionOrchestrator::new()
        .with_tier(remote, Duration::from_secs(5))
        .with_tier(local, Duration::from_secs(5));

    let result = orchestrator.extract(&request()).await;

    assert!(result.success);
    assert_eq!(result.tier, Tier::Remote);
    assert_eq!(result.jobs[0].title, "Remote Job");
    assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
    assert_eq!(local_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_remote_falls_through_to_local() {
    let (remote, _) = StubTier::new(Tier::Remote, vec![]);
    let (local, local_calls) = StubTier::new(Tier::Local, vec!["Local Job"]);

    let orchestrator = ExtractionOrchestrator::new()
        .with_tier(remote, Duration::from_secs(5))
        .with_tier(local, Duration::from_secs(5));

    let result = orchestrator.extract(&request()).await;

    assert_eq!(result.tier, Tier::Local);
    assert_eq!(local_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_blank_titles_do_not_count_as_success() {
    let (remote, _) = StubTier::new(Tier::Remote, vec!["   ", ""]);
    let (local, _) = StubTier::new(Tier::Local, vec!["Real Title"]);

    let orchestrator = ExtractionOrchestrator::new()
        .with_tier(remote, Duration::from_secs(5))
        .with_tier(local, Duration::from_secs(5));

    let result = orchestrator.extract(&request()).await;
    assert_eq!(result.tier, Tier::Local);
}

#[tokio::test]
async fn test_all_tiers_empty_yields_synthetic() {
    let (remote, _) = StubTier::new(Tier::Remote, vec![]);
    let (local, local_calls) = StubTier::new(Tier::Local, vec![]);

    let orchestrator = ExtractionOrchestrator::new()
        .with_tier(remote, Duration::from_secs(5))
        .with_tier(local, Duration::from_secs(5))
        .with_synthetic(SyntheticFallbackGenerator::seeded(42));

    let result = orchestrator.extract(&request()).await;

    assert_eq!(local_calls.load(Ordering::SeqCst), 1);
    assert!(result.success);
    assert!(result.is_synthetic());
    assert!((10..=15).contains(&result.jobs.len()));
    assert!(result.jobs.iter().all(|job| job.source == "Indeed (Simulated)"));
}

#[tokio::test]
async fn test_max_records_caps_real_tiers() {
    let (local, _) = StubTier::new(Tier::Local, vec!["A", "B", "C", "D"]);
    let orchestrator = ExtractionOrchestrator::new()
        .with_tier(local, Duration::from_secs(5))
        .with_max_records(NonZeroUsize::new(2));

    let result = orchestrator.extract(&request()).await;
    assert_eq!(result.jobs.len(), 2);
}

#[tokio::test]
async fn test_smallest_cap_still_keeps_real_records() {
    let (local, _) = StubTier::new(Tier::Local, vec!["Only Listing"]);
    let orchestrator = ExtractionOrchestrator::new()
        .with_tier(local, Duration::from_secs(5))
        .with_max_records(NonZeroUsize::new(1))
        .with_synthetic(SyntheticFallbackGenerator::seeded(3));

    let result = orchestrator.extract(&request()).await;
    assert_eq!(result.tier, Tier::Local);
    assert_eq!(result.jobs.len(), 1);
    assert_eq!(result.jobs[0].title, "Only Listing");
    assert!(!result.jobs[0].is_synthetic());
}

// ============================================================================
// Timeouts and cancellation
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_slow_tier_times_out_and_advances() {
    let (remote, _) = StubTier::new(Tier::Remote, vec!["Too Late"]);
    let remote = remote.slow(Duration::from_secs(120));
    let (local, _) = StubTier::new(Tier::Local, vec!["On Time"]);

    let orchestrator = ExtractionOrchestrator::new()
        .with_tier(remote, Duration::from_secs(10))
        .with_tier(local, Duration::from_secs(10));

    let result = orchestrator.extract(&request()).await;
    assert_eq!(result.tier, Tier::Local);
    assert_eq!(result.jobs[0].title, "On Time");
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let (local, local_calls) = StubTier::new(Tier::Local, vec!["Local Job"]);
    let orchestrator = ExtractionOrchestrator::new().with_tier(local, Duration::from_secs(5));

    let token = CancellationToken::new();
    token.cancel();

    let result = orchestrator.extract_with_cancel(&request(), &token).await;
    assert_eq!(result, Err(ExtractionError::Cancelled));
    assert_eq!(local_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_tier_skips_synthetic() {
    let (remote, _) = StubTier::new(Tier::Remote, vec!["Never"]);
    let remote = remote.slow(Duration::from_secs(60));
    let (local, local_calls) = StubTier::new(Tier::Local, vec!["Never Either"]);

    let orchestrator = ExtractionOrchestrator::new()
        .with_tier(remote, Duration::from_secs(120))
        .with_tier(local, Duration::from_secs(120));

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        canceller.cancel();
    });

    let result = orchestrator.extract_with_cancel(&request(), &token).await;
    assert_eq!(result, Err(ExtractionError::Cancelled));
    assert_eq!(local_calls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Standard cascade against mock services
// ============================================================================

fn quick_crawl() -> CrawlConfig {
    CrawlConfig::default()
        .with_request_delay(Duration::ZERO)
        .with_timeout(Duration::from_secs(5))
}

#[test]
fn test_from_config_without_key_skips_remote() {
    let config = OrchestratorConfig::default();

    let no_remote = ExtractionOrchestrator::from_config(None, quick_crawl(), &config).unwrap();
    assert_eq!(no_remote.tiers(), vec![Tier::Local, Tier::Synthetic]);

    let blank_key = ExtractionOrchestrator::from_config(
        Some(RemoteRenderConfig::new("  ")),
        quick_crawl(),
        &config,
    )
    .unwrap();
    assert_eq!(blank_key.tiers(), vec![Tier::Local, Tier::Synthetic]);

    let keyed = ExtractionOrchestrator::from_config(
        Some(RemoteRenderConfig::new("key")),
        quick_crawl(),
        &config,
    )
    .unwrap();
    assert_eq!(keyed.tiers(), vec![Tier::Remote, Tier::Local, Tier::Synthetic]);
}

#[tokio::test]
async fn test_remote_error_then_local_structured_data() {
    let render = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&render)
        .await;

    let site = MockServer::start().await;
    let html = r#"<script type="application/ld+json">
        {"@type": "JobPosting", "title": "Site Reliability Engineer",
         "hiringOrganization": {"name": "Vandelay"}}
        </script>"#;
    Mock::given(method("GET"))
        .and(path("/careers"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_bytes(html.as_bytes()),
        )
        .mount(&site)
        .await;

    let remote = RemoteRenderConfig::new("key")
        .with_endpoint(format!("{}/v1/", render.uri()))
        .with_timeout(Duration::from_secs(5));
    let orchestrator =
        ExtractionOrchestrator::from_config(Some(remote), quick_crawl(), &OrchestratorConfig::default())
            .unwrap();

    let request = ExtractionRequest::parse(&format!("{}/careers", site.uri())).unwrap();
    let result = orchestrator.extract(&request).await;

    assert_eq!(result.tier, Tier::Local);
    assert_eq!(result.jobs.len(), 1);
    assert_eq!(result.jobs[0].company, "Vandelay");
    assert_eq!(result.jobs[0].source, "External (structured)");
    assert!(!result.jobs[0].is_synthetic());
}

#[tokio::test]
async fn test_unreachable_remote_and_timed_out_crawl_still_returns_listings() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_bytes(b"<html></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&site)
        .await;

    // Nothing listens on port 9
    let remote = RemoteRenderConfig::new("key")
        .with_endpoint("http://127.0.0.1:9/v1/")
        .with_timeout(Duration::from_secs(2));
    let config = OrchestratorConfig {
        remote_timeout: Duration::from_secs(2),
        crawl_timeout: Duration::from_millis(300),
        max_records: None,
    };
    let orchestrator = ExtractionOrchestrator::from_config(Some(remote), quick_crawl(), &config)
        .unwrap()
        .with_synthetic(SyntheticFallbackGenerator::seeded(5));

    let request =
        ExtractionRequest::parse(&format!("{}/search?q=Data%20Scientist", site.uri())).unwrap();
    let result = orchestrator.extract(&request).await;

    assert!(result.success);
    assert!(result.is_synthetic());
    assert!((10..=15).contains(&result.jobs.len()));
    for job in &result.jobs {
        assert!(job.is_synthetic());
        assert!(job.title.ends_with(" Data Scientist"));
        assert_eq!(job.external_link, request.url.to_string());
    }
}
