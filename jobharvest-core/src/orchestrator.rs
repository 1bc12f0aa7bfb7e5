use crate::error::{ExtractionError, Result};
use crate::request::ExtractionRequest;
use crate::synthetic::SyntheticFallbackGenerator;
use jobharvest_scanner::{
    CrawlConfig, Extractor, JobRecord, LocalCrawlStrategy, RemoteRenderConfig,
    RemoteRenderStrategy, ScanError, Tier,
};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Per-tier time budgets and output limits
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub remote_timeout: Duration,
    pub crawl_timeout: Duration,
    /// Cap on records returned from a real tier
    pub max_records: Option<NonZeroUsize>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            remote_timeout: Duration::from_secs(45),
            crawl_timeout: Duration::from_secs(90),
            max_records: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub success: bool,
    /// Tier whose records these are
    pub tier: Tier,
    pub jobs: Vec<JobRecord>,
}

impl ExtractionResult {
    pub fn is_synthetic(&self) -> bool {
        self.tier == Tier::Synthetic
    }
}

struct TierSlot {
    extractor: Box<dyn Extractor>,
    timeout: Duration,
}

/// Runs the real tiers in order and falls back to synthetic listings.
///
/// The first tier that yields a titled record ends the run. Tier failures,
/// timeouts and empty pages all advance to the next tier; only cancellation
/// stops the cascade without a result.
pub struct ExtractionOrchestrator {
    tiers: Vec<TierSlot>,
    synthetic: SyntheticFallbackGenerator,
    max_records: Option<NonZeroUsize>,
}

impl Default for ExtractionOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionOrchestrator {
    /// A cascade with no real tiers; it only ever synthesizes
    pub fn new() -> Self {
        Self {
            tiers: Vec::new(),
            synthetic: SyntheticFallbackGenerator::new(),
            max_records: None,
        }
    }

    /// The standard remote -> local -> synthetic cascade. The remote tier is
    /// left out when no render credentials are configured.
    pub fn from_config(
        remote: Option<RemoteRenderConfig>,
        crawl: CrawlConfig,
        config: &OrchestratorConfig,
    ) -> std::result::Result<Self, ScanError> {
        let mut orchestrator = Self::new().with_max_records(config.max_records);

        match remote.filter(|r| !r.api_key.trim().is_empty()) {
            Some(remote) => {
                orchestrator = orchestrator
                    .with_tier(RemoteRenderStrategy::new(remote)?, config.remote_timeout);
            }
            None => info!("No render service key configured, remote tier disabled"),
        }

        Ok(orchestrator.with_tier(LocalCrawlStrategy::new(crawl)?, config.crawl_timeout))
    }

    pub fn with_tier(mut self, extractor: impl Extractor + 'static, timeout: Duration) -> Self {
        self.tiers.push(TierSlot {
            extractor: Box::new(extractor),
            timeout,
        });
        self
    }

    pub fn with_synthetic(mut self, generator: SyntheticFallbackGenerator) -> Self {
        self.synthetic = generator;
        self
    }

    pub fn with_max_records(mut self, max_records: Option<NonZeroUsize>) -> Self {
        self.max_records = max_records;
        self
    }

    /// Configured tiers in the order they run, synthetic last
    pub fn tiers(&self) -> Vec<Tier> {
        self.tiers
            .iter()
            .map(|slot| slot.extractor.tier())
            .chain(std::iter::once(Tier::Synthetic))
            .collect()
    }

    /// Run the cascade to completion. Never fails and never returns an empty result.
    pub async fn extract(&self, request: &ExtractionRequest) -> ExtractionResult {
        match self
            .extract_with_cancel(request, &CancellationToken::new())
            .await
        {
            Ok(result) => result,
            // A fresh token cannot be cancelled
            Err(_) => self.synthesize(request),
        }
    }

    /// Run the cascade, aborting the in-flight tier and skipping the rest once
    /// `cancel` fires
    pub async fn extract_with_cancel(
        &self,
        request: &ExtractionRequest,
        cancel: &CancellationToken,
    ) -> Result<ExtractionResult> {
        for slot in &self.tiers {
            let tier = slot.extractor.tier();
            info!(url = %request.url, tier = %tier, "Entering tier");

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!(url = %request.url, tier = %tier, "Extraction cancelled");
                    return Err(ExtractionError::Cancelled);
                }
                outcome = tokio::time::timeout(
                    slot.timeout,
                    slot.extractor.extract(&request.url, request.keyword.as_deref()),
                ) => outcome,
            };

            let records = match outcome {
                Ok(records) => self.accept(records),
                Err(_) => {
                    warn!(url = %request.url, tier = %tier, timeout = ?slot.timeout, "Tier timed out");
                    continue;
                }
            };

            if records.is_empty() {
                info!(url = %request.url, tier = %tier, "Tier produced no records, advancing");
                continue;
            }

            info!(url = %request.url, tier = %tier, records = records.len(), "Tier succeeded");
            return Ok(ExtractionResult {
                success: true,
                tier,
                jobs: records,
            });
        }

        if cancel.is_cancelled() {
            return Err(ExtractionError::Cancelled);
        }

        warn!(url = %request.url, "All real tiers empty, returning simulated listings");
        Ok(self.synthesize(request))
    }

    fn accept(&self, mut records: Vec<JobRecord>) -> Vec<JobRecord> {
        records.retain(JobRecord::has_title);
        if let Some(max) = self.max_records {
            records.truncate(max.get());
        }
        records
    }

    fn synthesize(&self, request: &ExtractionRequest) -> ExtractionResult {
        ExtractionResult {
            success: true,
            tier: Tier::Synthetic,
            jobs: self
                .synthetic
                .generate(request.keyword.as_deref(), &request.url),
        }
    }
}
