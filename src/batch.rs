//! Bounded-concurrency fan-out of fetch + classify pipelines.
//!
//! Each URL runs as its own tokio task so a panic in one pipeline is caught at
//! the join boundary and turned into a negative entry. `buffer_unordered` keeps
//! at most `concurrency` tasks alive and starts the next URL as soon as any
//! running one finishes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};

use crate::classifier::Classifier;
use crate::config::{ScanConfig, Signatures, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS};
use crate::error::ConfigError;
use crate::fetcher::{FailureReason, FetchOutcome, HttpFetcher, PageFetcher};
use crate::results::{ClassifiedEntry, ResultSet};

/// Runs a URL list through the fetcher and classifier
#[derive(Clone)]
pub struct BatchRunner {
    fetcher: Arc<dyn PageFetcher>,
    classifier: Arc<Classifier>,
    concurrency: usize,
    timeout: Duration,
}

impl BatchRunner {
    pub fn new(fetcher: Arc<dyn PageFetcher>, classifier: Classifier) -> Self {
        Self {
            fetcher,
            classifier: Arc::new(classifier),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Build a runner backed by a real HTTP fetcher
    pub fn from_config(config: &ScanConfig, signatures: &Signatures) -> Result<Self, ConfigError> {
        let fetcher = HttpFetcher::new(config)?;
        let classifier = Classifier::new(signatures)?;
        Ok(Self::new(Arc::new(fetcher), classifier)
            .with_concurrency(config.concurrency)
            .with_timeout(config.timeout))
    }

    /// Maximum in-flight pipelines; zero is treated as one
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Classify every URL, returning one entry per input in completion order
    pub async fn run(&self, urls: Vec<String>) -> ResultSet {
        if urls.is_empty() {
            log::info!("No URLs to scan");
            return ResultSet::default();
        }

        let total = urls.len();
        let started = Instant::now();
        log::info!(
            "🔎 Scanning {} URL(s), up to {} at a time",
            total,
            self.concurrency
        );

        let entries: Vec<ClassifiedEntry> = stream::iter(urls)
            .map(|url| self.spawn_pipeline(url))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let results = ResultSet::new(entries);
        let summary = results.summary();
        log::info!(
            "✅ Scanned {} URL(s) in {:.2?}: {} with chatbot, {} failed",
            summary.total,
            started.elapsed(),
            summary.with_chatbot,
            summary.failed
        );
        results
    }

    async fn spawn_pipeline(&self, url: String) -> ClassifiedEntry {
        let fetcher = Arc::clone(&self.fetcher);
        let classifier = Arc::clone(&self.classifier);
        let timeout = self.timeout;
        let task_url = url.clone();

        let pipeline = tokio::spawn(async move {
            check_url(fetcher.as_ref(), &classifier, &task_url, timeout).await
        });

        match pipeline.await {
            Ok(entry) => entry,
            Err(e) => {
                log::error!("Error processing {}: {}", url, e);
                ClassifiedEntry::failed(url, FailureReason::Other)
            }
        }
    }
}

/// Fetch one URL and classify its body; failures classify as negative
pub async fn check_url(
    fetcher: &dyn PageFetcher,
    classifier: &Classifier,
    url: &str,
    timeout: Duration,
) -> ClassifiedEntry {
    match fetcher.fetch(url, timeout).await {
        FetchOutcome::Success { body, .. } => {
            let has_chatbot = classifier.classify(&body);
            log::debug!("Checked {}: chatbot={}", url, has_chatbot);
            ClassifiedEntry::classified(url, has_chatbot)
        }
        FetchOutcome::Failure(reason) => {
            log::debug!("Checked {}: {}", url, reason);
            ClassifiedEntry::failed(url, reason)
        }
    }
}
