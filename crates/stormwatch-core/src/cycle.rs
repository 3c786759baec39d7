// ── Alert cycle runner ──
//
// One pass over every subscriber: fetch conditions, evaluate rules, notify
// on any fired rule. Per-subscriber failures are captured as outcomes and
// never abort the pass. Only one cycle runs at a time.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures_util::StreamExt;
use futures_util::stream;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::fetcher::ConditionFetcher;
use crate::model::{ObservedConditions, RuleKind, SkipReason, Subscriber};
use crate::notify::NotificationSender;
use crate::rules;
use crate::store::SubscriberStore;

/// Conditions cached for the lifetime of one cycle, keyed by normalized city.
type CityCache = DashMap<String, ObservedConditions>;

/// Tuning knobs for a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOptions {
    /// Subscribers processed in parallel. `1` is strictly sequential.
    pub concurrency: usize,
    /// Fetch each distinct city once per cycle instead of once per subscriber.
    pub share_city_conditions: bool,
}

impl Default for CycleOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            share_city_conditions: false,
        }
    }
}

/// Drives one alert cycle at a time over the injected collaborators.
pub struct AlertCycleRunner<S, F, N> {
    store: S,
    fetcher: F,
    sender: N,
    options: CycleOptions,
    /// Held for the whole cycle; `try_lock` rejects overlapping runs.
    guard: Mutex<()>,
    cancel: CancellationToken,
}

impl<S, F, N> AlertCycleRunner<S, F, N>
where
    S: SubscriberStore,
    F: ConditionFetcher,
    N: NotificationSender,
{
    pub fn new(store: S, fetcher: F, sender: N) -> Self {
        Self {
            store,
            fetcher,
            sender,
            options: CycleOptions::default(),
            guard: Mutex::new(()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_options(mut self, options: CycleOptions) -> Self {
        self.options = options;
        self
    }

    /// Share a cancellation token (typically with the scheduler).
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn options(&self) -> CycleOptions {
        self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn sender(&self) -> &N {
        &self.sender
    }

    /// Run one complete cycle.
    ///
    /// Fails only when another cycle holds the guard or the subscriber list
    /// cannot be loaded. Everything that goes wrong for an individual
    /// subscriber ends up in the returned summary.
    pub async fn run_once(&self) -> Result<CycleSummary, CoreError> {
        let Ok(_guard) = self.guard.try_lock() else {
            warn!("alert cycle requested while another is running");
            return Err(CoreError::CycleInProgress);
        };

        let started_at = Utc::now();
        let cancelled_early = self.cancel.is_cancelled();
        let subscribers = self.store.list_all().await?;
        info!(subscribers = subscribers.len(), "alert cycle started");

        let cache = self.options.share_city_conditions.then(CityCache::new);
        let pending: Vec<_> = subscribers
            .iter()
            .map(|subscriber| self.process(subscriber, cache.as_ref()))
            .collect();
        let outcomes: Vec<SubscriberOutcome> = stream::iter(pending)
            .buffered(self.options.concurrency.max(1))
            .collect()
            .await;

        let summary = CycleSummary::from_outcomes(
            &subscribers,
            outcomes,
            started_at,
            Utc::now(),
            cancelled_early,
        );
        info!(
            total = summary.total,
            processed = summary.processed,
            skipped = summary.skipped,
            notified = summary.notified,
            quiet = summary.quiet,
            failed = summary.failed,
            cancelled = summary.cancelled,
            "alert cycle finished"
        );
        Ok(summary)
    }

    /// Fetch → evaluate → notify for one subscriber.
    async fn process(&self, subscriber: &Subscriber, cache: Option<&CityCache>) -> SubscriberOutcome {
        if self.cancel.is_cancelled() {
            return SubscriberOutcome::Cancelled;
        }

        let address = subscriber.address.as_str();
        let city = subscriber.city.as_str();

        if let Some(reason) = subscriber.skip_reason() {
            warn!(address, city, %reason, "skipping subscriber with incomplete details");
            return SubscriberOutcome::Skipped(reason);
        }

        let conditions = match self.conditions_for(city, cache).await {
            Ok(conditions) => conditions,
            Err(error) => {
                warn!(address, city, error = %error, "failed to fetch conditions");
                return SubscriberOutcome::FetchFailed(error);
            }
        };

        let result = rules::evaluate(subscriber, &conditions);
        if !result.any_triggered {
            debug!(address, city, "no alert conditions met");
            return SubscriberOutcome::Quiet;
        }

        let kinds = result.kinds();
        match self
            .sender
            .send(address, &result.subject(), &result.message())
            .await
        {
            Ok(()) => {
                info!(address, city, rules = ?kinds, "weather alert sent");
                SubscriberOutcome::Notified(kinds)
            }
            Err(error) => {
                warn!(address, city, error = %error, "failed to send weather alert");
                SubscriberOutcome::SendFailed { rules: kinds, error }
            }
        }
    }

    async fn conditions_for(
        &self,
        city: &str,
        cache: Option<&CityCache>,
    ) -> Result<ObservedConditions, CoreError> {
        let city = city.trim();
        let Some(cache) = cache else {
            return self.fetcher.fetch(city).await;
        };

        let key = city.to_lowercase();
        if let Some(hit) = cache.get(&key) {
            debug!(city, "using conditions fetched earlier this cycle");
            return Ok(hit.value().clone());
        }
        // Failures are not cached; the next subscriber for this city retries.
        let conditions = self.fetcher.fetch(city).await?;
        cache.insert(key, conditions.clone());
        Ok(conditions)
    }
}

// ── Outcomes ─────────────────────────────────────────────────────────

/// What happened to one subscriber during a cycle.
#[derive(Debug)]
pub enum SubscriberOutcome {
    Skipped(SkipReason),
    /// Conditions fetched, no enabled rule fired.
    Quiet,
    Notified(Vec<RuleKind>),
    FetchFailed(CoreError),
    SendFailed {
        rules: Vec<RuleKind>,
        error: CoreError,
    },
    /// Not started because the cycle was cancelled.
    Cancelled,
}

/// Pipeline stage a subscriber failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureStage {
    Fetch,
    Send,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriberFailure {
    pub address: String,
    pub city: String,
    pub stage: FailureStage,
    pub error: String,
}

/// Aggregate result of one cycle, in subscriber list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    /// Subscribers that entered the fetch → evaluate → notify pipeline.
    pub processed: usize,
    pub skipped: usize,
    pub notified: usize,
    pub quiet: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub failures: Vec<SubscriberFailure>,
}

impl CycleSummary {
    pub fn from_outcomes(
        subscribers: &[Subscriber],
        outcomes: Vec<SubscriberOutcome>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        cancel_requested: bool,
    ) -> Self {
        let mut summary = Self {
            started_at,
            finished_at,
            total: subscribers.len(),
            processed: 0,
            skipped: 0,
            notified: 0,
            quiet: 0,
            failed: 0,
            cancelled: cancel_requested,
            failures: Vec::new(),
        };

        for (subscriber, outcome) in subscribers.iter().zip(outcomes) {
            let failure = |stage, error: CoreError| SubscriberFailure {
                address: subscriber.address.clone(),
                city: subscriber.city.clone(),
                stage,
                error: error.to_string(),
            };
            match outcome {
                SubscriberOutcome::Skipped(_) => summary.skipped += 1,
                SubscriberOutcome::Cancelled => summary.cancelled = true,
                SubscriberOutcome::Quiet => {
                    summary.processed += 1;
                    summary.quiet += 1;
                }
                SubscriberOutcome::Notified(_) => {
                    summary.processed += 1;
                    summary.notified += 1;
                }
                SubscriberOutcome::FetchFailed(error) => {
                    summary.processed += 1;
                    summary.failures.push(failure(FailureStage::Fetch, error));
                }
                SubscriberOutcome::SendFailed { error, .. } => {
                    summary.processed += 1;
                    summary.failures.push(failure(FailureStage::Send, error));
                }
            }
        }

        summary.failed = summary.failures.len();
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn duration(&self) -> chrono::TimeDelta {
        self.finished_at - self.started_at
    }
}
