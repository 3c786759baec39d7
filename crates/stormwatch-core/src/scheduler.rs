// ── Cycle scheduling ──
//
// A plain tokio timer loop over `AlertCycleRunner::run_once`. The hourly
// cadence recomputes the delay to the next top of the hour after every
// cycle, so an overrunning cycle skips the missed tick instead of queueing.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cycle::AlertCycleRunner;
use crate::fetcher::ConditionFetcher;
use crate::notify::NotificationSender;
use crate::store::SubscriberStore;

const HOUR: Duration = Duration::from_secs(3600);

/// A wake-up closer than this to the hour belongs to the cycle that just
/// ran, so the next top of the hour is used instead.
const MIN_HOURLY_DELAY: Duration = Duration::from_secs(5);

/// When cycles fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Minute 0 of every hour, UTC wall clock.
    Hourly,
    /// Fixed period measured from scheduler start. A tick missed during a
    /// long cycle fires once, late; later ticks stay on the original grid.
    Every(Duration),
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Hourly => f.write_str("hourly"),
            Cadence::Every(period) => write!(f, "every {}", humantime::format_duration(*period)),
        }
    }
}

/// Time left until the next top of the hour. Exactly on the hour yields a
/// full hour; with under 5 s to go it rolls over to the hour after.
pub fn delay_until_next_hour(now: DateTime<Utc>) -> Duration {
    let elapsed = Duration::from_secs(u64::from(now.minute()) * 60 + u64::from(now.second()))
        // Leap seconds report nanos past 1e9.
        + Duration::from_nanos(u64::from(now.nanosecond().min(999_999_999)));
    let delay = HOUR.saturating_sub(elapsed);
    if delay < MIN_HOURLY_DELAY {
        delay + HOUR
    } else {
        delay
    }
}

pub struct Scheduler<S, F, N> {
    runner: Arc<AlertCycleRunner<S, F, N>>,
    cadence: Cadence,
    run_on_start: bool,
}

impl<S, F, N> Scheduler<S, F, N>
where
    S: SubscriberStore + 'static,
    F: ConditionFetcher + 'static,
    N: NotificationSender + 'static,
{
    pub fn new(runner: Arc<AlertCycleRunner<S, F, N>>, cadence: Cadence) -> Self {
        Self {
            runner,
            cadence,
            run_on_start: false,
        }
    }

    /// Fire one cycle immediately before waiting for the first tick.
    pub fn run_on_start(mut self, enabled: bool) -> Self {
        self.run_on_start = enabled;
        self
    }

    pub fn runner(&self) -> &Arc<AlertCycleRunner<S, F, N>> {
        &self.runner
    }

    /// Loop until the runner's cancellation token fires.
    pub async fn run(self) {
        let cancel = self.runner.cancellation_token().clone();
        info!(cadence = %self.cadence, "scheduler started");

        if self.run_on_start && !cancel.is_cancelled() {
            self.tick().await;
        }

        match self.cadence {
            Cadence::Hourly => loop {
                let delay = delay_until_next_hour(Utc::now());
                debug!(delay = %humantime::format_duration(delay), "next alert cycle scheduled");
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(delay) => self.tick().await,
                }
            },
            Cadence::Every(period) => {
                let mut interval = tokio::time::interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => break,
                        _ = interval.tick() => self.tick().await,
                    }
                }
            }
        }

        info!("scheduler stopped");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn tick(&self) {
        if let Err(e) = self.runner.run_once().await {
            warn!(error = %e, "scheduled alert cycle failed");
        }
    }
}
