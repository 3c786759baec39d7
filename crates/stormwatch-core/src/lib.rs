// stormwatch-core: the alert engine.
//
// Subscribers come from a `SubscriberStore`; each cycle fetches current
// conditions per subscriber city, evaluates the subscriber's enabled rules
// and hands any alert to a `NotificationSender`. The `Scheduler` drives
// cycles on an hourly wall-clock cadence.

pub mod config;
pub mod cycle;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod notify;
pub mod rules;
pub mod scheduler;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_OPENWEATHER_URL, EngineConfig, NotifierSettings, ProviderSettings, TlsVerification};
pub use cycle::{
    AlertCycleRunner, CycleOptions, CycleSummary, FailureStage, SubscriberFailure, SubscriberOutcome,
};
pub use engine::{Engine, build_fetcher, build_notifier, build_runner, build_scheduler};
pub use error::CoreError;
pub use fetcher::{ConditionFetcher, OpenWeatherFetcher};
pub use model::{
    AlertPreferences, AlertResult, AqiLevel, ObservedConditions, RuleKind, SkipReason, Subscriber,
    TriggeredRule,
};
pub use notify::{NotificationSender, Notifier};
pub use rules::evaluate;
pub use scheduler::{Cadence, Scheduler, delay_until_next_hour};
pub use store::{FileStore, MemoryStore, SubscriberStore, UpsertOutcome};

// Re-exported so callers can build a runner without a direct dependency.
pub use tokio_util::sync::CancellationToken;
