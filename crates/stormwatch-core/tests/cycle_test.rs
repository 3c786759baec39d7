#![allow(clippy::unwrap_used)]
// Alert cycle behaviour against in-process fakes.

mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use stormwatch_core::{
    AlertCycleRunner, AlertPreferences, CoreError, CycleOptions, FailureStage, MemoryStore,
};

use common::{FakeFetcher, RecordingSender, conditions, pleasant, rain_only, rainy, subscriber};

type TestRunner = AlertCycleRunner<MemoryStore, FakeFetcher, RecordingSender>;

fn runner(
    subscribers: Vec<stormwatch_core::Subscriber>,
    fetcher: FakeFetcher,
    sender: RecordingSender,
) -> TestRunner {
    AlertCycleRunner::new(MemoryStore::with_subscribers(subscribers), fetcher, sender)
}

// ── Core scenarios ──────────────────────────────────────────────────

#[tokio::test]
async fn test_rain_in_pune_sends_one_alert() {
    let runner = runner(
        vec![subscriber("a@x.com", "Pune", rain_only())],
        FakeFetcher::new().with("Pune", rainy()),
        RecordingSender::new(),
    );

    let summary = runner.run_once().await.unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.notified, 1);
    assert_eq!(summary.failed, 0);

    let sent = runner.sender().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "a@x.com");
    assert!(sent[0].subject.contains("Pune"));
    assert_eq!(
        sent[0].body,
        "Weather Alert for Pune:\nIt's currently raining or drizzling.\n"
    );
}

#[tokio::test]
async fn test_no_enabled_flags_sends_nothing() {
    let runner = runner(
        vec![subscriber("a@x.com", "Pune", AlertPreferences::default())],
        FakeFetcher::new().with("Pune", conditions("Rain", 2.0, 95.0, 5)),
        RecordingSender::new(),
    );

    let summary = runner.run_once().await.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.quiet, 1);
    assert_eq!(summary.notified, 0);
    assert!(runner.sender().sent().is_empty());
}

#[tokio::test]
async fn test_incomplete_subscribers_are_skipped_without_calls() {
    let runner = runner(
        vec![
            subscriber("a@x.com", "", rain_only()),
            subscriber("", "Pune", rain_only()),
            subscriber("c@x.com", "   ", rain_only()),
        ],
        FakeFetcher::new().with("Pune", rainy()),
        RecordingSender::new(),
    );

    let summary = runner.run_once().await.unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.processed, 0);
    assert!(runner.fetcher().calls().is_empty());
    assert!(runner.sender().sent().is_empty());
}

#[tokio::test]
async fn test_provider_failure_does_not_stop_next_subscriber() {
    let runner = runner(
        vec![
            subscriber("a@x.com", "Atlantis", rain_only()),
            subscriber("b@x.com", "Pune", rain_only()),
        ],
        FakeFetcher::new().with("Pune", rainy()),
        RecordingSender::new(),
    );

    let summary = runner.run_once().await.unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.notified, 1);
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failures[0].address, "a@x.com");
    assert_eq!(summary.failures[0].city, "Atlantis");
    assert_eq!(summary.failures[0].stage, FailureStage::Fetch);
    assert!(summary.failures[0].error.contains("404"));

    let sent = runner.sender().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "b@x.com");
}

#[tokio::test]
async fn test_send_failure_is_recorded_and_isolated() {
    let runner = runner(
        vec![
            subscriber("a@x.com", "Pune", rain_only()),
            subscriber("b@x.com", "Pune", rain_only()),
        ],
        FakeFetcher::new().with("Pune", rainy()),
        RecordingSender::new().failing_for("a@x.com"),
    );

    let summary = runner.run_once().await.unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.notified, 1);
    assert_eq!(summary.failures[0].stage, FailureStage::Send);
    assert!(summary.failures[0].error.contains("relay unavailable"));
    assert_eq!(runner.sender().sent()[0].to, "b@x.com");
}

#[tokio::test]
async fn test_severe_weather_alone_never_notifies() {
    let runner = runner(
        vec![subscriber(
            "a@x.com",
            "Pune",
            AlertPreferences {
                severe_weather: true,
                ..Default::default()
            },
        )],
        FakeFetcher::new().with("Pune", conditions("Thunderstorm", 41.0, 95.0, 5)),
        RecordingSender::new(),
    );

    let summary = runner.run_once().await.unwrap();

    assert_eq!(summary.quiet, 1);
    assert!(runner.sender().sent().is_empty());
}

#[tokio::test]
async fn test_multi_rule_message_lists_each_fragment() {
    let runner = runner(
        vec![subscriber(
            "a@x.com",
            "Delhi",
            AlertPreferences {
                temp_above_30: true,
                humidity_above_80: true,
                poor_air_quality: true,
                ..Default::default()
            },
        )],
        FakeFetcher::new().with("Delhi", conditions("Haze", 38.0, 85.0, 5)),
        RecordingSender::new(),
    );

    runner.run_once().await.unwrap();

    let body = &runner.sender().sent()[0].body;
    assert_eq!(
        body,
        "Weather Alert for Delhi:\n\
         Temperature is above 30°C.\n\
         Humidity is above 80%.\n\
         Air Quality Index (AQI) is Poor or worse (Current AQI: 5, Very Poor).\n"
    );
}

#[tokio::test]
async fn test_empty_store_is_a_quiet_cycle() {
    let runner = runner(Vec::new(), FakeFetcher::new(), RecordingSender::new());
    let summary = runner.run_once().await.unwrap();
    assert_eq!(summary.total, 0);
    assert!(!summary.has_failures());
    assert!(!summary.cancelled);
}

// ── Ordering and concurrency ────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_concurrent_cycle_keeps_list_order() {
    let runner = runner(
        vec![
            subscriber("a@x.com", "Lima", rain_only()),
            subscriber("b@x.com", "Oslo", rain_only()),
            subscriber("c@x.com", "Kyiv", rain_only()),
            subscriber("d@x.com", "Rome", rain_only()),
        ],
        FakeFetcher::new()
            .slow("Lima", Duration::from_secs(30))
            .slow("Oslo", Duration::from_secs(10))
            .slow("Kyiv", Duration::from_secs(20))
            .with("Rome", pleasant()),
        RecordingSender::new(),
    )
    .with_options(CycleOptions {
        concurrency: 4,
        share_city_conditions: false,
    });

    let summary = runner.run_once().await.unwrap();

    let failed: Vec<&str> = summary.failures.iter().map(|f| f.address.as_str()).collect();
    assert_eq!(failed, vec!["a@x.com", "b@x.com", "c@x.com"]);
    assert_eq!(summary.quiet, 1);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_cycle_is_rejected() {
    let runner = Arc::new(runner(
        vec![subscriber("a@x.com", "Pune", rain_only())],
        FakeFetcher::new()
            .with("Pune", rainy())
            .slow("Pune", Duration::from_secs(60)),
        RecordingSender::new(),
    ));

    let first = tokio::spawn({
        let runner = Arc::clone(&runner);
        async move { runner.run_once().await }
    });
    tokio::time::sleep(Duration::from_secs(1)).await;

    let second = runner.run_once().await;
    assert!(matches!(second, Err(CoreError::CycleInProgress)));

    let summary = first.await.unwrap().unwrap();
    assert_eq!(summary.notified, 1);

    // Guard is released once the first cycle finishes.
    assert!(runner.run_once().await.is_ok());
}

// ── Cancellation ────────────────────────────────────────────────────

#[tokio::test]
async fn test_cancelled_before_start_processes_nothing() {
    let runner = runner(
        vec![
            subscriber("a@x.com", "Pune", rain_only()),
            subscriber("b@x.com", "Pune", rain_only()),
        ],
        FakeFetcher::new().with("Pune", rainy()),
        RecordingSender::new(),
    );
    runner.cancellation_token().cancel();

    let summary = runner.run_once().await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.processed, 0);
    assert!(runner.fetcher().calls().is_empty());
    assert!(runner.sender().sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_mid_cycle_finishes_current_subscriber() {
    let runner = Arc::new(runner(
        vec![
            subscriber("a@x.com", "Pune", rain_only()),
            subscriber("b@x.com", "Lima", rain_only()),
        ],
        FakeFetcher::new()
            .with("Pune", rainy())
            .slow("Pune", Duration::from_secs(10))
            .with("Lima", rainy()),
        RecordingSender::new(),
    ));

    let cycle = tokio::spawn({
        let runner = Arc::clone(&runner);
        async move { runner.run_once().await }
    });
    tokio::time::sleep(Duration::from_secs(5)).await;
    runner.cancellation_token().cancel();

    let summary = cycle.await.unwrap().unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.notified, 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(runner.fetcher().calls(), vec!["Pune"]);
    assert_eq!(runner.sender().sent()[0].to, "a@x.com");
}

// ── Per-cycle city sharing ──────────────────────────────────────────

#[tokio::test]
async fn test_each_subscriber_fetches_by_default() {
    let runner = runner(
        vec![
            subscriber("a@x.com", "Pune", rain_only()),
            subscriber("b@x.com", "pune", rain_only()),
        ],
        FakeFetcher::new().with("Pune", rainy()),
        RecordingSender::new(),
    );

    runner.run_once().await.unwrap();
    assert_eq!(runner.fetcher().calls().len(), 2);
}

#[tokio::test]
async fn test_shared_city_conditions_fetch_once_per_city() {
    let runner = runner(
        vec![
            subscriber("a@x.com", "Pune", rain_only()),
            subscriber("b@x.com", " pune ", rain_only()),
            subscriber("c@x.com", "Lima", rain_only()),
        ],
        FakeFetcher::new().with("Pune", rainy()).with("Lima", pleasant()),
        RecordingSender::new(),
    )
    .with_options(CycleOptions {
        concurrency: 1,
        share_city_conditions: true,
    });

    let summary = runner.run_once().await.unwrap();

    assert_eq!(runner.fetcher().calls(), vec!["Pune", "Lima"]);
    assert_eq!(summary.notified, 2);
    assert_eq!(summary.quiet, 1);
}

#[tokio::test]
async fn test_failed_fetch_is_not_shared() {
    let runner = runner(
        vec![
            subscriber("a@x.com", "Atlantis", rain_only()),
            subscriber("b@x.com", "Atlantis", rain_only()),
        ],
        FakeFetcher::new(),
        RecordingSender::new(),
    )
    .with_options(CycleOptions {
        concurrency: 1,
        share_city_conditions: true,
    });

    let summary = runner.run_once().await.unwrap();

    assert_eq!(runner.fetcher().calls().len(), 2);
    assert_eq!(summary.failed, 2);
}
