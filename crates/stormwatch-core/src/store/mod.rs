// ── Subscriber storage ──
//
// Plain data plumbing: list everything, upsert by address. The engine only
// ever reads; upserts come from the CLI.

mod file;
mod memory;

use std::future::Future;

use serde::Serialize;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::CoreError;
use crate::model::Subscriber;

/// Whether an upsert created a new subscriber or replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

pub trait SubscriberStore: Send + Sync {
    /// Every subscriber, in insertion order.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Subscriber>, CoreError>> + Send + '_;

    /// Insert or replace the subscriber with the same address.
    fn upsert(
        &self,
        subscriber: Subscriber,
    ) -> impl Future<Output = Result<UpsertOutcome, CoreError>> + Send + '_;
}

/// Subscribers are keyed by their trimmed address.
fn validate(subscriber: &mut Subscriber) -> Result<(), CoreError> {
    let address = subscriber.address.trim();
    if address.is_empty() {
        return Err(CoreError::Validation {
            message: "address must not be empty".into(),
        });
    }
    subscriber.address = address.to_owned();
    subscriber.city = subscriber.city.trim().to_owned();
    Ok(())
}
