// ── Domain model ──
//
// Subscribers and their preferences come from the store; observed
// conditions and alert results are produced fresh every cycle and
// discarded after notification.

pub mod alert;
pub mod conditions;
pub mod subscriber;

pub use alert::{AlertResult, RuleKind, TriggeredRule};
pub use conditions::{AqiLevel, ObservedConditions};
pub use subscriber::{AlertPreferences, SkipReason, Subscriber};
