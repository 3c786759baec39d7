// ── Notification dispatch ──

use std::future::Future;

use stormwatch_api::{MailClient, OutgoingEmail};
use tracing::{debug, warn};

use crate::error::CoreError;

/// Delivers one text message to one address. No retries.
pub trait NotificationSender: Send + Sync {
    fn send<'a>(
        &'a self,
        to: &'a str,
        subject: &'a str,
        body: &'a str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send + 'a;
}

/// The concrete senders the engine can be configured with.
#[derive(Debug, Clone)]
pub enum Notifier {
    /// Dry run: log the notification and report success.
    Log,
    /// Deliver through the mail relay API.
    Relay(MailClient),
}

impl NotificationSender for Notifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), CoreError> {
        match self {
            Notifier::Log => {
                warn!(%to, %subject, %body, "mail relay disabled, not sending notification");
                Ok(())
            }
            Notifier::Relay(client) => {
                let email = OutgoingEmail {
                    to: to.to_owned(),
                    subject: subject.to_owned(),
                    text: body.to_owned(),
                };
                let sent = client.send(&email).await.map_err(|e| CoreError::Send {
                    to: to.to_owned(),
                    message: e.to_string(),
                })?;
                debug!(%to, id = ?sent.id, "notification accepted by relay");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_notifier_always_succeeds() {
        Notifier::Log
            .send("a@x.com", "Weather Alert for Pune", "body")
            .await
            .expect("log sender never fails");
    }
}
