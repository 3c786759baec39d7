// HTTP mail relay client
//
// Delivers plain-text notification emails through a JSON mail API
// (Resend-compatible): `POST {api_url}/emails` with a bearer token.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::{self, TransportConfig};

/// A single outgoing message. The sender address is fixed per client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// Relay acknowledgement. Some relays answer `202` with an empty body, so
/// the id is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SentEmail {
    #[serde(default)]
    pub id: Option<String>,
}

/// Client for the mail relay.
#[derive(Clone)]
pub struct MailClient {
    http: reqwest::Client,
    api_url: Url,
    api_key: SecretString,
    from: String,
}

impl std::fmt::Debug for MailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailClient")
            .field("api_url", &self.api_url.as_str())
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

impl MailClient {
    pub fn new(
        api_url: &str,
        api_key: SecretString,
        from: String,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(api_url, api_key, from, http)
    }

    pub fn from_reqwest(
        api_url: &str,
        api_key: SecretString,
        from: String,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let api_url = Url::parse(&format!("{}/", api_url.trim_end_matches('/')))?;
        Ok(Self {
            http,
            api_url,
            api_key,
            from,
        })
    }

    /// The configured sender address.
    pub fn from_address(&self) -> &str {
        &self.from
    }

    /// Submit one email to the relay.
    pub async fn send(&self, email: &OutgoingEmail) -> Result<SentEmail, Error> {
        let url = self.api_url.join("emails")?;
        debug!(to = %email.to, "POST {}", url);

        let body = SendEmailRequest {
            from: &self.from,
            to: [email.to.as_str()],
            subject: &email.subject,
            text: &email.text,
        };

        let resp = self
            .http
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let url = transport::redact_query(resp.url());
        let text = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                url,
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(SentEmail::default());
        }

        serde_json::from_str(&text).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: text,
        })
    }
}
