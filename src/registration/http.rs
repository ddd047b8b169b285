use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::Url;
use serde::Deserialize;
use serde::Serialize;

use super::Registrar;
use super::RegistrationError;
use crate::domain::SubscriberEmail;

/// Posts the address to the signup API (see `routes::subscribe`).
///
/// Establishing a HTTP connection is expensive, so one `HttpRegistrar` (and
/// its `Client`) should be kept per surface and reused across submissions.
#[derive(Debug)]
pub struct HttpRegistrar {
    http_client: Client,
    endpoint: Url,
    timeout: Duration,
    /// Set for the dialog that resends a past issue
    newsletter_id: Option<String>,
}

impl HttpRegistrar {
    /// `POST <base_url>/api/newsletter`
    pub fn new(
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        Self::build(base_url, "api/newsletter", None, timeout)
    }

    /// `POST <base_url>/api/newsletter/resend`, asking for issue
    /// `newsletter_id` to be sent to the address
    pub fn resend(
        base_url: &str,
        newsletter_id: String,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        Self::build(base_url, "api/newsletter/resend", Some(newsletter_id), timeout)
    }

    fn build(
        base_url: &str,
        path: &str,
        newsletter_id: Option<String>,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let endpoint = Url::parse(base_url)
            .and_then(|url| url.join(path))
            .with_context(|| format!("invalid signup base url: {base_url:?}"))?;
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("could not build http client")?;
        Ok(Self {
            http_client,
            endpoint,
            timeout,
            newsletter_id,
        })
    }

    pub fn endpoint(&self) -> &str { self.endpoint.as_str() }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    newsletter_id: Option<&'a str>,
}

/// Error body returned by the signup API
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[async_trait]
impl Registrar for HttpRegistrar {
    #[tracing::instrument(
        name = "POSTing signup",
        skip(self, email),
        fields(endpoint = %self.endpoint)
    )]
    async fn register(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), RegistrationError> {
        let body = RegisterRequest {
            email: email.as_ref(),
            newsletter_id: self.newsletter_id.as_deref(),
        };

        let resp = self
            .http_client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| RegistrationError::from_request(e, self.timeout))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        // an unreadable body is not an error of its own; fall back to the status
        let message = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                format!(
                    "Erro {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                )
            });
        tracing::warn!(%status, "signup rejected: {message}");
        Err(RegistrationError::Rejected(message))
    }
}
