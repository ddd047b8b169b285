mod http;
mod postgres;

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
pub use http::HttpRegistrar;
pub use postgres::PgRegistrar;

use crate::domain::SubscriberEmail;
use crate::utils::error_chain_fmt;
use crate::utils::error_chain_message;

/// Stores (or forwards) a newly submitted address.
///
/// Implementations are interchangeable: the controller and the API only care
/// that a call either succeeds or fails. Chosen at runtime from configuration
/// (see `SignupSettings::registrar`), hence `async_trait` for object safety.
#[async_trait]
pub trait Registrar: Send + Sync {
    async fn register(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), RegistrationError>;
}

#[async_trait]
impl<T: Registrar + ?Sized> Registrar for Arc<T> {
    async fn register(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), RegistrationError> {
        (**self).register(email).await
    }
}

#[derive(thiserror::Error)]
pub enum RegistrationError {
    /// The other side answered, but said no. The message is meant for the
    /// user.
    #[error("{0}")]
    Rejected(String),
    /// The transport gave up on its own, after the given bound
    #[error("Registration request timed out after {0:?}")]
    TimedOut(Duration),
    #[error("Failed to send registration request")]
    Request(#[source] reqwest::Error),
    #[error("Failed to insert subscriber")]
    Database(#[from] sqlx::Error),
}

impl RegistrationError {
    /// Detail to show the user: a rejection's own message, or the cause
    /// chain of a request or database failure. `None` when there is nothing
    /// to say beyond a generic text (timeouts, empty rejections).
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Rejected(message) if message.trim().is_empty() => None,
            Self::Rejected(message) => Some(message.clone()),
            Self::TimedOut(_) => None,
            Self::Request(_) | Self::Database(_) => Some(error_chain_message(self)),
        }
    }

    /// A reqwest timeout surfaces as a timeout (with the client's bound), not
    /// as a request failure
    pub fn from_request(
        e: reqwest::Error,
        timeout: Duration,
    ) -> Self {
        match e.is_timeout() {
            true => Self::TimedOut(timeout),
            false => Self::Request(e),
        }
    }
}

impl Debug for RegistrationError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
