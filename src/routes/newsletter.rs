use std::fmt::Debug;

use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web::ResponseError;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::SubscriberEmail;
use crate::notifier::Messages;
use crate::registration::Registrar;
use crate::registration::RegistrationError;
use crate::utils::error_chain_fmt;

#[derive(Deserialize)]
pub struct SignupRequest {
    email: String,
}

/// Body of every non-2xx response; signup clients show `message` to the user
#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to register new subscriber")]
    RegistrationError(#[source] RegistrationError),
}

impl Debug for SubscribeError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::RegistrationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // the cause chain is logged by `TracingLogger`, not sent to the client
    fn error_response(&self) -> HttpResponse {
        let messages = Messages::default();
        let message = match self {
            Self::ValidationError(_) => messages.invalid_email_title,
            Self::RegistrationError(_) => messages.failure,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { message })
    }
}

/// `POST /api/newsletter`
///
/// Parses the address with the same rule as the signup form, then performs a
/// single registration. Registering an address that is already subscribed
/// succeeds.
///
/// # Request example
///
/// ```sh
///     curl -v --json '{"email": "john@foo.com"}' http://127.0.0.1:8000/api/newsletter
/// ```
#[tracing::instrument(
    name = "Adding new subscriber",
    skip(body, registrar),
    fields(subscriber_email = %body.email)
)]
pub async fn subscribe(
    body: web::Json<SignupRequest>,
    registrar: web::Data<dyn Registrar>,
) -> Result<HttpResponse, SubscribeError> {
    let email = SubscriberEmail::parse(body.into_inner().email)
        .map_err(SubscribeError::ValidationError)?;
    registrar
        .register(&email)
        .await
        .map_err(SubscribeError::RegistrationError)?;
    Ok(HttpResponse::Ok().finish())
}
