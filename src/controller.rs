use std::time::Duration;

use tokio::sync::watch;

use crate::domain::Phase;
use crate::domain::SubmissionError;
use crate::domain::SubscriberEmail;
use crate::domain::SubscriptionState;
use crate::notifier::Messages;
use crate::notifier::NotificationKind;
use crate::notifier::Notifier;
use crate::registration::Registrar;
use crate::registration::RegistrationError;

/// How long a registration call may take before it is abandoned
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Drives one signup surface (the landing page form, or the resend dialog):
/// holds the typed address, validates it, registers it through `R`, and
/// reports every terminal transition through `N`.
///
/// State lives in a `watch` channel, so a presentation layer can follow it
/// with `watch()`. All methods take `&self`; the only guard against duplicate
/// submissions is `Phase::Loading`, which is checked and entered in a single
/// update.
pub struct SubscriptionController<R, N> {
    registrar: R,
    notifier: N,
    messages: Messages,
    timeout: Duration,
    state: watch::Sender<SubscriptionState>,
}

/// What `submit` decided before any await point
enum Admission {
    Ignored,
    Rejected,
    Accepted(SubscriberEmail),
}

impl<R, N> SubscriptionController<R, N>
where
    R: Registrar,
    N: Notifier,
{
    pub fn new(
        registrar: R,
        notifier: N,
    ) -> Self {
        let (state, _) = watch::channel(SubscriptionState::default());
        Self {
            registrar,
            notifier,
            messages: Messages::default(),
            timeout: SUBMIT_TIMEOUT,
            state,
        }
    }

    pub fn with_timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_messages(
        mut self,
        messages: Messages,
    ) -> Self {
        self.messages = messages;
        self
    }

    pub fn state(&self) -> SubscriptionState { self.state.borrow().clone() }

    pub fn phase(&self) -> Phase { self.state.borrow().phase }

    /// Follow state changes, e.g. to render idle/loading/submitted views
    pub fn watch(&self) -> watch::Receiver<SubscriptionState> { self.state.subscribe() }

    /// No validation happens here. Editing while a call is in flight does not
    /// affect that call.
    pub fn set_email(
        &self,
        value: impl Into<String>,
    ) {
        let value = value.into();
        self.state.send_modify(|s| s.email = value);
    }

    /// Clear the form, e.g. after a successful signup
    pub fn reset(&self) { self.state.send_replace(SubscriptionState::default()); }

    /// Validate the current address and register it, at most once at a time.
    ///
    /// - `Loading` or `Submitted`: no-op
    /// - invalid address: `InvalidEmail`, phase unchanged, no registration
    /// - otherwise `Loading`, then `Submitted` on success or `Idle` on
    ///   failure/timeout
    ///
    /// Never fails; every outcome ends up in `state()` and the notifier.
    #[tracing::instrument(
        name = "Submitting newsletter signup",
        skip(self),
        fields(subscriber_email = tracing::field::Empty)
    )]
    pub async fn submit(&self) {
        let email = match self.admit() {
            Admission::Ignored => {
                tracing::debug!("submission ignored in phase {:?}", self.phase());
                return;
            }
            Admission::Rejected => {
                self.notifier.notify(
                    NotificationKind::Error,
                    &self.messages.invalid_email_title,
                    &self.messages.invalid_email,
                );
                return;
            }
            Admission::Accepted(email) => email,
        };
        tracing::Span::current().record("subscriber_email", tracing::field::display(&email));

        // if this future is dropped mid-call, the guard puts the phase back to `Idle`
        let in_flight = InFlight {
            state: &self.state,
            armed: true,
        };
        let outcome = tokio::time::timeout(self.timeout, self.registrar.register(&email)).await;
        in_flight.disarm();

        match outcome {
            Ok(Ok(())) => self.succeed(&email),
            Ok(Err(e)) => {
                tracing::error!(error.cause_chain = ?e, error.message = %e, "registration failed");
                let error = match e {
                    RegistrationError::TimedOut(bound) => SubmissionError::Timeout(bound),
                    e => SubmissionError::TransportFailure(
                        e.user_message()
                            .unwrap_or_else(|| self.messages.failure.clone()),
                    ),
                };
                self.fail(error);
            }
            Err(_elapsed) => {
                tracing::error!("registration timed out after {:?}", self.timeout);
                self.fail(SubmissionError::Timeout(self.timeout));
            }
        }
    }

    /// Check the guard, validate, and enter `Loading` in one state update
    fn admit(&self) -> Admission {
        let mut admission = Admission::Ignored;
        self.state.send_if_modified(|s| {
            if s.phase != Phase::Idle {
                return false;
            }
            match SubscriberEmail::parse(s.email.clone()) {
                Ok(email) => {
                    s.phase = Phase::Loading;
                    s.last_error = None;
                    admission = Admission::Accepted(email);
                }
                Err(e) => {
                    tracing::info!("{e}");
                    s.last_error = Some(SubmissionError::InvalidEmail);
                    admission = Admission::Rejected;
                }
            }
            true
        });
        admission
    }

    fn succeed(
        &self,
        email: &SubscriberEmail,
    ) {
        self.state.send_modify(|s| {
            s.phase = Phase::Submitted;
            s.last_error = None;
        });
        self.notifier.notify(
            NotificationKind::Info,
            &self.messages.success_title,
            &self.messages.success_for(email),
        );
    }

    fn fail(
        &self,
        error: SubmissionError,
    ) {
        let message = match &error {
            SubmissionError::Timeout(_) => self.messages.timeout.clone(),
            SubmissionError::TransportFailure(detail) => detail.clone(),
            SubmissionError::InvalidEmail => self.messages.invalid_email.clone(),
        };
        self.state.send_modify(|s| {
            s.phase = Phase::Idle;
            s.last_error = Some(error);
        });
        self.notifier.notify(
            NotificationKind::Error,
            &self.messages.failure_title,
            &message,
        );
    }
}

/// Returns the phase to `Idle` unless disarmed, so that a cancelled `submit`
/// cannot leave the controller stuck in `Loading`
struct InFlight<'a> {
    state: &'a watch::Sender<SubscriptionState>,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) { self.armed = false; }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_modify(|s| s.phase = Phase::Idle);
        }
    }
}
