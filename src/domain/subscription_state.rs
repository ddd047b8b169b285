use std::time::Duration;

/// Lifecycle of a single signup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// A registration call is in flight; further submissions are ignored
    Loading,
    /// The address was registered; `reset` is required before another signup
    Submitted,
}

/// Why the last submission did not reach `Phase::Submitted`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Registration timed out after {0:?}")]
    Timeout(Duration),
    /// Carries the text shown to the user
    #[error("Registration failed: {0}")]
    TransportFailure(String),
}

/// Everything a signup surface renders from. Owned by a single
/// `SubscriptionController`.
///
/// `phase == Submitted` implies `last_error.is_none()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionState {
    /// Raw user input, untrimmed and unvalidated
    pub email: String,
    pub phase: Phase,
    pub last_error: Option<SubmissionError>,
}

impl SubscriptionState {
    pub fn is_loading(&self) -> bool { self.phase == Phase::Loading }

    pub fn is_submitted(&self) -> bool { self.phase == Phase::Submitted }
}
