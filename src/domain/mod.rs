mod subscriber_email;
mod subscription_state;
// allow external `use` statements to skip `subscriber_email` etc
pub use subscriber_email::SubscriberEmail;
pub use subscription_state::Phase;
pub use subscription_state::SubmissionError;
pub use subscription_state::SubscriptionState;
