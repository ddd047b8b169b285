mod health_check;
mod newsletter;

pub use health_check::health_check;
pub use newsletter::subscribe;
pub use newsletter::SignupRequest;
pub use newsletter::SubscribeError;
