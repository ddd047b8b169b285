use std::process::ExitCode;

use saas_weekly::configuration::get_configuration;
use saas_weekly::controller::SubscriptionController;
use saas_weekly::domain::Phase;
use saas_weekly::notifier::Messages;
use saas_weekly::notifier::TracingNotifier;
use saas_weekly::telemetry::get_subscriber;
use saas_weekly::telemetry::init_subscriber;

const USAGE: &str = "usage: signup <email> [newsletter-id]";

/// Submit one address through the same state machine as the landing page
/// form. With a newsletter id, ask for that past issue to be resent instead.
///
/// ```sh
///     cargo run --bin signup -- john@foo.com | bunyan
///     APP_SIGNUP__TRANSPORT=database cargo run --bin signup -- john@foo.com
/// ```
#[tokio::main]
async fn main() -> Result<ExitCode, anyhow::Error> {
    let subscriber = get_subscriber("signup", "info", std::io::stdout);
    init_subscriber(subscriber);

    let mut args = std::env::args().skip(1);
    let Some(email) = args.next() else {
        eprintln!("{USAGE}");
        return Ok(ExitCode::from(2));
    };
    let newsletter_id = args.next();

    let cfg = get_configuration()?;
    let messages = match &newsletter_id {
        Some(id) => Messages::resend(id),
        None => cfg.signup.messages.clone(),
    };
    let registrar = cfg.signup.registrar(&cfg.database, newsletter_id)?;

    let controller = SubscriptionController::new(registrar, TracingNotifier)
        .with_timeout(cfg.signup.timeout())
        .with_messages(messages);
    controller.set_email(email);
    controller.submit().await;

    match controller.phase() {
        Phase::Submitted => Ok(ExitCode::SUCCESS),
        _ => Ok(ExitCode::FAILURE),
    }
}
