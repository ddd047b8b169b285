use saas_weekly::configuration::get_configuration;
use saas_weekly::startup::Application;
use saas_weekly::telemetry::get_subscriber;
use saas_weekly::telemetry::init_subscriber;

/// Initialise telemetry, load config, and start the server
#[tokio::main] // requires tokio features: macros, rt-multi-thread
async fn main() -> Result<(), anyhow::Error> {
    // only logs at the specified level and higher are emitted; `RUST_LOG`
    // overrides it
    let subscriber = get_subscriber("saas-weekly", "info", std::io::stdout);
    init_subscriber(subscriber);

    let cfg = get_configuration()?;
    let app = Application::build(cfg).await?;
    tracing::info!("listening on port {}", app.get_port());

    if let Err(e) = app.run_until_stopped().await {
        tracing::error!(error.cause_chain = ?e, error.message = %e, "API failed");
        return Err(e.into());
    }
    tracing::info!("API exited gracefully");
    Ok(())
}
