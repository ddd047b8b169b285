use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::web;
use actix_web::web::Data;
use actix_web::App;
use actix_web::HttpServer;
use tracing_actix_web::TracingLogger;

use crate::configuration::get_connection_pool;
use crate::configuration::Settings;
use crate::registration::PgRegistrar;
use crate::registration::Registrar;
use crate::routes::health_check;
use crate::routes::subscribe;

/// Wrapper for actix's `Server` with access to the bound port. Not to be
/// confused with actix's `App`!
pub struct Application {
    /// Left private; use `get_port` to access
    port: u16,
    server: Server,
}

impl Application {
    /// Bind the configured address and store signups in Postgres
    pub async fn build(cfg: Settings) -> Result<Self, anyhow::Error> {
        let pool = get_connection_pool(&cfg.database);
        Self::build_with_registrar(cfg, Arc::new(PgRegistrar::new(pool))).await
    }

    /// Like `build`, with signups going to `registrar` instead
    pub async fn build_with_registrar(
        cfg: Settings,
        registrar: Arc<dyn Registrar>,
    ) -> Result<Self, anyhow::Error> {
        let addr = format!("{}:{}", cfg.application.host, cfg.application.port);
        let listener = TcpListener::bind(addr)?;

        // port 0 lets the OS pick one; keep whatever was assigned
        let port = listener.local_addr()?.port();
        let server = run(listener, registrar)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 { self.port }

    /// Because this consumes `self`, this should be the final function call (or
    /// passed to `tokio::spawn`)
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> { self.server.await }
}

/// The server is not responsible for binding to an address, it only listens to
/// an already bound address.
///
/// Declares all API endpoints.
pub fn run(
    listener: TcpListener,
    registrar: Arc<dyn Registrar>,
) -> Result<Server, anyhow::Error> {
    // `Data` is externally an `Arc`; `from` keeps the trait object as is
    let registrar: Data<dyn Registrar> = Data::from(registrar);

    // each worker builds its own `App` from this closure, hence the clones
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/api/newsletter", web::post().to(subscribe))
            .app_data(registrar.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
