use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::notifier::Messages;
use crate::registration::HttpRegistrar;
use crate::registration::PgRegistrar;
use crate::registration::Registrar;

/// Global configuration, loaded from `configuration/*.yaml`. See
/// `get_configuration`.
#[derive(Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub signup: SignupSettings,
}

/// Server configuration
#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    /// Should be localhost on dev machine, 0.0.0.0 on prod
    pub host: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

/// Database configuration
#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    pub host: String,

    /// Port for the postgres database, which will be different from that of the
    /// server.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub database_name: String,

    /// Should be `true` in production.
    /// https://www.postgresql.org/docs/current/libpq-ssl.html#LIBPQ-SSL-SSLMODE-STATEMENTS
    pub require_ssl: bool,
}

impl DatabaseSettings {
    /// Return connection to a named database (declared in config file). The db
    /// password is concealed.
    pub fn connection(&self) -> PgConnectOptions {
        self.connection_without_db().database(&self.database_name)
    }

    /// Return connection to the Postgres instance (instead of a specific db),
    /// i.e. `database_name` is unset. This is typically used to init a
    /// randomised db for testing.
    pub fn connection_without_db(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .username(&self.username)
            .password(self.password.expose_secret())
            .host(&self.host)
            .port(self.port)
            .ssl_mode(match self.require_ssl {
                true => sqlx::postgres::PgSslMode::Require,
                false => sqlx::postgres::PgSslMode::Prefer,
            })
    }
}

/// connect_lazy only connects when the pool is used for the first time (this is
/// not async). this allows db-free requests (e.g. health_check) to avoid
/// init'ing the db.
pub fn get_connection_pool(db_cfg: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(db_cfg.connection())
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// POST to the signup API at `base_url`
    Http,
    /// Insert into the subscriber table directly
    Database,
}

/// How signup clients (e.g. the `signup` binary) register an address
#[derive(Deserialize, Clone)]
pub struct SignupSettings {
    pub transport: Transport,

    /// Where the signup API is reachable, e.g. `http://127.0.0.1:8000`
    pub base_url: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,

    #[serde(default)]
    pub messages: Messages,
}

impl SignupSettings {
    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_milliseconds) }

    /// Build the registrar selected by `transport`. `newsletter_id` selects
    /// the resend endpoint, which only the http transport can reach.
    pub fn registrar(
        &self,
        db_cfg: &DatabaseSettings,
        newsletter_id: Option<String>,
    ) -> Result<Arc<dyn Registrar>, anyhow::Error> {
        let registrar: Arc<dyn Registrar> = match (self.transport, newsletter_id) {
            (Transport::Http, None) => Arc::new(HttpRegistrar::new(&self.base_url, self.timeout())?),
            (Transport::Http, Some(id)) => {
                Arc::new(HttpRegistrar::resend(&self.base_url, id, self.timeout())?)
            }
            (Transport::Database, None) => Arc::new(PgRegistrar::new(get_connection_pool(db_cfg))),
            (Transport::Database, Some(id)) => {
                anyhow::bail!("cannot resend newsletter {id}: the database transport only registers subscribers")
            }
        };
        Ok(registrar)
    }
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Display for Environment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Environment::Local => "local",
                Environment::Production => "production",
            }
        )
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!("Invalid APP_ENVIRONMENT: {e}")),
        }
    }
}

/// Load yaml configuration files at `<project_root>/configuration`.
///
/// `base.yaml` is overlaid by `{local,production}.yaml` (chosen by
/// `APP_ENVIRONMENT`, default `local`), then by `APP_`-prefixed env vars:
///
/// `APP_APPLICATION__PORT=5001` -> `Settings.application.port`
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let cfg_dir = current_dir()
        .map_err(|e| ConfigError::Message(format!("could not get current dir: {e}")))?
        .join("configuration");

    let env: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or("local".to_string())
        .try_into()
        .map_err(ConfigError::Message)?;

    tracing::debug!("loading config for {env} env");

    let settings = Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))))
        .add_source(
            // env vars are -always- parsed as String, `serde-aux` is required to
            // parse other types
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
