use saas_weekly::configuration::get_configuration;
use saas_weekly::configuration::DatabaseSettings;
use saas_weekly::domain::SubscriberEmail;
use saas_weekly::registration::PgRegistrar;
use saas_weekly::registration::Registrar;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a db with a randomised name, with the migrations in `migrations/`
/// applied, so that each test gets a clean `subscribers` table.
async fn configure_database(cfg: &DatabaseSettings) -> PgPool {
    let mut conn = PgConnection::connect_with(&cfg.connection_without_db())
        .await
        .expect("postgres must be running");

    // unlike `query!`, `Executor` trait must be imported, and query validity is
    // not checked at compile time
    conn.execute(format!(r#"CREATE DATABASE "{}";"#, cfg.database_name).as_str())
        .await
        .unwrap();

    let pool = PgPool::connect_with(cfg.connection()).await.unwrap();
    sqlx::migrate!().run(&pool).await.expect("failed to migrate");
    pool
}

#[tokio::test]
#[ignore = "requires a running postgres"]
async fn register_inserts_once() {
    let mut cfg = get_configuration().unwrap();
    cfg.database.database_name = Uuid::new_v4().to_string();
    let pool = configure_database(&cfg.database).await;

    let registrar = PgRegistrar::new(pool.clone());
    let email = SubscriberEmail::parse("foo@bar.com".to_string()).unwrap();
    registrar.register(&email).await.unwrap();
    // already subscribed; not an error
    registrar.register(&email).await.unwrap();

    let emails: Vec<(String,)> = sqlx::query_as("SELECT email FROM subscribers")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(emails, [("foo@bar.com".to_string(),)]);
}
