use std::{net::SocketAddr, time::Duration};

use migration::{Migrator, MigratorTrait};
use server::ServerOptions;
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "agri_cms={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let server = settings.server;
    let db = parse_database(&server.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    let bind = server.bind.as_deref().unwrap_or("127.0.0.1");
    let bind: SocketAddr = format!("{bind}:{}", server.port).parse()?;
    let options = ServerOptions {
        bind,
        timezone: settings.app.timezone,
        session_ttl: Duration::from_secs(server.session_ttl_minutes * 60),
        watch_timeout: Duration::from_secs(server.watch_timeout_secs),
    };

    tracing::info!("starting server on {bind}");
    server::run(engine, options).await;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
