use std::time::Instant;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use tutorsync_api::config::ApiConfig;
use tutorsync_db::{create_pool, schema::initialize_database};

/// Drops the user info part of a connection string before it is logged.
fn redacted(database_url: &str) -> String {
    match (database_url.split_once("://"), database_url.rsplit_once('@')) {
        (Some((scheme, _)), Some((_, host))) => format!("{scheme}://***@{host}"),
        _ => database_url.to_string(),
    }
}

async fn migrate(database_url: &str) -> Result<()> {
    let started = Instant::now();
    info!("Connecting to {}", redacted(database_url));
    let pool = create_pool(database_url).await?;

    initialize_database(&pool).await?;
    info!("Schema ready in {:?}", started.elapsed());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    // Same settings as the server, so both agree on DATABASE_URL
    let config = ApiConfig::from_env()?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    migrate(&config.database_url).await
}
