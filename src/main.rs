use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cafe_central::{app, config::Config, connect, entities::seed_menu};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run().await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let db = connect(&config.database_url).await?;
    if config.seed_menu {
        seed_menu(&db).await?;
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Running at {}", listener.local_addr()?);
    axum::serve(listener, app(db)).await?;
    Ok(())
}
