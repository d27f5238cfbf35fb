use std::net::SocketAddr;
use thiserror::Error;

/// Runtime settings, read from the environment (and `.env` when present).
///
/// | Variable | Default |
/// |----------|---------|
/// | DATABASE_URL | sqlite://cafe.db?mode=rwc |
/// | BIND_ADDR | 0.0.0.0:3000 |
/// | SEED_MENU | false |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub seed_menu: bool,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("BIND_ADDR is not a valid socket address: {0}")]
    BindAddr(String),
    #[error("SEED_MENU must be true or false, got {0}")]
    SeedMenu(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://cafe.db?mode=rwc".into());

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|_| ConfigError::BindAddr(bind_addr))?;

        let seed_menu: bool = match std::env::var("SEED_MENU") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::SeedMenu(value))?,
            Err(_) => false,
        };

        Ok(Self {
            database_url,
            bind_addr,
            seed_menu,
        })
    }
}
