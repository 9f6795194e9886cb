use std::env;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid PORT value '{0}'")]
    InvalidPort(String),
}

/// Server settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    /// Reads `PORT`, falling back to [`DEFAULT_PORT`] when it is unset or invalid.
    pub fn from_env() -> Self {
        let port = match parse_port(env::var("PORT").ok().as_deref()) {
            Ok(Some(port_num)) => {
                info!("Using port {} from environment variable PORT.", port_num);
                port_num
            }
            Ok(None) => {
                info!(
                    "PORT environment variable not set. Using default port {}.",
                    DEFAULT_PORT
                );
                DEFAULT_PORT
            }
            Err(e) => {
                warn!("{} in environment variable. Using default port {}.", e, DEFAULT_PORT);
                DEFAULT_PORT
            }
        };
        Self { port }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_port(raw: Option<&str>) -> Result<Option<u16>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(port_str) => port_str
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidPort(port_str.to_string())),
    }
}
