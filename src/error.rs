use std::io;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum FirewallError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Packet queue error: {0}")]
    Queue(#[from] io::Error),

    #[error("Failed to install signal handler: {0}")]
    Signal(String),
}

pub type Result<T> = std::result::Result<T, FirewallError>;
