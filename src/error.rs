// ABOUTME: Application-wide error types for cert-manager-verifier.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::cluster::ConnectError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("cannot connect to cluster: {0}")]
    Connect(#[from] ConnectError),
}

pub type Result<T> = std::result::Result<T, Error>;
