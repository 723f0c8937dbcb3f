//! Error types surfaced by the simulation's public constructors.

use thiserror::Error;

/// Errors raised while loading or validating [`Params`](super::params::Params).
#[derive(Debug, Error)]
pub enum ParamsError {
    /// A configuration value cannot be used (e.g. a non-positive cell size).
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Reading or writing a params file failed.
    #[error("params file i/o failed")]
    Io(#[from] std::io::Error),
    /// A params file did not contain valid JSON for [`Params`](super::params::Params).
    #[error("params file is not valid json")]
    Json(#[from] serde_json::Error),
}
