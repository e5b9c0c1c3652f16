//! Core error type.
//!
//! Everything here is a startup-time failure: a simulation never begins when
//! one of these is returned.

use thiserror::Error;

use crate::LotId;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("lot {0} is configured more than once")]
    DuplicateLot(LotId),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `pk-core`.
pub type CoreResult<T> = Result<T, CoreError>;
