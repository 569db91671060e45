//! Error types for privat_rates

use thiserror::Error;

/// Failure to obtain the rate archive for one date
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] Box<ureq::Error>),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<ureq::Error> for FetchError {
    fn from(e: ureq::Error) -> Self {
        FetchError::Transport(Box::new(e))
    }
}

/// Rejected `DAYS` argument
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DaysError {
    #[error("days must be a non-negative whole number")]
    NotANumber,

    #[error("Maximum number of days is {max}")]
    TooMany { max: u8 },
}
