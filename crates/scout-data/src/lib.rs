//! External data collaborators for Scout.
//!
//! One small typed client per football data source, plus the `DataRouter`
//! that exposes them to the orchestration loop as tools. Clients report
//! "no matching record" as `Ok(None)`, not as an error.

pub mod executor;
pub mod sportsdb;
pub mod wikipedia;

pub use executor::DataRouter;
pub use sportsdb::{PlayerRecord, SportsDbClient, SportsDbConfig};
pub use wikipedia::{WikiSummary, WikipediaClient, WikipediaConfig};

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DataError::Decode(err.to_string())
        } else {
            DataError::Network(err.to_string())
        }
    }
}
