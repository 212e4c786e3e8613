pub mod errors;
pub mod types;

pub use errors::{ConfigError, ScoutError};
pub use types::{ChatRequest, ChatResponse, PlayerData};

pub type Result<T> = std::result::Result<T, ScoutError>;
