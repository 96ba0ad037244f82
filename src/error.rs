
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LumetricError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Data corruption: {message}")]
    DataCorruption { message: String },
    #[error("Serialization error for key '{key}': {message}")]
    Serialization { key: String, message: String },
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, LumetricError>;

// Helper conversions
impl From<rusqlite::Error> for LumetricError {
    fn from(e: rusqlite::Error) -> Self { Self::Persistence(e.to_string()) }
}
impl From<serde_json::Error> for LumetricError {
    fn from(e: serde_json::Error) -> Self { Self::DataCorruption { message: e.to_string() } }
}
impl From<config::ConfigError> for LumetricError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
