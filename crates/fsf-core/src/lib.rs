pub mod app_config;
pub mod config;
pub mod coordinate;
pub mod listings;
pub mod session;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use coordinate::{Coordinate, Geotagged};
pub use listings::{
    load_listings, parse_listings, Category, FoodListing, ListingId, ListingRecord,
    ListingsFile, ShelterListing,
};
pub use session::{AccessError, Role, Session, User};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
    InvalidCoordinate {
        latitude: f64,
        longitude: f64,
        reason: &'static str,
    },

    #[error("failed to read listings file {path}: {source}")]
    ListingsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse listings file: {0}")]
    ListingsFileParse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("config validation error: {0}")]
    Validation(String),
}
