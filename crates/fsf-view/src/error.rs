use thiserror::Error;

use crate::controller::SortMode;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    #[error("unknown sort mode '{0}'; expected name, price-low, price-high, or distance")]
    UnknownSortMode(String),

    #[error("sort mode '{mode}' is not offered for {category} listings right now")]
    SortModeUnavailable { mode: SortMode, category: String },

    #[error("nearby filtering needs a resolved location")]
    NearbyUnavailable,

    #[error("radius {radius_km} km is outside [{min_km}, {max_km}]")]
    RadiusOutOfRange {
        radius_km: f64,
        min_km: f64,
        max_km: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map API key not configured")]
    MissingApiKey,

    #[error("map surface failed to render: {0}")]
    Render(String),
}
