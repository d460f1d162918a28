//! Proximity primitives: great-circle distance, radius filtering,
//! distance ordering, and one-shot acquisition of the user's position.

pub mod distance;
pub mod error;
pub mod geolocation;

pub use distance::{
    distance_km, distance_to, filter_by_default_radius, filter_by_radius, sort_by_distance,
    DEFAULT_RADIUS_KM, EARTH_RADIUS_KM,
};
pub use error::GeolocationError;
pub use geolocation::{
    Delivery, FixedPosition, GeoLocationResult, GeolocationProvider, LocationWatch,
    PositionOptions, PositionSource, Unsupported,
};
