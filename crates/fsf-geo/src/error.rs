use thiserror::Error;

/// Why a position could not be obtained.
///
/// The display text is what consumers see in
/// [`GeoLocationResult::Failed`](crate::GeoLocationResult::Failed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Geolocation is not supported by this browser.")]
    Unsupported,

    #[error("User denied Geolocation")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("Timeout expired")]
    Timeout,

    #[error("Location request ended without a result")]
    Aborted,
}
