//! Per-category listing views and the hand-off to map surfaces.

pub mod controller;
pub mod error;
pub mod map;
pub mod static_map;

pub use controller::{
    available_sort_modes, ListingViewController, RadiusControl, SortMode, ViewControls,
    ViewEntry, ViewSettings, ViewState,
};
pub use error::{MapError, ViewError};
pub use map::{
    directions_url, geotagged_listings, present_map, GeotaggedListing, Inspector, MapPanel,
    MapScene, MapSurface, Marker, MarkerId, MarkerKind, PlaceholderReason,
};
pub use static_map::{StaticMap, StaticMapSurface};
