//! Map rendering contract.
//!
//! The view hands a resolved origin plus its geotagged listings to a
//! [`MapSurface`]. Listings without a geotag never reach the surface. When
//! there is nothing sensible to draw, or the surface cannot start, the
//! caller gets a [`MapPanel::Placeholder`] instead of an error.

use fsf_core::{Category, Coordinate, ListingId, ListingRecord};
use fsf_geo::GeoLocationResult;
use serde::Serialize;

use crate::controller::ViewEntry;
use crate::error::MapError;

/// A listing that is guaranteed to have a usable coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeotaggedListing {
    pub id: ListingId,
    pub coordinate: Coordinate,
    pub name: String,
    pub business_name: String,
    pub address: String,
    pub phone: String,
    /// Food only.
    pub price: Option<String>,
}

impl GeotaggedListing {
    #[must_use]
    pub fn from_record<T: ListingRecord>(record: &T) -> Option<Self> {
        let coordinate = record.coordinate()?;
        Some(Self {
            id: record.id().clone(),
            coordinate,
            name: record.name().to_string(),
            business_name: record.business_name().to_string(),
            address: record.address().to_string(),
            phone: record.phone().to_string(),
            price: record.price().map(str::to_string),
        })
    }
}

/// Keep only the listings a map can place, in their current order.
pub fn geotagged_listings<'a, T, I>(records: I) -> Vec<GeotaggedListing>
where
    T: ListingRecord + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter_map(GeotaggedListing::from_record)
        .collect()
}

/// External directions link built from the raw coordinates.
#[must_use]
pub fn directions_url(coordinate: Coordinate) -> String {
    format!(
        "https://maps.google.com/?q={},{}",
        coordinate.latitude, coordinate.longitude
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Origin,
    Food,
    Shelter,
}

impl MarkerKind {
    #[must_use]
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Food => MarkerKind::Food,
            Category::Shelter => MarkerKind::Shelter,
        }
    }

    /// Pin color; the origin is always visually distinct.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            MarkerKind::Origin => "blue",
            MarkerKind::Food => "orange",
            MarkerKind::Shelter => "red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MarkerId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: MarkerId,
    pub kind: MarkerKind,
    pub position: Coordinate,
    pub title: String,
}

/// Details shown when a marker is activated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Inspector {
    Origin {
        coordinates: String,
    },
    Listing {
        name: String,
        business_name: String,
        address: String,
        phone: String,
        price: Option<String>,
        directions_url: String,
    },
}

/// Markers for one render: the origin first, then one per listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub origin: Coordinate,
    pub category: Category,
    markers: Vec<Marker>,
    inspectors: Vec<Inspector>,
}

impl MapScene {
    #[must_use]
    pub fn build(origin: Coordinate, listings: &[GeotaggedListing], category: Category) -> Self {
        let kind = MarkerKind::for_category(category);
        let mut markers = Vec::with_capacity(listings.len() + 1);
        let mut inspectors = Vec::with_capacity(listings.len() + 1);

        markers.push(Marker {
            id: MarkerId(0),
            kind: MarkerKind::Origin,
            position: origin,
            title: "Your Location".to_string(),
        });
        inspectors.push(Inspector::Origin {
            coordinates: origin.to_string(),
        });

        for (idx, listing) in listings.iter().enumerate() {
            markers.push(Marker {
                id: MarkerId(idx + 1),
                kind,
                position: listing.coordinate,
                title: listing.name.clone(),
            });
            inspectors.push(Inspector::Listing {
                name: listing.name.clone(),
                business_name: listing.business_name.clone(),
                address: listing.address.clone(),
                phone: listing.phone.clone(),
                price: match category {
                    Category::Food => listing.price.clone().filter(|p| !p.trim().is_empty()),
                    Category::Shelter => None,
                },
                directions_url: directions_url(listing.coordinate),
            });
        }

        Self {
            origin,
            category,
            markers,
            inspectors,
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn origin_marker(&self) -> &Marker {
        &self.markers[0]
    }

    pub fn listing_markers(&self) -> &[Marker] {
        &self.markers[1..]
    }

    /// Inspector for an activated marker.
    #[must_use]
    pub fn select(&self, id: MarkerId) -> Option<&Inspector> {
        self.inspectors.get(id.0)
    }
}

/// A surface able to draw a [`MapScene`]-style hand-off.
pub trait MapSurface {
    type Output;

    /// Draw the origin and listings.
    ///
    /// # Errors
    ///
    /// [`MapError::MissingApiKey`] when the surface lacks required
    /// configuration, [`MapError::Render`] for any other failure.
    fn render(
        &mut self,
        origin: Coordinate,
        listings: &[GeotaggedListing],
        category: Category,
    ) -> Result<Self::Output, MapError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderReason {
    MissingApiKey,
    NoLocation,
    NoListings,
    Unavailable(String),
}

impl std::fmt::Display for PlaceholderReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceholderReason::MissingApiKey => write!(f, "Map API key not configured"),
            PlaceholderReason::NoLocation => write!(f, "Enable location to view map"),
            PlaceholderReason::NoListings => write!(f, "No listings to show on the map"),
            PlaceholderReason::Unavailable(reason) => write!(f, "Map unavailable: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapPanel<O> {
    Ready(O),
    Placeholder(PlaceholderReason),
}

impl<O> MapPanel<O> {
    pub fn is_ready(&self) -> bool {
        matches!(self, MapPanel::Ready(_))
    }
}

/// Render the current view on `surface`, degrading to a placeholder
/// instead of failing.
pub fn present_map<S, T>(
    surface: &mut S,
    location: &GeoLocationResult,
    category: Category,
    entries: &[ViewEntry<T>],
) -> MapPanel<S::Output>
where
    S: MapSurface,
    T: ListingRecord,
{
    let Some(origin) = location.user_location() else {
        return MapPanel::Placeholder(PlaceholderReason::NoLocation);
    };
    if entries.is_empty() {
        return MapPanel::Placeholder(PlaceholderReason::NoListings);
    }

    let listings = geotagged_listings(entries.iter().map(|e| &e.listing));
    match surface.render(origin, &listings, category) {
        Ok(output) => MapPanel::Ready(output),
        Err(MapError::MissingApiKey) => {
            tracing::warn!("map surface has no API key; showing placeholder");
            MapPanel::Placeholder(PlaceholderReason::MissingApiKey)
        }
        Err(MapError::Render(reason)) => {
            tracing::warn!(%reason, "map surface failed; showing placeholder");
            MapPanel::Placeholder(PlaceholderReason::Unavailable(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(name: &str, lat: f64, lon: f64, price: Option<&str>) -> GeotaggedListing {
        GeotaggedListing {
            id: ListingId::Text(name.to_lowercase()),
            coordinate: Coordinate {
                latitude: lat,
                longitude: lon,
            },
            name: name.to_string(),
            business_name: format!("{name} Co"),
            address: "1 Main Rd".to_string(),
            phone: "555".to_string(),
            price: price.map(str::to_string),
        }
    }

    const ORIGIN: Coordinate = Coordinate {
        latitude: 12.971_598,
        longitude: 77.594_566,
    };

    #[test]
    fn scene_places_origin_first_and_one_marker_per_listing() {
        let listings = vec![
            listing("Pizza Place", 12.98, 77.6, Some("120")),
            listing("Taco Stand", 12.99, 77.61, Some("80")),
        ];
        let scene = MapScene::build(ORIGIN, &listings, Category::Food);

        assert_eq!(scene.markers().len(), 3);
        assert_eq!(scene.origin_marker().kind, MarkerKind::Origin);
        assert_eq!(scene.origin_marker().position, ORIGIN);
        assert_eq!(scene.listing_markers().len(), 2);
        assert!(scene
            .listing_markers()
            .iter()
            .all(|m| m.kind == MarkerKind::Food));
        assert_ne!(MarkerKind::Origin.color(), MarkerKind::Food.color());
        assert_ne!(MarkerKind::Origin.color(), MarkerKind::Shelter.color());
    }

    #[test]
    fn origin_inspector_shows_coordinates() {
        let scene = MapScene::build(ORIGIN, &[], Category::Shelter);
        assert_eq!(
            scene.select(MarkerId(0)),
            Some(&Inspector::Origin {
                coordinates: "12.9716, 77.5946".to_string()
            })
        );
    }

    #[test]
    fn food_inspector_includes_price_and_directions() {
        let listings = vec![listing("Pizza Place", 12.98, 77.6, Some("120"))];
        let scene = MapScene::build(ORIGIN, &listings, Category::Food);
        match scene.select(MarkerId(1)) {
            Some(Inspector::Listing {
                name,
                price,
                directions_url,
                ..
            }) => {
                assert_eq!(name, "Pizza Place");
                assert_eq!(price.as_deref(), Some("120"));
                assert_eq!(directions_url, "https://maps.google.com/?q=12.98,77.6");
            }
            other => panic!("expected listing inspector, got {other:?}"),
        }
    }

    #[test]
    fn shelter_inspector_has_no_price() {
        let listings = vec![listing("Hope House", 12.98, 77.6, Some("ignored"))];
        let scene = MapScene::build(ORIGIN, &listings, Category::Shelter);
        assert!(matches!(
            scene.select(MarkerId(1)),
            Some(Inspector::Listing { price: None, .. })
        ));
        assert_eq!(scene.listing_markers()[0].kind, MarkerKind::Shelter);
    }

    #[test]
    fn food_inspector_hides_blank_price() {
        let listings = vec![
            listing("Soup Kitchen", 12.98, 77.6, Some("")),
            listing("Bread Bank", 12.99, 77.61, Some("   ")),
        ];
        let scene = MapScene::build(ORIGIN, &listings, Category::Food);
        for id in [MarkerId(1), MarkerId(2)] {
            assert!(
                matches!(scene.select(id), Some(Inspector::Listing { price: None, .. })),
                "expected no price, got: {:?}",
                scene.select(id)
            );
        }
    }

    #[test]
    fn unknown_marker_has_no_inspector() {
        let scene = MapScene::build(ORIGIN, &[], Category::Food);
        assert!(scene.select(MarkerId(5)).is_none());
    }

    #[test]
    fn placeholder_messages_are_readable() {
        assert_eq!(
            PlaceholderReason::NoLocation.to_string(),
            "Enable location to view map"
        );
        assert_eq!(
            PlaceholderReason::Unavailable("tiles offline".to_string()).to_string(),
            "Map unavailable: tiles offline"
        );
    }
}
