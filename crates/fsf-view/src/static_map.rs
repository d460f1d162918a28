//! Static-image map surface.
//!
//! Produces a single static map URL with the origin pin and one pin per
//! listing, alongside the [`MapScene`] used for marker inspection.

use fsf_core::{AppConfig, Category, Coordinate};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::error::MapError;
use crate::map::{GeotaggedListing, MapScene, MapSurface, MarkerKind};

const STATIC_MAP_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Characters left readable inside query values; everything else is escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b',')
    .remove(b':');

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticMap {
    pub url: String,
    pub scene: MapScene,
}

#[derive(Clone)]
pub struct StaticMapSurface {
    api_key: Option<String>,
    zoom: u8,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for StaticMapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticMapSurface")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("zoom", &self.zoom)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl StaticMapSurface {
    pub fn new(api_key: Option<String>, zoom: u8) -> Self {
        Self {
            api_key,
            zoom,
            width: 800,
            height: 400,
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(config.maps_api_key.clone(), config.map_zoom)
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    fn url_for(&self, api_key: &str, scene: &MapScene) -> String {
        let encode = |value: &str| utf8_percent_encode(value, QUERY_VALUE).to_string();
        let point = |c: Coordinate| format!("{},{}", c.latitude, c.longitude);

        let mut params = vec![
            ("size", format!("{}x{}", self.width, self.height)),
            ("center", point(scene.origin)),
            ("zoom", self.zoom.to_string()),
            (
                "markers",
                format!(
                    "color:{}|{}",
                    MarkerKind::Origin.color(),
                    point(scene.origin)
                ),
            ),
        ];

        let listing_markers = scene.listing_markers();
        if let Some(first) = listing_markers.first() {
            let points: Vec<String> = listing_markers.iter().map(|m| point(m.position)).collect();
            params.push((
                "markers",
                format!("color:{}|{}", first.kind.color(), points.join("|")),
            ));
        }
        params.push(("key", api_key.to_string()));

        let query: Vec<String> = params
            .iter()
            .map(|(name, value)| format!("{name}={}", encode(value)))
            .collect();
        format!("{STATIC_MAP_ENDPOINT}?{}", query.join("&"))
    }
}

impl MapSurface for StaticMapSurface {
    type Output = StaticMap;

    fn render(
        &mut self,
        origin: Coordinate,
        listings: &[GeotaggedListing],
        category: Category,
    ) -> Result<StaticMap, MapError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(MapError::MissingApiKey)?;
        let scene = MapScene::build(origin, listings, category);
        let url = self.url_for(api_key, &scene);
        tracing::debug!(markers = scene.markers().len(), %category, "static map rendered");
        Ok(StaticMap { url, scene })
    }
}

#[cfg(test)]
mod tests {
    use fsf_core::ListingId;

    use super::*;

    const ORIGIN: Coordinate = Coordinate {
        latitude: 12.9716,
        longitude: 77.5946,
    };

    fn listing(lat: f64, lon: f64) -> GeotaggedListing {
        GeotaggedListing {
            id: ListingId::Number(1),
            coordinate: Coordinate {
                latitude: lat,
                longitude: lon,
            },
            name: "Hope House".to_string(),
            business_name: "Hope House".to_string(),
            address: "12 Church St".to_string(),
            phone: "080-1234".to_string(),
            price: None,
        }
    }

    #[test]
    fn render_without_key_reports_missing_key() {
        let mut surface = StaticMapSurface::new(None, 14);
        let err = surface
            .render(ORIGIN, &[listing(12.98, 77.6)], Category::Shelter)
            .unwrap_err();
        assert_eq!(err, MapError::MissingApiKey);
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut surface = StaticMapSurface::new(Some("  ".to_string()), 14);
        assert_eq!(
            surface.render(ORIGIN, &[], Category::Food).unwrap_err(),
            MapError::MissingApiKey
        );
    }

    #[test]
    fn url_contains_center_zoom_markers_and_key() {
        let mut surface = StaticMapSurface::new(Some("k3y".to_string()), 14);
        let map = surface
            .render(
                ORIGIN,
                &[listing(12.98, 77.6), listing(12.99, 77.61)],
                Category::Shelter,
            )
            .unwrap();

        assert!(map.url.starts_with(STATIC_MAP_ENDPOINT), "{}", map.url);
        assert!(map.url.contains("size=800x400"), "{}", map.url);
        assert!(map.url.contains("center=12.9716,77.5946"), "{}", map.url);
        assert!(map.url.contains("zoom=14"), "{}", map.url);
        assert!(map.url.contains("markers=color:blue%7C12.9716,77.5946"), "{}", map.url);
        assert!(map.url.contains("markers=color:red%7C12.98,77.6%7C12.99,77.61"), "{}", map.url);
        assert!(map.url.ends_with("key=k3y"), "{}", map.url);
        assert_eq!(map.scene.markers().len(), 3);
    }

    #[test]
    fn no_listing_markers_means_origin_only() {
        let mut surface = StaticMapSurface::new(Some("k".to_string()), 10).with_size(400, 200);
        let map = surface.render(ORIGIN, &[], Category::Food).unwrap();
        assert_eq!(map.url.matches("markers=").count(), 1);
        assert!(map.url.contains("size=400x200"));
        assert!(map.url.contains("zoom=10"));
    }

    #[test]
    fn debug_redacts_key() {
        let surface = StaticMapSurface::new(Some("secret".to_string()), 14);
        let debug = format!("{surface:?}");
        assert!(!debug.contains("secret"));
    }
}
