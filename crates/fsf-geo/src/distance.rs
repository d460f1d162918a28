//! Haversine distance and the radius/ordering operations built on it.
//!
//! Everything here is pure: inputs are borrowed, results are fresh
//! vectors, and listings without a usable geotag never take part in any
//! arithmetic.

use fsf_core::{Coordinate, Geotagged};

/// Mean Earth radius used for every distance in the system.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Radius applied by [`filter_by_default_radius`].
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Great-circle distance between two points in kilometers, rounded to two
/// decimal places.
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push antipodal pairs a hair above 1.
    let h = h.min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    round_to_hundredths(EARTH_RADIUS_KM * c)
}

/// Distance from `origin` to a listing, if the listing is geotagged.
#[must_use]
pub fn distance_to<T: Geotagged>(origin: Coordinate, item: &T) -> Option<f64> {
    item.coordinate().map(|c| distance_km(origin, c))
}

/// Listings whose geotag lies within `radius_km` of `origin` (inclusive).
///
/// Input order is preserved. Listings without a geotag are never within
/// any radius.
#[must_use]
pub fn filter_by_radius<T>(items: &[T], origin: Coordinate, radius_km: f64) -> Vec<T>
where
    T: Geotagged + Clone,
{
    let kept: Vec<T> = items
        .iter()
        .filter(|item| distance_to(origin, *item).is_some_and(|d| d <= radius_km))
        .cloned()
        .collect();
    tracing::trace!(
        input = items.len(),
        kept = kept.len(),
        radius_km,
        "radius filter applied"
    );
    kept
}

/// [`filter_by_radius`] with [`DEFAULT_RADIUS_KM`].
#[must_use]
pub fn filter_by_default_radius<T>(items: &[T], origin: Coordinate) -> Vec<T>
where
    T: Geotagged + Clone,
{
    filter_by_radius(items, origin, DEFAULT_RADIUS_KM)
}

/// Order listings by ascending distance from `origin`.
///
/// Without an origin the input order is returned untouched. Listings that
/// lack a geotag compare equal to everything, so they stay in the slots
/// they occupied in the input; geotagged listings are stably sorted among
/// the remaining slots.
#[must_use]
pub fn sort_by_distance<T>(items: &[T], origin: Option<Coordinate>) -> Vec<T>
where
    T: Geotagged + Clone,
{
    let Some(origin) = origin else {
        return items.to_vec();
    };

    let mut ranked: Vec<(f64, &T)> = items
        .iter()
        .filter_map(|item| distance_to(origin, item).map(|d| (d, item)))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut ranked = ranked.into_iter().map(|(_, item)| item);
    items
        .iter()
        .map(|item| {
            if item.coordinate().is_some() {
                ranked.next().unwrap_or(item).clone()
            } else {
                item.clone()
            }
        })
        .collect()
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[path = "distance_test.rs"]
mod tests;
