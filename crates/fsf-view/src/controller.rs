//! Listing view controller.
//!
//! Combines text search, the nearby radius filter, and the selected sort
//! mode into one derived view for a single listing category. The derived
//! view is a pure projection of [`ViewState`] and the current
//! [`GeoLocationResult`]; the controller recomputes it in full whenever any
//! input changes.

use std::cmp::Ordering;
use std::str::FromStr;

use fsf_core::{AppConfig, Category, Coordinate, ListingRecord, Session};
use fsf_geo::{distance_to, filter_by_radius, sort_by_distance, GeoLocationResult};
use serde::{Deserialize, Serialize};

use crate::error::ViewError;
use crate::map::{present_map, MapPanel, MapSurface};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    Name,
    PriceLow,
    PriceHigh,
    Distance,
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::Name => write!(f, "name"),
            SortMode::PriceLow => write!(f, "price-low"),
            SortMode::PriceHigh => write!(f, "price-high"),
            SortMode::Distance => write!(f, "distance"),
        }
    }
}

impl FromStr for SortMode {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortMode::Name),
            "price-low" => Ok(SortMode::PriceLow),
            "price-high" => Ok(SortMode::PriceHigh),
            "distance" => Ok(SortMode::Distance),
            other => Err(ViewError::UnknownSortMode(other.to_string())),
        }
    }
}

/// Sort modes a user may pick for `category` given whether a location is
/// resolved. Distance is concealed without one; price only applies to food.
#[must_use]
pub fn available_sort_modes(category: Category, has_location: bool) -> Vec<SortMode> {
    let mut modes = vec![SortMode::Name];
    if category == Category::Food {
        modes.push(SortMode::PriceLow);
        modes.push(SortMode::PriceHigh);
    }
    if has_location {
        modes.push(SortMode::Distance);
    }
    modes
}

/// Radius bounds and starting value for the nearby control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub default_radius_km: f64,
    pub radius_min_km: f64,
    pub radius_max_km: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            default_radius_km: 5.0,
            radius_min_km: 1.0,
            radius_max_km: 50.0,
        }
    }
}

impl ViewSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            default_radius_km: config.default_radius_km,
            radius_min_km: config.radius_min_km,
            radius_max_km: config.radius_max_km,
        }
    }
}

/// Inputs of one category view. Lives only for a single page visit.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    pub search_term: String,
    pub sort_mode: SortMode,
    pub nearby_enabled: bool,
    pub radius_km: f64,
    pub listings: Vec<T>,
}

/// One row of the derived view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewEntry<T> {
    pub listing: T,
    /// Kilometers from the user, when both ends are known.
    pub distance_km: Option<f64>,
}

impl<T> ViewEntry<T> {
    #[must_use]
    pub fn distance_label(&self) -> Option<String> {
        self.distance_km.map(|d| format!("{d:.2} km"))
    }
}

impl<T: ListingRecord> ViewState<T> {
    /// Derive the filtered, sorted, distance-annotated view.
    ///
    /// Order: text filter, then the radius filter (only with `nearby_enabled`
    /// and a resolved location), then the sort.
    #[must_use]
    pub fn project(&self, location: &GeoLocationResult) -> Vec<ViewEntry<T>> {
        let origin = location.user_location();
        let needle = self.search_term.to_lowercase();

        let mut rows: Vec<T> = self
            .listings
            .iter()
            .filter(|listing| listing.matches_search(&needle))
            .cloned()
            .collect();

        if self.nearby_enabled {
            if let Some(origin) = origin {
                rows = filter_by_radius(&rows, origin, self.radius_km);
            }
        }

        match self.sort_mode {
            SortMode::Name => rows.sort_by(|a, b| compare_names(a.name(), b.name())),
            SortMode::PriceLow => rows.sort_by(|a, b| compare_prices(a, b, false)),
            SortMode::PriceHigh => rows.sort_by(|a, b| compare_prices(a, b, true)),
            SortMode::Distance => rows = sort_by_distance(&rows, origin),
        }

        rows.into_iter()
            .map(|listing| annotate(listing, origin))
            .collect()
    }
}

fn annotate<T: ListingRecord>(listing: T, origin: Option<Coordinate>) -> ViewEntry<T> {
    let distance_km = origin.and_then(|o| distance_to(o, &listing));
    ViewEntry {
        listing,
        distance_km,
    }
}

/// Case-insensitive first, raw bytes as the tie-break so the order is total.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Unparseable prices sort after every parseable one in both directions.
fn compare_prices<T: ListingRecord>(a: &T, b: &T, descending: bool) -> Ordering {
    match (a.price_value(), b.price_value()) {
        (Some(pa), Some(pb)) if descending => pb.total_cmp(&pa),
        (Some(pa), Some(pb)) => pa.total_cmp(&pb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The nearby toggle and its radius slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiusControl {
    pub min_km: f64,
    pub max_km: f64,
    pub value_km: f64,
    pub enabled: bool,
}

/// What the presentation layer may offer right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewControls {
    pub sort_options: Vec<SortMode>,
    pub selected_sort: SortMode,
    /// Absent whenever no location is resolved.
    pub nearby: Option<RadiusControl>,
    pub locating: bool,
    pub location_error: Option<String>,
    /// Add/edit/delete actions; administrators only.
    pub can_manage: bool,
}

/// Owns the view state of one category page and keeps its derived view current.
#[derive(Debug, Clone)]
pub struct ListingViewController<T> {
    state: ViewState<T>,
    location: GeoLocationResult,
    settings: ViewSettings,
    session: Session,
    derived: Vec<ViewEntry<T>>,
}

impl<T: ListingRecord> ListingViewController<T> {
    pub fn new(listings: Vec<T>, settings: ViewSettings, session: Session) -> Self {
        let mut controller = Self {
            state: ViewState {
                search_term: String::new(),
                sort_mode: SortMode::Name,
                nearby_enabled: false,
                radius_km: settings.default_radius_km,
                listings,
            },
            location: GeoLocationResult::Pending,
            settings,
            session,
            derived: Vec::new(),
        };
        controller.recompute();
        controller
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn location(&self) -> &GeoLocationResult {
        &self.location
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The current derived view.
    pub fn entries(&self) -> &[ViewEntry<T>] {
        &self.derived
    }

    pub fn set_listings(&mut self, listings: Vec<T>) {
        self.state.listings = listings;
        self.recompute();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
        self.recompute();
    }

    /// Select a sort mode.
    ///
    /// # Errors
    ///
    /// [`ViewError::SortModeUnavailable`] when the mode is not currently
    /// offered (distance without a location, price for shelters).
    pub fn set_sort_mode(&mut self, mode: SortMode) -> Result<(), ViewError> {
        if !self.sort_options().contains(&mode) {
            return Err(ViewError::SortModeUnavailable {
                mode,
                category: T::CATEGORY.to_string(),
            });
        }
        self.state.sort_mode = mode;
        self.recompute();
        Ok(())
    }

    /// Toggle the nearby radius filter.
    ///
    /// # Errors
    ///
    /// [`ViewError::NearbyUnavailable`] when enabling without a resolved
    /// location. Disabling always succeeds.
    pub fn set_nearby_enabled(&mut self, enabled: bool) -> Result<(), ViewError> {
        if enabled && self.location.user_location().is_none() {
            return Err(ViewError::NearbyUnavailable);
        }
        self.state.nearby_enabled = enabled;
        self.recompute();
        Ok(())
    }

    /// Move the radius slider.
    ///
    /// # Errors
    ///
    /// [`ViewError::RadiusOutOfRange`] outside the configured bounds.
    pub fn set_radius_km(&mut self, radius_km: f64) -> Result<(), ViewError> {
        let ViewSettings {
            radius_min_km: min_km,
            radius_max_km: max_km,
            ..
        } = self.settings;
        if !(min_km..=max_km).contains(&radius_km) {
            return Err(ViewError::RadiusOutOfRange {
                radius_km,
                min_km,
                max_km,
            });
        }
        self.state.radius_km = radius_km;
        self.recompute();
        Ok(())
    }

    /// Feed the latest geolocation state.
    ///
    /// Losing the location drops any distance-dependent selection so the
    /// state never holds an option the controls do not offer.
    pub fn set_location(&mut self, location: GeoLocationResult) {
        self.location = location;
        if self.location.user_location().is_none() {
            if self.state.sort_mode == SortMode::Distance {
                tracing::debug!("no location; falling back to name sort");
                self.state.sort_mode = SortMode::Name;
            }
            self.state.nearby_enabled = false;
        }
        self.recompute();
    }

    #[must_use]
    pub fn controls(&self) -> ViewControls {
        let has_location = self.location.user_location().is_some();
        ViewControls {
            sort_options: self.sort_options(),
            selected_sort: self.state.sort_mode,
            nearby: has_location.then_some(RadiusControl {
                min_km: self.settings.radius_min_km,
                max_km: self.settings.radius_max_km,
                value_km: self.state.radius_km,
                enabled: self.state.nearby_enabled,
            }),
            locating: self.location.is_loading(),
            location_error: self.location.error().map(str::to_string),
            can_manage: self.session.is_admin(),
        }
    }

    /// Hand the resolved location and current view to a map surface.
    pub fn map_panel<S: MapSurface>(&self, surface: &mut S) -> MapPanel<S::Output> {
        present_map(surface, &self.location, T::CATEGORY, &self.derived)
    }

    fn sort_options(&self) -> Vec<SortMode> {
        available_sort_modes(T::CATEGORY, self.location.user_location().is_some())
    }

    fn recompute(&mut self) {
        self.derived = self.state.project(&self.location);
        let category = T::CATEGORY;
        tracing::debug!(
            %category,
            input = self.state.listings.len(),
            output = self.derived.len(),
            sort = %self.state.sort_mode,
            nearby = self.state.nearby_enabled,
            "view recomputed"
        );
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
