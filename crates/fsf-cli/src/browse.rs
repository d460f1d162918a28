//! Listing page handlers for the CLI.
//!
//! A browse run mirrors one visit to a category page: acquire a location
//! once, apply the requested controls, then print the derived view and the
//! map panel.

use fsf_core::{AppConfig, Coordinate, ListingRecord, Session};
use fsf_geo::{
    FixedPosition, GeoLocationResult, GeolocationProvider, PositionOptions, PositionSource,
    Unsupported,
};
use fsf_view::{
    ListingViewController, MapPanel, StaticMapSurface, ViewControls, ViewEntry, ViewError,
    ViewSettings,
};
use serde::Serialize;

use crate::BrowseArgs;

#[derive(Debug, Serialize)]
struct BrowseOutput<'a, T> {
    location: Option<Coordinate>,
    location_error: Option<&'a str>,
    controls: ViewControls,
    entries: &'a [ViewEntry<T>],
    map: String,
}

/// Acquire one fix from `source` using the configured timeout.
pub(crate) async fn locate<S: PositionSource + 'static>(
    source: S,
    config: &AppConfig,
) -> GeoLocationResult {
    GeolocationProvider::new(source)
        .with_options(PositionOptions::with_timeout(config.geolocation_timeout))
        .acquire()
        .await
}

/// Build the controller for `listings` and apply the command-line controls.
///
/// # Errors
///
/// Returns an error if the given origin is not a valid coordinate or a
/// control is rejected by the view (distance sort or nearby filtering
/// without a location, radius outside the configured bounds).
pub(crate) async fn build_view<T: ListingRecord>(
    config: &AppConfig,
    listings: Vec<T>,
    args: &BrowseArgs,
) -> anyhow::Result<ListingViewController<T>> {
    let location = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => locate(FixedPosition(Coordinate::new(lat, lon)?), config).await,
        _ => locate(Unsupported, config).await,
    };

    let mut view = ListingViewController::new(
        listings,
        ViewSettings::from_app_config(config),
        Session::anonymous(),
    );
    view.set_location(location);

    let category = T::CATEGORY;
    if let Err(err) = apply_controls(&mut view, args) {
        tracing::warn!(%category, error = %err, "control rejected");
        return Err(err.into());
    }

    tracing::info!(
        %category,
        entries = view.entries().len(),
        located = view.location().user_location().is_some(),
        sort = %view.state().sort_mode,
        "view built"
    );
    Ok(view)
}

fn apply_controls<T: ListingRecord>(
    view: &mut ListingViewController<T>,
    args: &BrowseArgs,
) -> Result<(), ViewError> {
    if let Some(term) = &args.search {
        view.set_search_term(term.as_str());
    }
    view.set_sort_mode(args.sort)?;
    if let Some(radius_km) = args.nearby {
        view.set_nearby_enabled(true)?;
        view.set_radius_km(radius_km)?;
    }
    Ok(())
}

/// Run one browse command and print the result to stdout.
///
/// # Errors
///
/// See [`build_view`]; JSON output can additionally fail to serialize.
pub(crate) async fn run_browse<T>(
    config: &AppConfig,
    listings: Vec<T>,
    args: &BrowseArgs,
) -> anyhow::Result<()>
where
    T: ListingRecord + Serialize,
{
    let view = build_view(config, listings, args).await?;
    let mut surface = StaticMapSurface::from_app_config(config);
    let map = match view.map_panel(&mut surface) {
        MapPanel::Ready(map) => map.url,
        MapPanel::Placeholder(reason) => {
            tracing::debug!(%reason, "map shown as placeholder");
            reason.to_string()
        }
    };

    if args.json {
        let output = BrowseOutput {
            location: view.location().user_location(),
            location_error: view.location().error(),
            controls: view.controls(),
            entries: view.entries(),
            map,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let Some(err) = view.location().error() {
        println!("location: {err}");
    }
    if view.entries().is_empty() {
        println!("no {} listings match", T::CATEGORY);
    }
    for entry in view.entries() {
        println!("{}", format_entry(entry));
    }
    println!("map: {map}");

    Ok(())
}

pub(crate) fn format_entry<T: ListingRecord>(entry: &ViewEntry<T>) -> String {
    let listing = &entry.listing;
    let mut line = format!("{} ({})", listing.name(), listing.business_name());
    if let Some(price) = listing.price() {
        line.push_str(&format!(" Rs {price}"));
    }
    line.push_str(&format!(" | {} | {}", listing.address(), listing.phone()));
    if let Some(label) = entry.distance_label() {
        line.push_str(&format!(" | {label}"));
    }
    line
}
