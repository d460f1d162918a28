//! Food and shelter listing records and the read-only listing source.
//!
//! Records come from a json-server style document where every form field
//! was stored as typed by the admin: coordinates and prices show up as
//! numbers, numeric strings, empty strings, or `null`. Deserialization
//! normalizes those into `Option<f64>` / `String` so coordinate arithmetic
//! only ever sees explicit presence.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::coordinate::Geotagged;
use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Shelter,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Food => write!(f, "food"),
            Category::Shelter => write!(f, "shelter"),
        }
    }
}

/// Record identifier. The data store hands out numbers, hand-edited
/// documents sometimes use strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListingId {
    Number(i64),
    Text(String),
}

impl Default for ListingId {
    fn default() -> Self {
        ListingId::Text(String::new())
    }
}

impl std::fmt::Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingId::Number(n) => write!(f, "{n}"),
            ListingId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A meal offered by a food service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodListing {
    #[serde(default)]
    pub id: ListingId,
    #[serde(rename = "fbname")]
    pub business_name: String,
    #[serde(rename = "fname")]
    pub name: String,
    #[serde(rename = "fdis", default)]
    pub description: String,
    #[serde(rename = "fprice", default, deserialize_with = "lenient_string")]
    pub price: String,
    #[serde(rename = "fadd", default)]
    pub address: String,
    #[serde(rename = "fphone", default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(rename = "fimage", default)]
    pub image: String,
    #[serde(rename = "flocation", default)]
    pub location_link: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
}

impl FoodListing {
    /// Price as a number, or `None` when the stored text does not parse.
    #[must_use]
    pub fn price_value(&self) -> Option<f64> {
        self.price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
    }
}

/// A shelter or home offering accommodation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelterListing {
    #[serde(default)]
    pub id: ListingId,
    #[serde(rename = "hname")]
    pub name: String,
    #[serde(rename = "hdis", default)]
    pub description: String,
    #[serde(rename = "haddress", default)]
    pub address: String,
    #[serde(rename = "hphone", default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(rename = "hlocation", default)]
    pub location_link: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
}

/// Common read accessors shared by every listing category.
pub trait ListingRecord: Geotagged + Clone {
    const CATEGORY: Category;

    fn id(&self) -> &ListingId;

    /// Primary name used for sorting and the map marker title.
    fn name(&self) -> &str;

    /// Operator of the listing. Shelters are their own operator.
    fn business_name(&self) -> &str;

    fn address(&self) -> &str;

    fn phone(&self) -> &str;

    /// Raw price text; only food listings carry one.
    fn price(&self) -> Option<&str> {
        None
    }

    /// Parsed price; only food listings carry one.
    fn price_value(&self) -> Option<f64> {
        None
    }

    /// Case-insensitive substring match. `needle` must already be lowercase.
    fn matches_search(&self, needle: &str) -> bool;
}

impl Geotagged for FoodListing {
    fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    fn longitude(&self) -> Option<f64> {
        self.longitude
    }
}

impl ListingRecord for FoodListing {
    const CATEGORY: Category = Category::Food;

    fn id(&self) -> &ListingId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn business_name(&self) -> &str {
        &self.business_name
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn phone(&self) -> &str {
        &self.phone
    }

    fn price(&self) -> Option<&str> {
        Some(&self.price)
    }

    fn price_value(&self) -> Option<f64> {
        FoodListing::price_value(self)
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.business_name.to_lowercase().contains(needle)
    }
}

impl Geotagged for ShelterListing {
    fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    fn longitude(&self) -> Option<f64> {
        self.longitude
    }
}

impl ListingRecord for ShelterListing {
    const CATEGORY: Category = Category::Shelter;

    fn id(&self) -> &ListingId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn business_name(&self) -> &str {
        &self.name
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn phone(&self) -> &str {
        &self.phone
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

/// The two listing collections of the data store document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingsFile {
    #[serde(default)]
    pub food: Vec<FoodListing>,
    #[serde(default)]
    pub shelter: Vec<ShelterListing>,
}

/// Read the listing source document from disk.
///
/// # Errors
///
/// Returns [`CoreError::ListingsFileIo`] if the file cannot be read and
/// [`CoreError::ListingsFileParse`] if it is not a valid listings document.
pub fn load_listings(path: &Path) -> Result<ListingsFile, CoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| CoreError::ListingsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let listings = parse_listings(&content)?;
    tracing::debug!(
        path = %path.display(),
        food = listings.food.len(),
        shelter = listings.shelter.len(),
        "loaded listings"
    );
    Ok(listings)
}

/// Parse a listing source document.
///
/// # Errors
///
/// Returns [`CoreError::ListingsFileParse`] on malformed JSON or records
/// missing a required name field.
pub fn parse_listings(content: &str) -> Result<ListingsFile, CoreError> {
    Ok(serde_json::from_str(content)?)
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

#[cfg(test)]
#[path = "listings_test.rs"]
mod tests;
