use serde_json::json;

use super::*;

fn food_json() -> serde_json::Value {
    json!({
        "id": 1,
        "fbname": "Nandini Canteen",
        "fname": "Pizza Place",
        "fdis": "Wood-fired slices",
        "fprice": "120",
        "fadd": "MG Road",
        "fphone": "9876543210",
        "fimage": "pizza.jpg",
        "flocation": "https://maps.google.com/?q=12.97,77.59",
        "latitude": "12.9716",
        "longitude": 77.6946
    })
}

#[test]
fn food_listing_reads_store_field_names() {
    let food: FoodListing = serde_json::from_value(food_json()).unwrap();
    assert_eq!(food.id, ListingId::Number(1));
    assert_eq!(food.business_name, "Nandini Canteen");
    assert_eq!(food.name, "Pizza Place");
    assert_eq!(food.address, "MG Road");
    assert_eq!(food.price, "120");
    assert_eq!(food.latitude, Some(12.9716));
    assert_eq!(food.longitude, Some(77.6946));
}

#[test]
fn numeric_price_and_phone_become_text() {
    let mut value = food_json();
    value["fprice"] = json!(99.5);
    value["fphone"] = json!(5_551_234);
    let food: FoodListing = serde_json::from_value(value).unwrap();
    assert_eq!(food.price, "99.5");
    assert_eq!(food.phone, "5551234");
    assert_eq!(food.price_value(), Some(99.5));
}

#[test]
fn unparseable_price_has_no_value() {
    let mut value = food_json();
    value["fprice"] = json!("free");
    let food: FoodListing = serde_json::from_value(value).unwrap();
    assert_eq!(food.price, "free");
    assert_eq!(food.price_value(), None);
}

#[test]
fn empty_coordinate_strings_are_absent() {
    let mut value = food_json();
    value["latitude"] = json!("");
    value["longitude"] = json!(null);
    let food: FoodListing = serde_json::from_value(value).unwrap();
    assert_eq!(food.latitude, None);
    assert_eq!(food.longitude, None);
    assert!(food.coordinate().is_none());
}

#[test]
fn missing_coordinate_fields_are_absent() {
    let food: FoodListing = serde_json::from_value(json!({
        "fbname": "Corner Stall",
        "fname": "Idli"
    }))
    .unwrap();
    assert!(food.coordinate().is_none());
    assert_eq!(food.id, ListingId::default());
}

#[test]
fn garbage_coordinate_string_is_absent() {
    let mut value = food_json();
    value["latitude"] = json!("north-ish");
    let food: FoodListing = serde_json::from_value(value).unwrap();
    assert_eq!(food.latitude, None);
    assert!(food.coordinate().is_none());
}

#[test]
fn food_search_matches_name_or_business() {
    let food: FoodListing = serde_json::from_value(food_json()).unwrap();
    assert!(food.matches_search("piz"));
    assert!(food.matches_search("nandini"));
    assert!(!food.matches_search("taco"));
    assert!(food.matches_search(""));
}

#[test]
fn shelter_search_matches_name_only() {
    let shelter: ShelterListing = serde_json::from_value(json!({
        "id": "s-1",
        "hname": "Hope House",
        "hdis": "Warm beds for families",
        "haddress": "12 Church St",
        "hphone": "080-1234",
        "latitude": 12.98,
        "longitude": 77.6
    }))
    .unwrap();
    assert_eq!(shelter.id, ListingId::Text("s-1".to_string()));
    assert!(shelter.matches_search("hope"));
    assert!(!shelter.matches_search("beds"));
    assert_eq!(shelter.business_name(), "Hope House");
    assert_eq!(ListingRecord::price(&shelter), None);
}

#[test]
fn parse_listings_ignores_other_collections() {
    let doc = json!({
        "users": [{ "id": 1, "name": "admin", "role": "admin" }],
        "feedback": [{ "id": 1, "message": "thanks" }],
        "food": [food_json()],
        "shelter": []
    })
    .to_string();
    let file = parse_listings(&doc).unwrap();
    assert_eq!(file.food.len(), 1);
    assert!(file.shelter.is_empty());
}

#[test]
fn parse_listings_defaults_missing_collections() {
    let file = parse_listings("{}").unwrap();
    assert!(file.food.is_empty());
    assert!(file.shelter.is_empty());
}

#[test]
fn parse_listings_rejects_record_without_name() {
    let doc = json!({ "shelter": [{ "hdis": "no name" }] }).to_string();
    assert!(matches!(
        parse_listings(&doc),
        Err(CoreError::ListingsFileParse(_))
    ));
}

#[test]
fn load_listings_reports_missing_file() {
    let result = load_listings(Path::new("/definitely/not/here/db.json"));
    assert!(
        matches!(result, Err(CoreError::ListingsFileIo { ref path, .. }) if path.contains("db.json")),
        "expected ListingsFileIo, got: {result:?}"
    );
}

#[test]
fn category_display_is_lowercase() {
    assert_eq!(Category::Food.to_string(), "food");
    assert_eq!(Category::Shelter.to_string(), "shelter");
    assert_eq!(FoodListing::CATEGORY, Category::Food);
    assert_eq!(ShelterListing::CATEGORY, Category::Shelter);
}
