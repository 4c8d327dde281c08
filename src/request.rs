//! Request shaping for Google Maps Platform endpoints
//!
//! Pure functions turning the simplified, LLM friendly tool arguments into
//! provider request bodies, query parameters and field masks. Nothing here
//! touches the network; absent optional values are left out of the request
//! entirely rather than sent as `null`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Smallest accepted search radius in meters
pub const MIN_RADIUS_M: f64 = 1.0;
/// Largest search radius the Places API accepts
pub const MAX_RADIUS_M: f64 = 50_000.0;
/// Upper bound for page size / max result count
pub const MAX_RESULT_COUNT: i64 = 20;
/// Highest star rating
pub const MAX_RATING: f64 = 5.0;

/// Half-width in degrees of the box used to bias geocoding toward home (~1.1 km)
const HOME_BIAS_DELTA: f64 = 0.01;

/// Places Text Search field mask; fixed and minimal to keep cost down
pub const PLACES_FIELD_MASK_SEARCH_TEXT: &str = "places.id,places.displayName,\
places.formattedAddress,places.primaryType,places.rating,places.priceLevel,\
places.currentOpeningHours.openNow";

/// Places Nearby Search field mask
pub const PLACES_FIELD_MASK_SEARCH_NEARBY: &str = "places.id,places.displayName,\
places.formattedAddress,places.primaryType,places.types,places.rating,\
places.priceLevel,places.currentOpeningHours.openNow";

/// Place Details field mask
pub const PLACES_FIELD_MASK_DETAILS: &str = "id,displayName,formattedAddress,primaryType,\
currentOpeningHours.openNow,currentOpeningHours.weekdayDescriptions,rating,priceLevel,\
nationalPhoneNumber,internationalPhoneNumber,websiteUri,userRatingCount";

/// Price levels a search request may filter on (FREE is not a valid filter)
pub const REQUEST_PRICE_LEVELS: [&str; 4] = [
    "PRICE_LEVEL_INEXPENSIVE",
    "PRICE_LEVEL_MODERATE",
    "PRICE_LEVEL_EXPENSIVE",
    "PRICE_LEVEL_VERY_EXPENSIVE",
];

/// Travel modes understood by the directions tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub const NAMES: [&'static str; 4] = ["driving", "walking", "bicycling", "transit"];

    /// Parse a legacy mode name; unknown names yield `None`
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "driving" => Some(TravelMode::Driving),
            "walking" => Some(TravelMode::Walking),
            "bicycling" => Some(TravelMode::Bicycling),
            "transit" => Some(TravelMode::Transit),
            _ => None,
        }
    }

    /// Resolve an optional mode name, falling back to driving
    pub fn resolve(name: Option<&str>) -> Self {
        name.and_then(Self::parse).unwrap_or_default()
    }

    /// Routes API enum value
    pub fn routes_name(self) -> &'static str {
        match self {
            TravelMode::Driving => "DRIVE",
            TravelMode::Walking => "WALK",
            TravelMode::Bicycling => "BICYCLE",
            TravelMode::Transit => "TRANSIT",
        }
    }
}

/// Options for a Routes `computeRoutes` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionsOptions {
    pub mode: Option<String>,
    pub language: Option<String>,
    pub region: Option<String>,
    pub alternatives: Option<bool>,
    pub units: Option<String>,
    /// Epoch seconds
    pub departure_time: Option<i64>,
    /// Epoch seconds; only honored for transit and only without a departure time
    pub arrival_time: Option<i64>,
    /// Pipe delimited avoid tokens, e.g. `tolls|ferries`
    pub avoid: Option<String>,
}

/// A geographic circle used as a search bias or restriction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasCircle {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
}

impl BiasCircle {
    /// Build a circle with the radius clamped to the accepted range
    pub fn new(latitude: f64, longitude: f64, radius_meters: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_meters: clamp_radius(radius_meters),
        }
    }

    fn to_json(self) -> Value {
        json!({
            "circle": {
                "center": {
                    "latitude": self.latitude,
                    "longitude": self.longitude,
                },
                "radius": self.radius_meters,
            }
        })
    }
}

/// Options for Places Text Search (New)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextSearchOptions {
    pub text_query: String,
    pub included_type: Option<String>,
    pub strict_type_filtering: Option<bool>,
    pub open_now: Option<bool>,
    pub min_rating: Option<f64>,
    pub price_levels: Option<Vec<String>>,
    pub bias: Option<BiasCircle>,
    pub language: Option<String>,
    pub region: Option<String>,
    pub page_size: Option<u32>,
}

/// Options for Places Nearby Search (New)
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearchOptions {
    pub restriction: BiasCircle,
    pub included_types: Option<Vec<String>>,
    pub excluded_types: Option<Vec<String>>,
    pub included_primary_types: Option<Vec<String>>,
    pub excluded_primary_types: Option<Vec<String>>,
    pub language: Option<String>,
    pub region: Option<String>,
    pub max_results: Option<u32>,
    pub rank: Option<String>,
}

/// Forward geocoding request for the legacy Geocoding endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodeRequest {
    pub address: Option<String>,
    pub components: Option<String>,
    pub language: Option<String>,
    pub region: Option<String>,
    pub bounds: Option<String>,
}

/// Reverse geocoding request for the legacy Geocoding endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReverseGeocodeRequest {
    pub lat: f64,
    pub lng: f64,
    pub language: Option<String>,
    pub result_type: Option<String>,
    pub location_type: Option<String>,
}

/// Format epoch seconds as an RFC3339 UTC timestamp (`2023-11-14T22:13:20Z`)
pub fn rfc3339(epoch_seconds: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(epoch_seconds, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn insert_str(body: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        body.insert(key.to_string(), Value::String(v.to_string()));
    }
}

fn insert_list(body: &mut Map<String, Value>, key: &str, value: Option<&Vec<String>>) {
    if let Some(items) = value.filter(|items| !items.is_empty()) {
        body.insert(key.to_string(), json!(items));
    }
}

/// Route modifiers from a pipe delimited avoid string; unknown tokens are ignored
pub fn route_modifiers(avoid: &str) -> Option<Value> {
    const SYNONYMS: [(&str, &[&str]); 3] = [
        ("avoidTolls", &["toll", "tolls"]),
        ("avoidHighways", &["highway", "highways"]),
        ("avoidFerries", &["ferry", "ferries"]),
    ];

    let tokens: Vec<String> = avoid
        .split('|')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    let mut modifiers = Map::new();
    for (key, triggers) in SYNONYMS {
        if tokens.iter().any(|t| triggers.contains(&t.as_str())) {
            modifiers.insert(key.to_string(), Value::Bool(true));
        }
    }

    if modifiers.is_empty() {
        None
    } else {
        Some(Value::Object(modifiers))
    }
}

/// Build the request body for Routes `computeRoutes`
pub fn build_routes_body(origin: &str, destination: &str, options: &DirectionsOptions) -> Value {
    let mut body = Map::new();
    body.insert("origin".into(), json!({ "address": origin }));
    body.insert("destination".into(), json!({ "address": destination }));

    let mode = TravelMode::resolve(options.mode.as_deref());
    body.insert("travelMode".into(), Value::from(mode.routes_name()));

    if options.alternatives == Some(true) {
        body.insert("computeAlternativeRoutes".into(), Value::Bool(true));
    }

    // departure wins; arrival only applies to transit
    match (options.departure_time, options.arrival_time) {
        (Some(departure), _) => {
            if let Some(ts) = rfc3339(departure) {
                body.insert("departureTime".into(), Value::String(ts));
            }
        }
        (None, Some(arrival)) if mode == TravelMode::Transit => {
            if let Some(ts) = rfc3339(arrival) {
                body.insert("arrivalTime".into(), Value::String(ts));
            }
        }
        _ => {}
    }

    insert_str(&mut body, "languageCode", options.language.as_deref());
    insert_str(&mut body, "regionCode", options.region.as_deref());

    if let Some(units) = options.units.as_deref().filter(|u| !u.is_empty()) {
        let units = if units.eq_ignore_ascii_case("metric") || units.eq_ignore_ascii_case("imperial")
        {
            units.to_uppercase()
        } else {
            units.to_string()
        };
        body.insert("units".into(), Value::String(units));
    }

    if let Some(modifiers) = options.avoid.as_deref().and_then(route_modifiers) {
        body.insert("routeModifiers".into(), modifiers);
    }

    Value::Object(body)
}

/// Field mask for `computeRoutes`. Polyline geometry is never requested.
pub fn routes_field_mask() -> String {
    [
        "routes.distanceMeters",
        "routes.duration",
        "routes.description",
        "routes.localizedValues",
        "routes.legs.distanceMeters",
        "routes.legs.steps",
        "routes.legs.duration",
        "routes.legs.localizedValues",
    ]
    .join(",")
}

/// Build the request body for Places Text Search
pub fn build_text_search_body(options: &TextSearchOptions) -> Value {
    let mut body = Map::new();
    body.insert("textQuery".into(), Value::String(options.text_query.clone()));
    insert_str(&mut body, "includedType", options.included_type.as_deref());
    if let Some(strict) = options.strict_type_filtering {
        body.insert("strictTypeFiltering".into(), Value::Bool(strict));
    }
    if let Some(open_now) = options.open_now {
        body.insert("openNow".into(), Value::Bool(open_now));
    }
    if let Some(rating) = options.min_rating {
        body.insert("minRating".into(), json!(rating));
    }
    insert_list(&mut body, "priceLevels", options.price_levels.as_ref());
    insert_str(&mut body, "languageCode", options.language.as_deref());
    insert_str(&mut body, "regionCode", options.region.as_deref());
    if let Some(page_size) = options.page_size {
        body.insert("pageSize".into(), json!(page_size));
    }
    if let Some(bias) = options.bias.filter(|b| b.radius_meters > 0.0) {
        body.insert("locationBias".into(), bias.to_json());
    }
    Value::Object(body)
}

/// Build the request body for Places Nearby Search
pub fn build_nearby_search_body(options: &NearbySearchOptions) -> Value {
    let mut body = Map::new();
    body.insert(
        "locationRestriction".into(),
        options.restriction.to_json(),
    );
    insert_list(&mut body, "includedTypes", options.included_types.as_ref());
    insert_list(&mut body, "excludedTypes", options.excluded_types.as_ref());
    insert_list(
        &mut body,
        "includedPrimaryTypes",
        options.included_primary_types.as_ref(),
    );
    insert_list(
        &mut body,
        "excludedPrimaryTypes",
        options.excluded_primary_types.as_ref(),
    );
    insert_str(&mut body, "languageCode", options.language.as_deref());
    insert_str(&mut body, "regionCode", options.region.as_deref());
    if let Some(max_results) = options.max_results {
        body.insert("maxResultCount".into(), json!(max_results));
    }
    insert_str(&mut body, "rankPreference", options.rank.as_deref());
    Value::Object(body)
}

fn push_param(params: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        params.push((key.to_string(), v.to_string()));
    }
}

/// Query parameters for forward geocoding (the API key is added by the gateway)
pub fn geocode_params(request: &GeocodeRequest) -> Vec<(String, String)> {
    let mut params = Vec::new();
    push_param(&mut params, "address", request.address.as_deref());
    push_param(&mut params, "components", request.components.as_deref());
    push_param(&mut params, "language", request.language.as_deref());
    push_param(&mut params, "region", request.region.as_deref());
    push_param(&mut params, "bounds", request.bounds.as_deref());
    params
}

/// Query parameters for reverse geocoding
pub fn reverse_geocode_params(request: &ReverseGeocodeRequest) -> Vec<(String, String)> {
    let mut params = vec![(
        "latlng".to_string(),
        format!("{},{}", request.lat, request.lng),
    )];
    push_param(&mut params, "language", request.language.as_deref());
    push_param(&mut params, "result_type", request.result_type.as_deref());
    push_param(&mut params, "location_type", request.location_type.as_deref());
    params
}

/// Query parameters for Place Details
pub fn place_details_params(language: Option<&str>, region: Option<&str>) -> Vec<(String, String)> {
    let mut params = Vec::new();
    push_param(&mut params, "languageCode", language);
    push_param(&mut params, "regionCode", region);
    params
}

/// Small bounding box around a point, formatted for the Geocoding `bounds`
/// parameter (`south,west|north,east`). Biases, does not restrict.
pub fn location_bias_bounds(latitude: f64, longitude: f64) -> String {
    let south = latitude - HOME_BIAS_DELTA;
    let north = latitude + HOME_BIAS_DELTA;
    let west = longitude - HOME_BIAS_DELTA;
    let east = longitude + HOME_BIAS_DELTA;
    format!("{},{}|{},{}", south, west, north, east)
}

/// Accept a `places/<id>` resource name or a bare place id
pub fn place_id_from_resource(place_id: &str) -> &str {
    place_id.rsplit('/').next().unwrap_or(place_id)
}

/// A price level filter outside the request enum
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown price level '{0}'")]
pub struct UnknownPriceLevel(pub String);

/// Validate a minimum rating and round it up to the nearest half star.
///
/// Returns `None` for values outside `[0, 5]`.
pub fn normalize_rating(rating: f64) -> Option<f64> {
    if !(0.0..=MAX_RATING).contains(&rating) {
        return None;
    }
    Some((rating * 2.0).ceil() / 2.0)
}

/// Clamp a radius to `[1, 50000]` meters
pub fn clamp_radius(radius_meters: f64) -> f64 {
    if radius_meters.is_nan() {
        return MIN_RADIUS_M;
    }
    radius_meters.clamp(MIN_RADIUS_M, MAX_RADIUS_M)
}

/// Clamp a result count to `[1, 20]`
pub fn clamp_result_count(count: i64) -> u32 {
    count.clamp(1, MAX_RESULT_COUNT) as u32
}

/// Map price level filters to request enums.
///
/// Accepts `MODERATE` or `PRICE_LEVEL_MODERATE` in any case. The first
/// unknown level is returned as the error.
pub fn normalize_price_levels(levels: &[String]) -> Result<Vec<String>, UnknownPriceLevel> {
    levels
        .iter()
        .map(|level| {
            let upper = level.trim().to_uppercase();
            let full = if upper.starts_with("PRICE_LEVEL_") {
                upper
            } else {
                format!("PRICE_LEVEL_{}", upper)
            };
            if REQUEST_PRICE_LEVELS.contains(&full.as_str()) {
                Ok(full)
            } else {
                Err(UnknownPriceLevel(level.clone()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339() {
        assert_eq!(rfc3339(1_700_000_000).as_deref(), Some("2023-11-14T22:13:20Z"));
        assert_eq!(rfc3339(0).as_deref(), Some("1970-01-01T00:00:00Z"));
    }

    #[test]
    fn test_routes_body_basic() {
        let options = DirectionsOptions {
            mode: Some("walking".into()),
            language: Some("en".into()),
            region: Some("us".into()),
            alternatives: Some(true),
            units: Some("metric".into()),
            ..Default::default()
        };
        let body = build_routes_body("Home", "Work", &options);
        assert_eq!(
            body,
            json!({
                "origin": {"address": "Home"},
                "destination": {"address": "Work"},
                "travelMode": "WALK",
                "computeAlternativeRoutes": true,
                "languageCode": "en",
                "regionCode": "us",
                "units": "METRIC"
            })
        );
    }

    #[test]
    fn test_routes_mode_defaults_to_drive() {
        let body = build_routes_body("a", "b", &DirectionsOptions::default());
        assert_eq!(body["travelMode"], "DRIVE");

        let options = DirectionsOptions {
            mode: Some("hovercraft".into()),
            ..Default::default()
        };
        assert_eq!(build_routes_body("a", "b", &options)["travelMode"], "DRIVE");

        for (name, expected) in [("bicycling", "BICYCLE"), ("transit", "TRANSIT")] {
            let options = DirectionsOptions {
                mode: Some(name.into()),
                ..Default::default()
            };
            assert_eq!(build_routes_body("a", "b", &options)["travelMode"], expected);
        }
    }

    #[test]
    fn test_departure_wins_over_arrival() {
        let options = DirectionsOptions {
            mode: Some("transit".into()),
            departure_time: Some(1_700_000_000),
            arrival_time: Some(1_700_003_600),
            ..Default::default()
        };
        let body = build_routes_body("a", "b", &options);
        assert_eq!(body["departureTime"], "2023-11-14T22:13:20Z");
        assert!(body.get("arrivalTime").is_none());
    }

    #[test]
    fn test_arrival_time_transit_only() {
        let transit = DirectionsOptions {
            mode: Some("transit".into()),
            arrival_time: Some(1_700_000_000),
            ..Default::default()
        };
        let body = build_routes_body("a", "b", &transit);
        assert_eq!(body["arrivalTime"], "2023-11-14T22:13:20Z");
        assert_eq!(body["travelMode"], "TRANSIT");

        let driving = DirectionsOptions {
            mode: Some("driving".into()),
            arrival_time: Some(1_700_000_000),
            ..Default::default()
        };
        let body = build_routes_body("a", "b", &driving);
        assert!(body.get("arrivalTime").is_none());
        assert!(body.get("departureTime").is_none());
    }

    #[test]
    fn test_units_passthrough() {
        let options = DirectionsOptions {
            units: Some("Imperial".into()),
            ..Default::default()
        };
        assert_eq!(build_routes_body("a", "b", &options)["units"], "IMPERIAL");

        let options = DirectionsOptions {
            units: Some("furlongs".into()),
            ..Default::default()
        };
        assert_eq!(build_routes_body("a", "b", &options)["units"], "furlongs");
    }

    #[test]
    fn test_avoid_modifiers() {
        let options = DirectionsOptions {
            avoid: Some("tolls|highways".into()),
            ..Default::default()
        };
        let body = build_routes_body("a", "b", &options);
        assert_eq!(
            body["routeModifiers"],
            json!({"avoidTolls": true, "avoidHighways": true})
        );
        assert!(body["routeModifiers"].get("avoidFerries").is_none());

        assert_eq!(
            route_modifiers(" ferry | indoor "),
            Some(json!({"avoidFerries": true}))
        );
        assert_eq!(route_modifiers("indoor|unicorns"), None);
        assert_eq!(route_modifiers(""), None);
    }

    #[test]
    fn test_routes_field_mask_has_no_polyline() {
        let mask = routes_field_mask();
        assert!(mask.starts_with("routes.distanceMeters,"));
        assert!(mask.contains("routes.legs.localizedValues"));
        assert!(!mask.contains("polyline"));
    }

    #[test]
    fn test_text_search_body_omits_absent_fields() {
        let options = TextSearchOptions {
            text_query: "pizza".into(),
            ..Default::default()
        };
        assert_eq!(build_text_search_body(&options), json!({"textQuery": "pizza"}));
    }

    #[test]
    fn test_text_search_body_full() {
        let options = TextSearchOptions {
            text_query: "coffee".into(),
            included_type: Some("cafe".into()),
            strict_type_filtering: Some(true),
            open_now: Some(false),
            min_rating: Some(4.5),
            price_levels: Some(vec!["PRICE_LEVEL_MODERATE".into()]),
            bias: Some(BiasCircle::new(40.0, -74.0, 100_000.0)),
            language: Some("en".into()),
            region: Some("us".into()),
            page_size: Some(5),
        };
        let body = build_text_search_body(&options);
        assert_eq!(body["includedType"], "cafe");
        assert_eq!(body["strictTypeFiltering"], true);
        assert_eq!(body["openNow"], false);
        assert_eq!(body["minRating"], 4.5);
        assert_eq!(body["priceLevels"], json!(["PRICE_LEVEL_MODERATE"]));
        assert_eq!(body["pageSize"], 5);
        assert_eq!(
            body["locationBias"],
            json!({"circle": {"center": {"latitude": 40.0, "longitude": -74.0}, "radius": 50000.0}})
        );
    }

    #[test]
    fn test_nearby_search_body() {
        let options = NearbySearchOptions {
            restriction: BiasCircle::new(51.5, -0.12, 100_000.0),
            included_types: Some(vec!["restaurant".into()]),
            excluded_types: Some(vec![]),
            included_primary_types: None,
            excluded_primary_types: None,
            language: None,
            region: Some("gb".into()),
            max_results: Some(3),
            rank: Some("DISTANCE".into()),
        };
        let body = build_nearby_search_body(&options);
        assert_eq!(body["locationRestriction"]["circle"]["radius"], 50000.0);
        assert_eq!(body["includedTypes"], json!(["restaurant"]));
        assert!(body.get("excludedTypes").is_none());
        assert!(body.get("languageCode").is_none());
        assert_eq!(body["regionCode"], "gb");
        assert_eq!(body["maxResultCount"], 3);
        assert_eq!(body["rankPreference"], "DISTANCE");
    }

    #[test]
    fn test_geocode_params() {
        let request = GeocodeRequest {
            address: Some("10 Downing St".into()),
            language: Some("en".into()),
            bounds: Some(location_bias_bounds(10.0, 20.0)),
            ..Default::default()
        };
        let params = geocode_params(&request);
        assert_eq!(params[0], ("address".to_string(), "10 Downing St".to_string()));
        assert_eq!(params[1], ("language".to_string(), "en".to_string()));
        assert_eq!(params[2].0, "bounds");
        assert_eq!(params.len(), 3);

        let reverse = ReverseGeocodeRequest {
            lat: 40.5,
            lng: -73.25,
            result_type: Some("street_address".into()),
            ..Default::default()
        };
        let params = reverse_geocode_params(&reverse);
        assert_eq!(params[0], ("latlng".to_string(), "40.5,-73.25".to_string()));
        assert_eq!(params[1].0, "result_type");
    }

    #[test]
    fn test_location_bias_bounds() {
        assert_eq!(location_bias_bounds(0.5, 1.5), "0.49,1.49|0.51,1.51");
    }

    #[test]
    fn test_place_id_from_resource() {
        assert_eq!(place_id_from_resource("places/ChIJ123"), "ChIJ123");
        assert_eq!(place_id_from_resource("ChIJ123"), "ChIJ123");
    }

    #[test]
    fn test_normalize_rating() {
        for (input, expected) in [
            (0.0, 0.0),
            (0.1, 0.5),
            (3.5, 3.5),
            (3.6, 4.0),
            (4.01, 4.5),
            (5.0, 5.0),
        ] {
            assert_eq!(normalize_rating(input), Some(expected));
        }
        assert_eq!(normalize_rating(-0.5), None);
        assert_eq!(normalize_rating(5.5), None);
        assert_eq!(normalize_rating(f64::NAN), None);

        let mut r = 0.0;
        while r <= 5.0 {
            let n = normalize_rating(r).unwrap();
            assert_eq!(n, (r * 2.0).ceil() / 2.0);
            assert_eq!((n * 2.0).fract(), 0.0);
            assert!((0.0..=5.0).contains(&n));
            r += 0.07;
        }
    }

    #[test]
    fn test_clamps() {
        assert_eq!(clamp_radius(100_000.0), 50_000.0);
        assert_eq!(clamp_radius(0.0), 1.0);
        assert_eq!(clamp_radius(750.0), 750.0);
        assert_eq!(clamp_result_count(0), 1);
        assert_eq!(clamp_result_count(50), 20);
        assert_eq!(clamp_result_count(7), 7);
    }

    #[test]
    fn test_normalize_price_levels() {
        let levels = vec!["moderate".to_string(), "PRICE_LEVEL_EXPENSIVE".to_string()];
        assert_eq!(
            normalize_price_levels(&levels).unwrap(),
            vec!["PRICE_LEVEL_MODERATE", "PRICE_LEVEL_EXPENSIVE"]
        );
        let levels = vec!["FREE".to_string()];
        let err = normalize_price_levels(&levels).unwrap_err();
        assert_eq!(err, UnknownPriceLevel("FREE".to_string()));
        assert_eq!(err.to_string(), "Unknown price level 'FREE'");
    }
}
