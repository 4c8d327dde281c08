//! Response normalization for LLM consumption
//!
//! Provider responses are deeply nested and verbose. The generic tree
//! transforms here (polyline stripping, localized value promotion and
//! singleton collapsing) work on any JSON value; the flatteners below them
//! are endpoint specific and pick out the handful of fields a model needs.

use serde_json::{json, Map, Value};

/// Keys of `localizedValues` that overwrite raw values on the parent
const LOCALIZED_OVERWRITES: [&str; 2] = ["duration", "staticDuration"];

/// Remove every key named `polyline`, at any depth
pub fn strip_polylines(tree: Value) -> Value {
    match tree {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| key != "polyline")
                .map(|(key, value)| (key, strip_polylines(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_polylines).collect()),
        scalar => scalar,
    }
}

/// Overlay human readable `localizedValues` onto their parent objects.
///
/// A localized `distance` replaces the numeric `distanceMeters` and is only
/// applied where `distanceMeters` is present; `duration`
/// and `staticDuration` are overwritten; other localized keys are only
/// copied when the parent does not already have them. The `localizedValues`
/// group itself is kept.
pub fn promote_localized_values(tree: Value) -> Value {
    match tree {
        Value::Object(mut map) => {
            if let Some(Value::Object(localized)) = map.get("localizedValues").cloned() {
                if let Some(distance) = localized
                    .get("distance")
                    .filter(|_| map.contains_key("distanceMeters"))
                {
                    map.remove("distanceMeters");
                    map.insert("distance".to_string(), distance.clone());
                }
                for key in LOCALIZED_OVERWRITES {
                    if let Some(value) = localized.get(key) {
                        map.insert(key.to_string(), value.clone());
                    }
                }
                for (key, value) in localized {
                    if key == "distance" || LOCALIZED_OVERWRITES.contains(&key.as_str()) {
                        continue;
                    }
                    map.entry(key).or_insert(value);
                }
            }
            Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, promote_localized_values(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(promote_localized_values)
                .collect(),
        ),
        scalar => scalar,
    }
}

/// Collapse single key objects into their value, bottom up.
///
/// `{"staticDuration": {"text": "1 min"}}` becomes `{"staticDuration": "1 min"}`
/// and `{"a": {"b": {"c": 1}}}` becomes `{"a": 1}`. The root container is the
/// response envelope and is never replaced, only its contents.
pub fn collapse_singletons(tree: Value) -> Value {
    match tree {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, collapse_node(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(collapse_node).collect()),
        scalar => scalar,
    }
}

fn collapse_node(node: Value) -> Value {
    match node {
        Value::Object(map) => {
            let mut map: Map<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key, collapse_node(value)))
                .collect();
            if map.len() == 1 {
                if let Some((_, only)) = map.into_iter().next() {
                    return only;
                }
                return Value::Object(Map::new());
            }
            Value::Object(map)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(collapse_node).collect()),
        scalar => scalar,
    }
}

/// Full directions pipeline: strip, then localize, then collapse
pub fn normalize_routes_response(raw: Value) -> Value {
    collapse_singletons(promote_localized_values(strip_polylines(raw)))
}

/// Price level enum to `{level, label}`; unmapped enums keep only the label
pub fn normalize_price_level(value: Option<&str>) -> Option<Value> {
    let label = value.filter(|v| !v.is_empty())?;
    let level = match label {
        "PRICE_LEVEL_FREE" => Some(0),
        "PRICE_LEVEL_INEXPENSIVE" => Some(1),
        "PRICE_LEVEL_MODERATE" => Some(2),
        "PRICE_LEVEL_EXPENSIVE" => Some(3),
        "PRICE_LEVEL_VERY_EXPENSIVE" => Some(4),
        _ => None,
    };
    Some(match level {
        Some(level) => json!({ "level": level, "label": label }),
        None => json!({ "label": label }),
    })
}

fn non_empty<'a>(place: &'a Value, key: &str) -> Option<&'a Value> {
    place.get(key).filter(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    })
}

/// Compact place summary used by both search endpoints
pub fn flatten_place_basic(place: &Value) -> Value {
    let mut out = Map::new();
    if let Some(id) = non_empty(place, "id") {
        out.insert("id".into(), id.clone());
    }
    if let Some(display_name) = place.get("displayName").and_then(Value::as_object) {
        if let Some(text) = display_name.get("text").filter(|v| !v.is_null()) {
            out.insert("name".into(), text.clone());
        }
        if let Some(lang) = display_name.get("languageCode").filter(|v| !v.is_null()) {
            out.insert("name_lang".into(), lang.clone());
        }
    }
    if let Some(address) = non_empty(place, "formattedAddress") {
        out.insert("address".into(), address.clone());
    }
    if let Some(primary_type) = non_empty(place, "primaryType") {
        out.insert("primary_type".into(), primary_type.clone());
    }
    if let Some(rating) = place.get("rating").filter(|v| v.is_number()) {
        out.insert("rating".into(), rating.clone());
    }
    if let Some(price) = normalize_price_level(place.get("priceLevel").and_then(Value::as_str)) {
        out.insert("price_level".into(), price);
    }
    if let Some(open_now) = place
        .get("currentOpeningHours")
        .and_then(|hours| hours.get("openNow"))
        .filter(|v| !v.is_null())
    {
        out.insert("open_now".into(), open_now.clone());
    }
    if let Some(types) = non_empty(place, "types") {
        out.insert("types".into(), types.clone());
    }
    Value::Object(out)
}

/// Place details: the basic summary plus phone, website, rating count and hours
pub fn simplify_place_details(place: &Value) -> Value {
    let mut out = match flatten_place_basic(place) {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let mut phone = Map::new();
    if let Some(national) = non_empty(place, "nationalPhoneNumber") {
        phone.insert("national".into(), national.clone());
    }
    if let Some(international) = non_empty(place, "internationalPhoneNumber") {
        phone.insert("international".into(), international.clone());
    }
    if !phone.is_empty() {
        out.insert("phone".into(), Value::Object(phone));
    }

    if let Some(website) = place.get("websiteUri").filter(|v| !v.is_null()) {
        out.insert("website".into(), website.clone());
    }
    if let Some(count) = place.get("userRatingCount").filter(|v| !v.is_null()) {
        out.insert("user_rating_count".into(), count.clone());
    }
    if let Some(hours) = place
        .get("currentOpeningHours")
        .and_then(|hours| hours.get("weekdayDescriptions"))
        .filter(|v| v.as_array().is_some_and(|items| !items.is_empty()))
    {
        out.insert("hours_weekday_text".into(), hours.clone());
    }
    Value::Object(out)
}

/// Flatten every place of a search response into `{places, raw_count}`
pub fn summarize_places(response: &Value) -> Value {
    let places: Vec<Value> = response
        .get("places")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(flatten_place_basic).collect())
        .unwrap_or_default();
    let raw_count = places.len();
    json!({ "places": places, "raw_count": raw_count })
}

/// First geocoding result as `{formatted_address, lat, lng, place_id, types}`.
///
/// Later results are discarded; an empty result list yields `None`.
pub fn extract_first_location(response: &Value) -> Option<Value> {
    let top = response.get("results")?.as_array()?.first()?;
    let location = top
        .get("geometry")
        .and_then(|geometry| geometry.get("location"));
    let field = |value: Option<&Value>| value.cloned().unwrap_or(Value::Null);
    Some(json!({
        "formatted_address": field(top.get("formatted_address")),
        "lat": field(location.and_then(|l| l.get("lat"))),
        "lng": field(location.and_then(|l| l.get("lng"))),
        "place_id": field(top.get("place_id")),
        "types": field(top.get("types")),
    }))
}

/// Geocode tool result: `{status, result, raw_count}`
pub fn summarize_geocode(response: &Value) -> Value {
    let raw_count = response
        .get("results")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    json!({
        "status": response.get("status").cloned().unwrap_or(Value::Null),
        "result": extract_first_location(response),
        "raw_count": raw_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_routes() -> Value {
        json!({
            "routes": [{
                "distanceMeters": 15210,
                "duration": "1165s",
                "description": "I-280 S",
                "polyline": {"encodedPolyline": "abc"},
                "localizedValues": {
                    "distance": {"text": "15.2 km"},
                    "duration": {"text": "19 mins"},
                    "staticDuration": {"text": "17 mins"}
                },
                "legs": [{
                    "distanceMeters": 15210,
                    "duration": "1165s",
                    "localizedValues": {
                        "distance": {"text": "15.2 km"},
                        "duration": {"text": "19 mins"},
                        "staticDuration": {"text": "17 mins"}
                    },
                    "steps": [{
                        "distanceMeters": 30,
                        "staticDuration": "5s",
                        "polyline": {"encodedPolyline": "xyz"},
                        "navigationInstruction": {"instructions": "Head north"},
                        "localizedValues": {
                            "distance": {"text": "30 m"},
                            "staticDuration": {"text": "1 min"}
                        }
                    }]
                }]
            }]
        })
    }

    #[test]
    fn test_strip_polylines() {
        let stripped = strip_polylines(sample_routes());
        assert!(!stripped.to_string().contains("polyline"));
        assert_eq!(stripped["routes"][0]["description"], "I-280 S");
    }

    #[test]
    fn test_strip_polylines_without_polylines_is_identity() {
        let tree = json!({"a": [1, {"b": null, "c": "polylines"}], "d": {"e": true}});
        assert_eq!(strip_polylines(tree.clone()), tree);
        assert_eq!(strip_polylines(json!(42)), json!(42));
    }

    #[test]
    fn test_promote_localized_values() {
        let promoted = promote_localized_values(json!({
            "distanceMeters": 30,
            "duration": "65s",
            "staticDuration": "5s",
            "localizedValues": {
                "distance": {"text": "30 m"},
                "duration": {"text": "1 min"},
                "staticDuration": {"text": "1 min"},
                "transitFare": {"text": "$2.75"}
            }
        }));
        assert!(promoted.get("distanceMeters").is_none());
        assert_eq!(promoted["distance"], json!({"text": "30 m"}));
        assert_eq!(promoted["duration"], json!({"text": "1 min"}));
        assert_eq!(promoted["staticDuration"], json!({"text": "1 min"}));
        assert_eq!(promoted["transitFare"], json!({"text": "$2.75"}));
        assert!(promoted.get("localizedValues").is_some());
    }

    #[test]
    fn test_promote_distance_needs_distance_meters() {
        let promoted = promote_localized_values(json!({
            "staticDuration": "5s",
            "localizedValues": {
                "distance": {"text": "0 m"},
                "staticDuration": {"text": "1 min"}
            }
        }));
        assert!(promoted.get("distance").is_none());
        assert_eq!(promoted["staticDuration"], json!({"text": "1 min"}));
    }

    #[test]
    fn test_promote_keeps_existing_unhandled_keys() {
        let promoted = promote_localized_values(json!({
            "fare": "raw",
            "localizedValues": {"fare": {"text": "localized"}}
        }));
        assert_eq!(promoted["fare"], "raw");
    }

    #[test]
    fn test_promote_recurses_into_arrays() {
        let promoted = promote_localized_values(json!([
            {"items": [{"duration": "5s", "localizedValues": {"duration": {"text": "1 min"}}}]}
        ]));
        assert_eq!(promoted[0]["items"][0]["duration"], json!({"text": "1 min"}));
    }

    #[test]
    fn test_collapse_singletons() {
        assert_eq!(
            collapse_singletons(json!({"staticDuration": {"text": "1 min"}})),
            json!({"staticDuration": "1 min"})
        );
        assert_eq!(
            collapse_singletons(json!({"a": {"b": {"c": 1}}})),
            json!({"a": 1})
        );
        assert_eq!(
            collapse_singletons(json!({"list": [{"x": 1}, {"y": 2, "z": 3}, "s"]})),
            json!({"list": [1, {"y": 2, "z": 3}, "s"]})
        );
        assert_eq!(collapse_singletons(json!("scalar")), json!("scalar"));
        assert_eq!(collapse_singletons(json!({"empty": {}})), json!({"empty": {}}));
    }

    #[test]
    fn test_collapse_singletons_idempotent() {
        let trees = [
            sample_routes(),
            json!({"a": {"b": [{"c": {"d": 1}}, {"e": 1, "f": {"g": null}}]}}),
            json!([{"only": {"inner": [1, 2]}}]),
            json!(null),
        ];
        for tree in trees {
            let once = collapse_singletons(tree);
            let twice = collapse_singletons(once.clone());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_normalize_routes_response() {
        let normalized = normalize_routes_response(sample_routes());
        let route = &normalized["routes"][0];
        assert_eq!(route["distance"], "15.2 km");
        assert_eq!(route["duration"], "19 mins");
        assert_eq!(route["staticDuration"], "17 mins");
        assert!(route.get("distanceMeters").is_none());
        assert!(route.get("polyline").is_none());

        let step = &route["legs"][0]["steps"][0];
        assert_eq!(step["staticDuration"], "1 min");
        assert_eq!(step["distance"], "30 m");
        assert_eq!(step["navigationInstruction"], "Head north");
        assert!(step.get("polyline").is_none());
    }

    #[test]
    fn test_normalize_price_level() {
        assert_eq!(
            normalize_price_level(Some("PRICE_LEVEL_MODERATE")),
            Some(json!({"level": 2, "label": "PRICE_LEVEL_MODERATE"}))
        );
        assert_eq!(
            normalize_price_level(Some("PRICE_LEVEL_UNSPECIFIED")),
            Some(json!({"label": "PRICE_LEVEL_UNSPECIFIED"}))
        );
        assert_eq!(normalize_price_level(None), None);
        assert_eq!(normalize_price_level(Some("")), None);
    }

    #[test]
    fn test_flatten_place_basic() {
        let place = json!({
            "id": "ChIJ1",
            "displayName": {"text": "Blue Bottle", "languageCode": "en"},
            "formattedAddress": "1 Ferry Building, San Francisco",
            "primaryType": "cafe",
            "rating": 4.4,
            "priceLevel": "PRICE_LEVEL_INEXPENSIVE",
            "currentOpeningHours": {"openNow": false},
            "types": ["cafe", "food"]
        });
        assert_eq!(
            flatten_place_basic(&place),
            json!({
                "id": "ChIJ1",
                "name": "Blue Bottle",
                "name_lang": "en",
                "address": "1 Ferry Building, San Francisco",
                "primary_type": "cafe",
                "rating": 4.4,
                "price_level": {"level": 1, "label": "PRICE_LEVEL_INEXPENSIVE"},
                "open_now": false,
                "types": ["cafe", "food"]
            })
        );
    }

    #[test]
    fn test_flatten_place_basic_omits_missing() {
        let place = json!({"id": "ChIJ2", "displayName": {"text": "Somewhere"}});
        assert_eq!(
            flatten_place_basic(&place),
            json!({"id": "ChIJ2", "name": "Somewhere"})
        );
        assert_eq!(flatten_place_basic(&json!({})), json!({}));
    }

    #[test]
    fn test_simplify_place_details() {
        let place = json!({
            "id": "ChIJ3",
            "displayName": {"text": "Library"},
            "nationalPhoneNumber": "(555) 010-0000",
            "websiteUri": "https://example.org",
            "userRatingCount": 120,
            "currentOpeningHours": {
                "openNow": true,
                "weekdayDescriptions": ["Monday: 9 AM - 5 PM"]
            }
        });
        assert_eq!(
            simplify_place_details(&place),
            json!({
                "id": "ChIJ3",
                "name": "Library",
                "open_now": true,
                "phone": {"national": "(555) 010-0000"},
                "website": "https://example.org",
                "user_rating_count": 120,
                "hours_weekday_text": ["Monday: 9 AM - 5 PM"]
            })
        );

        let bare = simplify_place_details(&json!({"id": "x"}));
        assert!(bare.get("phone").is_none());
        assert!(bare.get("hours_weekday_text").is_none());
    }

    #[test]
    fn test_summarize_places() {
        let summary = summarize_places(&json!({
            "places": [{"id": "a"}, {"id": "b", "rating": 3.0}]
        }));
        assert_eq!(summary["raw_count"], 2);
        assert_eq!(summary["places"][1], json!({"id": "b", "rating": 3.0}));

        assert_eq!(
            summarize_places(&json!({})),
            json!({"places": [], "raw_count": 0})
        );
    }

    #[test]
    fn test_extract_first_location() {
        let response = json!({
            "status": "OK",
            "results": [
                {
                    "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA",
                    "geometry": {"location": {"lat": 37.422, "lng": -122.084}},
                    "place_id": "ChIJ2eUg",
                    "types": ["street_address"]
                },
                {"formatted_address": "ignored"}
            ]
        });
        assert_eq!(
            extract_first_location(&response),
            Some(json!({
                "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA",
                "lat": 37.422,
                "lng": -122.084,
                "place_id": "ChIJ2eUg",
                "types": ["street_address"]
            }))
        );
    }

    #[test]
    fn test_extract_first_location_empty() {
        assert_eq!(
            extract_first_location(&json!({"status": "ZERO_RESULTS", "results": []})),
            None
        );
        assert_eq!(extract_first_location(&json!({})), None);
    }

    #[test]
    fn test_summarize_geocode() {
        let summary = summarize_geocode(&json!({"status": "ZERO_RESULTS", "results": []}));
        assert_eq!(
            summary,
            json!({"status": "ZERO_RESULTS", "result": null, "raw_count": 0})
        );
    }
}
