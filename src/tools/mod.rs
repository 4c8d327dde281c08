//! Google Maps tools exposed to the LLM
//!
//! Each tool resolves its arguments against the configured defaults, calls
//! the shared [`MapsGateway`] once and returns a compact JSON result.

pub mod directions;
pub mod geocode;
pub mod places;

pub use directions::DirectionsTool;
pub use geocode::{GeocodeTool, ReverseGeocodeTool};
pub use places::{PlaceDetailsTool, PlacesNearbySearchTool, PlacesTextSearchTool};

use crate::config::MapsConfig;
use crate::core::{ToolArgs, ToolError};
use crate::gateway::{MapsGateway, ReqwestTransport, TransportError};
use serde_json::{json, Value};
use std::sync::Arc;

pub const TOOL_GEOCODE: &str = "gmaps_geocode";
pub const TOOL_REVERSE_GEOCODE: &str = "gmaps_reverse_geocode";
pub const TOOL_DIRECTIONS: &str = "gmaps_directions";
pub const TOOL_PLACES_SEARCH_TEXT: &str = "gmaps_places_search_text";
pub const TOOL_PLACES_SEARCH_NEARBY: &str = "gmaps_places_search_nearby";
pub const TOOL_PLACE_DETAILS: &str = "gmaps_place_details";

/// System prompt fragment describing the toolset
pub const API_PROMPT: &str = "You can use Google Maps tools to geocode, reverse geocode, get \
directions, search for nearby or matching places, and fetch place details like hours, phone, \
and website.";

/// Shared, immutable state handed to every tool
#[derive(Clone)]
pub struct MapsContext {
    pub gateway: Arc<MapsGateway>,
    pub config: Arc<MapsConfig>,
}

impl MapsContext {
    pub fn new(gateway: MapsGateway, config: MapsConfig) -> Self {
        Self {
            gateway: Arc::new(gateway),
            config: Arc::new(config),
        }
    }

    /// Build a context talking to the real endpoints over reqwest
    pub fn from_config(config: MapsConfig) -> Result<Self, TransportError> {
        let transport = Arc::new(ReqwestTransport::new()?);
        let gateway =
            MapsGateway::new(config.api_key(), transport).with_timeout(config.timeout());
        Ok(Self::new(gateway, config))
    }

    /// Explicit coordinates when both are given, else the home location
    pub(crate) fn center(&self, args: &ToolArgs) -> Result<Option<(f64, f64)>, ToolError> {
        if let Some(point) = explicit_point(args)? {
            return Ok(Some(point));
        }
        Ok(self
            .config
            .home
            .as_ref()
            .map(|home| (home.latitude, home.longitude)))
    }
}

/// Read an optional `lat`/`lng` pair; both or neither must be present
pub(crate) fn explicit_point(args: &ToolArgs) -> Result<Option<(f64, f64)>, ToolError> {
    match (args.get_f64("lat")?, args.get_f64("lng")?) {
        (Some(lat), Some(lng)) => {
            validate_coordinate(lat, lng)?;
            Ok(Some((lat, lng)))
        }
        (None, None) => Ok(None),
        _ => Err(ToolError::invalid("'lat' and 'lng' must be provided together")),
    }
}

pub(crate) fn validate_coordinate(lat: f64, lng: f64) -> Result<(), ToolError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ToolError::invalid("'lat' must be between -90 and 90"));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(ToolError::invalid("'lng' must be between -180 and 180"));
    }
    Ok(())
}

/// Optional string arguments must be strings when present
pub(crate) fn validate_strings(args: &ToolArgs, names: &[&str]) -> Result<(), ToolError> {
    for name in names {
        match args.get(name) {
            None | Some(Value::String(_)) => {}
            Some(_) => return Err(ToolError::invalid(format!("'{}' must be a string", name))),
        }
    }
    Ok(())
}

fn language_schema() -> Value {
    json!({
        "type": "string",
        "description": "Language code for results, e.g. 'en'"
    })
}

fn region_schema() -> Value {
    json!({
        "type": "string",
        "description": "Region code (ccTLD), e.g. 'us'"
    })
}

fn lat_lng_schema() -> (Value, Value) {
    (
        json!({"type": "number", "description": "Latitude of the search center; defaults to home"}),
        json!({"type": "number", "description": "Longitude of the search center; defaults to home"}),
    )
}
