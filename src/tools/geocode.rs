//! Forward and reverse geocoding tools

use super::{
    language_schema, region_schema, validate_coordinate, validate_strings, MapsContext,
    TOOL_GEOCODE, TOOL_REVERSE_GEOCODE,
};
use crate::core::{Tool, ToolArgs, ToolError, ToolResult};
use crate::normalize::summarize_geocode;
use crate::request::{location_bias_bounds, GeocodeRequest, ReverseGeocodeRequest};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

/// Geocode an address or a component filter, biased toward home
pub struct GeocodeTool {
    ctx: MapsContext,
}

impl GeocodeTool {
    pub fn new(ctx: MapsContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for GeocodeTool {
    fn name(&self) -> &str {
        TOOL_GEOCODE
    }

    fn description(&self) -> &str {
        "Geocode an address or component filter"
    }

    fn signature(&self) -> &str {
        "gmaps_geocode [--address=<text>] [--components=<filter>] [--language=<code>] [--region=<code>]"
    }

    fn validate_args(&self, args: &ToolArgs) -> Result<(), ToolError> {
        validate_strings(args, &["components", "language", "region"])?;
        if args.get_text("address").is_none() && args.get_str("components").is_none() {
            return Err(ToolError::invalid(
                "Provide 'address' or 'components' to geocode",
            ));
        }
        Ok(())
    }

    async fn execute(&self, args: &ToolArgs) -> Result<ToolResult> {
        let config = &self.ctx.config;
        let request = GeocodeRequest {
            address: args.get_text("address"),
            components: args.get_str("components").map(str::to_string),
            language: Some(config.language(args.get_str("language"))),
            region: config.region(args.get_str("region")),
            bounds: config
                .home
                .as_ref()
                .map(|home| location_bias_bounds(home.latitude, home.longitude)),
        };
        debug!(?request, "geocoding");

        let response = self.ctx.gateway.geocode(&request).await?;
        Ok(ToolResult::from_json(summarize_geocode(&response)))
    }

    fn get_parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "string",
                    "description": "Street address or place name to geocode"
                },
                "components": {
                    "type": "string",
                    "description": "Component filter, e.g. 'country:US|postal_code:94043'"
                },
                "language": language_schema(),
                "region": region_schema()
            },
            "required": []
        })
    }
}

/// Reverse geocode a coordinate; same result shape as [`GeocodeTool`]
pub struct ReverseGeocodeTool {
    ctx: MapsContext,
}

impl ReverseGeocodeTool {
    pub fn new(ctx: MapsContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for ReverseGeocodeTool {
    fn name(&self) -> &str {
        TOOL_REVERSE_GEOCODE
    }

    fn description(&self) -> &str {
        "Reverse geocode coordinates"
    }

    fn signature(&self) -> &str {
        "gmaps_reverse_geocode --lat=<degrees> --lng=<degrees> [--language=<code>] [--result_type=<types>] [--location_type=<types>]"
    }

    fn validate_args(&self, args: &ToolArgs) -> Result<(), ToolError> {
        validate_strings(args, &["language", "result_type", "location_type"])?;
        let lat = args
            .get_f64("lat")?
            .ok_or_else(|| ToolError::invalid("Missing required argument 'lat'"))?;
        let lng = args
            .get_f64("lng")?
            .ok_or_else(|| ToolError::invalid("Missing required argument 'lng'"))?;
        validate_coordinate(lat, lng)
    }

    async fn execute(&self, args: &ToolArgs) -> Result<ToolResult> {
        let request = ReverseGeocodeRequest {
            lat: args.get_f64("lat")?.unwrap_or_default(),
            lng: args.get_f64("lng")?.unwrap_or_default(),
            language: Some(self.ctx.config.language(args.get_str("language"))),
            result_type: args.get_str("result_type").map(str::to_string),
            location_type: args.get_str("location_type").map(str::to_string),
        };

        let response = self.ctx.gateway.reverse_geocode(&request).await?;
        Ok(ToolResult::from_json(summarize_geocode(&response)))
    }

    fn get_parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "lat": {"type": "number", "description": "Latitude in degrees"},
                "lng": {"type": "number", "description": "Longitude in degrees"},
                "language": language_schema(),
                "result_type": {
                    "type": "string",
                    "description": "Pipe separated address types, e.g. 'street_address|locality'"
                },
                "location_type": {
                    "type": "string",
                    "description": "Pipe separated location types, e.g. 'ROOFTOP'"
                }
            },
            "required": ["lat", "lng"]
        })
    }
}
