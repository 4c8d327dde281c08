//! Directions tool backed by the Routes API

use super::{language_schema, region_schema, validate_strings, MapsContext, TOOL_DIRECTIONS};
use crate::core::{Tool, ToolArgs, ToolError, ToolResult};
use crate::request::{DirectionsOptions, TravelMode};
use crate::time;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

pub const DEPARTURE_TIME_DESCRIPTION: &str = "The time to depart. Accepts date time strings \
like '5:00pm', '3:30pm', or full date times like '2:30pm Monday, March 29th, 2025'. Mutually \
exclusive with arrival_time";

pub const ARRIVAL_TIME_DESCRIPTION: &str = "The desired arrival time. Accepts date time strings \
like '5:00pm', '3:30pm tomorrow', or full date times like '2:30pm Monday, March 29th, 2025'. \
Mutually exclusive with departure_time";

/// Route between two addresses; returns the normalized route list
pub struct DirectionsTool {
    ctx: MapsContext,
}

impl DirectionsTool {
    pub fn new(ctx: MapsContext) -> Self {
        Self { ctx }
    }

    /// Resolve a departure/arrival argument in the configured zone.
    /// Unreadable values drop the constraint instead of failing the call.
    fn resolve_time(&self, args: &ToolArgs, name: &str) -> Option<i64> {
        let value = args.get(name)?;
        let resolved = time::resolve(value, self.ctx.config.time_zone.as_deref());
        if resolved.is_none() {
            warn!(argument = name, value = %value, "ignoring unparseable time");
        }
        resolved
    }
}

#[async_trait]
impl Tool for DirectionsTool {
    fn name(&self) -> &str {
        TOOL_DIRECTIONS
    }

    fn description(&self) -> &str {
        "Get directions between origin and destination"
    }

    fn signature(&self) -> &str {
        "gmaps_directions --origin=<place> --destination=<place> [--mode=driving|walking|bicycling|transit] [--departure_time=<time>] [--arrival_time=<time>] [--avoid=tolls|highways|ferries]"
    }

    fn validate_args(&self, args: &ToolArgs) -> Result<(), ToolError> {
        args.require_text("origin")?;
        args.require_text("destination")?;
        validate_strings(args, &["mode", "language", "region", "units", "avoid"])?;
        if let Some(mode) = args.get_str("mode") {
            if TravelMode::parse(mode).is_none() {
                return Err(ToolError::invalid(format!(
                    "'mode' must be one of {}",
                    TravelMode::NAMES.join(", ")
                )));
            }
        }
        args.get_bool("alternatives")?;
        for name in ["departure_time", "arrival_time"] {
            match args.get(name) {
                None | Some(Value::Number(_)) | Some(Value::String(_)) => {}
                Some(_) => {
                    return Err(ToolError::invalid(format!(
                        "'{}' must be epoch seconds or a date/time string",
                        name
                    )))
                }
            }
        }
        Ok(())
    }

    async fn execute(&self, args: &ToolArgs) -> Result<ToolResult> {
        let config = &self.ctx.config;
        let origin = args.require_text("origin")?;
        let destination = args.require_text("destination")?;

        let options = DirectionsOptions {
            mode: Some(config.travel_mode(args.get_str("mode"))),
            language: Some(config.language(args.get_str("language"))),
            region: config.region(args.get_str("region")),
            alternatives: args.get_bool("alternatives")?,
            units: args.get_str("units").map(str::to_string),
            departure_time: self.resolve_time(args, "departure_time"),
            arrival_time: self.resolve_time(args, "arrival_time"),
            avoid: args.get_str("avoid").map(str::to_string),
        };

        let response = self
            .ctx
            .gateway
            .directions(&origin, &destination, &options)
            .await?;
        let routes = response.get("routes").cloned().unwrap_or_else(|| json!([]));
        Ok(ToolResult::from_json(routes))
    }

    fn get_parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "origin": {"type": "string", "description": "Starting address or place name"},
                "destination": {"type": "string", "description": "Destination address or place name"},
                "mode": {
                    "type": "string",
                    "enum": TravelMode::NAMES,
                    "description": "Travel mode"
                },
                "language": language_schema(),
                "region": region_schema(),
                "alternatives": {
                    "type": "boolean",
                    "description": "Also return alternative routes"
                },
                "units": {
                    "type": "string",
                    "enum": ["metric", "imperial"],
                    "description": "Unit system for distances"
                },
                "departure_time": {
                    "type": ["string", "integer"],
                    "description": DEPARTURE_TIME_DESCRIPTION
                },
                "arrival_time": {
                    "type": ["string", "integer"],
                    "description": ARRIVAL_TIME_DESCRIPTION
                },
                "avoid": {
                    "type": "string",
                    "description": "Pipe separated features to avoid: tolls, highways, ferries"
                }
            },
            "required": ["origin", "destination"]
        })
    }
}
